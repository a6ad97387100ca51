//! Token models: claim sets, issued pairs, redacted secrets, and lineage records.

pub mod claims;
pub mod pair;
pub mod record;
pub mod secret;
