//! Auth-domain identifiers, fingerprints, and token models.

pub mod fingerprint;
pub mod id;
pub mod token;

pub use fingerprint::*;
pub use id::*;
pub use token::{claims::*, pair::*, record::*, secret::*};
