//! The credential pair returned to clients.

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Token type descriptor returned alongside every pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenType {
	/// RFC 6750 bearer semantics; the only type this broker issues.
	#[default]
	Bearer,
}
impl TokenType {
	/// Returns the wire representation of the descriptor.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenType::Bearer => "Bearer",
		}
	}
}
impl Display for TokenType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// A freshly issued access/refresh credential pair.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
	/// Short-lived signed access token.
	pub access_token: TokenSecret,
	/// Long-lived signed refresh token.
	pub refresh_token: TokenSecret,
	/// Instant both tokens were minted.
	pub issued_at: OffsetDateTime,
	/// Expiry instant of the access token.
	pub access_expires_at: OffsetDateTime,
	/// Expiry instant of the refresh token; always later than the access expiry.
	pub refresh_expires_at: OffsetDateTime,
	/// Token type descriptor for clients.
	pub token_type: TokenType,
}
impl TokenPair {
	/// Seconds until the access token expires, for client-side refresh scheduling.
	pub fn expires_in(&self) -> u64 {
		let remaining = (self.access_expires_at - self.issued_at).whole_seconds();

		u64::try_from(remaining).unwrap_or(0)
	}

	/// Remaining validity of the refresh token relative to the issuance instant.
	pub fn refresh_validity(&self) -> Duration {
		self.refresh_expires_at - self.issued_at
	}
}
impl Debug for TokenPair {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenPair")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("access_expires_at", &self.access_expires_at)
			.field("refresh_expires_at", &self.refresh_expires_at)
			.field("token_type", &self.token_type)
			.finish()
	}
}
