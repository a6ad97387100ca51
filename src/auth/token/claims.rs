//! Claim sets embedded into signed access and refresh tokens.

// self
use crate::{
	_prelude::*,
	auth::{FingerprintDigest, RefreshTokenId, RoleName, SessionId, UserId},
};

/// Claims carried by a short-lived access token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
	/// Account the token authenticates.
	pub sub: UserId,
	/// Role label granted to the account at issuance.
	pub role: RoleName,
	/// Session the token belongs to.
	pub sid: SessionId,
	/// Issued-at instant as a unix timestamp.
	pub iat: i64,
	/// Expiry instant as a unix timestamp.
	pub exp: i64,
}
impl AccessClaims {
	/// Builds access claims for the provided identity and validity window.
	pub fn new(
		user: UserId,
		role: RoleName,
		session: SessionId,
		issued_at: OffsetDateTime,
		expires_at: OffsetDateTime,
	) -> Self {
		Self {
			sub: user,
			role,
			sid: session,
			iat: issued_at.unix_timestamp(),
			exp: expires_at.unix_timestamp(),
		}
	}

	/// Expiry instant decoded from the `exp` claim.
	pub fn expires_at(&self) -> OffsetDateTime {
		OffsetDateTime::from_unix_timestamp(self.exp).unwrap_or(OffsetDateTime::UNIX_EPOCH)
	}
}

/// Claims carried by a long-lived refresh token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
	/// Account the token refreshes credentials for.
	pub sub: UserId,
	/// Session the token belongs to.
	pub sid: SessionId,
	/// Unique token identifier used as the rotation-store key.
	pub jti: RefreshTokenId,
	/// Rotation sequence marker, incremented on every successful rotation.
	pub seq: u32,
	/// Digest of the fingerprint the token is bound to, absent for legacy tokens.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fph: Option<FingerprintDigest>,
	/// Issued-at instant as a unix timestamp.
	pub iat: i64,
	/// Expiry instant as a unix timestamp.
	pub exp: i64,
}
impl RefreshClaims {
	/// Builds refresh claims for the provided identity and validity window.
	#[allow(clippy::too_many_arguments)]
	pub fn new(
		user: UserId,
		session: SessionId,
		token_id: RefreshTokenId,
		seq: u32,
		fingerprint: Option<FingerprintDigest>,
		issued_at: OffsetDateTime,
		expires_at: OffsetDateTime,
	) -> Self {
		Self {
			sub: user,
			sid: session,
			jti: token_id,
			seq,
			fph: fingerprint,
			iat: issued_at.unix_timestamp(),
			exp: expires_at.unix_timestamp(),
		}
	}

	/// Expiry instant decoded from the `exp` claim.
	pub fn expires_at(&self) -> OffsetDateTime {
		OffsetDateTime::from_unix_timestamp(self.exp).unwrap_or(OffsetDateTime::UNIX_EPOCH)
	}
}
