//! Signing capability seam and the default HMAC-SHA256 implementation.
//!
//! Rotation logic never touches a JWT library directly; it talks to [`TokenCodec`] so the
//! algorithm and backing crate stay swappable. The bundled [`HsTokenCodec`] signs with HS256
//! and deliberately skips expiry validation during decode - the flow enforces validity windows
//! itself so expired and malformed tokens surface as distinct failures.

// crates.io
use jsonwebtoken::{
	Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
	errors::Error as JwtError,
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::{AccessClaims, RefreshClaims, TokenSecret},
	error::ConfigError,
};

/// Error type produced by [`TokenCodec`] implementations.
#[derive(Debug, ThisError)]
pub enum CodecError {
	/// The token is malformed, carries an unexpected shape, or its signature does not verify.
	#[error("Token is malformed or its signature is invalid.")]
	Verification {
		/// Underlying library failure.
		#[source]
		source: JwtError,
	},
	/// The signing backend failed to produce a token.
	#[error("Token signing backend failed.")]
	Signing {
		/// Underlying library failure.
		#[source]
		source: JwtError,
	},
}

/// Capability interface for signing and verifying broker tokens.
pub trait TokenCodec
where
	Self: Send + Sync,
{
	/// Signs access claims into an opaque token string.
	fn sign_access(&self, claims: &AccessClaims) -> Result<TokenSecret, CodecError>;

	/// Signs refresh claims into an opaque token string.
	fn sign_refresh(&self, claims: &RefreshClaims) -> Result<TokenSecret, CodecError>;

	/// Verifies an access token's signature and shape, returning its claims.
	fn verify_access(&self, token: &str) -> Result<AccessClaims, CodecError>;

	/// Verifies a refresh token's signature and shape, returning its claims.
	fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, CodecError>;
}

/// HMAC-SHA256 [`TokenCodec`] backed by a shared secret.
#[derive(Clone)]
pub struct HsTokenCodec {
	enc_key: EncodingKey,
	dec_key: DecodingKey,
	validation: Validation,
}
impl HsTokenCodec {
	/// Builds a codec from the shared signing secret.
	pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, ConfigError> {
		let secret = secret.as_ref();

		if secret.is_empty() {
			return Err(ConfigError::EmptySigningKey);
		}

		let mut validation = Validation::new(Algorithm::HS256);

		// Validity windows are enforced by the rotation flow, not the codec.
		validation.validate_exp = false;
		validation.leeway = 0;

		Ok(Self {
			enc_key: EncodingKey::from_secret(secret),
			dec_key: DecodingKey::from_secret(secret),
			validation,
		})
	}

	fn sign<T>(&self, claims: &T) -> Result<TokenSecret, CodecError>
	where
		T: Serialize,
	{
		encode(&Header::new(Algorithm::HS256), claims, &self.enc_key)
			.map(TokenSecret::new)
			.map_err(|source| CodecError::Signing { source })
	}

	fn verify<T>(&self, token: &str) -> Result<T, CodecError>
	where
		T: DeserializeOwned,
	{
		decode::<T>(token, &self.dec_key, &self.validation)
			.map(|data| data.claims)
			.map_err(|source| CodecError::Verification { source })
	}
}
impl TokenCodec for HsTokenCodec {
	fn sign_access(&self, claims: &AccessClaims) -> Result<TokenSecret, CodecError> {
		self.sign(claims)
	}

	fn sign_refresh(&self, claims: &RefreshClaims) -> Result<TokenSecret, CodecError> {
		self.sign(claims)
	}

	fn verify_access(&self, token: &str) -> Result<AccessClaims, CodecError> {
		self.verify(token)
	}

	fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, CodecError> {
		self.verify(token)
	}
}
impl Debug for HsTokenCodec {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HsTokenCodec").field("secret", &"<redacted>").finish()
	}
}
