//! Client fingerprint modeling and digesting.
//!
//! A fingerprint is an opaque, caller-derived identifier for the device that received a token
//! pair. The raw value never leaves the process inside a token; refresh tokens embed a stable
//! base64 (no padding) SHA-256 digest instead, and rotation compares digests.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

/// Error returned when fingerprint validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum FingerprintError {
	/// Empty fingerprints carry no binding information and are rejected.
	#[error("Fingerprint cannot be empty.")]
	Empty,
}

/// Opaque client identifier supplied by the transport layer.
///
/// Treated as sensitive: `Debug` and `Display` redact the raw value.
#[derive(Clone, PartialEq, Eq)]
pub struct Fingerprint(String);
impl Fingerprint {
	/// Wraps a caller-supplied fingerprint after validation.
	pub fn new(value: impl Into<String>) -> Result<Self, FingerprintError> {
		let value = value.into();

		if value.is_empty() {
			return Err(FingerprintError::Empty);
		}

		Ok(Self(value))
	}

	/// Computes the stable digest embedded into refresh tokens.
	pub fn digest(&self) -> FingerprintDigest {
		FingerprintDigest(STANDARD_NO_PAD.encode(Sha256::digest(self.0.as_bytes())))
	}
}
impl Debug for Fingerprint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Fingerprint").field(&"<redacted>").finish()
	}
}
impl Display for Fingerprint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Stable digest of a [`Fingerprint`], safe to embed in claims and logs.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FingerprintDigest(String);
impl FingerprintDigest {
	/// Returns `true` when the digest matches the supplied raw fingerprint.
	pub fn matches(&self, fingerprint: &Fingerprint) -> bool {
		self == &fingerprint.digest()
	}

	/// Returns the encoded digest string.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Display for FingerprintDigest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
