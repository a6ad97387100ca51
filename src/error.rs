//! Broker-level error types shared across flows, stores, and collaborators.
//!
//! Every variant is terminal for the current request; nothing is retried internally. Transport
//! layers map the taxonomy onto status codes via [`crate::http::status_for`].

// self
use crate::{_prelude::*, auth::UserId, ext::RetryDirective};

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical broker error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Token signing backend failure.
	#[error("{0}")]
	Codec(
		#[from]
		#[source]
		crate::codec::CodecError,
	),
	/// User directory backend failure.
	#[error("{0}")]
	Directory(
		#[from]
		#[source]
		crate::ext::DirectoryError,
	),
	/// Session tracker backend failure.
	#[error("{0}")]
	Tracker(
		#[from]
		#[source]
		crate::ext::TrackerError,
	),
	/// Rate limit policy backend failure.
	#[error("{0}")]
	Policy(
		#[from]
		#[source]
		crate::ext::PolicyError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// Refresh token failed verification or is not recognized.
	#[error("Refresh token is invalid: {reason}")]
	InvalidToken {
		/// Human-readable rejection reason; safe to surface to clients.
		reason: String,
	},
	/// Refresh token is past its validity window.
	#[error("Refresh token expired at {expired_at}.")]
	TokenExpired {
		/// Instant the token stopped being valid.
		expired_at: OffsetDateTime,
	},
	/// Refresh token was already consumed by an earlier rotation.
	#[error("Refresh token has already been used; the session has been revoked.")]
	TokenReused,
	/// Supplied fingerprint does not match the one bound to the token.
	#[error("Fingerprint does not match the one bound to the refresh token.")]
	FingerprintMismatch,
	/// Referenced account no longer exists in the user store.
	#[error("User `{user}` no longer exists.")]
	UserNotFound {
		/// Identifier of the missing account.
		user: UserId,
	},
	/// Request rejected by the rate limit policy.
	#[error("Rate limit exceeded; retry in {}s.", .directive.retry_after_secs())]
	RateLimited {
		/// Timing advice for the caller.
		directive: RetryDirective,
	},
}
impl Error {
	/// Convenience constructor for invalid-token rejections.
	pub fn invalid_token(reason: impl Into<String>) -> Self {
		Self::InvalidToken { reason: reason.into() }
	}
}

/// Configuration and validation failures raised by the broker.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Lifetime invariant violated: access tokens must expire before their refresh pair.
	#[error("Access token lifetime must be strictly shorter than the refresh token lifetime.")]
	AccessOutlivesRefresh,
	/// Lifetimes must be positive durations.
	#[error("Token lifetimes must be positive.")]
	NonPositiveLifetime,
	/// Signing keys cannot be empty.
	#[error("Signing key cannot be empty.")]
	EmptySigningKey,
	/// Refresh record builder validation failed.
	#[error("Unable to build refresh record.")]
	RecordBuild(#[from] crate::auth::RefreshRecordBuilderError),
}
