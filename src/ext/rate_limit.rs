//! Rate limit policy contract consulted before rotation logic runs.
//!
//! The broker never implements budgeting itself; deployments inject a policy that inspects the
//! caller context and either admits the request or returns a retry directive that surfaces as
//! an HTTP 429 with a retry-after hint.

// self
use crate::{_prelude::*, auth::FingerprintDigest};

/// Boxed future returned by [`RateLimitPolicy::evaluate`].
pub type RateLimitFuture<'a> =
	Pin<Box<dyn Future<Output = Result<RateLimitDecision, PolicyError>> + 'a + Send>>;

/// Error type produced by [`RateLimitPolicy`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum PolicyError {
	/// Backend-level failure of the policy engine.
	#[error("Rate limit backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Strategy that inspects caller budgets before the broker touches token state.
pub trait RateLimitPolicy
where
	Self: Send + Sync,
{
	/// Evaluates whether the request may proceed.
	fn evaluate(&self, context: &RateLimitContext) -> RateLimitFuture<'_>;
}

/// Context shared with a [`RateLimitPolicy`] before a rotation is attempted.
///
/// The gate runs before token verification, so the context carries the transport-visible
/// fingerprint digest rather than an authenticated user identity.
#[derive(Clone, Debug)]
pub struct RateLimitContext {
	/// Logical operation being attempted (issue, rotate, revoke).
	pub operation: &'static str,
	/// Digest of the caller-supplied fingerprint, when one was sent.
	pub fingerprint: Option<FingerprintDigest>,
	/// Timestamp the broker observed before invoking the policy.
	pub observed_at: OffsetDateTime,
}
impl RateLimitContext {
	/// Creates a new context for the given operation.
	pub fn new(operation: &'static str, fingerprint: Option<FingerprintDigest>) -> Self {
		Self { operation, fingerprint, observed_at: OffsetDateTime::now_utc() }
	}

	/// Overrides the timestamp associated with the observation.
	pub fn with_observed_at(mut self, instant: OffsetDateTime) -> Self {
		self.observed_at = instant;

		self
	}
}

/// Result emitted by a [`RateLimitPolicy`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
	/// The request may proceed immediately.
	Allow,
	/// The request should be delayed.
	Delay(RetryDirective),
}

/// Advises callers when to retry after a [`RateLimitDecision::Delay`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryDirective {
	/// Instant when it is safe to retry.
	pub earliest_retry_at: OffsetDateTime,
	/// Suggested backoff duration.
	pub recommended_backoff: Duration,
	/// Optional descriptive string.
	pub reason: Option<String>,
}
impl RetryDirective {
	/// Creates a new directive with the provided timing metadata.
	pub fn new(earliest_retry_at: OffsetDateTime, recommended_backoff: Duration) -> Self {
		Self { earliest_retry_at, recommended_backoff, reason: None }
	}

	/// Adds a human-readable reason.
	pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
		self.reason = Some(reason.into());

		self
	}

	/// Backoff rounded to whole seconds for the retry-after transport hint.
	pub fn retry_after_secs(&self) -> u64 {
		u64::try_from(self.recommended_backoff.whole_seconds()).unwrap_or(0)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn retry_directive_rounds_backoff_to_seconds() {
		let directive =
			RetryDirective::new(OffsetDateTime::now_utc(), Duration::milliseconds(2500))
				.with_reason("burst budget exhausted");

		assert_eq!(directive.retry_after_secs(), 2);
		assert_eq!(directive.reason.as_deref(), Some("burst budget exhausted"));
	}

	#[test]
	fn negative_backoff_clamps_to_zero() {
		let directive = RetryDirective::new(OffsetDateTime::now_utc(), Duration::seconds(-5));

		assert_eq!(directive.retry_after_secs(), 0);
	}
}
