//! High-level credential flows coordinated by the broker.

pub mod issue;
pub mod revoke;
pub mod rotate;

mod common;

pub use rotate::*;

// self
use crate::{
	_prelude::*,
	auth::{Fingerprint, RefreshTokenId},
	codec::TokenCodec,
	error::ConfigError,
	ext::{RateLimitContext, RateLimitDecision, RateLimitPolicy, SessionTracker, UserDirectory},
	store::RotationStore,
};

/// Validated access/refresh validity windows.
///
/// The access window is always strictly shorter than the refresh window; constructors reject
/// any other combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenLifetimes {
	access: Duration,
	refresh: Duration,
}
impl TokenLifetimes {
	/// Default access token validity.
	pub const DEFAULT_ACCESS: Duration = Duration::minutes(5);
	/// Default refresh token validity.
	pub const DEFAULT_REFRESH: Duration = Duration::days(7);

	/// Creates validated lifetimes.
	pub fn new(access: Duration, refresh: Duration) -> Result<Self, ConfigError> {
		if !access.is_positive() || !refresh.is_positive() {
			return Err(ConfigError::NonPositiveLifetime);
		}
		if access >= refresh {
			return Err(ConfigError::AccessOutlivesRefresh);
		}

		Ok(Self { access, refresh })
	}

	/// Access token validity window.
	pub fn access(&self) -> Duration {
		self.access
	}

	/// Refresh token validity window.
	pub fn refresh(&self) -> Duration {
		self.refresh
	}
}
impl Default for TokenLifetimes {
	fn default() -> Self {
		Self { access: Self::DEFAULT_ACCESS, refresh: Self::DEFAULT_REFRESH }
	}
}

/// Coordinates credential issuance, rotation, and revocation for one deployment.
///
/// The broker owns the rotation store, the signing codec, and the collaborator handles so
/// individual flow implementations can focus on their own semantics (fingerprint binding,
/// CAS consumption, lineage revocation). All collaborators are trait objects; tests inject
/// in-memory fakes and production wires real backends.
#[derive(Clone)]
pub struct Broker {
	/// Rotation-state store holding refresh token lineage records.
	pub store: Arc<dyn RotationStore>,
	/// Signing capability used to mint and verify tokens.
	pub codec: Arc<dyn TokenCodec>,
	/// User store consulted before minting fresh credentials.
	pub directory: Arc<dyn UserDirectory>,
	/// Session-activity collaborator notified after successful rotations.
	pub sessions: Arc<dyn SessionTracker>,
	/// Optional request budget gate consulted before rotation logic runs.
	pub rate_limit: Option<Arc<dyn RateLimitPolicy>>,
	/// Validity windows applied to every minted pair.
	pub lifetimes: TokenLifetimes,
	/// Shared metrics recorder for rotation outcomes.
	pub rotate_metrics: Arc<RotateMetrics>,
	legacy_refresh: bool,
	flow_guards: Arc<Mutex<HashMap<RefreshTokenId, Arc<AsyncMutex<()>>>>>,
}
impl Broker {
	/// Creates a broker with default lifetimes, no rate limiting, and the legacy static
	/// refresh path enabled.
	pub fn new(
		store: Arc<dyn RotationStore>,
		codec: Arc<dyn TokenCodec>,
		directory: Arc<dyn UserDirectory>,
		sessions: Arc<dyn SessionTracker>,
	) -> Self {
		Self {
			store,
			codec,
			directory,
			sessions,
			rate_limit: None,
			lifetimes: TokenLifetimes::default(),
			rotate_metrics: Default::default(),
			legacy_refresh: true,
			flow_guards: Default::default(),
		}
	}

	/// Replaces the validity windows applied to minted pairs.
	pub fn with_lifetimes(mut self, lifetimes: TokenLifetimes) -> Self {
		self.lifetimes = lifetimes;

		self
	}

	/// Installs a rate limit policy consulted before each rotation.
	pub fn with_rate_limit(mut self, policy: Arc<dyn RateLimitPolicy>) -> Self {
		self.rate_limit = Some(policy);

		self
	}

	/// Enables or disables the legacy static refresh path for unbound tokens.
	pub fn with_legacy_refresh(mut self, enabled: bool) -> Self {
		self.legacy_refresh = enabled;

		self
	}

	/// Returns `true` when unbound tokens may still refresh without rotation.
	pub fn legacy_refresh_enabled(&self) -> bool {
		self.legacy_refresh
	}

	pub(crate) async fn check_rate_limit(
		&self,
		operation: &'static str,
		fingerprint: Option<&Fingerprint>,
	) -> crate::error::Result<()> {
		let Some(policy) = &self.rate_limit else {
			return Ok(());
		};
		let context = RateLimitContext::new(operation, fingerprint.map(|fp| fp.digest()));

		match policy.evaluate(&context).await? {
			RateLimitDecision::Allow => Ok(()),
			RateLimitDecision::Delay(directive) => Err(Error::RateLimited { directive }),
		}
	}
}
impl Debug for Broker {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Broker")
			.field("lifetimes", &self.lifetimes)
			.field("legacy_refresh", &self.legacy_refresh)
			.field("rate_limit_set", &self.rate_limit.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn lifetimes_enforce_the_ordering_invariant() {
		assert!(matches!(
			TokenLifetimes::new(Duration::days(7), Duration::minutes(5)),
			Err(ConfigError::AccessOutlivesRefresh)
		));
		assert!(matches!(
			TokenLifetimes::new(Duration::minutes(5), Duration::minutes(5)),
			Err(ConfigError::AccessOutlivesRefresh)
		));
		assert!(matches!(
			TokenLifetimes::new(Duration::ZERO, Duration::days(7)),
			Err(ConfigError::NonPositiveLifetime)
		));

		let lifetimes = TokenLifetimes::new(Duration::minutes(5), Duration::days(7))
			.expect("Reference lifetimes should be accepted.");

		assert!(lifetimes.access() < lifetimes.refresh());
	}

	#[test]
	fn default_lifetimes_match_the_reference_behavior() {
		let lifetimes = TokenLifetimes::default();

		assert_eq!(lifetimes.access(), Duration::minutes(5));
		assert_eq!(lifetimes.refresh(), Duration::days(7));
	}

	#[tokio::test]
	async fn test_prelude_brokers_issue_and_rotate() {
		use crate::{
			_preludet::{build_test_broker, register_account},
			auth::{Fingerprint, SessionId},
		};

		let (broker, _, directory) = build_test_broker();
		let (user, role) = register_account(&directory, "42", "patient");
		let session = SessionId::new("s1").expect("Session fixture should be valid.");
		let fingerprint = Fingerprint::new("fp-a").expect("Fingerprint fixture should be valid.");
		let pair = broker
			.issue(user, role, session, Some(&fingerprint))
			.await
			.expect("Issuing via the test prelude broker should succeed.");

		broker
			.rotate(pair.refresh_token.expose(), Some(&fingerprint))
			.await
			.expect("Rotating via the test prelude broker should succeed.");
	}
}
