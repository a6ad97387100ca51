//! Refresh rotation with fingerprint binding, CAS consumption, and replay response.
//!
//! [`Broker::rotate`] validates the presented refresh token, selects a
//! [`RotationStrategy`] from the token's fingerprint binding, and either consumes the token
//! atomically (issuing a full replacement pair) or serves the legacy static path for unbound
//! tokens. A replayed token burns its whole session lineage: reuse signals possible theft, so
//! every descendant refresh token of that session is revoked before the failure is returned.

mod metrics;

pub use metrics::RotateMetrics;

// self
use crate::{
	_prelude::*,
	auth::{
		AccessClaims, Fingerprint, FingerprintDigest, RefreshClaims, TokenPair, TokenSecret,
		TokenType,
	},
	flows::{Broker, common},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	store::ConsumeOutcome,
};

/// Named refresh strategies selected per request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotationStrategy {
	/// Fingerprint-bound path: the refresh token is consumed and replaced on every use.
	RotatingRefresh,
	/// Unbound legacy path: the same refresh token stays valid until natural expiry.
	LegacyStaticRefresh,
}
impl RotationStrategy {
	/// Selects the strategy from a token's binding and the caller-supplied fingerprint.
	///
	/// A bound token presented without a matching fingerprint is rejected outright; the
	/// binding is never silently dropped.
	pub fn select(
		bound: Option<&FingerprintDigest>,
		supplied: Option<&Fingerprint>,
	) -> Result<Self> {
		match (bound, supplied) {
			(Some(digest), Some(fingerprint)) if digest.matches(fingerprint) =>
				Ok(Self::RotatingRefresh),
			(Some(_), _) => Err(Error::FingerprintMismatch),
			(None, _) => Ok(Self::LegacyStaticRefresh),
		}
	}
}

impl Broker {
	/// Validates a refresh token and exchanges it for a fresh credential pair.
	pub async fn rotate(
		&self,
		refresh_token: &str,
		fingerprint: Option<&Fingerprint>,
	) -> Result<TokenPair> {
		const KIND: FlowKind = FlowKind::Rotate;

		let span = FlowSpan::new(KIND, "rotate");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.rotate_metrics.record_attempt();

		let result = span.instrument(self.rotate_checked(refresh_token, fingerprint)).await;

		match &result {
			Ok(_) => {
				self.rotate_metrics.record_success();
				obs::record_flow_outcome(KIND, FlowOutcome::Success);
			},
			Err(_) => {
				self.rotate_metrics.record_failure();
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
			},
		}

		result
	}

	async fn rotate_checked(
		&self,
		refresh_token: &str,
		fingerprint: Option<&Fingerprint>,
	) -> Result<TokenPair> {
		self.check_rate_limit("rotate", fingerprint).await?;

		let now = OffsetDateTime::now_utc();
		let claims = self
			.codec
			.verify_refresh(refresh_token)
			.map_err(|_| Error::invalid_token("signature verification failed."))?;
		let expires_at = claims.expires_at();

		if now >= expires_at {
			return Err(Error::TokenExpired { expired_at: expires_at });
		}

		match RotationStrategy::select(claims.fph.as_ref(), fingerprint)? {
			RotationStrategy::RotatingRefresh => self.rotate_bound(claims, now).await,
			RotationStrategy::LegacyStaticRefresh =>
				self.refresh_static(refresh_token, claims, now).await,
		}
	}

	async fn rotate_bound(&self, claims: RefreshClaims, now: OffsetDateTime) -> Result<TokenPair> {
		let guard = common::flow_guard(self, &claims.jti);
		let _exclusive = guard.lock().await;
		let profile = self
			.directory
			.find_user(&claims.sub)
			.await?
			.ok_or_else(|| Error::UserNotFound { user: claims.sub.clone() })?;
		let (pair, replacement) = common::mint_pair(
			self,
			profile.id,
			profile.role,
			claims.sid.clone(),
			claims.seq.saturating_add(1),
			claims.fph.clone(),
			now,
		)?;

		match self.store.consume_and_replace(&claims.jti, now, replacement).await? {
			ConsumeOutcome::Replaced => {},
			ConsumeOutcome::AlreadyConsumed => {
				// Replay signals possible theft; burn the whole lineage.
				let _ = self.store.revoke_session(&claims.sid, now).await;

				return Err(Error::TokenReused);
			},
			ConsumeOutcome::Revoked =>
				return Err(Error::invalid_token("the session has been revoked.")),
			ConsumeOutcome::Missing =>
				return Err(Error::invalid_token("the token is not recognized.")),
		}

		self.sessions.touch(&claims.sid, &pair.access_token).await?;

		Ok(pair)
	}

	async fn refresh_static(
		&self,
		refresh_token: &str,
		claims: RefreshClaims,
		now: OffsetDateTime,
	) -> Result<TokenPair> {
		if !self.legacy_refresh_enabled() {
			return Err(Error::invalid_token(
				"a fingerprint is required; legacy static refresh is disabled.",
			));
		}

		let record = self
			.store
			.fetch(&claims.jti)
			.await?
			.ok_or_else(|| Error::invalid_token("the token is not recognized."))?;

		if record.is_revoked() {
			return Err(Error::invalid_token("the session has been revoked."));
		}
		if record.is_consumed() {
			return Err(Error::TokenReused);
		}

		let profile = self
			.directory
			.find_user(&claims.sub)
			.await?
			.ok_or_else(|| Error::UserNotFound { user: claims.sub.clone() })?;
		// The reissued access token never outlives the remaining refresh window.
		let access_expires_at = (now + self.lifetimes.access()).min(claims.expires_at());
		let access_claims =
			AccessClaims::new(profile.id, profile.role, claims.sid.clone(), now, access_expires_at);
		let access_token = self.codec.sign_access(&access_claims)?;
		let pair = TokenPair {
			access_token,
			refresh_token: TokenSecret::new(refresh_token),
			issued_at: now,
			access_expires_at,
			refresh_expires_at: claims.expires_at(),
			token_type: TokenType::Bearer,
		};

		self.sessions.touch(&claims.sid, &pair.access_token).await?;

		Ok(pair)
	}
}
