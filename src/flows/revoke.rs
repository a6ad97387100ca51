//! Explicit lineage revocation, consumed by logout handlers and abuse response.

// self
use crate::{
	_prelude::*,
	auth::SessionId,
	flows::Broker,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl Broker {
	/// Revokes every refresh token of a session lineage; returns how many were affected.
	///
	/// Consumed tokens are revoked too so the lineage cannot resurface through any path.
	pub async fn revoke_session(&self, session: &SessionId) -> Result<usize> {
		const KIND: FlowKind = FlowKind::Revoke;

		let span = FlowSpan::new(KIND, "revoke_session");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let now = OffsetDateTime::now_utc();
				let affected = self.store.revoke_session(session, now).await?;

				Ok(affected)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}
