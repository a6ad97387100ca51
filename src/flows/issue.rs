//! Fresh pair issuance, consumed by login handlers.

// self
use crate::{
	_prelude::*,
	auth::{Fingerprint, RoleName, SessionId, TokenPair, UserId},
	flows::{Broker, common},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl Broker {
	/// Issues a brand-new credential pair with no prior lineage.
	///
	/// Called at login time after the caller has already authenticated the account. Passing a
	/// fingerprint binds the refresh token to the requesting client; omitting it produces a
	/// legacy unbound token that refreshes without rotation.
	pub async fn issue(
		&self,
		user: UserId,
		role: RoleName,
		session: SessionId,
		fingerprint: Option<&Fingerprint>,
	) -> Result<TokenPair> {
		const KIND: FlowKind = FlowKind::Issue;

		let span = FlowSpan::new(KIND, "issue");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let now = OffsetDateTime::now_utc();
				let (pair, record) = common::mint_pair(
					self,
					user,
					role,
					session,
					0,
					fingerprint.map(|fp| fp.digest()),
					now,
				)?;

				self.store.save(record).await?;

				Ok(pair)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}
