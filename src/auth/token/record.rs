//! Server-side refresh token state records, lifecycle helpers, and builders.

// self
use crate::{
	_prelude::*,
	auth::{FingerprintDigest, RefreshTokenId, SessionId, UserId},
};

/// Current lifecycle status for a refresh record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefreshStatus {
	/// Token has been issued and may be presented for rotation.
	Issued,
	/// Token exceeded its expiry instant without being consumed.
	Expired,
	/// Token was consumed by a successful rotation; terminal.
	Consumed,
	/// Token was invalidated by logout or lineage revocation; terminal.
	Revoked,
}

/// Errors produced by [`RefreshRecordBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum RefreshRecordBuilderError {
	/// Issued when no expiry (absolute or relative) was configured.
	#[error("Expiry must be supplied via expires_at or expires_in.")]
	MissingExpiry,
}

/// Server-side record tracking one refresh token's lineage state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRecord {
	/// Token identifier; matches the `jti` claim of the signed token.
	pub id: RefreshTokenId,
	/// Account the token was issued to.
	pub user: UserId,
	/// Session lineage the token belongs to.
	pub session: SessionId,
	/// Rotation sequence marker within the lineage.
	pub seq: u32,
	/// Digest of the bound fingerprint, absent for legacy tokens.
	pub fingerprint: Option<FingerprintDigest>,
	/// Issued-at instant.
	pub issued_at: OffsetDateTime,
	/// Expiry instant.
	pub expires_at: OffsetDateTime,
	/// Consumption instant set by a successful rotation.
	pub consumed_at: Option<OffsetDateTime>,
	/// Revocation instant set by logout or lineage revocation.
	pub revoked_at: Option<OffsetDateTime>,
}
impl RefreshRecord {
	/// Returns a builder for the provided identity triple.
	pub fn builder(id: RefreshTokenId, user: UserId, session: SessionId) -> RefreshRecordBuilder {
		RefreshRecordBuilder::new(id, user, session)
	}

	/// Computes the lifecycle status at a given instant.
	///
	/// Revocation and consumption are sticky and take precedence over time-derived expiry.
	pub fn status_at(&self, instant: OffsetDateTime) -> RefreshStatus {
		if self.revoked_at.is_some() {
			return RefreshStatus::Revoked;
		}
		if self.consumed_at.is_some() {
			return RefreshStatus::Consumed;
		}
		if instant >= self.expires_at {
			return RefreshStatus::Expired;
		}

		RefreshStatus::Issued
	}

	/// Returns `true` if the record can still be presented for rotation at the instant.
	pub fn is_issued_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), RefreshStatus::Issued)
	}

	/// Returns `true` if the record has been consumed by a rotation.
	pub fn is_consumed(&self) -> bool {
		self.consumed_at.is_some()
	}

	/// Returns `true` if the record has been revoked.
	pub fn is_revoked(&self) -> bool {
		self.revoked_at.is_some()
	}

	/// Marks the record as consumed.
	pub fn consume(&mut self, instant: OffsetDateTime) {
		self.consumed_at = Some(instant);
	}

	/// Marks the record as revoked.
	pub fn revoke(&mut self, instant: OffsetDateTime) {
		self.revoked_at = Some(instant);
	}
}

/// Builder for [`RefreshRecord`].
#[derive(Clone, Debug)]
pub struct RefreshRecordBuilder {
	id: RefreshTokenId,
	user: UserId,
	session: SessionId,
	seq: u32,
	fingerprint: Option<FingerprintDigest>,
	issued_at: Option<OffsetDateTime>,
	expires_at: Option<OffsetDateTime>,
	expires_in: Option<Duration>,
}
impl RefreshRecordBuilder {
	fn new(id: RefreshTokenId, user: UserId, session: SessionId) -> Self {
		Self {
			id,
			user,
			session,
			seq: 0,
			fingerprint: None,
			issued_at: None,
			expires_at: None,
			expires_in: None,
		}
	}

	/// Sets the rotation sequence marker.
	pub fn seq(mut self, seq: u32) -> Self {
		self.seq = seq;

		self
	}

	/// Binds the record to a fingerprint digest.
	pub fn fingerprint(mut self, digest: FingerprintDigest) -> Self {
		self.fingerprint = Some(digest);

		self
	}

	/// Binds the record to an optional fingerprint digest.
	pub fn maybe_fingerprint(mut self, digest: Option<FingerprintDigest>) -> Self {
		self.fingerprint = digest;

		self
	}

	/// Sets the issued-at instant.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = Some(instant);

		self
	}

	/// Sets an absolute expiry instant.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Sets a relative expiry duration from the issued instant.
	pub fn expires_in(mut self, duration: Duration) -> Self {
		self.expires_in = Some(duration);

		self
	}

	/// Consumes the builder and produces a [`RefreshRecord`].
	pub fn build(self) -> Result<RefreshRecord, RefreshRecordBuilderError> {
		let issued_at = self.issued_at.unwrap_or_else(OffsetDateTime::now_utc);
		let expires_at = match (self.expires_at, self.expires_in) {
			(Some(instant), _) => instant,
			(None, Some(delta)) => issued_at + delta,
			(None, None) => return Err(RefreshRecordBuilderError::MissingExpiry),
		};

		Ok(RefreshRecord {
			id: self.id,
			user: self.user,
			session: self.session,
			seq: self.seq,
			fingerprint: self.fingerprint,
			issued_at,
			expires_at,
			consumed_at: None,
			revoked_at: None,
		})
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn build_record() -> RefreshRecord {
		RefreshRecord::builder(
			RefreshTokenId::new("jti-1").expect("Token id fixture should be valid."),
			UserId::new("42").expect("User fixture should be valid."),
			SessionId::new("s1").expect("Session fixture should be valid."),
		)
		.issued_at(macros::datetime!(2025-01-01 00:00 UTC))
		.expires_at(macros::datetime!(2025-01-08 00:00 UTC))
		.build()
		.expect("Refresh record fixture should build successfully.")
	}

	#[test]
	fn status_transitions_cover_all_states() {
		let mut record = build_record();

		assert_eq!(
			record.status_at(macros::datetime!(2025-01-02 00:00 UTC)),
			RefreshStatus::Issued
		);
		assert_eq!(
			record.status_at(macros::datetime!(2025-01-08 00:00 UTC)),
			RefreshStatus::Expired
		);

		record.consume(macros::datetime!(2025-01-02 00:00 UTC));

		assert_eq!(
			record.status_at(macros::datetime!(2025-01-03 00:00 UTC)),
			RefreshStatus::Consumed
		);

		record.revoke(macros::datetime!(2025-01-04 00:00 UTC));

		assert_eq!(
			record.status_at(macros::datetime!(2025-01-05 00:00 UTC)),
			RefreshStatus::Revoked
		);
	}

	#[test]
	fn consumption_is_terminal_even_after_expiry() {
		let mut record = build_record();

		record.consume(macros::datetime!(2025-01-02 00:00 UTC));

		assert_eq!(
			record.status_at(macros::datetime!(2025-02-01 00:00 UTC)),
			RefreshStatus::Consumed
		);
		assert!(!record.is_issued_at(macros::datetime!(2025-01-03 00:00 UTC)));
	}

	#[test]
	fn builder_handles_relative_expiry() {
		let record = RefreshRecord::builder(
			RefreshTokenId::random(),
			UserId::new("42").expect("User fixture should be valid."),
			SessionId::new("s1").expect("Session fixture should be valid."),
		)
		.seq(2)
		.issued_at(macros::datetime!(2025-01-01 00:00 UTC))
		.expires_in(Duration::days(7))
		.build()
		.expect("Relative expiry should be supported.");

		assert_eq!(record.expires_at, macros::datetime!(2025-01-08 00:00 UTC));
		assert_eq!(record.seq, 2);
	}

	#[test]
	fn builder_requires_an_expiry() {
		let result = RefreshRecord::builder(
			RefreshTokenId::random(),
			UserId::new("42").expect("User fixture should be valid."),
			SessionId::new("s1").expect("Session fixture should be valid."),
		)
		.build();

		assert_eq!(result.unwrap_err(), RefreshRecordBuilderError::MissingExpiry);
	}
}
