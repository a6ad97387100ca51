//! Thread-safe in-memory [`RotationStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{RefreshRecord, RefreshTokenId, SessionId},
	store::{ConsumeOutcome, RotationStore, StoreError, StoreFuture},
};

type RecordMap = Arc<RwLock<HashMap<RefreshTokenId, RefreshRecord>>>;

/// Thread-safe storage backend that keeps rotation state in-process.
///
/// The consume-and-replace step holds one write lock across the status check, the consumption
/// mark, and the replacement insert, which is what makes the replay guarantee hold under
/// concurrent rotations of the same token.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(RecordMap);
impl MemoryStore {
	/// Number of records currently held, consumed and revoked ones included.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when the store holds no records.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn consume_now(
		map: RecordMap,
		id: RefreshTokenId,
		instant: OffsetDateTime,
		replacement: RefreshRecord,
	) -> ConsumeOutcome {
		let mut guard = map.write();
		let outcome = match guard.get(&id) {
			Some(existing) if existing.is_revoked() => ConsumeOutcome::Revoked,
			Some(existing) if existing.is_consumed() => ConsumeOutcome::AlreadyConsumed,
			Some(_) => ConsumeOutcome::Replaced,
			None => ConsumeOutcome::Missing,
		};

		if matches!(outcome, ConsumeOutcome::Replaced) {
			if let Some(existing) = guard.get_mut(&id) {
				existing.consume(instant);
			}

			guard.insert(replacement.id.clone(), replacement);
		}

		outcome
	}

	fn revoke_session_now(map: RecordMap, session: SessionId, instant: OffsetDateTime) -> usize {
		let mut guard = map.write();
		let mut affected = 0;

		for record in guard.values_mut().filter(|record| record.session == session) {
			if !record.is_revoked() {
				record.revoke(instant);

				affected += 1;
			}
		}

		affected
	}
}
impl RotationStore for MemoryStore {
	fn save(&self, record: RefreshRecord) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().insert(record.id.clone(), record);

			Ok(())
		})
	}

	fn fetch<'a>(&'a self, id: &'a RefreshTokenId) -> StoreFuture<'a, Option<RefreshRecord>> {
		let map = self.0.clone();
		let id = id.to_owned();

		Box::pin(async move { Ok(map.read().get(&id).cloned()) })
	}

	fn consume_and_replace<'a>(
		&'a self,
		id: &'a RefreshTokenId,
		instant: OffsetDateTime,
		replacement: RefreshRecord,
	) -> StoreFuture<'a, ConsumeOutcome> {
		let map = self.0.clone();
		let id = id.to_owned();

		Box::pin(async move { Ok(Self::consume_now(map, id, instant, replacement)) })
	}

	fn revoke_session<'a>(
		&'a self,
		session: &'a SessionId,
		instant: OffsetDateTime,
	) -> StoreFuture<'a, usize> {
		let map = self.0.clone();
		let session = session.to_owned();

		Box::pin(async move { Ok(Self::revoke_session_now(map, session, instant)) })
	}
}
