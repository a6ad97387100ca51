//! Storage contract and built-in store implementation for rotation state.

pub mod memory;

pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{RefreshRecord, RefreshTokenId, SessionId},
};

/// Boxed future returned by [`RotationStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract for refresh token lineage state.
///
/// Implementations back the replay guarantee: [`consume_and_replace`](Self::consume_and_replace)
/// must check "not yet consumed" and mark "consumed" in one indivisible step, so two concurrent
/// rotations of the same token can never both succeed.
pub trait RotationStore
where
	Self: Send + Sync,
{
	/// Persists a freshly issued refresh record.
	fn save(&self, record: RefreshRecord) -> StoreFuture<'_, ()>;

	/// Fetches the record for a token identifier, if present.
	fn fetch<'a>(&'a self, id: &'a RefreshTokenId) -> StoreFuture<'a, Option<RefreshRecord>>;

	/// Atomically consumes a token and installs its replacement record.
	///
	/// On [`ConsumeOutcome::Replaced`] the old record is marked consumed at `instant` and the
	/// replacement is persisted under its own identifier within the same atomic step.
	fn consume_and_replace<'a>(
		&'a self,
		id: &'a RefreshTokenId,
		instant: OffsetDateTime,
		replacement: RefreshRecord,
	) -> StoreFuture<'a, ConsumeOutcome>;

	/// Marks every record of the session revoked; returns how many were affected.
	fn revoke_session<'a>(
		&'a self,
		session: &'a SessionId,
		instant: OffsetDateTime,
	) -> StoreFuture<'a, usize>;
}

/// Result of an atomic consume-and-replace attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsumeOutcome {
	/// The token was consumed and the replacement record installed.
	Replaced,
	/// The token had already been consumed by an earlier rotation.
	AlreadyConsumed,
	/// The token belongs to a revoked lineage.
	Revoked,
	/// No record exists for the token identifier.
	Missing,
}

/// Error type produced by [`RotationStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
