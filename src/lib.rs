//! Turnkey credential rotation for web portals—fingerprint-bound refresh tokens, CAS-backed
//! replay protection, and transport-aware observability in one crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod codec;
pub mod error;
pub mod ext;
pub mod flows;
pub mod http;
pub mod obs;
pub mod store;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{RoleName, UserId},
		codec::{HsTokenCodec, TokenCodec},
		ext::{NullSessionTracker, SessionTracker, StaticUserDirectory, UserDirectory, UserProfile},
		flows::Broker,
		store::{MemoryStore, RotationStore},
	};

	/// Signing secret shared by broker test fixtures.
	pub const TEST_SIGNING_KEY: &str = "test-signing-key";

	/// Constructs a [`Broker`] backed by in-memory collaborators, returning the backend handles
	/// tests need to poke state directly.
	pub fn build_test_broker() -> (Broker, Arc<MemoryStore>, Arc<StaticUserDirectory>) {
		let store_backend = Arc::new(MemoryStore::default());
		let directory_backend = Arc::new(StaticUserDirectory::default());
		let store: Arc<dyn RotationStore> = store_backend.clone();
		let directory: Arc<dyn UserDirectory> = directory_backend.clone();
		let codec: Arc<dyn TokenCodec> =
			Arc::new(HsTokenCodec::new(TEST_SIGNING_KEY).expect("Test codec should build."));
		let sessions: Arc<dyn SessionTracker> = Arc::new(NullSessionTracker);
		let broker = Broker::new(store, codec, directory, sessions);

		(broker, store_backend, directory_backend)
	}

	/// Registers an account with the given role and returns its identifiers.
	pub fn register_account(
		directory: &StaticUserDirectory,
		user: &str,
		role: &str,
	) -> (UserId, RoleName) {
		let id = UserId::new(user).expect("User fixture should be valid.");
		let role = RoleName::new(role).expect("Role fixture should be valid.");

		directory.upsert(UserProfile::new(id.clone(), role.clone()));

		(id, role)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};

	pub use crate::error::{Error, Result};
}

#[cfg(test)] use tokio as _;
