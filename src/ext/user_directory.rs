//! User directory contract confirming accounts still exist at rotation time.

// self
use crate::{
	_prelude::*,
	auth::{RoleName, UserId},
};

/// Boxed future returned by [`UserDirectory`] lookups.
pub type DirectoryFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, DirectoryError>> + 'a + Send>>;

/// Error type produced by [`UserDirectory`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum DirectoryError {
	/// Backend-level failure of the directory store.
	#[error("User directory backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Minimal account view the broker needs to mint fresh credentials.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	/// Account identifier.
	pub id: UserId,
	/// Current role label; newly minted access tokens carry this, not the one at login.
	pub role: RoleName,
}
impl UserProfile {
	/// Creates a profile for the provided identity.
	pub fn new(id: UserId, role: RoleName) -> Self {
		Self { id, role }
	}
}

/// Lookup contract over the persistent user store.
pub trait UserDirectory
where
	Self: Send + Sync,
{
	/// Fetches the profile for an account, `None` when it no longer exists.
	fn find_user<'a>(&'a self, user: &'a UserId) -> DirectoryFuture<'a, Option<UserProfile>>;
}

/// In-memory [`UserDirectory`] for tests and local development.
#[derive(Clone, Debug, Default)]
pub struct StaticUserDirectory(Arc<RwLock<HashMap<UserId, UserProfile>>>);
impl StaticUserDirectory {
	/// Registers or replaces an account.
	pub fn upsert(&self, profile: UserProfile) {
		self.0.write().insert(profile.id.clone(), profile);
	}

	/// Removes an account, simulating deletion from the persistent store.
	pub fn remove(&self, user: &UserId) -> Option<UserProfile> {
		self.0.write().remove(user)
	}
}
impl UserDirectory for StaticUserDirectory {
	fn find_user<'a>(&'a self, user: &'a UserId) -> DirectoryFuture<'a, Option<UserProfile>> {
		let map = self.0.clone();
		let user = user.to_owned();

		Box::pin(async move { Ok(map.read().get(&user).cloned()) })
	}
}
