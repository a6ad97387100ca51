//! Session activity contract notified after successful rotations.

// self
use crate::{
	_prelude::*,
	auth::{SessionId, TokenSecret},
};

/// Boxed future returned by [`SessionTracker::touch`].
pub type TrackerFuture<'a> = Pin<Box<dyn Future<Output = Result<(), TrackerError>> + 'a + Send>>;

/// Error type produced by [`SessionTracker`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum TrackerError {
	/// Backend-level failure of the session store.
	#[error("Session tracker backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Contract for the session-activity collaborator.
///
/// The broker does not own session records; it only reports which access token became the
/// active one for a session after a successful rotation.
pub trait SessionTracker
where
	Self: Send + Sync,
{
	/// Records that `access_token` is now the active credential for `session`.
	fn touch<'a>(
		&'a self,
		session: &'a SessionId,
		access_token: &'a TokenSecret,
	) -> TrackerFuture<'a>;
}

/// No-op [`SessionTracker`] for deployments without activity tracking.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSessionTracker;
impl SessionTracker for NullSessionTracker {
	fn touch<'a>(
		&'a self,
		_session: &'a SessionId,
		_access_token: &'a TokenSecret,
	) -> TrackerFuture<'a> {
		Box::pin(async { Ok(()) })
	}
}
