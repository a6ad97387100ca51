//! Shared helpers for flow implementations (pair minting, singleflight guards).

// self
use crate::{
	_prelude::*,
	auth::{
		AccessClaims, FingerprintDigest, RefreshClaims, RefreshRecord, RefreshRecordBuilderError,
		RefreshTokenId, RoleName, SessionId, TokenPair, TokenType, UserId,
	},
	error::ConfigError,
	flows::Broker,
};

/// Mints a brand-new access/refresh pair plus the lineage record to persist.
///
/// The caller decides how the record reaches the store: `issue` saves it directly, the
/// rotating path installs it through the consume-and-replace CAS.
pub(crate) fn mint_pair(
	broker: &Broker,
	user: UserId,
	role: RoleName,
	session: SessionId,
	seq: u32,
	fingerprint: Option<FingerprintDigest>,
	now: OffsetDateTime,
) -> Result<(TokenPair, RefreshRecord)> {
	let access_expires_at = now + broker.lifetimes.access();
	let refresh_expires_at = now + broker.lifetimes.refresh();
	let token_id = RefreshTokenId::random();
	let access_claims =
		AccessClaims::new(user.clone(), role, session.clone(), now, access_expires_at);
	let refresh_claims = RefreshClaims::new(
		user.clone(),
		session.clone(),
		token_id.clone(),
		seq,
		fingerprint.clone(),
		now,
		refresh_expires_at,
	);
	let access_token = broker.codec.sign_access(&access_claims)?;
	let refresh_token = broker.codec.sign_refresh(&refresh_claims)?;
	let record = RefreshRecord::builder(token_id, user, session)
		.seq(seq)
		.maybe_fingerprint(fingerprint)
		.issued_at(now)
		.expires_at(refresh_expires_at)
		.build()
		.map_err(map_record_builder_error)?;
	let pair = TokenPair {
		access_token,
		refresh_token,
		issued_at: now,
		access_expires_at,
		refresh_expires_at,
		token_type: TokenType::Bearer,
	};

	Ok((pair, record))
}

/// Returns (and creates on demand) the singleflight guard for a refresh token.
pub(crate) fn flow_guard(broker: &Broker, id: &RefreshTokenId) -> Arc<AsyncMutex<()>> {
	let mut guards = broker.flow_guards.lock();

	guards.entry(id.clone()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
}

/// Normalizes record builder errors into broker errors.
pub(crate) fn map_record_builder_error(err: RefreshRecordBuilderError) -> Error {
	ConfigError::from(err).into()
}
