//! Transport contract consumed by HTTP layers.
//!
//! The broker ships no server; this module defines the wire surface any server layer needs:
//! request parsing (JSON body + named cookie), response/error DTOs with camelCase field names,
//! status code mapping for the error taxonomy, and `Set-Cookie` construction for the issued
//! pair.

// crates.io
use cookie::{Cookie, SameSite};
use http::StatusCode;
// self
use crate::{
	_prelude::*,
	auth::{Fingerprint, FingerprintError, TokenPair},
};

/// Name of the cookie carrying the access token.
pub const ACCESS_COOKIE: &str = "access_token";
/// Name of the cookie carrying the refresh token.
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Error produced while interpreting an incoming refresh request.
#[derive(Debug, ThisError)]
pub enum RequestParseError {
	/// The request body is not valid JSON for the expected shape.
	#[error("Request body is not valid JSON at `{}`.", .source.path())]
	Json {
		/// Structured parsing failure including the failing path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The supplied fingerprint failed validation.
	#[error(transparent)]
	Fingerprint(#[from] FingerprintError),
}

/// Incoming refresh request payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RefreshRequest {
	/// Refresh token sent in the body; the named cookie is consulted when absent.
	pub refresh_token: Option<String>,
	/// Raw fingerprint material supplied by the client.
	pub fingerprint: Option<String>,
}
impl RefreshRequest {
	/// Parses a JSON request body, reporting the failing path on malformed input.
	pub fn from_json(body: &[u8]) -> Result<Self, RequestParseError> {
		let mut deserializer = serde_json::Deserializer::from_slice(body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| RequestParseError::Json { source })
	}

	/// Resolves the refresh token from the body field, falling back to the `Cookie` header.
	pub fn resolve_token(&self, cookie_header: Option<&str>) -> Option<String> {
		if let Some(token) = &self.refresh_token {
			return Some(token.clone());
		}

		cookie_header.and_then(refresh_token_from_cookies)
	}

	/// Parses the supplied fingerprint, treating an empty string as absent.
	pub fn parsed_fingerprint(&self) -> Result<Option<Fingerprint>, RequestParseError> {
		match self.fingerprint.as_deref() {
			None | Some("") => Ok(None),
			Some(raw) => Ok(Some(Fingerprint::new(raw)?)),
		}
	}
}

/// Extracts the refresh token from a `Cookie` request header value.
pub fn refresh_token_from_cookies(header: &str) -> Option<String> {
	Cookie::split_parse(header.to_string())
		.filter_map(Result::ok)
		.find(|cookie| cookie.name() == REFRESH_COOKIE)
		.map(|cookie| cookie.value().to_string())
}

/// Success payload returned for issued pairs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
	/// Signed access token.
	pub access_token: String,
	/// Signed refresh token.
	pub refresh_token: String,
	/// Seconds until the access token expires.
	pub expires_in: u64,
	/// Token type descriptor, always `Bearer`.
	pub token_type: String,
}
impl From<&TokenPair> for TokenResponse {
	fn from(pair: &TokenPair) -> Self {
		Self {
			access_token: pair.access_token.expose().to_string(),
			refresh_token: pair.refresh_token.expose().to_string(),
			expires_in: pair.expires_in(),
			token_type: pair.token_type.as_str().to_string(),
		}
	}
}

/// Failure payload returned for rejected requests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
	/// Human-readable failure description.
	pub message: String,
	/// Retry delay hint accompanying rate limit rejections.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub retry_after_secs: Option<u64>,
}
impl From<&Error> for ErrorBody {
	fn from(error: &Error) -> Self {
		let message = match error {
			// Internal failures surface as a generic message without backend detail.
			Error::Storage(_)
			| Error::Codec(_)
			| Error::Directory(_)
			| Error::Tracker(_)
			| Error::Policy(_)
			| Error::Config(_) => "Unexpected internal failure.".into(),
			other => other.to_string(),
		};

		Self { message, retry_after_secs: retry_after_hint(error) }
	}
}

/// Error returned when neither the body field nor the named cookie carried a refresh token.
pub fn missing_token_error() -> Error {
	Error::invalid_token("no refresh token was supplied.")
}

/// Suggested retry delay in seconds for rate-limited requests.
pub fn retry_after_hint(error: &Error) -> Option<u64> {
	match error {
		Error::RateLimited { directive } => Some(directive.retry_after_secs()),
		_ => None,
	}
}

/// Maps broker errors onto response status codes.
pub fn status_for(error: &Error) -> StatusCode {
	match error {
		Error::InvalidToken { .. }
		| Error::TokenExpired { .. }
		| Error::TokenReused
		| Error::FingerprintMismatch => StatusCode::UNAUTHORIZED,
		Error::UserNotFound { .. } => StatusCode::NOT_FOUND,
		Error::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
		Error::Storage(_)
		| Error::Codec(_)
		| Error::Directory(_)
		| Error::Tracker(_)
		| Error::Policy(_)
		| Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
	}
}

/// Attributes applied to both issued cookies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CookieOptions {
	/// Adds the `Secure` attribute; enabled outside local development.
	pub secure: bool,
}
impl Default for CookieOptions {
	fn default() -> Self {
		Self { secure: true }
	}
}

/// Builds the access + refresh `Set-Cookie` pair for an issued token pair.
///
/// Both cookies are `HttpOnly` and `SameSite=Strict`; max-age follows each token's validity.
pub fn token_cookies(
	pair: &TokenPair,
	options: CookieOptions,
) -> (Cookie<'static>, Cookie<'static>) {
	let access = build_cookie(
		ACCESS_COOKIE,
		pair.access_token.expose().to_string(),
		pair.access_expires_at - pair.issued_at,
		options,
	);
	let refresh = build_cookie(
		REFRESH_COOKIE,
		pair.refresh_token.expose().to_string(),
		pair.refresh_validity(),
		options,
	);

	(access, refresh)
}

fn build_cookie(
	name: &'static str,
	value: String,
	max_age: Duration,
	options: CookieOptions,
) -> Cookie<'static> {
	Cookie::build((name, value))
		.path("/")
		.http_only(true)
		.same_site(SameSite::Strict)
		.secure(options.secure)
		.max_age(max_age)
		.build()
}
