//! Strongly typed identifiers shared across the rotation domain.

// std
use std::{borrow::Borrow, ops::Deref};
// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::_prelude::*;

macro_rules! domain_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				check_identifier($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				check_identifier($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;
const TOKEN_ID_LEN: usize = 32;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (user, session, role, refresh token).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (user, session, role, refresh token).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (user, session, role, refresh token).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

domain_id! { UserId, "Unique identifier for a portal account.", "User" }
domain_id! { SessionId, "Unique identifier for a login session.", "Session" }
domain_id! { RoleName, "Role label carried inside access tokens.", "Role" }
domain_id! { RefreshTokenId, "Unique identifier (jti) minted per refresh token.", "RefreshToken" }

impl RefreshTokenId {
	/// Mints a random alphanumeric token identifier.
	pub fn random() -> Self {
		Self(rand::rng().sample_iter(Alphanumeric).take(TOKEN_ID_LEN).map(char::from).collect())
	}
}

fn check_identifier(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_whitespace_and_empty_values() {
		assert!(UserId::new("").is_err());
		assert!(UserId::new("user 42").is_err());
		assert!(SessionId::new(" s1").is_err());
		assert!(RoleName::new("patient\n").is_err());

		let user = UserId::new("42").expect("Numeric user identifier should be accepted.");

		assert_eq!(user.as_ref(), "42");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let session: SessionId =
			serde_json::from_str("\"s1\"").expect("Session identifier should deserialize.");

		assert_eq!(session.as_ref(), "s1");
		assert!(serde_json::from_str::<SessionId>("\"s 1\"").is_err());
		assert!(serde_json::from_str::<RoleName>("\"\"").is_err());
	}

	#[test]
	fn length_limit_is_enforced_exactly() {
		let exact = "a".repeat(IDENTIFIER_MAX_LEN);

		UserId::new(&exact).expect("Identifier at the length limit should be accepted.");

		assert!(UserId::new(format!("{exact}a")).is_err());
	}

	#[test]
	fn random_token_ids_are_valid_and_distinct() {
		let first = RefreshTokenId::random();
		let second = RefreshTokenId::random();

		assert_eq!(first.len(), TOKEN_ID_LEN);
		assert_ne!(first, second);
		RefreshTokenId::new(first.as_ref())
			.expect("Random token identifiers should satisfy validation.");
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<SessionId, u8> =
			HashMap::from_iter([(SessionId::new("s1").expect("Session fixture should be valid."), 1_u8)]);

		assert_eq!(map.get("s1"), Some(&1));
	}
}
