//! Tenant and client identifiers, validated once so URL assembly can trust them.
//!
//! A tenant lands verbatim in every token and Graph path, so it is restricted to the
//! characters a directory GUID or a verified domain can contain. Client ids only travel in
//! form bodies and just have to be a single non-empty token.

// std
use std::ops::Deref;
// self
use crate::_prelude::*;

const MAX_LEN: usize = 256;

macro_rules! def_id {
	($(#[$meta:meta])* $name:ident, $label:literal, $check:path) => {
		$(#[$meta])*
		#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Validates `value` and wraps it.
			pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
				let value = value.into();

				$check($label, &value)?;

				Ok(Self(value))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &str {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				Self::new(value)
			}
		}
		impl From<$name> for String {
			fn from(id: $name) -> Self {
				id.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, "{}({})", $label, self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
	};
}

/// Why an identifier was rejected.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum IdentifierError {
	/// Nothing was supplied.
	#[error("{kind} id cannot be empty")]
	Empty {
		/// `Tenant` or `Client`.
		kind: &'static str,
	},
	/// A character outside the allowed set was found.
	#[error("{kind} id contains the disallowed character {found:?}")]
	InvalidChar {
		/// `Tenant` or `Client`.
		kind: &'static str,
		/// First offending character.
		found: char,
	},
	/// The value is longer than any directory accepts.
	#[error("{kind} id is longer than {max} bytes")]
	TooLong {
		/// `Tenant` or `Client`.
		kind: &'static str,
		/// Upper bound in bytes.
		max: usize,
	},
}

def_id! {
	/// Directory (tenant) the client operates on: a GUID or a verified domain such as
	/// `contoso.partner.onmschina.cn`.
	TenantId, "Tenant", check_tenant
}
def_id! {
	/// Application (client) id registered in the tenant.
	ClientId, "Client", check_client
}

fn check_len(kind: &'static str, value: &str) -> Result<(), IdentifierError> {
	if value.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if value.len() > MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: MAX_LEN });
	}

	Ok(())
}

fn check_tenant(kind: &'static str, value: &str) -> Result<(), IdentifierError> {
	check_len(kind, value)?;

	match value.chars().find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'))) {
		Some(found) => Err(IdentifierError::InvalidChar { kind, found }),
		None => Ok(()),
	}
}

fn check_client(kind: &'static str, value: &str) -> Result<(), IdentifierError> {
	check_len(kind, value)?;

	match value.chars().find(|c| c.is_whitespace() || c.is_control()) {
		Some(found) => Err(IdentifierError::InvalidChar { kind, found }),
		None => Ok(()),
	}
}
