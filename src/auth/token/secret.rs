//! Shared, redacted holder for bearer tokens and passwords.

// self
use crate::_prelude::*;

const REDACTED: &str = "<redacted>";

/// Secret string that never shows up in `Debug` or `Display` output.
///
/// Clones share one allocation, so handing the cached bearer token to every Graph call
/// does not copy it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(Arc<str>);
impl TokenSecret {
	/// Wraps `value`.
	pub fn new(value: impl Into<String>) -> Self {
		Self(Arc::from(value.into()))
	}

	/// Raw value; keep it out of logs.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// `Bearer {token}` for the `Authorization` header.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.0)
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "TokenSecret({REDACTED})")
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(REDACTED)
	}
}
