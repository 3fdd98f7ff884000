//! Resource-owner credentials used by the password grant.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// User name + password pair sent to the token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct UserCredentials {
	/// User principal name (usually the sign-in e-mail).
	pub user_name: String,
	/// Account password; redacted in formatter output.
	pub password: TokenSecret,
}
impl UserCredentials {
	/// Pairs a user name with its password.
	pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> Self {
		Self { user_name: user_name.into(), password: TokenSecret::new(password) }
	}
}
impl Debug for UserCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("UserCredentials")
			.field("user_name", &self.user_name)
			.field("password", &"<redacted>")
			.finish()
	}
}
