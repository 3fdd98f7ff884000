//! Cached bearer token state and its expiry bookkeeping.

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret, error::ConfigError};

/// Lifecycle status for the cached token at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
	/// Nothing usable is cached (no value or no expiry).
	Empty,
	/// Token is usable.
	Active,
	/// Token reached its (margin-adjusted) expiry instant.
	Expired,
}

/// Bearer token plus the instant after which it must not be used.
///
/// The cache only ever replaces this value wholesale; fields are never patched
/// individually.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
	/// Access token issued by the token endpoint, if any.
	pub value: Option<TokenSecret>,
	/// Margin-adjusted expiry instant, if any.
	pub expires_at: Option<OffsetDateTime>,
}
impl CachedToken {
	/// Time subtracted from the server-reported expiry so tokens are refreshed early.
	pub const SAFETY_MARGIN: Duration = Duration::seconds(300);

	/// Creates an empty cache entry.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Creates a cache entry with an explicit expiry instant.
	pub fn new(value: impl Into<String>, expires_at: OffsetDateTime) -> Self {
		Self { value: Some(TokenSecret::new(value)), expires_at: Some(expires_at) }
	}

	/// Creates a cache entry from the token endpoint's `expires_on` (Unix seconds), applying
	/// [`SAFETY_MARGIN`](Self::SAFETY_MARGIN).
	pub fn from_expires_on(value: impl Into<String>, expires_on: i64) -> Result<Self> {
		let adjusted = expires_on
			.checked_sub(Self::SAFETY_MARGIN.whole_seconds())
			.ok_or(ConfigError::ExpiresOnOutOfRange)?;
		let expires_at = OffsetDateTime::from_unix_timestamp(adjusted)
			.map_err(|_| ConfigError::ExpiresOnOutOfRange)?;

		Ok(Self::new(value, expires_at))
	}

	/// Expiry expressed in Unix epoch milliseconds.
	pub fn expires_at_millis(&self) -> Option<i64> {
		self.expires_at.map(|at| (at.unix_timestamp_nanos() / 1_000_000) as i64)
	}

	/// Computes the lifecycle status at a given instant.
	pub fn status_at(&self, instant: OffsetDateTime) -> TokenStatus {
		match (&self.value, self.expires_at) {
			(Some(_), Some(expires_at)) if expires_at > instant => TokenStatus::Active,
			(Some(_), Some(_)) => TokenStatus::Expired,
			_ => TokenStatus::Empty,
		}
	}

	/// Returns the token value when it is still usable at `instant`.
	pub fn valid_at(&self, instant: OffsetDateTime) -> Option<&TokenSecret> {
		match self.status_at(instant) {
			TokenStatus::Active => self.value.as_ref(),
			_ => None,
		}
	}
}
impl Debug for CachedToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CachedToken")
			.field("value", &self.value.as_ref().map(|_| "<redacted>"))
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
