//! Bearer token cache backed by the OAuth 2.0 password grant.
//!
//! [`TokenCache::get_valid_token`] serves the cached admin token until its margin-adjusted
//! expiry passes and only then calls the token endpoint. Refreshes run behind a single
//! async guard, so concurrent callers that all observe a stale token share one in-flight
//! refresh instead of stampeding the token endpoint. Callers queued behind a failed refresh
//! receive that failure instead of repeating the grant. The same password grant also backs
//! [`TokenCache::verify_credentials`], which checks a member's credentials without touching
//! the cache.

mod grant;
mod metrics;

pub use metrics::RefreshMetrics;

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	auth::{CachedToken, ClientId, TenantId, TokenSecret, UserCredentials},
	directory::{ClientOptions, DirectoryEndpoints},
	error::{ConfigError, TransientError},
	http::{GraphTransport, HttpResponse},
	obs::{self, OpKind},
};

/// Caches the admin bearer token and refreshes it on demand.
pub struct TokenCache<T>
where
	T: ?Sized + GraphTransport,
{
	transport: Arc<T>,
	endpoints: DirectoryEndpoints,
	tenant_id: TenantId,
	client_id: ClientId,
	admin: UserCredentials,
	state: RwLock<CachedToken>,
	/// Holds the failure of the latest refresh attempt, if it failed.
	refresh_guard: AsyncMutex<Option<FailedRefresh>>,
	refresh_generation: AtomicU64,
	/// Shared counters for cache hits and refresh outcomes.
	pub metrics: Arc<RefreshMetrics>,
}
impl<T> TokenCache<T>
where
	T: ?Sized + GraphTransport,
{
	/// Creates an empty cache for the admin account in `options`.
	pub fn new(options: &ClientOptions, transport: impl Into<Arc<T>>) -> Self {
		Self {
			transport: transport.into(),
			endpoints: options.endpoints.clone(),
			tenant_id: options.tenant_id.clone(),
			client_id: options.client_id.clone(),
			admin: options.admin.clone(),
			state: RwLock::new(CachedToken::empty()),
			refresh_guard: AsyncMutex::new(None),
			refresh_generation: AtomicU64::new(0),
			metrics: Default::default(),
		}
	}

	/// Returns a snapshot of the cached state.
	pub fn cached(&self) -> CachedToken {
		self.state.read().clone()
	}

	/// Replaces the cached state wholesale.
	pub fn set_token(&self, token: CachedToken) {
		*self.state.write() = token;
	}

	/// Returns a token that is valid right now, refreshing first when the cached one is
	/// missing or stale.
	///
	/// Refresh failures propagate; nothing is retried. Callers that were already waiting
	/// on a refresh that fails get an equivalent error without a second grant, while later
	/// calls start a new attempt.
	pub async fn get_valid_token(&self) -> Result<TokenSecret> {
		let generation = self.refresh_generation.load(Ordering::Acquire);

		if let Some(token) = self.fresh() {
			return Ok(token);
		}

		let mut last_failure = self.refresh_guard.lock().await;

		// Another caller may have refreshed while we waited on the guard.
		if let Some(token) = self.fresh() {
			return Ok(token);
		}
		// A refresh that failed while we waited is shared rather than repeated.
		if let Some(failure) = last_failure
			.as_ref()
			.filter(|_| self.refresh_generation.load(Ordering::Acquire) != generation)
		{
			return Err(failure.replay());
		}

		self.refresh_locked(&mut last_failure).await
	}

	/// Unconditionally fetches a new admin token and stores it.
	pub async fn refresh(&self) -> Result<TokenSecret> {
		let mut last_failure = self.refresh_guard.lock().await;

		self.refresh_locked(&mut last_failure).await
	}

	/// Runs the password grant for `user_name` / `password` and reports whether the token
	/// endpoint issued an access token.
	///
	/// The issued token is discarded and the cache is left untouched. Rejected credentials
	/// yield `Ok(false)`; transport failures, throttling, and 5xx answers are errors.
	pub async fn verify_credentials(&self, user_name: &str, password: &str) -> Result<bool> {
		obs::observe(OpKind::Verification, "verify_credentials", async {
			let credentials = UserCredentials::new(user_name, password);
			let response = self.exchange(&credentials).await?;

			grant::carries_access_token(&response)
		})
		.await
	}

	fn fresh(&self) -> Option<TokenSecret> {
		let token = self.state.read().valid_at(OffsetDateTime::now_utc()).cloned();

		if token.is_some() {
			self.metrics.record_hit();
		}

		token
	}

	async fn refresh_locked(&self, last_failure: &mut Option<FailedRefresh>) -> Result<TokenSecret> {
		obs::observe(OpKind::TokenRefresh, "refresh", async {
			self.metrics.record_attempt();

			let result = async {
				let response = self.exchange(&self.admin).await?;
				let token = grant::map_token_response(&response)?;
				let value = token.value.clone().ok_or(ConfigError::MissingAccessToken)?;

				self.set_token(token);

				Ok::<_, Error>(value)
			}
			.await;

			match &result {
				Ok(_) => self.metrics.record_success(),
				Err(_) => self.metrics.record_failure(),
			}

			*last_failure = result.as_ref().err().map(FailedRefresh::capture);
			self.refresh_generation.fetch_add(1, Ordering::AcqRel);

			result
		})
		.await
	}

	async fn exchange(&self, credentials: &UserCredentials) -> Result<HttpResponse> {
		let request = grant::password_grant_request(
			&self.endpoints,
			&self.tenant_id,
			&self.client_id,
			credentials,
		)?;

		self.transport.send(request).await
	}
}
impl<T> Debug for TokenCache<T>
where
	T: ?Sized + GraphTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenCache")
			.field("tenant_id", &self.tenant_id)
			.field("client_id", &self.client_id)
			.field("admin", &self.admin)
			.field("state", &*self.state.read())
			.finish()
	}
}

/// Failed refresh kept around for the callers that queued behind it.
#[derive(Clone, Debug)]
enum FailedRefresh {
	InvalidGrant(String),
	InvalidClient(String),
	Other(String),
}
impl FailedRefresh {
	fn capture(err: &Error) -> Self {
		match err {
			Error::InvalidGrant { reason } => Self::InvalidGrant(reason.clone()),
			Error::InvalidClient { reason } => Self::InvalidClient(reason.clone()),
			err => Self::Other(err.to_string()),
		}
	}

	fn replay(&self) -> Error {
		match self {
			Self::InvalidGrant(reason) => Error::InvalidGrant { reason: reason.clone() },
			Self::InvalidClient(reason) => Error::InvalidClient { reason: reason.clone() },
			Self::Other(message) => TransientError::TokenEndpoint {
				message: format!("concurrent refresh failed: {message}"),
				status: None,
			}
			.into(),
		}
	}
}
