//! Azure Active Directory Graph client with cached password-grant tokens, user/group CRUD
//! wrappers, and a pluggable transport.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cache;
pub mod directory;
pub mod error;
pub mod graph;
pub mod http;
pub mod obs;
pub mod request;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test`
	//! crate feature.

	pub use crate::_prelude::*;

	// std
	use std::collections::VecDeque;
	// self
	use crate::{
		directory::ClientOptions,
		http::{GraphTransport, HttpRequest, HttpResponse, TransportFuture},
	};

	/// Tenant identifier used across tests.
	pub const TEST_TENANT: &str = "tenant-test";
	/// Client identifier used across tests.
	pub const TEST_CLIENT_ID: &str = "client-test";
	/// Administrative account used across tests.
	pub const TEST_USER: &str = "admin@contoso.test";
	/// Administrative password used across tests.
	pub const TEST_PASSWORD: &str = "admin-password";

	/// Builds options whose login and graph hosts both point at `base`.
	pub fn test_options(base: &str) -> ClientOptions {
		let host = Url::parse(base).expect("Failed to parse test host URL.");

		ClientOptions::builder()
			.tenant_id(TEST_TENANT)
			.client_id(TEST_CLIENT_ID)
			.user_name(TEST_USER)
			.user_password(TEST_PASSWORD)
			.endpoints(host.clone(), host)
			.build()
			.expect("Failed to build test client options.")
	}

	/// Current Unix timestamp shifted by `offset_secs`, for `expires_on` fixtures.
	pub fn unix_now_plus(offset_secs: i64) -> i64 {
		OffsetDateTime::now_utc().unix_timestamp() + offset_secs
	}

	/// Token endpoint success body in the shape Azure AD v1 returns (`expires_on` as a string).
	pub fn token_body(access_token: &str, expires_on: i64) -> String {
		serde_json::json!({
			"token_type": "Bearer",
			"expires_in": "3599",
			"expires_on": expires_on.to_string(),
			"resource": "https://graph.test",
			"access_token": access_token,
		})
		.to_string()
	}

	/// In-process transport that replays scripted responses and records every request.
	#[derive(Debug, Default)]
	pub struct FakeTransport {
		responses: Mutex<VecDeque<HttpResponse>>,
		requests: Mutex<Vec<HttpRequest>>,
	}
	impl FakeTransport {
		/// Queues a response; responses are served in FIFO order.
		pub fn push(&self, status: u16, body: impl Into<String>) -> &Self {
			self.responses.lock().push_back(HttpResponse::new(status, body.into().into_bytes()));

			self
		}

		/// Returns every request observed so far.
		pub fn requests(&self) -> Vec<HttpRequest> {
			self.requests.lock().clone()
		}

		/// Returns the number of requests observed so far.
		pub fn calls(&self) -> usize {
			self.requests.lock().len()
		}
	}
	impl GraphTransport for FakeTransport {
		fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
			Box::pin(async move {
				self.requests.lock().push(request);

				let response = self.responses.lock().pop_front();

				Ok(response.expect("FakeTransport ran out of scripted responses."))
			})
		}
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
