//! Helpers shared by the reqwest + httpmock integration suites.

#![allow(dead_code)]

// crates.io
use httpmock::MockServer;
use time::OffsetDateTime;
// self
use aad_graph::{directory::ClientOptions, graph::ReqwestGraphClient, url::Url};

pub const TENANT: &str = "tenant-it";
pub const CLIENT_ID: &str = "client-it";
pub const ADMIN: &str = "admin@contoso.test";
pub const ADMIN_PASSWORD: &str = "admin-password";

/// Options whose login and Graph hosts both point at `server`.
pub fn options(server: &MockServer) -> ClientOptions {
	let host = Url::parse(&server.base_url()).expect("Mock server URL should parse.");

	ClientOptions::builder()
		.tenant_id(TENANT)
		.client_id(CLIENT_ID)
		.user_name(ADMIN)
		.user_password(ADMIN_PASSWORD)
		.endpoints(host.clone(), host)
		.build()
		.expect("Integration options should build.")
}

pub fn client(server: &MockServer) -> ReqwestGraphClient {
	ReqwestGraphClient::new(options(server))
}

pub fn token_path() -> String {
	format!("/{TENANT}/oauth2/token")
}

pub fn graph_path(rest: &str) -> String {
	format!("/{TENANT}/{rest}")
}

pub fn unix_now_plus(offset_secs: i64) -> i64 {
	OffsetDateTime::now_utc().unix_timestamp() + offset_secs
}

/// Azure AD v1 token body; `expires_on` is rendered as a string like the real endpoint.
pub fn token_body(access_token: &str, expires_on: i64) -> String {
	serde_json::json!({
		"token_type": "Bearer",
		"expires_in": "3599",
		"expires_on": expires_on.to_string(),
		"access_token": access_token,
	})
	.to_string()
}
