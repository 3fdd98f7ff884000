//! Client options: the credentials, cloud host, and registration name a [`GraphClient`]
//! needs, validated before any network activity.
//!
//! Option keys keep the plugin spelling (`tenlentId`, `clientId`, `userName`,
//! `userPassword`, `baseUrl`, `name`) so JSON configs written for the plugin host load
//! unchanged, and every error names the key that failed.
//!
//! [`GraphClient`]: crate::graph::GraphClient

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::{ClientId, TenantId, UserCredentials},
	directory::DirectoryEndpoints,
	error::ConfigError,
};

/// Cloud host suffix used when `baseUrl` is not supplied.
pub const DEFAULT_BASE_URL: &str = "chinacloudapi.cn";
/// Registration name used when `name` is not supplied.
pub const DEFAULT_NAME: &str = "AAD";

const TENANT_ID: &str = "tenlentId";
const CLIENT_ID: &str = "clientId";
const USER_NAME: &str = "userName";
const USER_PASSWORD: &str = "userPassword";
const BASE_URL: &str = "baseUrl";
const NAME: &str = "name";

/// Validated configuration for a [`GraphClient`](crate::graph::GraphClient).
#[derive(Clone, Debug)]
pub struct ClientOptions {
	/// Directory the client operates on.
	pub tenant_id: TenantId,
	/// Application registered in the tenant.
	pub client_id: ClientId,
	/// Administrative account used for the cached token.
	pub admin: UserCredentials,
	/// Cloud host suffix the endpoints were derived from.
	pub base_url: String,
	/// Registration name (plugin key) of the client.
	pub name: String,
	/// Login and Graph hosts.
	pub endpoints: DirectoryEndpoints,
}
impl ClientOptions {
	/// Creates an empty builder.
	pub fn builder() -> ClientOptionsBuilder {
		ClientOptionsBuilder::default()
	}

	/// Loads options from a plugin-style JSON object.
	///
	/// Each required key must be present and hold a string; anything else fails with an error
	/// naming the key. Optional keys fall back to their defaults when absent, `null`, or empty.
	///
	/// `tenlentId` and `clientId` are additionally checked as identifiers (see
	/// [`TenantId`] and [`ClientId`]): the tenant becomes a URL path segment, so it must be a
	/// directory GUID or domain. `userName` and `userPassword` are taken as given, and the
	/// token endpoint judges them.
	pub fn from_json(value: &Value) -> Result<Self, ConfigError> {
		let required = |field: &'static str| match value.get(field) {
			Some(Value::String(s)) => Ok(s.clone()),
			_ => Err(ConfigError::not_a_string(field)),
		};
		let optional = |field: &'static str| match value.get(field) {
			None | Some(Value::Null) => Ok(None),
			Some(Value::String(s)) => Ok(Some(s.clone())),
			Some(_) => Err(ConfigError::not_a_string(field)),
		};
		let mut builder = Self::builder()
			.tenant_id(required(TENANT_ID)?)
			.client_id(required(CLIENT_ID)?)
			.user_name(required(USER_NAME)?)
			.user_password(required(USER_PASSWORD)?);

		if let Some(base_url) = optional(BASE_URL)? {
			builder = builder.base_url(base_url);
		}
		if let Some(name) = optional(NAME)? {
			builder = builder.name(name);
		}

		builder.build()
	}

	/// Loads options from `AAD_TENLENT_ID`, `AAD_CLIENT_ID`, `AAD_USER_NAME`,
	/// `AAD_USER_PASSWORD`, and the optional `AAD_BASE_URL` / `AAD_NAME`.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|var| std::env::var(var).ok())
	}

	/// Same as [`from_env`](Self::from_env) with a caller-supplied variable lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut builder = ClientOptionsBuilder {
			tenant_id: lookup("AAD_TENLENT_ID"),
			client_id: lookup("AAD_CLIENT_ID"),
			user_name: lookup("AAD_USER_NAME"),
			user_password: lookup("AAD_USER_PASSWORD"),
			..Default::default()
		};

		if let Some(base_url) = lookup("AAD_BASE_URL") {
			builder = builder.base_url(base_url);
		}
		if let Some(name) = lookup("AAD_NAME") {
			builder = builder.name(name);
		}

		builder.build()
	}
}

/// Builder for [`ClientOptions`] values.
#[derive(Clone, Debug, Default)]
pub struct ClientOptionsBuilder {
	/// Tenant identifier (`tenlentId`).
	pub tenant_id: Option<String>,
	/// OAuth 2.0 client identifier (`clientId`).
	pub client_id: Option<String>,
	/// Administrative account (`userName`).
	pub user_name: Option<String>,
	/// Administrative account password (`userPassword`).
	pub user_password: Option<String>,
	/// Cloud host suffix (`baseUrl`).
	pub base_url: Option<String>,
	/// Registration name (`name`).
	pub name: Option<String>,
	/// Explicit authority + Graph hosts; overrides `base_url` derivation.
	pub endpoints: Option<DirectoryEndpoints>,
}
impl ClientOptionsBuilder {
	/// Sets the tenant identifier.
	pub fn tenant_id(mut self, value: impl Into<String>) -> Self {
		self.tenant_id = Some(value.into());

		self
	}

	/// Sets the OAuth 2.0 client identifier.
	pub fn client_id(mut self, value: impl Into<String>) -> Self {
		self.client_id = Some(value.into());

		self
	}

	/// Sets the administrative account.
	pub fn user_name(mut self, value: impl Into<String>) -> Self {
		self.user_name = Some(value.into());

		self
	}

	/// Sets the administrative account password.
	pub fn user_password(mut self, value: impl Into<String>) -> Self {
		self.user_password = Some(value.into());

		self
	}

	/// Sets the cloud host suffix (defaults to [`DEFAULT_BASE_URL`]).
	pub fn base_url(mut self, value: impl Into<String>) -> Self {
		self.base_url = Some(value.into());

		self
	}

	/// Sets the registration name (defaults to [`DEFAULT_NAME`]).
	pub fn name(mut self, value: impl Into<String>) -> Self {
		self.name = Some(value.into());

		self
	}

	/// Points the client at explicit authority and Graph hosts.
	pub fn endpoints(mut self, authority: Url, graph: Url) -> Self {
		self.endpoints = Some(DirectoryEndpoints::custom(authority, graph));

		self
	}

	/// Validates the configuration and produces [`ClientOptions`].
	pub fn build(self) -> Result<ClientOptions, ConfigError> {
		let tenant_id = require(TENANT_ID, self.tenant_id)?;
		let client_id = require(CLIENT_ID, self.client_id)?;
		let user_name = require(USER_NAME, self.user_name)?;
		let user_password = require(USER_PASSWORD, self.user_password)?;
		let tenant_id = TenantId::new(tenant_id)
			.map_err(|e| ConfigError::InvalidOption { field: TENANT_ID, reason: e.to_string() })?;
		let client_id = ClientId::new(client_id)
			.map_err(|e| ConfigError::InvalidOption { field: CLIENT_ID, reason: e.to_string() })?;

		let base_url = non_empty(self.base_url).unwrap_or_else(|| DEFAULT_BASE_URL.into());
		let name = non_empty(self.name).unwrap_or_else(|| DEFAULT_NAME.into());
		let endpoints = match self.endpoints {
			Some(endpoints) => endpoints,
			None => DirectoryEndpoints::from_base_url(&base_url).map_err(|e| {
				ConfigError::InvalidOption { field: BASE_URL, reason: e.to_string() }
			})?,
		};

		Ok(ClientOptions {
			tenant_id,
			client_id,
			admin: UserCredentials::new(user_name, user_password),
			base_url,
			name,
			endpoints,
		})
	}
}

fn require(field: &'static str, value: Option<String>) -> Result<String, ConfigError> {
	value.ok_or(ConfigError::MissingOption { field })
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|v| !v.trim().is_empty())
}
