//! Request-shape builder that turns a caller's [`RequestSpec`] into the [`HttpRequest`]
//! handed to a transport.
//!
//! Normalization depends only on the [`RequestSpec`], the tenant root URL, and a bearer
//! token. The method defaults to `get`. `api-version=1.5` is always forced onto the query
//! and caller values for that key are dropped. Caller headers are layered over the JSON
//! content type and the `Authorization` header. Nothing is cached between builds.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::ConfigError,
	http::{HttpRequest, Method},
};

/// `api-version` forced on every Graph request.
pub const GRAPH_API_VERSION: &str = "1.5";

const API_VERSION_KEY: &str = "api-version";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Extra query parameters (OData options such as `$filter` or `$top`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query(Vec<(String, String)>);
impl Query {
	/// Creates an empty query.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds `key=value`, replacing an earlier value for the same key.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		let key = key.into();

		self.0.retain(|(existing, _)| existing != &key);
		self.0.push((key, value.into()));

		self
	}

	/// Adds an OData `$filter` expression.
	pub fn filter(self, expression: impl Into<String>) -> Self {
		self.with("$filter", expression)
	}

	/// Adds an OData `$top` page size.
	pub fn top(self, count: u32) -> Self {
		self.with("$top", count.to_string())
	}

	/// Adds the `$skiptoken` returned in `odata.nextLink`.
	pub fn skip_token(self, token: impl Into<String>) -> Self {
		self.with("$skiptoken", token)
	}

	/// Iterates over the parameters in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
	}

	/// Returns `true` when no parameters are set.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl<K, V> FromIterator<(K, V)> for Query
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		iter.into_iter().fold(Self::new(), |query, (key, value)| query.with(key, value))
	}
}

/// Caller-side description of a Graph request before normalization.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestSpec {
	/// HTTP verb; `None` means `get`.
	pub method: Option<Method>,
	/// Absolute target URL; `None` targets the tenant root (`{graph}/{tenant}`).
	pub url: Option<Url>,
	/// Extra query parameters.
	pub query: Query,
	/// Headers layered over the defaults.
	pub headers: Vec<(String, String)>,
	/// JSON body.
	pub body: Option<Value>,
}
impl RequestSpec {
	/// Creates a spec for `method` against `url`.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method: Some(method), url: Some(url), ..Default::default() }
	}

	/// Replaces the query parameters.
	pub fn query(mut self, query: Query) -> Self {
		self.query = query;

		self
	}

	/// Adds a header that overrides any default with the same name.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Serializes `body` as the JSON payload.
	pub fn json<B>(mut self, body: &B) -> Result<Self, ConfigError>
	where
		B: ?Sized + Serialize,
	{
		self.body = Some(serde_json::to_value(body).map_err(ConfigError::SerializeBody)?);

		Ok(self)
	}

	/// Resolved HTTP verb.
	pub fn method(&self) -> Method {
		self.method.unwrap_or_default()
	}

	/// Normalizes this request into what a transport sends.
	pub fn into_request(self, tenant_root: &Url, token: &TokenSecret) -> Result<HttpRequest> {
		let method = self.method();
		let mut url = self.url.unwrap_or_else(|| tenant_root.clone());
		let carried = url
			.query_pairs()
			.into_owned()
			.filter(|(key, _)| key != API_VERSION_KEY)
			.collect::<Vec<_>>();

		url.set_query(None);

		{
			let mut pairs = url.query_pairs_mut();

			pairs.append_pair(API_VERSION_KEY, GRAPH_API_VERSION);

			for (key, value) in carried.iter().map(|(k, v)| (k.as_str(), v.as_str())) {
				pairs.append_pair(key, value);
			}
			for (key, value) in self.query.iter().filter(|(key, _)| *key != API_VERSION_KEY) {
				pairs.append_pair(key, value);
			}
		}

		let mut request = HttpRequest::new(method, url)
			.with_header("Content-Type", JSON_CONTENT_TYPE)
			.with_header("Authorization", token.bearer());

		for (name, value) in self.headers {
			request = request.with_header(name, value);
		}
		if let Some(body) = self.body {
			request = request.with_body(serde_json::to_vec(&body).map_err(ConfigError::SerializeBody)?);
		}

		Ok(request)
	}
}
