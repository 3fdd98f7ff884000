//! Graph API client: token-backed request execution plus the user and group wrappers.
//!
//! [`GraphClient`] owns the shared [`TokenCache`] and transport. Every call builds its
//! request through [`RequestSpec::into_request`] with a token resolved by
//! [`TokenCache::get_valid_token`], sends it, and maps the answer into a [`GraphResponse`]
//! or an [`Error`]. The wrappers are grouped into [`ReadApi`] and [`WriteApi`].

pub mod model;
pub mod read;
pub mod write;

pub use model::*;
pub use read::ReadApi;
pub use write::WriteApi;

// crates.io
use serde::de::DeserializeOwned;
use serde_json::Value;
// self
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;
use crate::{
	_prelude::*,
	auth::{TenantId, TokenSecret},
	cache::TokenCache,
	directory::{ClientOptions, DirectoryEndpoints},
	error::TransientError,
	http::{GraphTransport, HttpRequest, HttpResponse, Method},
	obs::{self, OpKind},
	request::{Query, RequestSpec},
};

/// [`GraphClient`] backed by the default reqwest transport.
#[cfg(feature = "reqwest")]
pub type ReqwestGraphClient = GraphClient<ReqwestTransport>;

/// Decoded 2xx Graph answer.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphResponse {
	/// HTTP status code.
	pub status: u16,
	/// Parsed JSON body; [`Value::Null`] when the body was empty (e.g. `204 No Content`).
	pub data: Value,
}
impl GraphResponse {
	/// Decodes [`data`](Self::data) into `T`, reporting the JSON path on mismatch.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		serde_path_to_error::deserialize(&self.data).map_err(|source| {
			TransientError::GraphResponseParse { source, status: self.status }.into()
		})
	}
}

/// Azure AD Graph client sharing one token cache and one transport across all calls.
pub struct GraphClient<T>
where
	T: ?Sized + GraphTransport,
{
	name: String,
	tenant_id: TenantId,
	endpoints: DirectoryEndpoints,
	transport: Arc<T>,
	tokens: Arc<TokenCache<T>>,
}
#[cfg(feature = "reqwest")]
impl GraphClient<ReqwestTransport> {
	/// Creates a client that talks to Azure through a default reqwest client.
	pub fn new(options: ClientOptions) -> Self {
		Self::with_transport(options, ReqwestTransport::default())
	}

	/// Validates a plugin-style JSON config and creates a reqwest-backed client from it.
	pub fn from_json(config: &Value) -> Result<Self> {
		Ok(Self::new(ClientOptions::from_json(config)?))
	}
}
impl<T> GraphClient<T>
where
	T: ?Sized + GraphTransport,
{
	/// Creates a client over a caller-supplied transport.
	pub fn with_transport(options: ClientOptions, transport: impl Into<Arc<T>>) -> Self {
		let transport = transport.into();
		let tokens = Arc::new(TokenCache::new(&options, transport.clone()));

		Self {
			name: options.name,
			tenant_id: options.tenant_id,
			endpoints: options.endpoints,
			transport,
			tokens,
		}
	}

	/// Registration name (defaults to `AAD`).
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Tenant every call is scoped to.
	pub fn tenant_id(&self) -> &TenantId {
		&self.tenant_id
	}

	/// Login and Graph hosts.
	pub fn endpoints(&self) -> &DirectoryEndpoints {
		&self.endpoints
	}

	/// Shared admin token cache.
	pub fn tokens(&self) -> &Arc<TokenCache<T>> {
		&self.tokens
	}

	/// Read-only wrappers.
	pub fn reads(&self) -> ReadApi<'_, T> {
		ReadApi::new(self)
	}

	/// Mutating wrappers.
	pub fn writes(&self) -> WriteApi<'_, T> {
		WriteApi::new(self)
	}

	/// `{graph}/{tenant}/{segments...}`.
	pub fn url<I>(&self, segments: I) -> Result<Url>
	where
		I: IntoIterator,
		I::Item: AsRef<str>,
	{
		Ok(self.endpoints.graph_url(&self.tenant_id, segments)?)
	}

	/// Normalizes `spec` into a transport request carrying a currently valid admin token.
	///
	/// A spec without a URL targets the tenant root.
	pub async fn build_request(&self, spec: RequestSpec) -> Result<HttpRequest> {
		let token = self.tokens.get_valid_token().await?;

		self.normalize(spec, &token)
	}

	/// Builds, sends, and maps `spec`.
	pub async fn execute(&self, spec: RequestSpec) -> Result<GraphResponse> {
		self.call("execute", spec).await
	}

	pub(crate) async fn call(&self, stage: &'static str, spec: RequestSpec) -> Result<GraphResponse> {
		let kind = match spec.method() {
			Method::Get => OpKind::GraphRead,
			_ => OpKind::GraphWrite,
		};

		obs::observe(kind, stage, async {
			let request = self.build_request(spec).await?;
			let response = self.transport.send(request).await?;

			map_graph_response(response)
		})
		.await
	}

	pub(crate) fn spec<I>(&self, method: Method, segments: I, query: Query) -> Result<RequestSpec>
	where
		I: IntoIterator,
		I::Item: AsRef<str>,
	{
		Ok(RequestSpec::new(method, self.url(segments)?).query(query))
	}

	fn normalize(&self, spec: RequestSpec, token: &TokenSecret) -> Result<HttpRequest> {
		let root = self.url(std::iter::empty::<&str>())?;

		spec.into_request(&root, token)
	}
}
impl<T> Clone for GraphClient<T>
where
	T: ?Sized + GraphTransport,
{
	fn clone(&self) -> Self {
		Self {
			name: self.name.clone(),
			tenant_id: self.tenant_id.clone(),
			endpoints: self.endpoints.clone(),
			transport: self.transport.clone(),
			tokens: self.tokens.clone(),
		}
	}
}
impl<T> Debug for GraphClient<T>
where
	T: ?Sized + GraphTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GraphClient")
			.field("name", &self.name)
			.field("tenant_id", &self.tenant_id)
			.field("endpoints", &self.endpoints)
			.field("tokens", &self.tokens)
			.finish()
	}
}

#[derive(Deserialize)]
struct ODataErrorBody {
	#[serde(rename = "odata.error")]
	error: ODataError,
}

#[derive(Deserialize)]
struct ODataError {
	#[serde(default)]
	code: Option<String>,
	#[serde(default)]
	message: Option<ODataMessage>,
}

#[derive(Deserialize)]
struct ODataMessage {
	#[serde(default)]
	value: Option<String>,
}

fn map_graph_response(response: HttpResponse) -> Result<GraphResponse> {
	let status = response.status;

	if !response.is_success() {
		return Err(map_graph_error(&response));
	}
	if response.body.iter().all(u8::is_ascii_whitespace) {
		return Ok(GraphResponse { status, data: Value::Null });
	}

	let de = &mut serde_json::Deserializer::from_slice(&response.body);
	let data = serde_path_to_error::deserialize(de)
		.map_err(|source| TransientError::GraphResponseParse { source, status })?;

	Ok(GraphResponse { status, data })
}

fn map_graph_error(response: &HttpResponse) -> Error {
	let (code, message) = match serde_json::from_slice::<ODataErrorBody>(&response.body) {
		Ok(ODataErrorBody { error }) =>
			(error.code, error.message.and_then(|message| message.value)),
		Err(_) => (None, None),
	};
	let message = message
		.filter(|message| !message.is_empty())
		.unwrap_or_else(|| format!("HTTP {}: {}", response.status, response.body_preview()));

	if response.is_transient() {
		return TransientError::GraphEndpoint { message, status: response.status }.into();
	}

	Error::Graph { status: response.status, code, message }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::{self, FakeTransport, TEST_TENANT};

	fn client() -> (GraphClient<FakeTransport>, Arc<FakeTransport>) {
		let transport = Arc::new(FakeTransport::default());
		let client: GraphClient<FakeTransport> =
			GraphClient::with_transport(_preludet::test_options("https://mock.test"), transport.clone());

		(client, transport)
	}

	#[tokio::test]
	async fn build_request_resolves_token_once_and_targets_tenant_root() {
		let (client, transport) = client();

		transport.push(200, _preludet::token_body("admin-token", _preludet::unix_now_plus(3600)));

		let first = client
			.build_request(RequestSpec::default())
			.await
			.expect("Empty spec should build against the tenant root.");
		let second = client
			.build_request(RequestSpec::default())
			.await
			.expect("Second build should reuse the cached token.");

		assert_eq!(first.method, Method::Get);
		assert_eq!(first.header("Authorization"), Some("Bearer admin-token"));
		assert_eq!(
			first.url.as_str(),
			format!("https://mock.test/{TEST_TENANT}?api-version=1.5")
		);
		assert_eq!(first, second);
		assert_eq!(transport.calls(), 1);
		assert_eq!(client.name(), "AAD");
	}

	#[tokio::test]
	async fn execute_sends_custom_specs() {
		let (client, transport) = client();

		transport
			.push(200, _preludet::token_body("admin-token", _preludet::unix_now_plus(3600)))
			.push(200, r#"{"value":[{"objectId":"t-1","objectType":"Company"}]}"#);

		let url = client.url(["tenantDetails"]).expect("Tenant details URL should build.");
		let response = client
			.execute(RequestSpec::new(Method::Get, url).header("Accept", "application/json"))
			.await
			.expect("Custom spec should execute.");
		let page = response
			.json::<ODataCollection<DirectoryObject>>()
			.expect("Tenant details should decode.");
		let requests = transport.requests();
		let sent = &requests[1];

		assert_eq!(page.value[0].object_type.as_deref(), Some("Company"));
		assert_eq!(sent.url.path(), format!("/{TEST_TENANT}/tenantDetails"));
		assert_eq!(sent.header("accept"), Some("application/json"));
	}

	#[test]
	fn empty_success_body_maps_to_null() {
		let response = map_graph_response(HttpResponse::new(204, Vec::new()))
			.expect("No Content should map to an empty response.");

		assert_eq!(response.status, 204);
		assert_eq!(response.data, Value::Null);
	}

	#[test]
	fn odata_errors_are_classified() {
		let missing = HttpResponse::new(
			404,
			r#"{"odata.error":{"code":"Request_ResourceNotFound","message":{"lang":"en","value":"Resource 'x' does not exist."}}}"#,
		);
		let throttled = HttpResponse::new(429, "slow down");

		match map_graph_error(&missing) {
			Error::Graph { status, code, message } => {
				assert_eq!(status, 404);
				assert_eq!(code.as_deref(), Some("Request_ResourceNotFound"));
				assert_eq!(message, "Resource 'x' does not exist.");
			},
			other => panic!("Unexpected mapping: {other:?}."),
		}
		assert!(matches!(
			map_graph_error(&throttled),
			Error::Transient(TransientError::GraphEndpoint { status: 429, .. })
		));
		assert!(matches!(
			map_graph_error(&HttpResponse::new(403, "")),
			Error::Graph { status: 403, code: None, .. }
		));
	}

	#[test]
	fn typed_decoding_reports_the_path() {
		let response = GraphResponse {
			status: 200,
			data: serde_json::json!({ "value": [{ "objectId": 7 }] }),
		};

		match response.json::<ODataCollection<DirectoryObject>>() {
			Err(Error::Transient(TransientError::GraphResponseParse { source, status })) => {
				assert_eq!(source.path().to_string(), "value[0].objectId");
				assert_eq!(status, 200);
			},
			other => panic!("Unexpected decoding: {other:?}."),
		}
	}
}
