//! Transport primitives for token and Graph calls.
//!
//! The module exposes [`GraphTransport`], the client's only dependency on an HTTP stack,
//! together with the transport-neutral [`HttpRequest`] / [`HttpResponse`] descriptors.
//! Implementations receive fully-built requests (absolute URL with query, headers, body)
//! and hand back the raw status, headers, and body. Status interpretation stays with the
//! caller, so implementations must return non-2xx responses as `Ok`.

// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::{ConfigError, TransientError, TransportError};

/// Boxed future returned by [`GraphTransport::send`].
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<HttpResponse>> + 'a + Send>>;

/// Abstraction over HTTP transports that execute token and Graph requests.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can back both
/// the token cache and the Graph wrappers behind an `Arc`.
pub trait GraphTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and resolves with whatever the server answered.
	///
	/// Only failures to obtain a response (DNS, TCP, TLS, timeouts) are errors.
	fn send(&self, request: HttpRequest) -> TransportFuture<'_>;
}

/// HTTP verbs used against the token and Graph endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
	#[default]
	/// `GET`, the default for Graph reads.
	Get,
	/// `POST`.
	Post,
	/// `PATCH`.
	Patch,
	/// `DELETE`.
	Delete,
}
impl Method {
	/// Lowercase label (`get`, `post`, ...).
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "get",
			Method::Post => "post",
			Method::Patch => "patch",
			Method::Delete => "delete",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully-built request descriptor handed to a [`GraphTransport`].
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
	/// HTTP verb.
	pub method: Method,
	/// Absolute URL including the query string.
	pub url: Url,
	/// Header name/value pairs in insertion order.
	pub headers: Vec<(String, String)>,
	/// Request body, if any.
	pub body: Option<Vec<u8>>,
}
impl HttpRequest {
	/// Creates a request with no headers and no body.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, headers: Vec::new(), body: None }
	}

	/// Sets `name` to `value`, replacing any header with the same (case-insensitive) name.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		let name = name.into();

		self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
		self.headers.push((name, value.into()));

		self
	}

	/// Attaches a body.
	pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
		self.body = Some(body.into());

		self
	}

	/// Looks up a header value by case-insensitive name.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(existing, _)| existing.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}

	/// Looks up a query parameter value by exact name.
	pub fn query_param(&self, name: &str) -> Option<String> {
		self.url.query_pairs().find(|(key, _)| key == name).map(|(_, value)| value.into_owned())
	}
}
impl Debug for HttpRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let headers = self
			.headers
			.iter()
			.map(|(name, value)| {
				if name.eq_ignore_ascii_case("authorization") {
					(name.as_str(), "<redacted>")
				} else {
					(name.as_str(), value.as_str())
				}
			})
			.collect::<Vec<_>>();

		f.debug_struct("HttpRequest")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("headers", &headers)
			.field("body_len", &self.body.as_ref().map(Vec::len))
			.finish()
	}
}

/// Raw response returned by a [`GraphTransport`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Header name/value pairs as received.
	pub headers: Vec<(String, String)>,
	/// Response body bytes (possibly empty).
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Creates a response with no headers.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers: Vec::new(), body: body.into() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns `true` for statuses worth retrying (429 and 5xx).
	pub fn is_transient(&self) -> bool {
		self.status == 429 || self.status >= 500
	}

	/// Lossy UTF-8 preview of the body, capped at 256 bytes, for error messages.
	pub fn body_preview(&self) -> String {
		const LIMIT: usize = 256;

		let slice = &self.body[..self.body.len().min(LIMIT)];

		String::from_utf8_lossy(slice).trim().to_owned()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token requests should not follow redirects; configure any custom [`ReqwestClient`]
/// accordingly before passing it to [`ReqwestTransport::with_client`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a transport whose client never follows redirects.
	pub fn without_redirects() -> Result<Self> {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.map_err(ConfigError::from)?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl GraphTransport for ReqwestTransport {
	fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let endpoint = request.url.as_str().to_owned();
			let method = match request.method {
				Method::Get => reqwest::Method::GET,
				Method::Post => reqwest::Method::POST,
				Method::Patch => reqwest::Method::PATCH,
				Method::Delete => reqwest::Method::DELETE,
			};
			let mut builder = self.0.request(method, request.url);

			for (name, value) in &request.headers {
				builder = builder.header(name.as_str(), value.as_str());
			}
			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response =
				builder.send().await.map_err(|err| map_reqwest_error(&endpoint, err))?;
			let status = response.status().as_u16();
			let headers = response
				.headers()
				.iter()
				.filter_map(|(name, value)| {
					value.to_str().ok().map(|value| (name.as_str().to_owned(), value.to_owned()))
				})
				.collect();
			let body =
				response.bytes().await.map_err(|err| map_reqwest_error(&endpoint, err))?.to_vec();

			Ok(HttpResponse { status, headers, body })
		})
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(endpoint: &str, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransientError::Timeout { endpoint: endpoint.to_owned() }.into();
	}

	TransportError::network(endpoint, err).into()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn request() -> HttpRequest {
		HttpRequest::new(
			Method::Get,
			Url::parse("https://graph.test/t/users?api-version=1.5")
				.expect("Request fixture URL should parse."),
		)
	}

	#[test]
	fn headers_replace_case_insensitively() {
		let request = request()
			.with_header("Content-Type", "application/json")
			.with_header("content-type", "text/plain");

		assert_eq!(request.headers.len(), 1);
		assert_eq!(request.header("CONTENT-TYPE"), Some("text/plain"));
	}

	#[test]
	fn debug_redacts_authorization() {
		let request = request().with_header("Authorization", "Bearer super-secret");
		let rendered = format!("{request:?}");

		assert!(!rendered.contains("super-secret"));
		assert_eq!(request.query_param("api-version").as_deref(), Some("1.5"));
	}

	#[test]
	fn response_classification() {
		assert!(HttpResponse::new(204, Vec::new()).is_success());
		assert!(HttpResponse::new(429, Vec::new()).is_transient());
		assert!(HttpResponse::new(503, Vec::new()).is_transient());
		assert!(!HttpResponse::new(404, Vec::new()).is_transient());
		assert_eq!(HttpResponse::new(400, " oops \n").body_preview(), "oops");
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn reqwest_transport_builds_without_redirects() {
		let transport =
			ReqwestTransport::without_redirects().expect("Redirect-free client should build.");
		let _client: &ReqwestClient = transport.as_ref();
	}

	#[test]
	fn method_labels_are_lowercase() {
		assert_eq!(Method::default(), Method::Get);
		assert_eq!(Method::Patch.to_string(), "patch");
	}
}
