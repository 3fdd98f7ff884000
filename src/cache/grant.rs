//! Password-grant request assembly and token endpoint response mapping.

// crates.io
use serde::{Deserializer, de::Error as _};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{CachedToken, ClientId, TenantId, UserCredentials},
	directory::DirectoryEndpoints,
	error::{ConfigError, TransientError},
	http::{HttpRequest, HttpResponse, Method},
};

const GRANT_TYPE: &str = "password";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Success body of the v1 token endpoint. Only the fields the cache needs are kept.
#[derive(Debug, Deserialize)]
struct TokenResponse {
	#[serde(default)]
	access_token: Option<String>,
	#[serde(default, deserialize_with = "epoch_seconds")]
	expires_on: Option<i64>,
}

/// OAuth error body (`{"error": "...", "error_description": "..."}`).
#[derive(Debug, Default, Deserialize)]
struct TokenErrorResponse {
	#[serde(default)]
	error: Option<String>,
	#[serde(default)]
	error_description: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EpochSeconds {
	Number(i64),
	Text(String),
}

/// Builds `POST {authority}/{tenant}/oauth2/token?api-version=1.0` for `credentials`.
pub(crate) fn password_grant_request(
	endpoints: &DirectoryEndpoints,
	tenant: &TenantId,
	client_id: &ClientId,
	credentials: &UserCredentials,
) -> Result<HttpRequest> {
	let url = endpoints.token_url(tenant)?;
	let form = form_urlencoded::Serializer::new(String::new())
		.append_pair("grant_type", GRANT_TYPE)
		.append_pair("resource", endpoints.resource())
		.append_pair("client_id", client_id)
		.append_pair("username", &credentials.user_name)
		.append_pair("password", credentials.password.expose())
		.finish();

	Ok(HttpRequest::new(Method::Post, url)
		.with_header("Content-Type", FORM_CONTENT_TYPE)
		.with_body(form))
}

/// Maps a token endpoint answer into the next cache state.
pub(crate) fn map_token_response(response: &HttpResponse) -> Result<CachedToken> {
	if !response.is_success() {
		return Err(map_error_response(response));
	}

	let status = Some(response.status);
	let de = &mut serde_json::Deserializer::from_slice(&response.body);
	let parsed: TokenResponse = serde_path_to_error::deserialize(de)
		.map_err(|source| TransientError::TokenResponseParse { source, status })?;
	let access_token = parsed
		.access_token
		.filter(|token| !token.is_empty())
		.ok_or(ConfigError::MissingAccessToken)?;
	let expires_on = parsed.expires_on.ok_or(ConfigError::MissingExpiresOn)?;

	CachedToken::from_expires_on(access_token, expires_on)
}

/// Decides whether a verification answer carried an access token.
///
/// Throttling and server failures are errors; every other answer without a token is a
/// plain `false`.
pub(crate) fn carries_access_token(response: &HttpResponse) -> Result<bool> {
	if response.is_transient() {
		return Err(map_error_response(response));
	}

	let issued = serde_json::from_slice::<TokenResponse>(&response.body)
		.ok()
		.and_then(|parsed| parsed.access_token)
		.is_some_and(|token| !token.is_empty());

	Ok(issued)
}

/// Classifies a non-2xx token endpoint answer from its OAuth `error` code.
pub(crate) fn map_error_response(response: &HttpResponse) -> Error {
	let parsed =
		serde_json::from_slice::<TokenErrorResponse>(&response.body).unwrap_or_default();
	let message = parsed
		.error_description
		.clone()
		.or_else(|| parsed.error.clone())
		.map(|message| message.lines().next().unwrap_or_default().trim().to_owned())
		.filter(|message| !message.is_empty())
		.unwrap_or_else(|| format!("HTTP {}: {}", response.status, response.body_preview()));

	match parsed.error.as_deref() {
		Some("invalid_grant") => Error::InvalidGrant { reason: message },
		Some("invalid_client" | "unauthorized_client") =>
			Error::InvalidClient { reason: message },
		None if response.status == 401 => Error::InvalidClient { reason: message },
		_ => TransientError::TokenEndpoint { message, status: Some(response.status) }.into(),
	}
}

fn epoch_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
	D: Deserializer<'de>,
{
	match Option::<EpochSeconds>::deserialize(deserializer)? {
		None => Ok(None),
		Some(EpochSeconds::Number(secs)) => Ok(Some(secs)),
		Some(EpochSeconds::Text(raw)) => raw.trim().parse().map(Some).map_err(D::Error::custom),
	}
}
