mod common;

// crates.io
use httpmock::prelude::*;
use time::{Duration, OffsetDateTime};
// self
use aad_graph::{
	auth::{CachedToken, TokenSecret},
	error::{Error, TransientError},
};
use common::*;

#[tokio::test]
async fn token_is_fetched_once_and_reused() {
	let server = MockServer::start_async().await;
	let client = client(&server);
	let expires_on = unix_now_plus(3600);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(token_path())
				.query_param("api-version", "1.0")
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("admin-token", expires_on));
		})
		.await;
	let first = client.tokens().get_valid_token().await.expect("Initial fetch should succeed.");
	let second = client.tokens().get_valid_token().await.expect("Cached read should succeed.");

	assert_eq!(first.expose(), "admin-token");
	assert_eq!(second.expose(), "admin-token");
	assert_eq!(client.tokens().cached().expires_at_millis(), Some((expires_on - 300) * 1000));

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn concurrent_callers_share_one_refresh() {
	let server = MockServer::start_async().await;
	let client = client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(token_path());
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("shared-token", unix_now_plus(3600)));
		})
		.await;
	let tokens = client.tokens();
	let (first, second, third) =
		tokio::join!(tokens.get_valid_token(), tokens.get_valid_token(), tokens.get_valid_token());

	for token in [first, second, third] {
		assert_eq!(token.expect("Every caller should get a token.").expose(), "shared-token");
	}

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn stale_token_is_replaced() {
	let server = MockServer::start_async().await;
	let client = client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(token_path());
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("renewed", unix_now_plus(3600)));
		})
		.await;

	client.tokens().set_token(CachedToken {
		value: Some(TokenSecret::new("stale")),
		expires_at: Some(OffsetDateTime::now_utc() - Duration::seconds(1)),
	});

	let token = client.tokens().get_valid_token().await.expect("Refresh should succeed.");

	assert_eq!(token.expose(), "renewed");

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn rejected_admin_credentials_map_to_invalid_grant() {
	let server = MockServer::start_async().await;
	let client = client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(token_path());
			then.status(400).header("content-type", "application/json").body(
				r#"{"error":"invalid_grant","error_description":"AADSTS50126: Invalid username or password."}"#,
			);
		})
		.await;
	let err = client.tokens().get_valid_token().await.expect_err("Rejected grant should fail.");

	assert!(matches!(err, Error::InvalidGrant { ref reason } if reason.contains("AADSTS50126")));
	assert_eq!(client.tokens().cached(), CachedToken::empty());

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn queued_callers_share_a_rejected_refresh() {
	let server = MockServer::start_async().await;
	let client = client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(token_path());
			then.status(400)
				.header("content-type", "application/json")
				.body(r#"{"error":"invalid_grant","error_description":"AADSTS50126: Invalid username or password."}"#);
		})
		.await;
	let tokens = client.tokens();
	let (first, second, third) =
		tokio::join!(tokens.get_valid_token(), tokens.get_valid_token(), tokens.get_valid_token());

	for result in [first, second, third] {
		let err = result.expect_err("Every caller should see the rejection.");

		assert!(matches!(err, Error::InvalidGrant { ref reason } if reason.contains("AADSTS50126")));
	}

	mock.assert_calls_async(1).await;

	// Later calls start a fresh attempt instead of replaying the old failure.
	tokens.get_valid_token().await.expect_err("A new attempt should be rejected again.");

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn verify_member_reports_without_caching() {
	let server = MockServer::start_async().await;
	let client = client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(token_path());
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("member-token", unix_now_plus(3600)));
		})
		.await;
	let verified = client
		.reads()
		.verify_member("member@contoso.test", "member-password")
		.await
		.expect("Verification should succeed.");

	assert!(verified);
	assert_eq!(client.tokens().cached(), CachedToken::empty());

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn verify_member_surfaces_server_failures() {
	let server = MockServer::start_async().await;
	let client = client(&server);
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(token_path());
			then.status(503).body("service unavailable");
		})
		.await;
	let err = client
		.reads()
		.verify_member("member@contoso.test", "member-password")
		.await
		.expect_err("5xx answers should not read as a verdict.");

	assert!(matches!(err, Error::Transient(TransientError::TokenEndpoint { status: Some(503), .. })));
}
