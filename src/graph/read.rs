//! Read wrappers: user and group lookups, membership links, and credential verification.

// self
use crate::{
	_prelude::*,
	graph::{GraphClient, GraphResponse},
	http::{GraphTransport, Method},
	request::Query,
};

/// Read-only Graph operations, borrowed from a [`GraphClient`].
pub struct ReadApi<'a, T>
where
	T: ?Sized + GraphTransport,
{
	client: &'a GraphClient<T>,
}
impl<'a, T> ReadApi<'a, T>
where
	T: ?Sized + GraphTransport,
{
	pub(crate) fn new(client: &'a GraphClient<T>) -> Self {
		Self { client }
	}

	/// `GET users`
	pub async fn members(&self, query: Query) -> Result<GraphResponse> {
		self.get("members", ["users"], query).await
	}

	/// `GET users/{principal}`; `principal` is an object id or user principal name.
	pub async fn member(&self, principal: &str, query: Query) -> Result<GraphResponse> {
		self.get("member", ["users", principal], query).await
	}

	/// `GET groups`
	pub async fn groups(&self, query: Query) -> Result<GraphResponse> {
		self.get("groups", ["groups"], query).await
	}

	/// `GET groups/{id}`
	pub async fn group(&self, group_id: &str, query: Query) -> Result<GraphResponse> {
		self.get("group", ["groups", group_id], query).await
	}

	/// `GET groups/{id}/$links/members`
	///
	/// The answer decodes as [`ODataCollection<DirectoryLink>`](crate::graph::ODataCollection).
	pub async fn group_members(&self, group_id: &str, query: Query) -> Result<GraphResponse> {
		self.get("group_members", ["groups", group_id, "$links", "members"], query).await
	}

	/// `GET users/{id}/$links/memberOf`
	pub async fn member_of(&self, user_id: &str, query: Query) -> Result<GraphResponse> {
		self.get("member_of", ["users", user_id, "$links", "memberOf"], query).await
	}

	/// Checks whether `user_name` / `password` can obtain a token.
	///
	/// See [`TokenCache::verify_credentials`](crate::cache::TokenCache::verify_credentials).
	pub async fn verify_member(&self, user_name: &str, password: &str) -> Result<bool> {
		self.client.tokens().verify_credentials(user_name, password).await
	}

	async fn get<const N: usize>(
		&self,
		stage: &'static str,
		segments: [&str; N],
		query: Query,
	) -> Result<GraphResponse> {
		let spec = self.client.spec(Method::Get, segments, query)?;

		self.client.call(stage, spec).await
	}
}
