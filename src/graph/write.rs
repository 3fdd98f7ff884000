//! Write wrappers: user and group CRUD plus group membership links.

// self
use crate::{
	_prelude::*,
	graph::{DirectoryLink, GraphClient, GraphResponse},
	http::{GraphTransport, Method},
	request::Query,
};

/// Mutating Graph operations, borrowed from a [`GraphClient`].
pub struct WriteApi<'a, T>
where
	T: ?Sized + GraphTransport,
{
	client: &'a GraphClient<T>,
}
impl<'a, T> WriteApi<'a, T>
where
	T: ?Sized + GraphTransport,
{
	pub(crate) fn new(client: &'a GraphClient<T>) -> Self {
		Self { client }
	}

	/// `POST users`, usually with a [`NewMember`](crate::graph::NewMember) body.
	pub async fn create_member<B>(&self, member: &B, query: Query) -> Result<GraphResponse>
	where
		B: ?Sized + Serialize,
	{
		self.send("create_member", Method::Post, ["users"], Some(member), query).await
	}

	/// `PATCH users/{principal}` with the changed properties.
	pub async fn update_member<B>(
		&self,
		principal: &str,
		changes: &B,
		query: Query,
	) -> Result<GraphResponse>
	where
		B: ?Sized + Serialize,
	{
		self.send("update_member", Method::Patch, ["users", principal], Some(changes), query).await
	}

	/// `DELETE users/{principal}`
	pub async fn delete_member(&self, principal: &str, query: Query) -> Result<GraphResponse> {
		self.send::<(), 2>("delete_member", Method::Delete, ["users", principal], None, query).await
	}

	/// `POST groups`, usually with a [`NewGroup`](crate::graph::NewGroup) body.
	pub async fn create_group<B>(&self, group: &B, query: Query) -> Result<GraphResponse>
	where
		B: ?Sized + Serialize,
	{
		self.send("create_group", Method::Post, ["groups"], Some(group), query).await
	}

	/// `PATCH groups/{id}` with the changed properties.
	pub async fn update_group<B>(
		&self,
		group_id: &str,
		changes: &B,
		query: Query,
	) -> Result<GraphResponse>
	where
		B: ?Sized + Serialize,
	{
		self.send("update_group", Method::Patch, ["groups", group_id], Some(changes), query).await
	}

	/// `DELETE groups/{id}`
	pub async fn delete_group(&self, group_id: &str, query: Query) -> Result<GraphResponse> {
		self.send::<(), 2>("delete_group", Method::Delete, ["groups", group_id], None, query).await
	}

	/// `POST groups/{id}/$links/members` linking the directory object `member_id`.
	pub async fn add_group_member(
		&self,
		group_id: &str,
		member_id: &str,
		query: Query,
	) -> Result<GraphResponse> {
		let target = self.client.endpoints().directory_object_url(self.client.tenant_id(), member_id)?;
		let link = DirectoryLink { url: target.into() };

		self.send(
			"add_group_member",
			Method::Post,
			["groups", group_id, "$links", "members"],
			Some(&link),
			query,
		)
		.await
	}

	/// `DELETE groups/{id}/$links/members/{member_id}`
	pub async fn remove_group_member(
		&self,
		group_id: &str,
		member_id: &str,
		query: Query,
	) -> Result<GraphResponse> {
		self.send::<(), 5>(
			"remove_group_member",
			Method::Delete,
			["groups", group_id, "$links", "members", member_id],
			None,
			query,
		)
		.await
	}

	async fn send<B, const N: usize>(
		&self,
		stage: &'static str,
		method: Method,
		segments: [&str; N],
		body: Option<&B>,
		query: Query,
	) -> Result<GraphResponse>
	where
		B: ?Sized + Serialize,
	{
		let mut spec = self.client.spec(method, segments, query)?;

		if let Some(body) = body {
			spec = spec.json(body)?;
		}

		self.client.call(stage, spec).await
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::{
		_preludet::{self, FakeTransport, TEST_TENANT},
		error::TransientError,
		graph::{NewGroup, NewMember},
	};

	fn client() -> (GraphClient<FakeTransport>, Arc<FakeTransport>) {
		let transport = Arc::new(FakeTransport::default());
		let client: GraphClient<FakeTransport> =
			GraphClient::with_transport(_preludet::test_options("https://mock.test"), transport.clone());

		transport.push(200, _preludet::token_body("admin-token", _preludet::unix_now_plus(3600)));

		(client, transport)
	}

	fn body_json(body: &Option<Vec<u8>>) -> serde_json::Value {
		serde_json::from_slice(body.as_deref().expect("Request should carry a body."))
			.expect("Request body should be JSON.")
	}

	#[tokio::test]
	async fn writes_hit_documented_methods_and_paths() {
		let (client, transport) = client();
		let writes = client.writes();
		let member = NewMember::new("Alice", "alice", "alice@contoso.test", "P@ssw0rd!");
		let group = NewGroup::security("Ops", "ops");

		transport
			.push(201, r#"{"objectId":"u-1"}"#)
			.push(204, "")
			.push(204, "")
			.push(201, r#"{"objectId":"g-1"}"#)
			.push(204, "")
			.push(204, "")
			.push(204, "")
			.push(204, "");

		writes.create_member(&member, Query::new()).await.expect("create_member should succeed.");
		writes
			.update_member("u-1", &json!({ "displayName": "Alice B" }), Query::new())
			.await
			.expect("update_member should succeed.");
		writes.delete_member("u-1", Query::new()).await.expect("delete_member should succeed.");
		writes.create_group(&group, Query::new()).await.expect("create_group should succeed.");
		writes
			.update_group("g-1", &json!({ "description": "on call" }), Query::new())
			.await
			.expect("update_group should succeed.");
		writes.delete_group("g-1", Query::new()).await.expect("delete_group should succeed.");
		writes
			.add_group_member("g-1", "u-1", Query::new())
			.await
			.expect("add_group_member should succeed.");
		writes
			.remove_group_member("g-1", "u-1", Query::new())
			.await
			.expect("remove_group_member should succeed.");

		let requests = transport.requests();
		let shapes = requests
			.iter()
			.skip(1)
			.map(|request| (request.method.as_str(), request.url.path().to_owned()))
			.collect::<Vec<_>>();

		assert_eq!(
			shapes,
			[
				("post", format!("/{TEST_TENANT}/users")),
				("patch", format!("/{TEST_TENANT}/users/u-1")),
				("delete", format!("/{TEST_TENANT}/users/u-1")),
				("post", format!("/{TEST_TENANT}/groups")),
				("patch", format!("/{TEST_TENANT}/groups/g-1")),
				("delete", format!("/{TEST_TENANT}/groups/g-1")),
				("post", format!("/{TEST_TENANT}/groups/g-1/$links/members")),
				("delete", format!("/{TEST_TENANT}/groups/g-1/$links/members/u-1")),
			]
		);
		assert_eq!(body_json(&requests[1].body)["passwordProfile"]["password"], "P@ssw0rd!");
		assert_eq!(body_json(&requests[4].body)["securityEnabled"], true);
		assert_eq!(
			body_json(&requests[7].body),
			json!({ "url": format!("https://mock.test/{TEST_TENANT}/directoryObjects/u-1") })
		);
		assert!(requests[3].body.is_none());
		assert!(requests[8].body.is_none());
	}

	#[tokio::test]
	async fn graph_rejections_and_throttling_surface() {
		let (client, transport) = client();

		transport
			.push(
				400,
				r#"{"odata.error":{"code":"Request_BadRequest","message":{"value":"Another object with the same value for property userPrincipalName already exists."}}}"#,
			)
			.push(503, "");

		let member = NewMember::new("Alice", "alice", "alice@contoso.test", "P@ssw0rd!");

		match client.writes().create_member(&member, Query::new()).await {
			Err(Error::Graph { status: 400, code, .. }) =>
				assert_eq!(code.as_deref(), Some("Request_BadRequest")),
			other => panic!("Unexpected result: {other:?}."),
		}
		assert!(matches!(
			client.writes().delete_member("u-1", Query::new()).await,
			Err(Error::Transient(TransientError::GraphEndpoint { status: 503, .. }))
		));
	}
}
