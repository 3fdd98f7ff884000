//! Login and Graph host handling plus URL assembly for every call the client makes.

// self
use crate::{_prelude::*, auth::TenantId, error::ConfigError};

/// `api-version` pinned on the token endpoint.
pub const TOKEN_API_VERSION: &str = "1.0";

/// Login (authority) and Graph hosts for a cloud.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryEndpoints {
	/// Authority host serving `/{tenant}/oauth2/token`.
	pub authority: Url,
	/// Graph host serving `/{tenant}/users`, `/{tenant}/groups`, and friends.
	pub graph: Url,
}
impl DirectoryEndpoints {
	/// Derives `https://login.{base}` and `https://graph.{base}` from a cloud host suffix such
	/// as `chinacloudapi.cn` or `windows.net`.
	pub fn from_base_url(base_url: &str) -> Result<Self, ConfigError> {
		let base = base_url.trim().trim_end_matches('/');

		Ok(Self {
			authority: Url::parse(&format!("https://login.{base}"))?,
			graph: Url::parse(&format!("https://graph.{base}"))?,
		})
	}

	/// Uses explicit hosts, e.g. a sovereign cloud or a local mock server.
	pub fn custom(authority: Url, graph: Url) -> Self {
		Self { authority, graph }
	}

	/// Graph host rendered the way the token endpoint expects the `resource` parameter.
	pub fn resource(&self) -> &str {
		self.graph.as_str().trim_end_matches('/')
	}

	/// `{authority}/{tenant}/oauth2/token?api-version=1.0`.
	pub fn token_url(&self, tenant: &TenantId) -> Result<Url, ConfigError> {
		let mut url = bare(&self.authority);

		push_segments(&mut url, [tenant.as_ref(), "oauth2", "token"])?;

		url.query_pairs_mut().append_pair("api-version", TOKEN_API_VERSION);

		Ok(url)
	}

	/// `{graph}/{tenant}/{segments...}` with each segment percent-encoded.
	pub fn graph_url<I>(&self, tenant: &TenantId, segments: I) -> Result<Url, ConfigError>
	where
		I: IntoIterator,
		I::Item: AsRef<str>,
	{
		let mut url = bare(&self.graph);

		push_segments(&mut url, [tenant.as_ref()])?;
		push_segments(&mut url, segments)?;

		Ok(url)
	}

	/// `{graph}/{tenant}/directoryObjects/{object_id}`, the link target used by membership
	/// writes.
	pub fn directory_object_url(
		&self,
		tenant: &TenantId,
		object_id: &str,
	) -> Result<Url, ConfigError> {
		self.graph_url(tenant, ["directoryObjects", object_id])
	}
}

fn bare(base: &Url) -> Url {
	let mut url = base.clone();

	url.set_query(None);
	url.set_fragment(None);

	url
}

fn push_segments<I>(url: &mut Url, segments: I) -> Result<(), ConfigError>
where
	I: IntoIterator,
	I::Item: AsRef<str>,
{
	let rendered = url.to_string();
	let mut path =
		url.path_segments_mut().map_err(|_| ConfigError::CannotBeABase { url: rendered })?;

	path.pop_if_empty().extend(segments);

	Ok(())
}
