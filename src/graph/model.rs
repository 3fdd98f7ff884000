//! Typed payloads for the user and group wrappers.
//!
//! Field names follow the Graph 1.5 JSON schema (`camelCase`, `odata.*` annotations).

// self
use crate::_prelude::*;

/// Body for `POST users`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
	/// Whether the account can sign in.
	pub account_enabled: bool,
	/// Name shown in the directory.
	pub display_name: String,
	/// Mail alias.
	pub mail_nickname: String,
	/// Initial password settings.
	pub password_profile: PasswordProfile,
	/// Sign-in name, e.g. `someone@contoso.partner.onmschina.cn`.
	pub user_principal_name: String,
}
impl NewMember {
	/// Creates an enabled member whose first sign-in must change `password`.
	pub fn new(
		display_name: impl Into<String>,
		mail_nickname: impl Into<String>,
		user_principal_name: impl Into<String>,
		password: impl Into<String>,
	) -> Self {
		Self {
			account_enabled: true,
			display_name: display_name.into(),
			mail_nickname: mail_nickname.into(),
			password_profile: PasswordProfile::new(password),
			user_principal_name: user_principal_name.into(),
		}
	}
}

/// Password settings attached to a new member.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordProfile {
	/// Initial password.
	pub password: String,
	/// Whether the member must pick a new password at next sign-in.
	pub force_change_password_next_login: bool,
}
impl PasswordProfile {
	/// Creates a profile that forces a password change at next sign-in.
	pub fn new(password: impl Into<String>) -> Self {
		Self { password: password.into(), force_change_password_next_login: true }
	}
}
impl Debug for PasswordProfile {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PasswordProfile")
			.field("password", &"<redacted>")
			.field("force_change_password_next_login", &self.force_change_password_next_login)
			.finish()
	}
}

/// Body for `POST groups`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroup {
	/// Name shown in the directory.
	pub display_name: String,
	/// Mail alias.
	pub mail_nickname: String,
	/// Graph 1.5 only accepts `false` here.
	pub mail_enabled: bool,
	/// Graph 1.5 only accepts `true` here.
	pub security_enabled: bool,
	/// Optional free-form description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}
impl NewGroup {
	/// Creates a security group.
	pub fn security(display_name: impl Into<String>, mail_nickname: impl Into<String>) -> Self {
		Self {
			display_name: display_name.into(),
			mail_nickname: mail_nickname.into(),
			mail_enabled: false,
			security_enabled: true,
			description: None,
		}
	}

	/// Sets the description.
	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());

		self
	}
}

const TYPE_CAST_PREFIX: &str = "Microsoft.DirectoryServices.";

/// A `$links` entry: the absolute URL of a directory object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryLink {
	/// `{graph}/{tenant}/directoryObjects/{id}`.
	pub url: String,
}
impl DirectoryLink {
	/// Object id the link points at, skipping a trailing type cast segment.
	pub fn object_id(&self) -> Option<&str> {
		self.url
			.rsplit('/')
			.find(|segment| !segment.is_empty() && !segment.starts_with(TYPE_CAST_PREFIX))
	}
}

/// Directory object summary as returned by user and group reads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryObject {
	/// Object id.
	pub object_id: String,
	/// `User`, `Group`, ...
	#[serde(default)]
	pub object_type: Option<String>,
	/// Display name.
	#[serde(default)]
	pub display_name: Option<String>,
	/// Sign-in name; users only.
	#[serde(default)]
	pub user_principal_name: Option<String>,
}

/// OData collection envelope (`{"value": [...], "odata.nextLink": "..."}`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ODataCollection<T> {
	/// Page items.
	#[serde(default)]
	pub value: Vec<T>,
	/// Continuation link carrying the next `$skiptoken`.
	#[serde(rename = "odata.nextLink", default, skip_serializing_if = "Option::is_none")]
	pub next_link: Option<String>,
}
impl<T> ODataCollection<T> {
	/// `$skiptoken` of the next page, ready for [`Query::skip_token`](crate::request::Query::skip_token).
	pub fn skip_token(&self) -> Option<String> {
		let link = self.next_link.as_deref()?;
		let (_, query) = link.split_once('?')?;

		url::form_urlencoded::parse(query.as_bytes())
			.find(|(key, _)| key == "$skiptoken")
			.map(|(_, value)| value.into_owned())
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn new_member_serializes_in_graph_shape() {
		let member = NewMember::new("Alice", "alice", "alice@contoso.test", "P@ssw0rd!");
		let value = serde_json::to_value(&member).expect("Member should serialize.");

		assert_eq!(
			value,
			json!({
				"accountEnabled": true,
				"displayName": "Alice",
				"mailNickname": "alice",
				"passwordProfile": { "password": "P@ssw0rd!", "forceChangePasswordNextLogin": true },
				"userPrincipalName": "alice@contoso.test",
			})
		);
		assert!(!format!("{member:?}").contains("P@ssw0rd!"));
	}

	#[test]
	fn new_group_omits_missing_description() {
		let value = serde_json::to_value(NewGroup::security("Ops", "ops"))
			.expect("Group should serialize.");

		assert_eq!(
			value,
			json!({
				"displayName": "Ops",
				"mailNickname": "ops",
				"mailEnabled": false,
				"securityEnabled": true,
			})
		);
	}

	#[test]
	fn link_collections_expose_ids_and_paging() {
		let page: ODataCollection<DirectoryLink> = serde_json::from_value(json!({
			"odata.metadata": "https://graph.test/t/$metadata#directoryObjects/$links/members",
			"value": [{ "url": "https://graph.test/t/directoryObjects/abc-123/Microsoft.DirectoryServices.User" }],
			"odata.nextLink": "directoryObjects/$links/members?$skiptoken=X%27445%27",
		}))
		.expect("Link page should decode.");

		assert_eq!(page.value[0].object_id(), Some("abc-123"));
		assert_eq!(page.skip_token().as_deref(), Some("X'445'"));

		let link = DirectoryLink { url: "https://graph.test/t/directoryObjects/def-456/".into() };

		assert_eq!(link.object_id(), Some("def-456"));
	}
	#[test]
	fn object_pages_decode_without_default_items() {
		let page: ODataCollection<DirectoryObject> = serde_json::from_value(json!({
			"value": [{ "objectId": "g-1", "objectType": "Group", "displayName": "Ops" }],
		}))
		.expect("Object page should decode.");

		assert_eq!(page.value[0].object_id, "g-1");
		assert_eq!(page.value[0].display_name.as_deref(), Some("Ops"));
		assert_eq!(page.skip_token(), None);

		let empty: ODataCollection<DirectoryObject> =
			serde_json::from_value(json!({})).expect("A page without `value` should decode.");

		assert!(empty.value.is_empty());
	}
}
