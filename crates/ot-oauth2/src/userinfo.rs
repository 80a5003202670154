//! `GET /userinfo` claims assembly. Requires a valid, unrevoked,
//! unexpired access token; the authorization block (`roles`) is gated
//! by the token's own scope the same way the ID token's additional
//! claims are (`crate::id_token`).
//!
//! A `projects` block is deliberately not modeled here: there is no
//! `Project` entity anywhere in this system's data model for it to be
//! derived from. It is omitted rather than invented; see `DESIGN.md`.

use serde::Serialize;

use crate::scope;

#[derive(Debug, Clone, Serialize)]
pub struct UserInfoClaims {
	pub sub: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub roles: Option<Vec<String>>,
}

pub struct UserInfoInput<'a> {
	pub subject: &'a str,
	pub scopes: &'a [String],
	pub email: &'a str,
	pub name: &'a str,
	pub roles: Vec<String>,
}

#[must_use]
pub fn build_claims(input: UserInfoInput<'_>) -> UserInfoClaims {
	let wants_profile = scope::contains(input.scopes, scope::PROFILE);
	let wants_email = scope::contains(input.scopes, scope::EMAIL);
	let wants_roles = scope::contains(input.scopes, scope::ROLES);

	UserInfoClaims {
		sub: input.subject.to_string(),
		email: (wants_profile || wants_email).then(|| input.email.to_string()),
		name: wants_profile.then(|| input.name.to_string()),
		roles: wants_roles.then_some(input.roles),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn roles_only_appear_with_the_roles_scope() {
		let claims = build_claims(UserInfoInput {
			subject: "user-1",
			scopes: &["openid".to_string(), "roles".to_string()],
			email: "alice@acme.local",
			name: "Alice",
			roles: vec!["tenant_owner".into()],
		});
		assert_eq!(claims.roles, Some(vec!["tenant_owner".to_string()]));
		assert!(claims.email.is_none());
	}
}

// vim: ts=4
