//! OIDC ID token claims. Signing itself is delegated to
//! [`ot_crypto::signing::sign_claims`]; this module only builds the claim
//! set and computes `at_hash`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::scope;

/// RFC 8174 `at_hash`: left half of `SHA-256(access_token)`, base64url
/// encoded, binding the ID token to the specific access token issued
/// alongside it.
#[must_use]
pub fn at_hash(access_token: &str) -> String {
	let mut hasher = Sha256::new();
	hasher.update(access_token.as_bytes());
	let digest = hasher.finalize();
	URL_SAFE_NO_PAD.encode(&digest[..digest.len() / 2])
}

#[derive(Debug, Clone, Serialize)]
pub struct IdTokenClaims {
	pub iss: String,
	pub sub: String,
	pub aud: String,
	pub exp: i64,
	pub iat: i64,
	pub auth_time: i64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub nonce: Option<String>,
	pub at_hash: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub roles: Option<Vec<String>>,
}

pub struct IdTokenInput<'a> {
	pub issuer: &'a str,
	pub subject: &'a str,
	pub audience: &'a str,
	pub issued_at: i64,
	pub expires_at: i64,
	pub auth_time: i64,
	pub nonce: Option<String>,
	pub access_token: &'a str,
	pub scopes: &'a [String],
	pub email: &'a str,
	pub name: &'a str,
	pub roles: Vec<String>,
}

/// `email`/`name`/`roles` appear only when the granted scope includes
/// `profile`, `email`, or `roles` respectively, following the
/// conventional OIDC scope/claim mapping (see `DESIGN.md` for the
/// judgment call behind this over a looser "profile or roles" reading).
#[must_use]
pub fn build_claims(input: IdTokenInput<'_>) -> IdTokenClaims {
	let wants_profile = scope::contains(input.scopes, scope::PROFILE);
	let wants_email = scope::contains(input.scopes, scope::EMAIL);
	let wants_roles = scope::contains(input.scopes, scope::ROLES);

	IdTokenClaims {
		iss: input.issuer.to_string(),
		sub: input.subject.to_string(),
		aud: input.audience.to_string(),
		exp: input.expires_at,
		iat: input.issued_at,
		auth_time: input.auth_time,
		nonce: input.nonce,
		at_hash: at_hash(input.access_token),
		email: (wants_profile || wants_email).then(|| input.email.to_string()),
		name: wants_profile.then(|| input.name.to_string()),
		roles: wants_roles.then_some(input.roles),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn at_hash_is_deterministic() {
		assert_eq!(at_hash("some-access-token"), at_hash("some-access-token"));
		assert_ne!(at_hash("some-access-token"), at_hash("other-access-token"));
	}

	#[test]
	fn claims_are_gated_by_scope() {
		let claims = build_claims(IdTokenInput {
			issuer: "https://issuer.example",
			subject: "user-1",
			audience: "client-1",
			issued_at: 1000,
			expires_at: 4600,
			auth_time: 1000,
			nonce: Some("n-1".into()),
			access_token: "at",
			scopes: &["openid".to_string()],
			email: "alice@acme.local",
			name: "Alice",
			roles: vec!["tenant_member".into()],
		});
		assert!(claims.email.is_none());
		assert!(claims.name.is_none());
		assert!(claims.roles.is_none());
		assert_eq!(claims.nonce.as_deref(), Some("n-1"));
	}
}

// vim: ts=4
