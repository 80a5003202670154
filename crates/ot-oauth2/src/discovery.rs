//! `GET /.well-known/openid-configuration` and `GET /oauth2/jwks`. Both
//! are pure functions of the issuer string and the signing-key
//! repository — no session, no tenant, no authentication.

use ot_crypto::signing::{public_key_to_jwk, JwkRsa};
use ot_types::prelude::ClResult;
use ot_types::repo::SigningKeyRepository;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DiscoveryDocument {
	pub issuer: String,
	pub authorization_endpoint: String,
	pub token_endpoint: String,
	pub userinfo_endpoint: String,
	pub revocation_endpoint: String,
	pub jwks_uri: String,
	pub response_types_supported: &'static [&'static str],
	pub grant_types_supported: &'static [&'static str],
	pub subject_types_supported: &'static [&'static str],
	pub id_token_signing_alg_values_supported: &'static [&'static str],
	pub code_challenge_methods_supported: &'static [&'static str],
	pub scopes_supported: &'static [&'static str],
	pub token_endpoint_auth_methods_supported: &'static [&'static str],
}

/// Every endpoint is derived from `issuer` by appending the fixed path
/// this deployment mounts it at — there is no separate per-endpoint
/// configuration to drift out of sync with `issuer` itself.
#[must_use]
pub fn discovery_document(issuer: &str) -> DiscoveryDocument {
	let issuer = issuer.trim_end_matches('/');
	DiscoveryDocument {
		issuer: issuer.to_string(),
		authorization_endpoint: format!("{issuer}/oauth2/authorize"),
		token_endpoint: format!("{issuer}/oauth2/token"),
		userinfo_endpoint: format!("{issuer}/userinfo"),
		revocation_endpoint: format!("{issuer}/oauth2/revoke"),
		jwks_uri: format!("{issuer}/oauth2/jwks"),
		response_types_supported: &["code"],
		grant_types_supported: &["authorization_code", "refresh_token"],
		subject_types_supported: &["public"],
		id_token_signing_alg_values_supported: &["RS256"],
		code_challenge_methods_supported: &["S256", "plain"],
		scopes_supported: &["openid", "profile", "email", "roles"],
		token_endpoint_auth_methods_supported: &["client_secret_basic", "client_secret_post", "none"],
	}
}

#[derive(Debug, Serialize)]
pub struct JwksResponse {
	pub keys: Vec<JwkRsa>,
}

/// Publishes every non-retired signing key, current and not-yet-retired
/// predecessors included, so a relying party mid-rotation can still verify
/// tokens signed moments before a new key took over.
pub async fn jwks(keys: &dyn SigningKeyRepository) -> ClResult<JwksResponse> {
	let all = keys.list_signing_keys().await?;
	let mut out = Vec::with_capacity(all.len());
	for key in all.iter().filter(|k| !k.retired) {
		out.push(public_key_to_jwk(&key.kid, &key.public_key_pem)?);
	}
	Ok(JwksResponse { keys: out })
}


// vim: ts=4
