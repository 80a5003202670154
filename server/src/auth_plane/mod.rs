//! Everything a browser or OAuth2 client talks to directly: registration,
//! login/logout, the authorize/token/revoke/userinfo/discovery endpoints,
//! and the server-rendered login form. Distinct from `admin_plane`, which
//! is JSON-only and gated by RBAC rather than by "is there a live
//! session."

pub mod authorize;
pub mod discovery;
pub mod login;
pub mod logout;
pub mod me;
pub mod password;
pub mod register;
pub mod revoke;
pub mod token;
pub mod userinfo;

use crate::state::AppState;

// Routes here are mounted individually by `build_router` rather than through
// a single combined `Router` in this module: the authorize/login/token/
// password routes each need their own named rate limiter layered on.

/// Reads `Authorization: Bearer <token>`, fingerprints it, and loads the
/// matching, unrevoked, unexpired access token record. Used by both
/// `/userinfo` and anywhere else a bearer token needs resolving outside
/// the cookie-session extractors in `ot_types::extract`.
pub async fn resolve_bearer_token(
	headers: &axum::http::HeaderMap,
	state: &AppState,
) -> Result<ot_types::model::AccessToken, ot_types::prelude::Error> {
	use ot_types::extract::HasRepositories;
	use ot_types::prelude::Error;

	let raw = headers
		.get(axum::http::header::AUTHORIZATION)
		.and_then(|v| v.to_str().ok())
		.and_then(|v| v.strip_prefix("Bearer "))
		.ok_or(Error::Unauthorized)?;

	let hash = ot_crypto::fingerprint::fingerprint(raw);
	let token = state.repositories().tokens().get_access_token(&hash).await?.ok_or(Error::Unauthorized)?;

	if token.revoked_at.is_some() || token.expires_at.is_past() {
		return Err(Error::Unauthorized);
	}
	Ok(token)
}

// vim: ts=4
