//! The authorize step (`GET /oauth2/authorize`). Assumes the caller has
//! already resolved an authenticated auth-plane session — redirecting an
//! anonymous visitor to the login page is the HTTP layer's job, not this
//! engine's.

use ot_crypto::fingerprint::random_token;
use ot_types::ids::{ClientId, TenantId, UserId};
use ot_types::model::{AuthorizationCode, PkceMethod};
use ot_types::repo::{AuthorizationCodeRepository, ClientRepository};
use ot_types::types::Timestamp;

use crate::error::{OAuthError, OAuthErrorCode};
use crate::scope;

/// Authorization codes live 5 minutes.
pub const CODE_TTL_SECONDS: i64 = 5 * 60;
/// Bytes of entropy in a minted code, before base64url encoding.
const CODE_ENTROPY_BYTES: usize = 32;

pub struct AuthorizeParams {
	pub response_type: String,
	pub client_id: ClientId,
	pub redirect_uri: String,
	pub scope: String,
	pub state: String,
	pub nonce: Option<String>,
	pub code_challenge: Option<String>,
	pub code_challenge_method: Option<String>,
}

pub struct AuthorizeOutcome {
	pub redirect_uri: String,
	pub code: String,
	pub state: String,
}

/// Validates `params` against the client registration and mints a
/// single-use authorization code. Every failure path carries `state` so
/// the handler can redirect back to the client with the error echoed,
/// except when the error happens before a safe redirect target is known
/// (unknown client, bad redirect_uri) — those must not redirect at all,
/// per RFC 6749 §4.1.2.1, and the caller is expected to render them as a
/// direct error response instead of a redirect.
pub async fn authorize(
	clients: &dyn ClientRepository,
	codes: &dyn AuthorizationCodeRepository,
	tenant_id: TenantId,
	user_id: UserId,
	params: AuthorizeParams,
) -> Result<AuthorizeOutcome, OAuthError> {
	let client = clients
		.get_client(params.client_id)
		.await
		.map_err(|_| OAuthError::new(OAuthErrorCode::InvalidRequest, "unknown client_id"))?;

	if !client.is_active || client.tenant_id != tenant_id {
		return Err(OAuthError::new(OAuthErrorCode::UnauthorizedClient, "client is not available to this tenant"));
	}

	if !client.redirect_uris.iter().any(|registered| registered == &params.redirect_uri) {
		return Err(OAuthError::new(OAuthErrorCode::InvalidRequest, "redirect_uri does not exactly match registration"));
	}

	// From here on a validation failure is safe to report via redirect:
	// the redirect_uri itself has just been confirmed to belong to the client.
	let err = |code: OAuthErrorCode, msg: &str| OAuthError::new(code, msg).with_state(Some(params.state.clone()));

	if params.response_type != "code" {
		return Err(err(OAuthErrorCode::UnsupportedResponseType, "only response_type=code is supported"));
	}

	let requested_scopes = scope::parse(&params.scope);
	if !scope::is_subset(&requested_scopes, &client.scopes) {
		return Err(err(OAuthErrorCode::InvalidScope, "requested scope exceeds the client's allowed scopes"));
	}

	let code_challenge_method = match params.code_challenge_method.as_deref() {
		Some("S256") => Some(PkceMethod::S256),
		Some("plain") => Some(PkceMethod::Plain),
		Some(_) => return Err(err(OAuthErrorCode::InvalidRequest, "unsupported code_challenge_method")),
		None => None,
	};
	if params.code_challenge.is_some() != code_challenge_method.is_some() {
		return Err(err(OAuthErrorCode::InvalidRequest, "code_challenge and code_challenge_method must both be present"));
	}

	let now = Timestamp::now();
	let code = random_token(CODE_ENTROPY_BYTES);
	let record = AuthorizationCode {
		code: code.clone(),
		client_id: client.id,
		tenant_id,
		user_id,
		redirect_uri: params.redirect_uri.clone(),
		scopes: requested_scopes,
		code_challenge: params.code_challenge,
		code_challenge_method,
		nonce: params.nonce,
		created_at: now,
		expires_at: now.add_seconds(CODE_TTL_SECONDS),
		consumed_at: None,
	};
	codes.store_code(record).await.map_err(OAuthError::from)?;

	Ok(AuthorizeOutcome { redirect_uri: params.redirect_uri, code, state: params.state })
}


// vim: ts=4
