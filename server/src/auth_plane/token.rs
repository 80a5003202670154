//! `POST /oauth2/token` (RFC 6749 §4.1.3 / §6). Supports the
//! `authorization_code` and `refresh_token` grants; client authentication
//! accepts HTTP Basic (`client_secret_basic`) or form fields
//! (`client_secret_post`/public clients).

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Form;
use serde::{Deserialize, Serialize};

use ot_oauth2::client_auth::authenticate_client;
use ot_oauth2::error::{OAuthError, OAuthErrorCode};
use ot_oauth2::id_token::{self, IdTokenInput};
use ot_oauth2::token::{self as engine, MintedPair};
use ot_rbac::RbacAuthority;
use ot_types::extract::HasRepositories;
use ot_types::ids::{ClientId, TenantId, UserId};
use ot_types::model::OAuthClient;
use ot_types::types::Timestamp;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
	pub grant_type: String,
	#[serde(default)]
	pub code: Option<String>,
	#[serde(default)]
	pub redirect_uri: Option<String>,
	#[serde(default)]
	pub code_verifier: Option<String>,
	#[serde(default)]
	pub refresh_token: Option<String>,
	#[serde(default)]
	pub client_id: Option<String>,
	#[serde(default)]
	pub client_secret: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
	pub access_token: String,
	pub token_type: &'static str,
	pub expires_in: i64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id_token: Option<String>,
	pub scope: String,
}

fn basic_auth(headers: &HeaderMap) -> Option<(String, String)> {
	use base64::Engine;
	let raw = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
	let encoded = raw.strip_prefix("Basic ")?;
	let decoded = base64::engine::general_purpose::STANDARD.decode(encoded).ok()?;
	let decoded = String::from_utf8(decoded).ok()?;
	let (user, pass) = decoded.split_once(':')?;
	Some((user.to_string(), pass.to_string()))
}

pub async fn token(State(state): State<AppState>, headers: HeaderMap, Form(body): Form<TokenRequest>) -> Response {
	let repo = state.repositories();

	let (client_id_raw, client_secret) = match basic_auth(&headers) {
		Some((id, secret)) => (Some(id), Some(secret)),
		None => (body.client_id.clone(), body.client_secret.clone()),
	};

	let Some(client_id_raw) = client_id_raw else {
		return OAuthError::invalid_client("client_id is required").into_response();
	};
	let Ok(client_id) = client_id_raw.parse::<ClientId>() else {
		return OAuthError::invalid_client("unknown client").into_response();
	};

	let client = match authenticate_client(repo.clients(), client_id, client_secret.as_deref()).await {
		Ok(client) => client,
		Err(err) => return err.into_response(),
	};

	let result = match body.grant_type.as_str() {
		"authorization_code" => authorization_code_grant(&state, &client, &body).await,
		"refresh_token" => refresh_token_grant(&state, &client, &body).await,
		_ => Err(OAuthError::new(OAuthErrorCode::UnsupportedGrantType, "unsupported grant_type")),
	};

	match result {
		Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
		Err(err) => err.into_response(),
	}
}

async fn authorization_code_grant(
	state: &AppState,
	client: &OAuthClient,
	body: &TokenRequest,
) -> Result<TokenResponse, OAuthError> {
	let repo = state.repositories();
	let code = body.code.as_deref().ok_or_else(|| OAuthError::invalid_request("code is required"))?;
	let redirect_uri =
		body.redirect_uri.as_deref().ok_or_else(|| OAuthError::invalid_request("redirect_uri is required"))?;

	let (record, pair) = engine::redeem_authorization_code(
		repo.codes(),
		repo.tokens(),
		client,
		code,
		redirect_uri,
		body.code_verifier.as_deref(),
	)
	.await?;

	finish(state, client, record.tenant_id, record.user_id, &record.scopes, record.nonce.clone(), pair).await
}

async fn refresh_token_grant(
	state: &AppState,
	client: &OAuthClient,
	body: &TokenRequest,
) -> Result<TokenResponse, OAuthError> {
	let repo = state.repositories();
	let refresh_token =
		body.refresh_token.as_deref().ok_or_else(|| OAuthError::invalid_request("refresh_token is required"))?;

	let pair = engine::rotate_refresh_token(repo.tokens(), client, refresh_token).await?;

	// `rotate_refresh_token` stores the new access token before returning,
	// so the minted row (and therefore the user/tenant/scope it belongs to)
	// can be read straight back by its fingerprint rather than re-derived.
	let access_hash = ot_crypto::fingerprint::fingerprint(&pair.access_token);
	let minted = repo
		.tokens()
		.get_access_token(&access_hash)
		.await
		.map_err(OAuthError::from)?
		.ok_or_else(|| OAuthError::new(OAuthErrorCode::ServerError, "minted token vanished"))?;

	finish(state, client, minted.tenant_id, minted.user_id, &minted.scopes, None, pair).await
}

#[allow(clippy::too_many_arguments)]
async fn finish(
	state: &AppState,
	client: &OAuthClient,
	tenant_id: TenantId,
	user_id: UserId,
	scopes: &[String],
	nonce: Option<String>,
	pair: MintedPair,
) -> Result<TokenResponse, OAuthError> {
	let id_token = issue_id_token(state, client, tenant_id, user_id, scopes, nonce, &pair).await?;

	Ok(TokenResponse {
		access_token: pair.access_token,
		token_type: "Bearer",
		expires_in: (pair.access_token_expires_at.0 - Timestamp::now().0).max(0),
		refresh_token: pair.refresh_token,
		id_token,
		scope: engine::scope_string(scopes),
	})
}

#[allow(clippy::too_many_arguments)]
async fn issue_id_token(
	state: &AppState,
	client: &OAuthClient,
	tenant_id: TenantId,
	user_id: UserId,
	scopes: &[String],
	nonce: Option<String>,
	pair: &MintedPair,
) -> Result<Option<String>, OAuthError> {
	if !scopes.iter().any(|s| s == "openid") {
		return Ok(None);
	}
	let repo = state.repositories();

	let user = repo.identities().get_user(tenant_id, user_id).await.map_err(OAuthError::from)?;
	let rbac = RbacAuthority::new(repo.rbac());
	let roles = rbac.roles_for_user(tenant_id, user_id).await.map_err(OAuthError::from)?;

	let signing_key = repo
		.signing_keys()
		.active_signing_key()
		.await
		.map_err(OAuthError::from)?
		.ok_or_else(|| OAuthError::new(OAuthErrorCode::ServerError, "no active signing key"))?;

	let private_key_der =
		state.master_key.unwrap(&signing_key.wrapped_private_key).map_err(OAuthError::from)?;

	let now = Timestamp::now();
	let claims = id_token::build_claims(IdTokenInput {
		issuer: &state.issuer,
		subject: &user.id.to_string(),
		audience: &client.id.to_string(),
		issued_at: now.0,
		expires_at: pair.access_token_expires_at.0,
		auth_time: now.0,
		nonce,
		access_token: &pair.access_token,
		scopes,
		email: &user.email,
		name: &user.display_name,
		roles: roles.into_iter().map(|role| role.name).collect(),
	});

	let signed = ot_crypto::signing::sign_claims(&state.worker, claims, signing_key.kid.clone(), private_key_der.to_vec())
		.await
		.map_err(OAuthError::from)?;

	Ok(Some(signed))
}

// vim: ts=4
