//! `GET /oauth2/authorize`. Redirects an anonymous visitor to the login
//! form, preserving every query parameter so the form can re-submit them
//! once credentials are verified; an already-authenticated visitor is
//! redirected straight to the client with a freshly minted code.

use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use ot_oauth2::authorize as engine;
use ot_oauth2::error::{OAuthError, OAuthErrorCode};
use ot_types::extract::{HasRepositories, OptionalAuth};
use ot_types::ids::ClientId;

use crate::state::AppState;

/// The full set of query parameters the authorize step and the login form
/// pass back and forth. Every field but `client_id` is carried as a raw
/// string — validation of their contents belongs to `ot_oauth2::authorize`,
/// not to this HTTP-facing shape.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthorizeQuery {
	#[serde(default)]
	pub response_type: String,
	pub client_id: String,
	#[serde(default)]
	pub redirect_uri: String,
	#[serde(default)]
	pub scope: String,
	#[serde(default)]
	pub state: String,
	#[serde(default)]
	pub nonce: Option<String>,
	#[serde(default)]
	pub code_challenge: Option<String>,
	#[serde(default)]
	pub code_challenge_method: Option<String>,
}

pub async fn authorize(
	State(state): State<AppState>,
	OptionalAuth(ctx): OptionalAuth,
	Query(query): Query<AuthorizeQuery>,
) -> Response {
	let Some(ctx) = ctx else {
		return redirect_to_login(&query);
	};

	let Ok(client_id) = query.client_id.parse::<ClientId>() else {
		return OAuthError::invalid_request("invalid client_id").into_response();
	};

	let redirect_uri = query.redirect_uri.clone();
	let state_param = query.state.clone();
	let repo = state.repositories();

	let params = engine::AuthorizeParams {
		response_type: query.response_type,
		client_id,
		redirect_uri: redirect_uri.clone(),
		scope: query.scope,
		state: state_param,
		nonce: query.nonce,
		code_challenge: query.code_challenge,
		code_challenge_method: query.code_challenge_method,
	};

	match engine::authorize(repo.clients(), repo.codes(), ctx.tenant_id, ctx.user_id, params).await {
		Ok(outcome) => redirect_with_pairs(&outcome.redirect_uri, &[("code", outcome.code), ("state", outcome.state)]),
		Err(err) => redirect_or_render_error(&redirect_uri, err),
	}
}

/// Errors raised before a redirect_uri is confirmed to belong to the
/// client carry no `state` — see `ot_oauth2::authorize`'s module docs.
/// Those must render directly rather than redirect; every later error
/// carries `state` and is safe to redirect back to the client with.
fn redirect_or_render_error(redirect_uri: &str, err: OAuthError) -> Response {
	if err.state.is_some() && !redirect_uri.is_empty() {
		return redirect_with_pairs(redirect_uri, &err.redirect_pairs());
	}
	err.into_response()
}

fn redirect_with_pairs(target: &str, pairs: &[(&str, String)]) -> Response {
	let query = serde_urlencoded::to_string(pairs).unwrap_or_default();
	let separator = if target.contains('?') { "&" } else { "?" };
	let location = format!("{target}{separator}{query}");
	match HeaderValue::from_str(&location) {
		Ok(value) => {
			let mut response = StatusCode::FOUND.into_response();
			response.headers_mut().insert(axum::http::header::LOCATION, value);
			response
		}
		Err(_) => OAuthError::new(OAuthErrorCode::ServerError, "could not build redirect").into_response(),
	}
}

fn redirect_to_login(query: &AuthorizeQuery) -> Response {
	let qs = serde_urlencoded::to_string(query).unwrap_or_default();
	let location = format!("/login?{qs}");
	match HeaderValue::from_str(&location) {
		Ok(value) => {
			let mut response = StatusCode::FOUND.into_response();
			response.headers_mut().insert(axum::http::header::LOCATION, value);
			response
		}
		Err(_) => OAuthError::new(OAuthErrorCode::ServerError, "could not build redirect").into_response(),
	}
}

// vim: ts=4
