//! Both the JSON login used by non-browser clients
//! (`POST /api/v1/auth/login`) and the server-rendered form that backs
//! `GET`/`POST /login`, which an anonymous `/oauth2/authorize` visit
//! redirects to.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use ot_identity::IdentityService;
use ot_oauth2::authorize as engine;
use ot_session::SessionService;
use ot_types::ids::{ClientId, TenantId};
use ot_types::model::SessionNamespace;
use ot_types::prelude::{ClResult, Error};

use crate::auth_plane::authorize::AuthorizeQuery;
use crate::cookies::set_session_cookie;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ApiLoginRequest {
	pub tenant_id: TenantId,
	pub email: String,
	pub password: String,
}

#[derive(Debug, Serialize)]
pub struct ApiLoginResponse {
	pub user_id: String,
}

/// `POST /api/v1/auth/login`: plain credential exchange for a session
/// cookie, used by first-party clients that never go through the OAuth2
/// authorize/token dance.
pub async fn api_login(
	State(state): State<AppState>,
	Json(body): Json<ApiLoginRequest>,
) -> ClResult<Response> {
	let repo = {
		use ot_types::extract::HasRepositories;
		state.repositories()
	};
	let identity = IdentityService::new(repo.identities(), state.worker.as_ref(), state.audit.as_ref());
	let user = identity.verify_password(body.tenant_id, &body.email, body.password).await?;

	let sessions = SessionService::new(repo.sessions());
	let session = sessions.create(user.id, body.tenant_id, SessionNamespace::Auth).await?;

	let mut response = (StatusCode::OK, Json(ApiLoginResponse { user_id: user.id.to_string() })).into_response();
	if let Some(cookie) = set_session_cookie(&state, "ot_auth_session", &session.id.to_string(), 86400) {
		response.headers_mut().append(axum::http::header::SET_COOKIE, cookie);
	}
	Ok(response)
}

/// Mirrors [`AuthorizeQuery`] field-for-field plus credentials. Kept
/// separate rather than `#[serde(flatten)]`-ing `AuthorizeQuery` in:
/// `serde_urlencoded`'s deserializer does not support flatten.
#[derive(Debug, Deserialize)]
pub struct LoginFormBody {
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
	pub email: String,
	pub password: String,
}

impl LoginFormBody {
	fn as_authorize_query(&self) -> AuthorizeQuery {
		AuthorizeQuery {
			response_type: self.response_type.clone(),
			client_id: self.client_id.clone(),
			redirect_uri: self.redirect_uri.clone(),
			scope: self.scope.clone(),
			state: self.state.clone(),
			nonce: self.nonce.clone(),
			code_challenge: self.code_challenge.clone(),
			code_challenge_method: self.code_challenge_method.clone(),
		}
	}
}

fn render(state: &AppState, query: &AuthorizeQuery, error: Option<&str>) -> Response {
	let data = json!({
		"client_id": query.client_id,
		"redirect_uri": query.redirect_uri,
		"scope": query.scope,
		"state": query.state,
		"nonce": query.nonce,
		"code_challenge": query.code_challenge,
		"code_challenge_method": query.code_challenge_method,
		"error": error,
	});
	match state.templates.render("login", &data) {
		Ok(html) => Html(html).into_response(),
		Err(err) => {
			tracing::error!(%err, "failed to render login template");
			Error::Internal("template rendering failed".into()).into_response()
		}
	}
}

pub async fn show_form(State(state): State<AppState>, Query(query): Query<AuthorizeQuery>) -> Response {
	render(&state, &query, None)
}

pub async fn submit_form(
	State(state): State<AppState>,
	axum::extract::Form(body): axum::extract::Form<LoginFormBody>,
) -> Response {
	let repo = {
		use ot_types::extract::HasRepositories;
		state.repositories()
	};
	let query = body.as_authorize_query();

	let Ok(client_id) = body.client_id.parse::<ClientId>() else {
		return render(&state, &query, Some("invalid client"));
	};
	let Ok(client) = repo.clients().get_client(client_id).await else {
		return render(&state, &query, Some("invalid client"));
	};

	let identity = IdentityService::new(repo.identities(), state.worker.as_ref(), state.audit.as_ref());
	let user = match identity.verify_password(client.tenant_id, &body.email, body.password).await {
		Ok(user) => user,
		Err(_) => return render(&state, &query, Some("invalid email or password")),
	};

	let sessions = SessionService::new(repo.sessions());
	let session = match sessions.create(user.id, client.tenant_id, SessionNamespace::Auth).await {
		Ok(session) => session,
		Err(_) => return render(&state, &query, Some("could not start a session, try again")),
	};

	let params = engine::AuthorizeParams {
		response_type: query.response_type.clone(),
		client_id,
		redirect_uri: query.redirect_uri.clone(),
		scope: query.scope.clone(),
		state: query.state.clone(),
		nonce: query.nonce.clone(),
		code_challenge: query.code_challenge.clone(),
		code_challenge_method: query.code_challenge_method.clone(),
	};

	let mut response = match engine::authorize(repo.clients(), repo.codes(), client.tenant_id, user.id, params).await {
		Ok(outcome) => {
			let pairs = [("code", outcome.code), ("state", outcome.state)];
			let qs = serde_urlencoded::to_string(pairs).unwrap_or_default();
			let separator = if outcome.redirect_uri.contains('?') { "&" } else { "?" };
			let location = format!("{}{separator}{qs}", outcome.redirect_uri);
			let mut resp = StatusCode::FOUND.into_response();
			if let Ok(value) = axum::http::HeaderValue::from_str(&location) {
				resp.headers_mut().insert(axum::http::header::LOCATION, value);
			}
			resp
		}
		Err(err) => return render(&state, &query, Some(&err.description)),
	};

	if let Some(cookie) = set_session_cookie(&state, "ot_auth_session", &session.id.to_string(), 86400) {
		response.headers_mut().append(axum::http::header::SET_COOKIE, cookie);
	}
	response
}

// vim: ts=4
