use axum::extract::State;
use axum::http::StatusCode;
use axum::Form;
use serde::Deserialize;

use ot_oauth2::revoke as engine;
use ot_types::extract::HasRepositories;
use ot_types::prelude::ClResult;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RevokeRequest {
	pub token: String,
	#[serde(default)]
	pub token_type_hint: Option<String>,
}

/// RFC 7009: always 200, whether or not the token existed.
pub async fn revoke(State(state): State<AppState>, Form(body): Form<RevokeRequest>) -> ClResult<StatusCode> {
	let repo = state.repositories();
	engine::revoke(repo.tokens(), &body.token, body.token_type_hint.as_deref()).await?;
	Ok(StatusCode::OK)
}

// vim: ts=4
