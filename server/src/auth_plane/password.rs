use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use ot_identity::IdentityService;
use ot_types::extract::{Auth, HasRepositories};
use ot_types::prelude::ClResult;
use axum::Json;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
	pub old_password: String,
	pub new_password: String,
}

pub async fn change_password(
	State(state): State<AppState>,
	Auth(ctx): Auth,
	Json(body): Json<ChangePasswordRequest>,
) -> ClResult<StatusCode> {
	let repo = state.repositories();
	let identity = IdentityService::new(repo.identities(), state.worker.as_ref(), state.audit.as_ref());
	identity.change_password(ctx.user_id, body.old_password, body.new_password).await?;
	Ok(StatusCode::NO_CONTENT)
}

// vim: ts=4
