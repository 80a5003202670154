use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::http::StatusCode;

use ot_types::extract::{Auth, HasRepositories};
use ot_types::prelude::ClResult;

use crate::cookies::clear_session_cookie;
use crate::state::AppState;

pub async fn logout(State(state): State<AppState>, Auth(ctx): Auth) -> ClResult<Response> {
	state.repositories().sessions().delete_session(&ctx.session_id).await?;

	let mut response = StatusCode::NO_CONTENT.into_response();
	if let Some(cookie) = clear_session_cookie(&state, "ot_auth_session") {
		response.headers_mut().append(axum::http::header::SET_COOKIE, cookie);
	}
	Ok(response)
}

// vim: ts=4
