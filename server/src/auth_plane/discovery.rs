use axum::extract::State;
use axum::Json;

use ot_oauth2::discovery::{discovery_document, jwks as engine_jwks, DiscoveryDocument, JwksResponse};
use ot_types::extract::HasRepositories;
use ot_types::prelude::ClResult;

use crate::state::AppState;

pub async fn discovery(State(state): State<AppState>) -> Json<DiscoveryDocument> {
	Json(discovery_document(&state.issuer))
}

pub async fn jwks(State(state): State<AppState>) -> ClResult<Json<JwksResponse>> {
	let repo = state.repositories();
	Ok(Json(engine_jwks(repo.signing_keys()).await?))
}

// vim: ts=4
