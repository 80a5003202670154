use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use ot_identity::{IdentityService, NewProfile};
use ot_types::ids::{TenantId, UserId};
use ot_types::prelude::ClResult;
use ot_types::types::Timestamp;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
	pub tenant_id: TenantId,
	pub email: String,
	pub password: String,
	pub display_name: String,
}

#[derive(Debug, Serialize)]
pub struct UserView {
	pub id: UserId,
	pub email: String,
	pub display_name: String,
	pub created_at: Timestamp,
}

/// Self-service registration into a tenant that already exists. Creating
/// the tenant itself is an admin-plane operation.
pub async fn register(
	State(state): State<AppState>,
	Json(body): Json<RegisterRequest>,
) -> ClResult<(StatusCode, Json<UserView>)> {
	let repo = {
		use ot_types::extract::HasRepositories;
		state.repositories()
	};
	let identity = IdentityService::new(repo.identities(), state.worker.as_ref(), state.audit.as_ref());

	let profile = NewProfile { email: body.email, display_name: body.display_name };
	let user = identity.create_identity(body.tenant_id, profile).await?;
	identity.set_credential(user.id, body.password).await?;

	Ok((
		StatusCode::CREATED,
		Json(UserView { id: user.id, email: user.email, display_name: user.display_name, created_at: user.created_at }),
	))
}

// vim: ts=4
