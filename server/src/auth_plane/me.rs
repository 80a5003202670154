use axum::extract::State;
use axum::Json;
use serde::Serialize;

use ot_rbac::RbacAuthority;
use ot_types::extract::{Auth, HasRepositories};
use ot_types::ids::UserId;
use ot_types::prelude::ClResult;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MeResponse {
	pub user_id: UserId,
	pub email: String,
	pub display_name: String,
	pub roles: Vec<String>,
}

pub async fn me(State(state): State<AppState>, Auth(ctx): Auth) -> ClResult<Json<MeResponse>> {
	let repo = state.repositories();
	let user = repo.identities().get_user(ctx.tenant_id, ctx.user_id).await?;

	let rbac = RbacAuthority::new(repo.rbac());
	let roles = rbac.roles_for_user(ctx.tenant_id, ctx.user_id).await?;

	Ok(Json(MeResponse {
		user_id: user.id,
		email: user.email,
		display_name: user.display_name,
		roles: roles.into_iter().map(|role| role.name).collect(),
	}))
}

// vim: ts=4
