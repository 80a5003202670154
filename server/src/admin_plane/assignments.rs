use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use ot_rbac::catalog::perm;
use ot_rbac::RbacAuthority;
use ot_types::extract::{AdminAuth, HasRepositories};
use ot_types::ids::{AssignmentId, TenantId, UserId};
use ot_types::prelude::ClResult;
use ot_types::types::Timestamp;

use super::require_permission;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
	pub user_id: UserId,
	pub tenant_id: TenantId,
	pub role_name: String,
}

#[derive(Debug, Serialize)]
pub struct AssignmentView {
	pub id: AssignmentId,
	pub user_id: UserId,
	pub tenant_id: TenantId,
	pub role_name: String,
	pub granted_at: Timestamp,
}

pub async fn assign(
	State(state): State<AppState>,
	AdminAuth(ctx): AdminAuth,
	Json(body): Json<AssignRequest>,
) -> ClResult<(StatusCode, Json<AssignmentView>)> {
	require_permission(&state, &ctx, perm::TENANT_MANAGE_USERS, body.tenant_id).await?;

	let repo = state.repositories();
	let rbac = RbacAuthority::new(repo.rbac());
	let assignment = rbac.assign(body.user_id, body.tenant_id, &body.role_name).await?;

	Ok((
		StatusCode::CREATED,
		Json(AssignmentView {
			id: assignment.id,
			user_id: assignment.user_id,
			tenant_id: assignment.tenant_id,
			role_name: body.role_name,
			granted_at: assignment.granted_at,
		}),
	))
}

#[derive(Debug, Deserialize)]
pub struct RevokeQuery {
	pub tenant_id: TenantId,
}

pub async fn revoke(
	State(state): State<AppState>,
	AdminAuth(ctx): AdminAuth,
	Path(id): Path<AssignmentId>,
	axum::extract::Query(query): axum::extract::Query<RevokeQuery>,
) -> ClResult<StatusCode> {
	require_permission(&state, &ctx, perm::TENANT_MANAGE_USERS, query.tenant_id).await?;

	let repo = state.repositories();
	let rbac = RbacAuthority::new(repo.rbac());
	rbac.revoke(id).await?;
	let _ = repo;
	Ok(StatusCode::NO_CONTENT)
}

// vim: ts=4
