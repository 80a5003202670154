use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use ot_identity::{IdentityService, NewProfile};
use ot_rbac::catalog::perm;
use ot_types::extract::{AdminAuth, HasRepositories};
use ot_types::ids::{TenantId, UserId};
use ot_types::prelude::{ApiResponse, ClResult};
use ot_types::types::{PaginationInfo, Timestamp};

use super::{require_permission, PageQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
	pub email: String,
	pub display_name: String,
	pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserView {
	pub id: UserId,
	pub email: String,
	pub display_name: String,
	pub created_at: Timestamp,
	pub disabled: bool,
}

pub async fn create(
	State(state): State<AppState>,
	AdminAuth(ctx): AdminAuth,
	Path(tenant_id): Path<TenantId>,
	Json(body): Json<CreateUserRequest>,
) -> ClResult<(StatusCode, Json<UserView>)> {
	require_permission(&state, &ctx, perm::TENANT_MANAGE_USERS, tenant_id).await?;

	let repo = state.repositories();
	let identity = IdentityService::new(repo.identities(), state.worker.as_ref(), state.audit.as_ref());
	let profile = NewProfile { email: body.email, display_name: body.display_name };
	let user = identity.create_identity(tenant_id, profile).await?;
	identity.set_credential(user.id, body.password).await?;

	Ok((
		StatusCode::CREATED,
		Json(UserView {
			id: user.id,
			email: user.email,
			display_name: user.display_name,
			created_at: user.created_at,
			disabled: user.disabled,
		}),
	))
}

pub async fn list(
	State(state): State<AppState>,
	AdminAuth(ctx): AdminAuth,
	Path(tenant_id): Path<TenantId>,
	Query(page): Query<PageQuery>,
) -> ClResult<Json<ApiResponse<Vec<UserView>>>> {
	require_permission(&state, &ctx, perm::TENANT_VIEW_USERS, tenant_id).await?;

	let (users, total) = state.repositories().identities().list_users(tenant_id, page.limit(), page.offset()).await?;
	let data = users
		.into_iter()
		.map(|user| UserView {
			id: user.id,
			email: user.email,
			display_name: user.display_name,
			created_at: user.created_at,
			disabled: user.disabled,
		})
		.collect();
	Ok(Json(ApiResponse::paginated(data, PaginationInfo { total, limit: page.limit(), offset: page.offset() })))
}

// vim: ts=4
