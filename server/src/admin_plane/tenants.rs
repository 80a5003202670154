use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use ot_rbac::catalog::perm;
use ot_rbac::RbacAuthority;
use ot_types::extract::{AdminAuth, HasRepositories};
use ot_types::ids::TenantId;
use ot_types::model::{RoleScope, Tenant};
use ot_types::prelude::{ApiResponse, ClResult, Error, Patch};
use ot_types::types::Timestamp;

use super::PageQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTenantRequest {
	pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTenantRequest {
	#[serde(default)]
	pub name: Patch<String>,
	#[serde(default)]
	pub suspended: Patch<bool>,
}

#[derive(Debug, Serialize)]
pub struct TenantView {
	pub id: TenantId,
	pub name: String,
	pub created_at: Timestamp,
	pub suspended: bool,
}

impl From<Tenant> for TenantView {
	fn from(tenant: Tenant) -> Self {
		Self { id: tenant.id, name: tenant.name, created_at: tenant.created_at, suspended: tenant.suspended }
	}
}

async fn require_platform(state: &AppState, ctx: &ot_types::extract::AuthCtx, permission: &str) -> ClResult<()> {
	let repo = state.repositories();
	let rbac = RbacAuthority::new(repo.rbac());
	if rbac.has_permission(ctx.user_id, permission, RoleScope::Platform, ctx.tenant_id).await? {
		return Ok(());
	}
	Err(Error::PermissionDenied)
}

pub async fn create(
	State(state): State<AppState>,
	AdminAuth(ctx): AdminAuth,
	Json(body): Json<CreateTenantRequest>,
) -> ClResult<(StatusCode, Json<TenantView>)> {
	require_platform(&state, &ctx, perm::PLATFORM_MANAGE_TENANTS).await?;

	let tenant = Tenant { id: TenantId::new(), name: body.name, created_at: Timestamp::now(), suspended: false };
	let created = state.repositories().tenants().create_tenant(tenant).await?;
	Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn list(
	State(state): State<AppState>,
	AdminAuth(ctx): AdminAuth,
	Query(page): Query<PageQuery>,
) -> ClResult<Json<ApiResponse<Vec<TenantView>>>> {
	require_platform(&state, &ctx, perm::PLATFORM_MANAGE_TENANTS).await?;

	let (tenants, total) = state.repositories().tenants().list_tenants(page.limit(), page.offset()).await?;
	let data = tenants.into_iter().map(TenantView::from).collect();
	Ok(Json(ApiResponse::paginated(
		data,
		ot_types::types::PaginationInfo { total, limit: page.limit(), offset: page.offset() },
	)))
}

pub async fn get(
	State(state): State<AppState>,
	AdminAuth(ctx): AdminAuth,
	Path(id): Path<TenantId>,
) -> ClResult<Json<TenantView>> {
	super::require_permission(&state, &ctx, perm::TENANT_VIEW, id).await?;
	let tenant = state.repositories().tenants().get_tenant(id).await?;
	Ok(Json(tenant.into()))
}

pub async fn update(
	State(state): State<AppState>,
	AdminAuth(ctx): AdminAuth,
	Path(id): Path<TenantId>,
	Json(body): Json<UpdateTenantRequest>,
) -> ClResult<Json<TenantView>> {
	super::require_permission(&state, &ctx, perm::TENANT_MANAGE_SETTINGS, id).await?;

	let repo = state.repositories();
	let mut tenant = repo.tenants().get_tenant(id).await?;
	if let Patch::Value(name) = body.name {
		tenant.name = name;
	}
	if let Patch::Value(suspended) = body.suspended {
		tenant.suspended = suspended;
	}
	let updated = repo.tenants().update_tenant(tenant).await?;
	Ok(Json(updated.into()))
}

// vim: ts=4
