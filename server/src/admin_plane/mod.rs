//! JSON-only management surface: tenants, users, OAuth2 clients, and RBAC
//! assignments. Every route requires a live admin-plane session and an
//! explicit permission check — unlike the auth-plane's login/token flow,
//! there is no endpoint here that works for an anonymous caller.

pub mod assignments;
pub mod clients;
pub mod tenants;
pub mod users;

use axum::Router;
use serde::Deserialize;

use ot_rbac::RbacAuthority;
use ot_types::extract::{AuthCtx, HasRepositories};
use ot_types::ids::TenantId;
use ot_types::prelude::{ClResult, Error};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
	use axum::routing::{get, patch, post};

	Router::new()
		.route("/api/v1/tenants", get(tenants::list).post(tenants::create))
		.route("/api/v1/tenants/{id}", get(tenants::get).patch(tenants::update))
		.route("/api/v1/tenants/{id}/users", get(users::list).post(users::create))
		.route("/api/v1/tenants/{id}/oauth2/clients", get(clients::list).post(clients::create))
		.route("/api/v1/tenants/{id}/oauth2/clients/{client_id}", patch(clients::update).delete(clients::delete))
		.route("/api/v1/rbac/assignments", post(assignments::assign))
		.route("/api/v1/rbac/assignments/{id}", axum::routing::delete(assignments::revoke))
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
	pub limit: Option<u32>,
	pub offset: Option<u32>,
}

impl PageQuery {
	#[must_use]
	pub fn limit(&self) -> u32 {
		self.limit.unwrap_or(50).min(200)
	}

	#[must_use]
	pub fn offset(&self) -> u32 {
		self.offset.unwrap_or(0)
	}
}

/// Grants access when the caller holds `permission` either at tenant
/// scope against `resource_tenant_id`, or at platform scope from their
/// own home tenant — a platform_admin must never need a session rooted
/// in the resource's own tenant to manage it.
pub async fn require_permission(
	state: &AppState,
	ctx: &AuthCtx,
	permission: &str,
	resource_tenant_id: TenantId,
) -> ClResult<()> {
	let repo = state.repositories();
	let rbac = RbacAuthority::new(repo.rbac());

	if rbac
		.has_permission(ctx.user_id, permission, ot_types::model::RoleScope::Tenant, resource_tenant_id)
		.await?
	{
		return Ok(());
	}
	if rbac.has_platform_permission(ctx.user_id, permission, ctx.tenant_id).await? {
		return Ok(());
	}
	Err(Error::PermissionDenied)
}

// vim: ts=4
