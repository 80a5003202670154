//! First-run platform admin bootstrap. Unlike the teacher, which backgrounds
//! its startup bootstrap behind `tokio::spawn`, this bootstrap runs to
//! completion before the listener accepts its first connection — serving a
//! request against a store that has not finished seeding its RBAC catalog
//! would leave every permission check vacuously false. See `DESIGN.md`.

use serde_json::Map;

use ot_crypto::fingerprint::random_token;
use ot_identity::{IdentityService, NewProfile};
use ot_rbac::{catalog, RbacAuthority};
use ot_types::extract::HasRepositories;
use ot_types::ids::TenantId;
use ot_types::model::Tenant;
use ot_types::prelude::{ClResult, Error};
use ot_types::types::Timestamp;

use crate::config::Settings;
use crate::state::AppState;

/// Seeds the RBAC catalog unconditionally (idempotent per role) and, only
/// if no `platform_admin` assignment exists anywhere, creates a tenant,
/// a platform admin identity, and assigns it the role. The generated
/// password is printed once to the process's standard output — there is
/// no other channel to deliver it through on a from-nothing boot.
pub async fn bootstrap(state: &AppState, settings: &Settings) -> ClResult<()> {
	let repo = state.repositories();
	let rbac = RbacAuthority::new(repo.rbac());
	rbac.seed_catalog().await?;

	if repo.rbac().platform_admin_exists().await? {
		tracing::info!("platform admin already bootstrapped, skipping");
		return Ok(());
	}

	let Some(email) = settings.bootstrap_admin_email.clone() else {
		tracing::warn!("OT_BOOTSTRAP_ADMIN_EMAIL not set; no platform admin will be created");
		return Ok(());
	};

	let tenant_id = resolve_bootstrap_tenant(state, settings).await?;

	let identity = IdentityService::new(repo.identities(), state.worker.as_ref(), state.audit.as_ref());
	let profile = NewProfile { email: email.clone(), display_name: "Platform Admin".to_string() };
	let user = identity.create_identity(tenant_id, profile).await?;

	let generated_password = random_token(18);
	identity.set_credential(user.id, generated_password.clone()).await?;

	rbac.assign(user.id, tenant_id, catalog::PLATFORM_ADMIN).await?;

	let mut detail = Map::new();
	detail.insert("email".to_string(), serde_json::Value::String(email));
	ot_audit::emit(
		state.audit.as_ref(),
		Some(tenant_id),
		Some(user.id),
		"platform_admin_bootstrapped",
		"success",
		detail,
	)
	.await;

	println!("bootstrap: created platform admin user {} with password: {generated_password}", user.id);
	println!("bootstrap: change this password immediately after first login");

	Ok(())
}

async fn resolve_bootstrap_tenant(state: &AppState, settings: &Settings) -> ClResult<TenantId> {
	let repo = state.repositories();

	if let Some(tenant_id) = settings.bootstrap_admin_tenant_id {
		return match repo.tenants().get_tenant(tenant_id).await {
			Ok(tenant) => Ok(tenant.id),
			Err(Error::NotFound) => {
				let tenant = Tenant { id: tenant_id, name: "bootstrap".to_string(), created_at: Timestamp::now(), suspended: false };
				Ok(repo.tenants().create_tenant(tenant).await?.id)
			}
			Err(err) => Err(err),
		};
	}

	let tenant = Tenant { id: TenantId::new(), name: "bootstrap".to_string(), created_at: Timestamp::now(), suspended: false };
	Ok(repo.tenants().create_tenant(tenant).await?.id)
}

// vim: ts=4
