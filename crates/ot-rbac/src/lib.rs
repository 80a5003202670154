//! The RBAC authority. The single runtime operation is
//! [`RbacAuthority::has_permission`]; everything else (seeding, role
//! lookup, assignment) exists to support it or the admin surface.
//! Role-name checks at runtime are forbidden — callers must never branch
//! on `role.name`, only on the result of a permission check.

pub mod catalog;

use ot_types::ids::{AssignmentId, RoleId, TenantId, UserId};
use ot_types::model::{Assignment, Role, RoleScope};
use ot_types::prelude::{ClResult, Error};
use ot_types::repo::RbacRepository;
use ot_types::types::Timestamp;

pub struct RbacAuthority<'a> {
	repo: &'a dyn RbacRepository,
}

impl<'a> RbacAuthority<'a> {
	#[must_use]
	pub fn new(repo: &'a dyn RbacRepository) -> Self {
		Self { repo }
	}

	/// Writes the seeded role catalog if a role with a given canonical name
	/// is not already present. Idempotent: re-running against a populated
	/// catalog is a no-op per role.
	pub async fn seed_catalog(&self) -> ClResult<()> {
		for role in catalog::seed_roles() {
			if self.repo.find_role_by_name(&role.name).await?.is_none() {
				self.repo.seed_catalog_role(role).await?;
			}
		}
		Ok(())
	}

	/// Grants `role_name` to `user_id` at tenant scope. Validates the role
	/// exists in the catalog; assignment to a nonexistent scope context
	/// must fail, which the caller enforces by confirming the tenant
	/// exists before calling this (the tenant repository is the source of
	/// truth, not this crate).
	pub async fn assign(&self, user_id: UserId, tenant_id: TenantId, role_name: &str) -> ClResult<Assignment> {
		let role = self
			.repo
			.find_role_by_name(role_name)
			.await?
			.ok_or_else(|| Error::ValidationError(format!("unknown role: {role_name}")))?;

		let assignment = Assignment {
			id: AssignmentId::new(),
			user_id,
			tenant_id,
			role_id: role.id,
			granted_at: Timestamp::now(),
		};
		self.repo.assign_role(assignment).await
	}

	pub async fn revoke(&self, assignment_id: AssignmentId) -> ClResult<()> {
		self.repo.revoke_assignment(assignment_id).await
	}

	/// Loads every assignment for the user, keeps those whose scope
	/// matches (and, for tenant/client scope, whose context id matches
	/// the one requested), then accepts if any surviving role carries the
	/// literal permission or the `*` wildcard.
	pub async fn has_permission(
		&self,
		user_id: UserId,
		permission: &str,
		scope: RoleScope,
		tenant_id: TenantId,
	) -> ClResult<bool> {
		// A scope context id may be null (platform scope) or a tenant/client
		// id. This workspace's `Assignment` row always carries the user's
		// home tenant_id regardless of the role's scope — a platform_admin
		// assignment is still recorded against the tenant the admin identity
		// happens to live in (the bootstrap flow requires
		// `OT_BOOTSTRAP_ADMIN_TENANT_ID` for exactly this reason). Scope
		// match, not context match, is what makes a platform grant
		// platform-wide: once a
		// role with `RoleScope::Platform` is found, it authorizes everywhere,
		// independent of which tenant_id the assignment row happens to carry.
		let assignments = self.repo.list_assignments_for_user(tenant_id, user_id).await?;
		for assignment in assignments {
			let role = self.repo.get_role(assignment.role_id).await?;
			if role.scope != scope {
				continue;
			}
			if role_grants(&role, permission) {
				return Ok(true);
			}
		}
		Ok(false)
	}

	/// Convenience for platform-scope checks: a platform_admin assignment is
	/// visible from whichever tenant the admin identity lives in, so this
	/// just calls [`has_permission`](Self::has_permission) with
	/// `RoleScope::Platform`.
	pub async fn has_platform_permission(
		&self,
		user_id: UserId,
		permission: &str,
		home_tenant_id: TenantId,
	) -> ClResult<bool> {
		self.has_permission(user_id, permission, RoleScope::Platform, home_tenant_id).await
	}

	/// Populates the OIDC `roles` claim and admin introspection views.
	/// Never used to gate an operation — see module docs.
	pub async fn roles_for_user(&self, tenant_id: TenantId, user_id: UserId) -> ClResult<Vec<Role>> {
		let assignments = self.repo.list_assignments_for_user(tenant_id, user_id).await?;
		let mut roles = Vec::with_capacity(assignments.len());
		for assignment in assignments {
			roles.push(self.repo.get_role(assignment.role_id).await?);
		}
		Ok(roles)
	}
}

fn role_grants(role: &Role, permission: &str) -> bool {
	role.permissions.iter().any(|p| p == "*" || p == permission)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use std::sync::Mutex;

	/// Minimal in-memory stand-in for [`RbacRepository`], local to this
	/// crate's tests — the full reference adapter lives in
	/// `ot-adapter-memory`, which depends on this crate and so cannot be
	/// depended on back.
	#[derive(Default)]
	struct FakeRbacRepo {
		roles: Mutex<Vec<Role>>,
		assignments: Mutex<Vec<Assignment>>,
	}

	#[async_trait]
	impl RbacRepository for FakeRbacRepo {
		async fn seed_catalog_role(&self, role: Role) -> ClResult<Role> {
			self.roles.lock().expect("lock").push(role.clone());
			Ok(role)
		}

		async fn get_role(&self, id: RoleId) -> ClResult<Role> {
			self.roles.lock().expect("lock").iter().find(|r| r.id == id).cloned().ok_or(Error::NotFound)
		}

		async fn find_role_by_name(&self, name: &str) -> ClResult<Option<Role>> {
			Ok(self.roles.lock().expect("lock").iter().find(|r| r.name == name).cloned())
		}

		async fn assign_role(&self, assignment: Assignment) -> ClResult<Assignment> {
			self.assignments.lock().expect("lock").push(assignment.clone());
			Ok(assignment)
		}

		async fn revoke_assignment(&self, id: AssignmentId) -> ClResult<()> {
			self.assignments.lock().expect("lock").retain(|a| a.id != id);
			Ok(())
		}

		async fn list_assignments_for_user(&self, tenant_id: TenantId, user_id: UserId) -> ClResult<Vec<Assignment>> {
			Ok(self
				.assignments
				.lock()
				.expect("lock")
				.iter()
				.filter(|a| a.user_id == user_id && a.tenant_id == tenant_id)
				.cloned()
				.collect())
		}

		async fn platform_admin_exists(&self) -> ClResult<bool> {
			let roles = self.roles.lock().expect("lock");
			let Some(role) = roles.iter().find(|r| r.name == "platform_admin") else {
				return Ok(false);
			};
			let role_id = role.id;
			drop(roles);
			Ok(self.assignments.lock().expect("lock").iter().any(|a| a.role_id == role_id))
		}
	}

	fn repo() -> FakeRbacRepo {
		FakeRbacRepo::default()
	}

	#[tokio::test]
	async fn tenant_owner_sees_manage_users_but_not_platform_wildcard() {
		let repo = repo();
		let authority = RbacAuthority::new(&repo);
		authority.seed_catalog().await.unwrap();

		let tenant_a = TenantId::new();
		let tenant_b = TenantId::new();
		let user = UserId::new();
		authority.assign(user, tenant_a, "tenant_owner").await.unwrap();

		assert!(authority
			.has_permission(user, "tenant:manage_users", RoleScope::Tenant, tenant_a)
			.await
			.unwrap());
		assert!(!authority
			.has_permission(user, "tenant:manage_users", RoleScope::Tenant, tenant_b)
			.await
			.unwrap());
	}

	#[tokio::test]
	async fn member_cannot_manage_clients() {
		let repo = repo();
		let authority = RbacAuthority::new(&repo);
		authority.seed_catalog().await.unwrap();

		let tenant = TenantId::new();
		let user = UserId::new();
		authority.assign(user, tenant, "tenant_member").await.unwrap();

		assert!(!authority
			.has_permission(user, "tenant:manage_clients", RoleScope::Tenant, tenant)
			.await
			.unwrap());
		assert!(authority.has_permission(user, "tenant:view", RoleScope::Tenant, tenant).await.unwrap());
	}
}

// vim: ts=4
