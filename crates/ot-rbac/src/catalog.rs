//! The seeded role catalog. Roles are data, not code — this module is
//! the one place their permission lists are spelled out.

use ot_types::ids::RoleId;
use ot_types::model::{Role, RoleScope};

pub const PLATFORM_ADMIN: &str = "platform_admin";
pub const TENANT_OWNER: &str = "tenant_owner";
pub const TENANT_ADMIN: &str = "tenant_admin";
pub const TENANT_MEMBER: &str = "tenant_member";

fn perms(list: &[&str]) -> Vec<String> {
	list.iter().map(|s| (*s).to_string()).collect()
}

/// The four canonical roles, ready to persist via
/// [`crate::RbacAuthority::seed_catalog`].
#[must_use]
pub fn seed_roles() -> Vec<Role> {
	vec![
		Role { id: RoleId::new(), name: PLATFORM_ADMIN.into(), scope: RoleScope::Platform, permissions: perms(&["*"]) },
		Role {
			id: RoleId::new(),
			name: TENANT_OWNER.into(),
			scope: RoleScope::Tenant,
			permissions: perms(&[
				"tenant:manage_users",
				"tenant:manage_clients",
				"tenant:manage_settings",
				"tenant:view_users",
				"tenant:view",
				"tenant:view_audit",
				"user:read_profile",
				"user:write_profile",
				"user:change_password",
				"user:manage_sessions",
			]),
		},
		Role {
			id: RoleId::new(),
			name: TENANT_ADMIN.into(),
			scope: RoleScope::Tenant,
			permissions: perms(&[
				"tenant:manage_users",
				"tenant:manage_clients",
				"tenant:view_users",
				"tenant:view",
				"user:read_profile",
				"user:write_profile",
				"user:change_password",
				"user:manage_sessions",
			]),
		},
		Role {
			id: RoleId::new(),
			name: TENANT_MEMBER.into(),
			scope: RoleScope::Tenant,
			permissions: perms(&["tenant:view", "user:read_profile", "user:write_profile", "user:change_password"]),
		},
	]
}

/// `domain:verb` permission constants used by handlers, kept central so a
/// typo in a permission string is a compile error at the call site rather
/// than a silent always-false check.
pub mod perm {
	pub const TENANT_MANAGE_USERS: &str = "tenant:manage_users";
	pub const TENANT_MANAGE_CLIENTS: &str = "tenant:manage_clients";
	pub const TENANT_MANAGE_SETTINGS: &str = "tenant:manage_settings";
	pub const TENANT_VIEW_USERS: &str = "tenant:view_users";
	pub const TENANT_VIEW: &str = "tenant:view";
	pub const TENANT_VIEW_AUDIT: &str = "tenant:view_audit";
	pub const USER_READ_PROFILE: &str = "user:read_profile";
	pub const USER_WRITE_PROFILE: &str = "user:write_profile";
	pub const USER_CHANGE_PASSWORD: &str = "user:change_password";
	pub const USER_MANAGE_SESSIONS: &str = "user:manage_sessions";
	pub const PLATFORM_MANAGE_TENANTS: &str = "platform:manage_tenants";
}

// vim: ts=4
