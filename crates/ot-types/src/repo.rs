//! Repository contracts. One trait per bounded capability, the same way
//! the surrounding ecosystem splits a single "database" concern into an
//! adapter per responsibility rather than one god-trait — a domain
//! service depends on exactly the capability it needs, and a test can
//! substitute an in-memory stand-in for just that slice.

use async_trait::async_trait;

use crate::error::ClResult;
use crate::ids::{AssignmentId, ClientId, KeyId, RoleId, SessionId, TenantId, UserId};
use crate::model::{
	AccessToken, Assignment, AuditEvent, AuthorizationCode, Credential, OAuthClient, RefreshToken, Role, Session,
	SigningKey, Tenant, User,
};

#[async_trait]
pub trait TenantRepository: Send + Sync {
	async fn create_tenant(&self, tenant: Tenant) -> ClResult<Tenant>;
	async fn get_tenant(&self, id: TenantId) -> ClResult<Tenant>;
	async fn list_tenants(&self, limit: u32, offset: u32) -> ClResult<(Vec<Tenant>, u64)>;
	/// Whole-row replace backing admin-plane PATCH (`name`/`suspended`).
	async fn update_tenant(&self, tenant: Tenant) -> ClResult<Tenant>;
}

#[async_trait]
pub trait IdentityRepository: Send + Sync {
	async fn create_user(&self, user: User) -> ClResult<User>;
	async fn get_user(&self, tenant_id: TenantId, id: UserId) -> ClResult<User>;
	async fn find_user_by_email(&self, tenant_id: TenantId, email: &str) -> ClResult<Option<User>>;
	async fn list_users(&self, tenant_id: TenantId, limit: u32, offset: u32) -> ClResult<(Vec<User>, u64)>;

	async fn put_credential(&self, credential: Credential) -> ClResult<()>;
	async fn get_credential(&self, user_id: UserId) -> ClResult<Option<Credential>>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
	async fn create_session(&self, session: Session) -> ClResult<Session>;
	async fn get_session(&self, id: &SessionId) -> ClResult<Option<Session>>;
	async fn touch_session(&self, id: &SessionId, idle_expires_at: crate::types::Timestamp) -> ClResult<()>;
	async fn delete_session(&self, id: &SessionId) -> ClResult<()>;
	async fn delete_sessions_for_user(&self, user_id: UserId) -> ClResult<()>;
	/// Rotation hook: destroys only the sessions in the given namespace,
	/// leaving the other plane's session (if any) intact.
	async fn delete_sessions_for_user_in_namespace(
		&self,
		user_id: UserId,
		namespace: crate::model::SessionNamespace,
	) -> ClResult<()>;
}

#[async_trait]
pub trait RbacRepository: Send + Sync {
	async fn seed_catalog_role(&self, role: Role) -> ClResult<Role>;
	async fn get_role(&self, id: RoleId) -> ClResult<Role>;
	async fn find_role_by_name(&self, name: &str) -> ClResult<Option<Role>>;

	async fn assign_role(&self, assignment: Assignment) -> ClResult<Assignment>;
	async fn revoke_assignment(&self, id: AssignmentId) -> ClResult<()>;
	async fn list_assignments_for_user(&self, tenant_id: TenantId, user_id: UserId) -> ClResult<Vec<Assignment>>;
	/// Whether any assignment anywhere binds the `platform_admin` role —
	/// the bootstrap idempotence check. Scans across tenants, unlike every
	/// other method on this trait, since platform-scope bootstrap has no
	/// single tenant to key the lookup on.
	async fn platform_admin_exists(&self) -> ClResult<bool>;
}

#[async_trait]
pub trait ClientRepository: Send + Sync {
	async fn create_client(&self, client: OAuthClient) -> ClResult<OAuthClient>;
	async fn get_client(&self, id: ClientId) -> ClResult<OAuthClient>;
	async fn list_clients(&self, tenant_id: TenantId, limit: u32, offset: u32) -> ClResult<(Vec<OAuthClient>, u64)>;
	/// Whole-row replace backing admin-plane PATCH (name, redirect_uris,
	/// scopes, `is_active`, ...).
	async fn update_client(&self, client: OAuthClient) -> ClResult<OAuthClient>;
	async fn delete_client(&self, id: ClientId) -> ClResult<()>;
}

/// Outcome of [`AuthorizationCodeRepository::consume_code`]'s conditional
/// update. Distinguishing `AlreadyUsed` from `NotFound` is what lets the
/// engine tell a genuine replay (trigger revocation) apart from a bogus
/// code (plain `invalid_grant`).
#[derive(Debug)]
pub enum ConsumeOutcome {
	Consumed(AuthorizationCode),
	AlreadyUsed,
	NotFound,
}

#[async_trait]
pub trait AuthorizationCodeRepository: Send + Sync {
	async fn store_code(&self, code: AuthorizationCode) -> ClResult<()>;
	/// Atomically fetch-and-mark-consumed via `SET is_used=true WHERE
	/// code=? AND is_used=false`. Implementations must guarantee that two
	/// concurrent redemptions of the same code cannot both observe
	/// [`ConsumeOutcome::Consumed`] — this is the single-use boundary.
	async fn consume_code(&self, code: &str) -> ClResult<ConsumeOutcome>;
}

#[async_trait]
pub trait TokenRepository: Send + Sync {
	async fn store_access_token(&self, token: AccessToken) -> ClResult<()>;
	async fn get_access_token(&self, token_hash: &str) -> ClResult<Option<AccessToken>>;
	async fn revoke_access_token(&self, token_hash: &str) -> ClResult<()>;

	async fn store_refresh_token(&self, token: RefreshToken) -> ClResult<()>;
	async fn get_refresh_token(&self, token_hash: &str) -> ClResult<Option<RefreshToken>>;
	/// Marks a token consumed and links its successor's `family_id`.
	async fn consume_refresh_token(&self, token_hash: &str) -> ClResult<Option<RefreshToken>>;
	async fn revoke_token_family(&self, family_id: uuid::Uuid) -> ClResult<()>;
	/// Replay defense: revokes every access and refresh token ever minted
	/// from `code`, keyed by the `source_code` each one was stamped with
	/// at mint time.
	async fn revoke_tokens_by_source_code(&self, code: &str) -> ClResult<()>;
}

#[async_trait]
pub trait SigningKeyRepository: Send + Sync {
	async fn store_signing_key(&self, key: SigningKey) -> ClResult<()>;
	async fn get_signing_key(&self, kid: &KeyId) -> ClResult<Option<SigningKey>>;
	async fn active_signing_key(&self) -> ClResult<Option<SigningKey>>;
	async fn list_signing_keys(&self) -> ClResult<Vec<SigningKey>>;
	async fn retire_signing_key(&self, kid: &KeyId) -> ClResult<()>;
}

#[async_trait]
pub trait AuditRepository: Send + Sync {
	async fn record(&self, event: AuditEvent) -> ClResult<()>;
}

/// The full set of repositories a deployment must provide. Mirrors the
/// "one trait object field per capability" shape domain services expect;
/// an adapter crate implements all of these against one backing store.
pub trait Repositories: Send + Sync {
	fn tenants(&self) -> &dyn TenantRepository;
	fn identities(&self) -> &dyn IdentityRepository;
	fn sessions(&self) -> &dyn SessionRepository;
	fn rbac(&self) -> &dyn RbacRepository;
	fn clients(&self) -> &dyn ClientRepository;
	fn codes(&self) -> &dyn AuthorizationCodeRepository;
	fn tokens(&self) -> &dyn TokenRepository;
	fn signing_keys(&self) -> &dyn SigningKeyRepository;
	fn audit(&self) -> &dyn AuditRepository;
}

// vim: ts=4
