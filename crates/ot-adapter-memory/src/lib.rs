//! Single-process, in-memory [`Repositories`] implementation. Every
//! collection is a `Mutex`-guarded `Vec`/`HashMap`, linear-scanned rather
//! than indexed — fine for the small row counts a single tenant deployment
//! or a test fixture ever holds, and useful as the reference backend that
//! exercises every repository contract without a real database.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use ot_types::ids::{AssignmentId, ClientId, KeyId, RoleId, SessionId, TenantId, UserId};
use ot_types::model::{
	AccessToken, Assignment, AuditEvent, AuthorizationCode, Credential, OAuthClient, RefreshToken, Role, Session,
	SessionNamespace, SigningKey, Tenant, User,
};
use ot_types::prelude::{ClResult, Error};
use ot_types::repo::{
	AuditRepository, AuthorizationCodeRepository, ClientRepository, ConsumeOutcome, IdentityRepository,
	RbacRepository, Repositories, SessionRepository, SigningKeyRepository, TenantRepository, TokenRepository,
};
use ot_types::types::Timestamp;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
	tenants: Mutex<HashMap<TenantId, Tenant>>,
	users: Mutex<HashMap<UserId, User>>,
	credentials: Mutex<HashMap<UserId, Credential>>,
	sessions: Mutex<HashMap<SessionId, Session>>,
	roles: Mutex<HashMap<RoleId, Role>>,
	assignments: Mutex<HashMap<AssignmentId, Assignment>>,
	clients: Mutex<HashMap<ClientId, OAuthClient>>,
	codes: Mutex<HashMap<String, AuthorizationCode>>,
	access_tokens: Mutex<HashMap<String, AccessToken>>,
	refresh_tokens: Mutex<HashMap<String, RefreshToken>>,
	signing_keys: Mutex<HashMap<KeyId, SigningKey>>,
	audit_events: Mutex<Vec<AuditEvent>>,
}

impl MemoryStore {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Snapshot of every recorded audit event, newest last. Test-only in
	/// practice, but not `#[cfg(test)]`-gated since downstream crates'
	/// integration tests need it too.
	#[must_use]
	pub fn audit_events(&self) -> Vec<AuditEvent> {
		self.audit_events.lock().unwrap_or_else(|e| e.into_inner()).clone()
	}
}

#[async_trait]
impl TenantRepository for MemoryStore {
	async fn create_tenant(&self, tenant: Tenant) -> ClResult<Tenant> {
		let mut guard = self.tenants.lock().unwrap_or_else(|e| e.into_inner());
		guard.insert(tenant.id, tenant.clone());
		Ok(tenant)
	}

	async fn get_tenant(&self, id: TenantId) -> ClResult<Tenant> {
		self.tenants.lock().unwrap_or_else(|e| e.into_inner()).get(&id).cloned().ok_or(Error::NotFound)
	}

	async fn list_tenants(&self, limit: u32, offset: u32) -> ClResult<(Vec<Tenant>, u64)> {
		let guard = self.tenants.lock().unwrap_or_else(|e| e.into_inner());
		let mut all: Vec<Tenant> = guard.values().cloned().collect();
		all.sort_by_key(|t| t.created_at.0);
		let total = all.len() as u64;
		let page = all.into_iter().skip(offset as usize).take(limit as usize).collect();
		Ok((page, total))
	}

	async fn update_tenant(&self, tenant: Tenant) -> ClResult<Tenant> {
		let mut guard = self.tenants.lock().unwrap_or_else(|e| e.into_inner());
		if !guard.contains_key(&tenant.id) {
			return Err(Error::NotFound);
		}
		guard.insert(tenant.id, tenant.clone());
		Ok(tenant)
	}
}

#[async_trait]
impl IdentityRepository for MemoryStore {
	async fn create_user(&self, user: User) -> ClResult<User> {
		self.users.lock().unwrap_or_else(|e| e.into_inner()).insert(user.id, user.clone());
		Ok(user)
	}

	async fn get_user(&self, tenant_id: TenantId, id: UserId) -> ClResult<User> {
		self.users
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.get(&id)
			.filter(|u| u.tenant_id == tenant_id)
			.cloned()
			.ok_or(Error::NotFound)
	}

	async fn find_user_by_email(&self, tenant_id: TenantId, email: &str) -> ClResult<Option<User>> {
		Ok(self
			.users
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.values()
			.find(|u| u.tenant_id == tenant_id && u.email == email)
			.cloned())
	}

	async fn list_users(&self, tenant_id: TenantId, limit: u32, offset: u32) -> ClResult<(Vec<User>, u64)> {
		let guard = self.users.lock().unwrap_or_else(|e| e.into_inner());
		let mut all: Vec<User> = guard.values().filter(|u| u.tenant_id == tenant_id).cloned().collect();
		all.sort_by_key(|u| u.created_at.0);
		let total = all.len() as u64;
		let page = all.into_iter().skip(offset as usize).take(limit as usize).collect();
		Ok((page, total))
	}

	async fn put_credential(&self, credential: Credential) -> ClResult<()> {
		self.credentials.lock().unwrap_or_else(|e| e.into_inner()).insert(credential.user_id, credential);
		Ok(())
	}

	async fn get_credential(&self, user_id: UserId) -> ClResult<Option<Credential>> {
		Ok(self.credentials.lock().unwrap_or_else(|e| e.into_inner()).get(&user_id).cloned())
	}
}

#[async_trait]
impl SessionRepository for MemoryStore {
	async fn create_session(&self, session: Session) -> ClResult<Session> {
		self.sessions.lock().unwrap_or_else(|e| e.into_inner()).insert(session.id.clone(), session.clone());
		Ok(session)
	}

	async fn get_session(&self, id: &SessionId) -> ClResult<Option<Session>> {
		Ok(self.sessions.lock().unwrap_or_else(|e| e.into_inner()).get(id).cloned())
	}

	async fn touch_session(&self, id: &SessionId, idle_expires_at: Timestamp) -> ClResult<()> {
		if let Some(session) = self.sessions.lock().unwrap_or_else(|e| e.into_inner()).get_mut(id) {
			session.idle_expires_at = idle_expires_at;
		}
		Ok(())
	}

	async fn delete_session(&self, id: &SessionId) -> ClResult<()> {
		self.sessions.lock().unwrap_or_else(|e| e.into_inner()).remove(id);
		Ok(())
	}

	async fn delete_sessions_for_user(&self, user_id: UserId) -> ClResult<()> {
		self.sessions.lock().unwrap_or_else(|e| e.into_inner()).retain(|_, s| s.user_id != user_id);
		Ok(())
	}

	async fn delete_sessions_for_user_in_namespace(&self, user_id: UserId, namespace: SessionNamespace) -> ClResult<()> {
		self.sessions
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.retain(|_, s| !(s.user_id == user_id && s.namespace == namespace));
		Ok(())
	}
}

#[async_trait]
impl RbacRepository for MemoryStore {
	async fn seed_catalog_role(&self, role: Role) -> ClResult<Role> {
		let mut guard = self.roles.lock().unwrap_or_else(|e| e.into_inner());
		if let Some(existing) = guard.values().find(|r| r.name == role.name) {
			return Ok(existing.clone());
		}
		guard.insert(role.id, role.clone());
		Ok(role)
	}

	async fn get_role(&self, id: RoleId) -> ClResult<Role> {
		self.roles.lock().unwrap_or_else(|e| e.into_inner()).get(&id).cloned().ok_or(Error::NotFound)
	}

	async fn find_role_by_name(&self, name: &str) -> ClResult<Option<Role>> {
		Ok(self.roles.lock().unwrap_or_else(|e| e.into_inner()).values().find(|r| r.name == name).cloned())
	}

	async fn assign_role(&self, assignment: Assignment) -> ClResult<Assignment> {
		self.assignments.lock().unwrap_or_else(|e| e.into_inner()).insert(assignment.id, assignment.clone());
		Ok(assignment)
	}

	async fn revoke_assignment(&self, id: AssignmentId) -> ClResult<()> {
		self.assignments.lock().unwrap_or_else(|e| e.into_inner()).remove(&id);
		Ok(())
	}

	async fn list_assignments_for_user(&self, tenant_id: TenantId, user_id: UserId) -> ClResult<Vec<Assignment>> {
		Ok(self
			.assignments
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.values()
			.filter(|a| a.user_id == user_id && a.tenant_id == tenant_id)
			.cloned()
			.collect())
	}

	async fn platform_admin_exists(&self) -> ClResult<bool> {
		let roles = self.roles.lock().unwrap_or_else(|e| e.into_inner());
		let Some(role) = roles.values().find(|r| r.name == "platform_admin") else {
			return Ok(false);
		};
		let role_id = role.id;
		drop(roles);
		Ok(self.assignments.lock().unwrap_or_else(|e| e.into_inner()).values().any(|a| a.role_id == role_id))
	}
}

#[async_trait]
impl ClientRepository for MemoryStore {
	async fn create_client(&self, client: OAuthClient) -> ClResult<OAuthClient> {
		self.clients.lock().unwrap_or_else(|e| e.into_inner()).insert(client.id, client.clone());
		Ok(client)
	}

	async fn get_client(&self, id: ClientId) -> ClResult<OAuthClient> {
		self.clients.lock().unwrap_or_else(|e| e.into_inner()).get(&id).cloned().ok_or(Error::NotFound)
	}

	async fn list_clients(&self, tenant_id: TenantId, limit: u32, offset: u32) -> ClResult<(Vec<OAuthClient>, u64)> {
		let guard = self.clients.lock().unwrap_or_else(|e| e.into_inner());
		let mut all: Vec<OAuthClient> = guard.values().filter(|c| c.tenant_id == tenant_id).cloned().collect();
		all.sort_by_key(|c| c.created_at.0);
		let total = all.len() as u64;
		let page = all.into_iter().skip(offset as usize).take(limit as usize).collect();
		Ok((page, total))
	}

	async fn update_client(&self, client: OAuthClient) -> ClResult<OAuthClient> {
		let mut guard = self.clients.lock().unwrap_or_else(|e| e.into_inner());
		if !guard.contains_key(&client.id) {
			return Err(Error::NotFound);
		}
		guard.insert(client.id, client.clone());
		Ok(client)
	}

	async fn delete_client(&self, id: ClientId) -> ClResult<()> {
		self.clients.lock().unwrap_or_else(|e| e.into_inner()).remove(&id);
		Ok(())
	}
}

#[async_trait]
impl AuthorizationCodeRepository for MemoryStore {
	async fn store_code(&self, code: AuthorizationCode) -> ClResult<()> {
		self.codes.lock().unwrap_or_else(|e| e.into_inner()).insert(code.code.clone(), code);
		Ok(())
	}

	async fn consume_code(&self, code: &str) -> ClResult<ConsumeOutcome> {
		// A single `Mutex` guard makes the fetch-and-mark a single critical
		// section, the in-process equivalent of the conditional-update the
		// trait contract demands of a real database.
		let mut guard = self.codes.lock().unwrap_or_else(|e| e.into_inner());
		let Some(record) = guard.get_mut(code) else {
			return Ok(ConsumeOutcome::NotFound);
		};
		if record.consumed_at.is_some() {
			return Ok(ConsumeOutcome::AlreadyUsed);
		}
		record.consumed_at = Some(Timestamp::now());
		Ok(ConsumeOutcome::Consumed(record.clone()))
	}
}

#[async_trait]
impl TokenRepository for MemoryStore {
	async fn store_access_token(&self, token: AccessToken) -> ClResult<()> {
		self.access_tokens.lock().unwrap_or_else(|e| e.into_inner()).insert(token.token_hash.clone(), token);
		Ok(())
	}

	async fn get_access_token(&self, token_hash: &str) -> ClResult<Option<AccessToken>> {
		Ok(self.access_tokens.lock().unwrap_or_else(|e| e.into_inner()).get(token_hash).cloned())
	}

	async fn revoke_access_token(&self, token_hash: &str) -> ClResult<()> {
		if let Some(token) = self.access_tokens.lock().unwrap_or_else(|e| e.into_inner()).get_mut(token_hash) {
			token.revoked_at = Some(Timestamp::now());
		}
		Ok(())
	}

	async fn store_refresh_token(&self, token: RefreshToken) -> ClResult<()> {
		self.refresh_tokens.lock().unwrap_or_else(|e| e.into_inner()).insert(token.token_hash.clone(), token);
		Ok(())
	}

	async fn get_refresh_token(&self, token_hash: &str) -> ClResult<Option<RefreshToken>> {
		Ok(self.refresh_tokens.lock().unwrap_or_else(|e| e.into_inner()).get(token_hash).cloned())
	}

	async fn consume_refresh_token(&self, token_hash: &str) -> ClResult<Option<RefreshToken>> {
		let mut guard = self.refresh_tokens.lock().unwrap_or_else(|e| e.into_inner());
		if let Some(token) = guard.get_mut(token_hash) {
			token.consumed_at = Some(Timestamp::now());
			return Ok(Some(token.clone()));
		}
		Ok(None)
	}

	async fn revoke_token_family(&self, family_id: Uuid) -> ClResult<()> {
		let now = Timestamp::now();
		let paired_hashes: Vec<String> = {
			let mut guard = self.refresh_tokens.lock().unwrap_or_else(|e| e.into_inner());
			let mut hashes = Vec::new();
			for token in guard.values_mut().filter(|t| t.family_id == family_id) {
				token.revoked_at = Some(now);
				hashes.push(token.paired_access_token_hash.clone());
			}
			hashes
		};
		let mut access = self.access_tokens.lock().unwrap_or_else(|e| e.into_inner());
		for hash in paired_hashes {
			if let Some(token) = access.get_mut(&hash) {
				token.revoked_at = Some(now);
			}
		}
		Ok(())
	}

	async fn revoke_tokens_by_source_code(&self, code: &str) -> ClResult<()> {
		let now = Timestamp::now();
		for token in self
			.access_tokens
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.values_mut()
			.filter(|t| t.source_code.as_deref() == Some(code))
		{
			token.revoked_at = Some(now);
		}
		for token in self
			.refresh_tokens
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.values_mut()
			.filter(|t| t.source_code.as_deref() == Some(code))
		{
			token.revoked_at = Some(now);
		}
		Ok(())
	}
}

#[async_trait]
impl SigningKeyRepository for MemoryStore {
	async fn store_signing_key(&self, key: SigningKey) -> ClResult<()> {
		self.signing_keys.lock().unwrap_or_else(|e| e.into_inner()).insert(key.kid, key);
		Ok(())
	}

	async fn get_signing_key(&self, kid: &KeyId) -> ClResult<Option<SigningKey>> {
		Ok(self.signing_keys.lock().unwrap_or_else(|e| e.into_inner()).get(kid).cloned())
	}

	async fn active_signing_key(&self) -> ClResult<Option<SigningKey>> {
		Ok(self
			.signing_keys
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.values()
			.filter(|k| !k.retired)
			.max_by_key(|k| k.created_at.0)
			.cloned())
	}

	async fn list_signing_keys(&self) -> ClResult<Vec<SigningKey>> {
		Ok(self.signing_keys.lock().unwrap_or_else(|e| e.into_inner()).values().cloned().collect())
	}

	async fn retire_signing_key(&self, kid: &KeyId) -> ClResult<()> {
		if let Some(key) = self.signing_keys.lock().unwrap_or_else(|e| e.into_inner()).get_mut(kid) {
			key.retired = true;
		}
		Ok(())
	}
}

#[async_trait]
impl AuditRepository for MemoryStore {
	async fn record(&self, event: AuditEvent) -> ClResult<()> {
		self.audit_events.lock().unwrap_or_else(|e| e.into_inner()).push(event);
		Ok(())
	}
}

impl Repositories for MemoryStore {
	fn tenants(&self) -> &dyn TenantRepository {
		self
	}
	fn identities(&self) -> &dyn IdentityRepository {
		self
	}
	fn sessions(&self) -> &dyn SessionRepository {
		self
	}
	fn rbac(&self) -> &dyn RbacRepository {
		self
	}
	fn clients(&self) -> &dyn ClientRepository {
		self
	}
	fn codes(&self) -> &dyn AuthorizationCodeRepository {
		self
	}
	fn tokens(&self) -> &dyn TokenRepository {
		self
	}
	fn signing_keys(&self) -> &dyn SigningKeyRepository {
		self
	}
	fn audit(&self) -> &dyn AuditRepository {
		self
	}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
	use super::*;
	use ot_types::model::{ClientKind, GrantType, PkceMethod, TokenEndpointAuthMethod};

	fn sample_client(tenant_id: TenantId) -> OAuthClient {
		OAuthClient {
			id: ClientId::new(),
			tenant_id,
			kind: ClientKind::Public,
			name: "test".into(),
			secret_hash: None,
			redirect_uris: vec!["https://app/cb".into()],
			scopes: vec!["openid".into()],
			grant_types: vec![GrantType::AuthorizationCode, GrantType::RefreshToken],
			response_types: vec!["code".into()],
			token_endpoint_auth_method: TokenEndpointAuthMethod::None,
			access_token_ttl_seconds: 3600,
			refresh_token_ttl_seconds: 86400,
			id_token_ttl_seconds: 3600,
			is_active: true,
			created_at: Timestamp::now(),
		}
	}

	#[tokio::test]
	async fn consume_code_is_single_use() {
		let store = MemoryStore::new();
		let tenant_id = TenantId::new();
		let code = AuthorizationCode {
			code: "abc123".into(),
			client_id: ClientId::new(),
			tenant_id,
			user_id: UserId::new(),
			redirect_uri: "https://app/cb".into(),
			scopes: vec!["openid".into()],
			code_challenge: None,
			code_challenge_method: None::<PkceMethod>,
			nonce: None,
			created_at: Timestamp::now(),
			expires_at: Timestamp::from_now(300),
			consumed_at: None,
		};
		store.store_code(code).await.unwrap();

		match store.consume_code("abc123").await.unwrap() {
			ConsumeOutcome::Consumed(_) => {}
			other => panic!("expected Consumed, got {other:?}"),
		}
		match store.consume_code("abc123").await.unwrap() {
			ConsumeOutcome::AlreadyUsed => {}
			other => panic!("expected AlreadyUsed, got {other:?}"),
		}
		match store.consume_code("no-such-code").await.unwrap() {
			ConsumeOutcome::NotFound => {}
			other => panic!("expected NotFound, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn tenant_scoped_queries_stay_isolated() {
		let store = MemoryStore::new();
		let tenant_a = TenantId::new();
		let tenant_b = TenantId::new();
		let client_a = sample_client(tenant_a);
		let client_b = sample_client(tenant_b);
		store.create_client(client_a.clone()).await.unwrap();
		store.create_client(client_b).await.unwrap();

		let (clients, total) = store.list_clients(tenant_a, 10, 0).await.unwrap();
		assert_eq!(total, 1);
		assert_eq!(clients[0].id, client_a.id);
	}

	#[tokio::test]
	async fn revoking_a_token_family_revokes_the_paired_access_token() {
		let store = MemoryStore::new();
		let tenant_id = TenantId::new();
		let client = sample_client(tenant_id);
		let family_id = Uuid::new_v4();
		let access = AccessToken {
			token_hash: "access-hash".into(),
			client_id: client.id,
			tenant_id,
			user_id: UserId::new(),
			scopes: vec!["openid".into()],
			created_at: Timestamp::now(),
			expires_at: Timestamp::from_now(3600),
			revoked_at: None,
			source_code: None,
		};
		let refresh = RefreshToken {
			token_hash: "refresh-hash".into(),
			family_id,
			client_id: client.id,
			tenant_id,
			user_id: access.user_id,
			scopes: vec!["openid".into()],
			paired_access_token_hash: access.token_hash.clone(),
			source_code: None,
			created_at: Timestamp::now(),
			expires_at: Timestamp::from_now(86400),
			consumed_at: None,
			revoked_at: None,
		};
		store.store_access_token(access.clone()).await.unwrap();
		store.store_refresh_token(refresh).await.unwrap();

		store.revoke_token_family(family_id).await.unwrap();

		let reloaded = store.get_access_token(&access.token_hash).await.unwrap().unwrap();
		assert!(reloaded.revoked_at.is_some());
	}
}

// vim: ts=4
