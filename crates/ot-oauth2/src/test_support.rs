//! Shared in-memory fakes for this crate's own unit tests. Not part of
//! the public API — never compiled outside `#[cfg(test)]`.

use std::sync::Mutex;

use async_trait::async_trait;
use ot_types::ids::{ClientId, TenantId};
use ot_types::model::{
	AccessToken, AuthorizationCode, ClientKind, GrantType, OAuthClient, RefreshToken, TokenEndpointAuthMethod,
};
use ot_types::prelude::{ClResult, Error};
use ot_types::repo::{AuthorizationCodeRepository, ClientRepository, ConsumeOutcome, TokenRepository};
use ot_types::types::Timestamp;

#[must_use]
pub fn active_client(tenant_id: TenantId, redirect_uris: &[&str], scopes: &[&str]) -> OAuthClient {
	OAuthClient {
		id: ClientId::new(),
		tenant_id,
		kind: ClientKind::Public,
		name: "test client".into(),
		secret_hash: None,
		redirect_uris: redirect_uris.iter().map(|s| (*s).to_string()).collect(),
		scopes: scopes.iter().map(|s| (*s).to_string()).collect(),
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

#[derive(Default)]
pub struct FakeClientRepo {
	clients: Mutex<Vec<OAuthClient>>,
}

impl FakeClientRepo {
	pub fn seed(&self, client: OAuthClient) {
		self.clients.lock().unwrap().push(client);
	}
}

#[async_trait]
impl ClientRepository for FakeClientRepo {
	async fn create_client(&self, client: OAuthClient) -> ClResult<OAuthClient> {
		self.clients.lock().unwrap().push(client.clone());
		Ok(client)
	}
	async fn get_client(&self, id: ClientId) -> ClResult<OAuthClient> {
		self.clients.lock().unwrap().iter().find(|c| c.id == id).cloned().ok_or(Error::NotFound)
	}
	async fn list_clients(&self, tenant_id: TenantId, _limit: u32, _offset: u32) -> ClResult<(Vec<OAuthClient>, u64)> {
		let v: Vec<_> = self.clients.lock().unwrap().iter().filter(|c| c.tenant_id == tenant_id).cloned().collect();
		let total = v.len() as u64;
		Ok((v, total))
	}
	async fn update_client(&self, client: OAuthClient) -> ClResult<OAuthClient> {
		let mut guard = self.clients.lock().unwrap();
		if let Some(slot) = guard.iter_mut().find(|c| c.id == client.id) {
			*slot = client.clone();
		}
		Ok(client)
	}
	async fn delete_client(&self, id: ClientId) -> ClResult<()> {
		self.clients.lock().unwrap().retain(|c| c.id != id);
		Ok(())
	}
}

#[derive(Default)]
pub struct FakeCodeRepo {
	codes: Mutex<Vec<AuthorizationCode>>,
}

#[async_trait]
impl AuthorizationCodeRepository for FakeCodeRepo {
	async fn store_code(&self, code: AuthorizationCode) -> ClResult<()> {
		self.codes.lock().unwrap().push(code);
		Ok(())
	}

	async fn consume_code(&self, code: &str) -> ClResult<ConsumeOutcome> {
		let mut guard = self.codes.lock().unwrap();
		let Some(record) = guard.iter_mut().find(|c| c.code == code) else {
			return Ok(ConsumeOutcome::NotFound);
		};
		if record.consumed_at.is_some() {
			return Ok(ConsumeOutcome::AlreadyUsed);
		}
		record.consumed_at = Some(Timestamp::now());
		Ok(ConsumeOutcome::Consumed(record.clone()))
	}
}

#[derive(Default)]
pub struct FakeTokenRepo {
	access: Mutex<Vec<AccessToken>>,
	refresh: Mutex<Vec<RefreshToken>>,
}

#[async_trait]
impl TokenRepository for FakeTokenRepo {
	async fn store_access_token(&self, token: AccessToken) -> ClResult<()> {
		self.access.lock().unwrap().push(token);
		Ok(())
	}
	async fn get_access_token(&self, token_hash: &str) -> ClResult<Option<AccessToken>> {
		Ok(self.access.lock().unwrap().iter().find(|t| t.token_hash == token_hash).cloned())
	}
	async fn revoke_access_token(&self, token_hash: &str) -> ClResult<()> {
		if let Some(token) = self.access.lock().unwrap().iter_mut().find(|t| t.token_hash == token_hash) {
			token.revoked_at = Some(Timestamp::now());
		}
		Ok(())
	}

	async fn store_refresh_token(&self, token: RefreshToken) -> ClResult<()> {
		self.refresh.lock().unwrap().push(token);
		Ok(())
	}
	async fn get_refresh_token(&self, token_hash: &str) -> ClResult<Option<RefreshToken>> {
		Ok(self.refresh.lock().unwrap().iter().find(|t| t.token_hash == token_hash).cloned())
	}
	async fn consume_refresh_token(&self, token_hash: &str) -> ClResult<Option<RefreshToken>> {
		let mut guard = self.refresh.lock().unwrap();
		if let Some(token) = guard.iter_mut().find(|t| t.token_hash == token_hash) {
			token.consumed_at = Some(Timestamp::now());
			return Ok(Some(token.clone()));
		}
		Ok(None)
	}
	async fn revoke_token_family(&self, family_id: uuid::Uuid) -> ClResult<()> {
		let now = Timestamp::now();
		for token in self.refresh.lock().unwrap().iter_mut().filter(|t| t.family_id == family_id) {
			token.revoked_at = Some(now);
		}
		let paired_hashes: Vec<String> = self
			.refresh
			.lock()
			.unwrap()
			.iter()
			.filter(|t| t.family_id == family_id)
			.map(|t| t.paired_access_token_hash.clone())
			.collect();
		for token in self.access.lock().unwrap().iter_mut().filter(|t| paired_hashes.contains(&t.token_hash)) {
			token.revoked_at = Some(now);
		}
		Ok(())
	}
	async fn revoke_tokens_by_source_code(&self, code: &str) -> ClResult<()> {
		let now = Timestamp::now();
		for token in self.access.lock().unwrap().iter_mut().filter(|t| t.source_code.as_deref() == Some(code)) {
			token.revoked_at = Some(now);
		}
		for token in self.refresh.lock().unwrap().iter_mut().filter(|t| t.source_code.as_deref() == Some(code)) {
			token.revoked_at = Some(now);
		}
		Ok(())
	}
}

// vim: ts=4
