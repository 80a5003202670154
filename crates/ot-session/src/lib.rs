//! The session authority. Backs both the end-user login flow and the
//! management API; sessions are server-backed records, never stateless
//! self-validating tokens.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ot_types::ids::{SessionId, TenantId, UserId};
use ot_types::model::{Session, SessionNamespace};
use ot_types::prelude::{ClResult, Error};
use ot_types::repo::SessionRepository;
use ot_types::types::Timestamp;
use rand::RngCore;

/// Default absolute session lifetime: 24 hours.
pub const DEFAULT_SESSION_TTL_SECONDS: i64 = 24 * 60 * 60;
/// Default idle timeout: 30 minutes.
pub const DEFAULT_IDLE_TIMEOUT_SECONDS: i64 = 30 * 60;

pub struct SessionService<'a> {
	repo: &'a dyn SessionRepository,
	ttl_seconds: i64,
	idle_timeout_seconds: i64,
}

impl<'a> SessionService<'a> {
	#[must_use]
	pub fn new(repo: &'a dyn SessionRepository) -> Self {
		Self { repo, ttl_seconds: DEFAULT_SESSION_TTL_SECONDS, idle_timeout_seconds: DEFAULT_IDLE_TIMEOUT_SECONDS }
	}

	#[must_use]
	pub fn with_timeouts(repo: &'a dyn SessionRepository, ttl_seconds: i64, idle_timeout_seconds: i64) -> Self {
		Self { repo, ttl_seconds, idle_timeout_seconds }
	}

	/// Generates a 32-byte, base64url-encoded session id; rotates out any
	/// pre-existing session for this user in the same namespace first,
	/// then persists the new one.
	pub async fn create(&self, user_id: UserId, tenant_id: TenantId, namespace: SessionNamespace) -> ClResult<Session> {
		self.repo.delete_sessions_for_user_in_namespace(user_id, namespace).await?;

		let mut bytes = [0u8; 32];
		rand::rng().fill_bytes(&mut bytes);
		let id = SessionId(URL_SAFE_NO_PAD.encode(bytes));

		let now = Timestamp::now();
		let session = Session {
			id,
			namespace,
			tenant_id,
			user_id,
			created_at: now,
			expires_at: now.add_seconds(self.ttl_seconds),
			idle_expires_at: now.add_seconds(self.idle_timeout_seconds),
		};
		self.repo.create_session(session).await
	}

	/// Returns an error if missing or expired; never auto-prunes on the
	/// read path, since expiry enforcement is authoritative on its own.
	/// This never deletes the row itself — only [`Self::delete`] or a
	/// periodic sweep does that.
	pub async fn get(&self, id: &SessionId) -> ClResult<Session> {
		let session = self.repo.get_session(id).await?.ok_or(Error::Unauthorized)?;
		if session.expires_at.is_past() || session.idle_expires_at.is_past() {
			return Err(Error::Unauthorized);
		}
		Ok(session)
	}

	/// Advances `idle_expires_at`; rejects if the absolute `expires_at`
	/// has already passed.
	pub async fn refresh(&self, id: &SessionId) -> ClResult<Session> {
		let session = self.get(id).await?;
		let idle_expires_at = Timestamp::now().add_seconds(self.idle_timeout_seconds);
		self.repo.touch_session(id, idle_expires_at).await?;
		Ok(Session { idle_expires_at, ..session })
	}

	pub async fn delete(&self, id: &SessionId) -> ClResult<()> {
		self.repo.delete_session(id).await
	}

	pub async fn delete_all_for_user(&self, user_id: UserId) -> ClResult<()> {
		self.repo.delete_sessions_for_user(user_id).await
	}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use std::sync::Mutex;

	#[derive(Default)]
	struct FakeSessionRepo {
		sessions: Mutex<Vec<Session>>,
	}

	#[async_trait]
	impl SessionRepository for FakeSessionRepo {
		async fn create_session(&self, session: Session) -> ClResult<Session> {
			self.sessions.lock().unwrap().push(session.clone());
			Ok(session)
		}

		async fn get_session(&self, id: &SessionId) -> ClResult<Option<Session>> {
			Ok(self.sessions.lock().unwrap().iter().find(|s| &s.id == id).cloned())
		}

		async fn touch_session(&self, id: &SessionId, idle_expires_at: Timestamp) -> ClResult<()> {
			if let Some(s) = self.sessions.lock().unwrap().iter_mut().find(|s| &s.id == id) {
				s.idle_expires_at = idle_expires_at;
			}
			Ok(())
		}

		async fn delete_session(&self, id: &SessionId) -> ClResult<()> {
			self.sessions.lock().unwrap().retain(|s| &s.id != id);
			Ok(())
		}

		async fn delete_sessions_for_user(&self, user_id: UserId) -> ClResult<()> {
			self.sessions.lock().unwrap().retain(|s| s.user_id != user_id);
			Ok(())
		}

		async fn delete_sessions_for_user_in_namespace(
			&self,
			user_id: UserId,
			namespace: SessionNamespace,
		) -> ClResult<()> {
			self.sessions.lock().unwrap().retain(|s| !(s.user_id == user_id && s.namespace == namespace));
			Ok(())
		}
	}

	#[tokio::test]
	async fn get_after_delete_is_unauthorized() {
		let repo = FakeSessionRepo::default();
		let service = SessionService::new(&repo);
		let session = service.create(UserId::new(), TenantId::new(), SessionNamespace::Auth).await.unwrap();

		service.delete(&session.id).await.unwrap();
		assert!(matches!(service.get(&session.id).await, Err(Error::Unauthorized)));
	}

	#[tokio::test]
	async fn refresh_past_expiry_fails() {
		let repo = FakeSessionRepo::default();
		let service = SessionService::with_timeouts(&repo, -1, 3600);
		let session = service.create(UserId::new(), TenantId::new(), SessionNamespace::Auth).await.unwrap();

		assert!(matches!(service.refresh(&session.id).await, Err(Error::Unauthorized)));
	}

	#[tokio::test]
	async fn login_rotation_only_touches_the_same_namespace() {
		let repo = FakeSessionRepo::default();
		let service = SessionService::new(&repo);
		let user = UserId::new();
		let tenant = TenantId::new();

		let admin_session = service.create(user, tenant, SessionNamespace::Admin).await.unwrap();
		let first_auth_session = service.create(user, tenant, SessionNamespace::Auth).await.unwrap();
		let second_auth_session = service.create(user, tenant, SessionNamespace::Auth).await.unwrap();

		assert!(service.get(&admin_session.id).await.is_ok());
		assert!(matches!(service.get(&first_auth_session.id).await, Err(Error::Unauthorized)));
		assert!(service.get(&second_auth_session.id).await.is_ok());
	}
}

// vim: ts=4
