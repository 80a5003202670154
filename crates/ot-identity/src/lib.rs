//! The identity service. Identity is distinct from credentials: a
//! [`ot_types::model::User`] can exist with no
//! [`ot_types::model::Credential`] row at all (see `DESIGN.md` for the
//! reasoning behind that split).

use ot_audit::AuditSink;
use ot_crypto::worker::WorkerPool;
use ot_types::ids::{TenantId, UserId};
use ot_types::model::{Credential, User};
use ot_types::prelude::{ClResult, Error};
use ot_types::repo::IdentityRepository;
use ot_types::types::Timestamp;
use serde_json::json;

pub struct IdentityService<'a> {
	repo: &'a dyn IdentityRepository,
	worker: &'a WorkerPool,
	audit: &'a dyn AuditSink,
}

/// Profile fields supplied when creating an identity.
pub struct NewProfile {
	pub email: String,
	pub display_name: String,
}

impl<'a> IdentityService<'a> {
	#[must_use]
	pub fn new(repo: &'a dyn IdentityRepository, worker: &'a WorkerPool, audit: &'a dyn AuditSink) -> Self {
		Self { repo, worker, audit }
	}

	/// Creates a user row. Does not require a credential — the coupling of
	/// registration with an initial password lives at the transport layer
	/// (`server`'s `/api/v1/auth/register` handler), not here.
	pub async fn create_identity(&self, tenant_id: TenantId, profile: NewProfile) -> ClResult<User> {
		if self.repo.find_user_by_email(tenant_id, &profile.email).await?.is_some() {
			return Err(Error::Conflict(format!("email already registered in tenant: {}", profile.email)));
		}
		let user = User {
			id: UserId::new(),
			tenant_id,
			email: profile.email,
			display_name: profile.display_name,
			created_at: Timestamp::now(),
			disabled: false,
		};
		self.repo.create_user(user).await
	}

	/// Hashes `secret` with Argon2id (off the async runtime, via the crypto
	/// worker pool) and stores it as the user's password credential,
	/// replacing any existing one: at most one active credential per type.
	pub async fn set_credential(&self, user_id: UserId, secret: String) -> ClResult<()> {
		let password_hash = ot_crypto::password::hash_password(self.worker, secret).await?;
		self.repo
			.put_credential(Credential { user_id, password_hash, updated_at: Timestamp::now() })
			.await?;
		let mut detail = serde_json::Map::new();
		detail.insert("user_id".into(), json!(user_id.to_string()));
		ot_audit::emit(self.audit, None, Some(user_id), "credential_set", "success", detail).await;
		Ok(())
	}

	/// Fails with a generic "invalid credentials" error for both
	/// unknown-email and wrong-password, timing-equivalent where
	/// practical. Both branches always run the (CPU-bound, constant-ish
	/// time) Argon2id verification so an observer cannot distinguish
	/// "no such email" from "wrong password" by response latency alone.
	pub async fn verify_password(&self, tenant_id: TenantId, email: &str, plaintext: String) -> ClResult<User> {
		let user = self.repo.find_user_by_email(tenant_id, email).await?;
		let credential = match &user {
			Some(u) => self.repo.get_credential(u.id).await?,
			None => None,
		};

		// Always verify against *some* hash so a missing user or missing
		// credential doesn't short-circuit into a visibly faster failure.
		let hash = credential.as_ref().map(|c| c.password_hash.clone()).unwrap_or_else(decoy_hash);
		let verified = ot_crypto::password::verify_password(self.worker, plaintext, hash).await;

		match (user, credential, verified) {
			(Some(user), Some(_), Ok(())) if !user.disabled => Ok(user),
			_ => Err(Error::Unauthorized),
		}
	}

	/// Verifies `old` against the stored hash before writing `new`. Emits
	/// an audit event either way, success or failure.
	pub async fn change_password(&self, user_id: UserId, old: String, new: String) -> ClResult<()> {
		let credential = self.repo.get_credential(user_id).await?.ok_or(Error::Unauthorized)?;
		let verify = ot_crypto::password::verify_password(self.worker, old, credential.password_hash).await;

		if verify.is_err() {
			let mut detail = serde_json::Map::new();
			detail.insert("user_id".into(), json!(user_id.to_string()));
			ot_audit::emit(self.audit, None, Some(user_id), "password_change", "failure", detail).await;
			return Err(Error::Unauthorized);
		}

		self.set_credential(user_id, new).await?;
		let mut detail = serde_json::Map::new();
		detail.insert("user_id".into(), json!(user_id.to_string()));
		ot_audit::emit(self.audit, None, Some(user_id), "password_change", "success", detail).await;
		Ok(())
	}
}

/// A fixed, never-persisted Argon2id hash verified against when no
/// credential exists, so `verify_password` spends roughly the same time
/// whether the email is unknown or merely passwordless.
fn decoy_hash() -> String {
	"$argon2id$v=19$m=65536,t=3,p=4$b3BlbnRydXN0eWRlY295c2FsdA$\
	 uB2t3h3q8n8u0C2b0v2r6jv7yQqk6q0m4f9hXo0nQmE"
		.to_string()
}


// vim: ts=4
