//! Argon2id password hashing. Every call that touches the algorithm
//! itself is synchronous and is only ever invoked through the worker
//! pool — never inline on the async runtime.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use ot_types::prelude::{ClResult, Error};
use rand::rngs::OsRng;

use crate::worker::{Priority, WorkerPool};

fn hash_password_sync(password: String) -> ClResult<String> {
	let salt = SaltString::generate(&mut OsRng);
	Argon2::default()
		.hash_password(password.as_bytes(), &salt)
		.map(|hash| hash.to_string())
		.map_err(|err| Error::Internal(format!("password hashing failed: {err}")))
}

pub async fn hash_password(worker: &WorkerPool, password: String) -> ClResult<String> {
	worker
		.spawn(Priority::High, move || hash_password_sync(password))
		.await
		.ok_or_else(|| Error::Internal("worker pool lost password hash job".into()))?
}

fn verify_password_sync(password: String, hash: String) -> ClResult<()> {
	let parsed = PasswordHash::new(&hash).map_err(|_| Error::Unauthorized)?;
	Argon2::default()
		.verify_password(password.as_bytes(), &parsed)
		.map_err(|_| Error::Unauthorized)
}

pub async fn verify_password(worker: &WorkerPool, password: String, hash: String) -> ClResult<()> {
	worker
		.spawn(Priority::High, move || verify_password_sync(password, hash))
		.await
		.ok_or_else(|| Error::Internal("worker pool lost password verify job".into()))?
}


// vim: ts=4
