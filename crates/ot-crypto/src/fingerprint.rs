//! SHA-256 fingerprinting. Client secrets, access tokens, and refresh
//! tokens are never stored in plaintext — only this digest is persisted,
//! and redemption compares digests, never the secret itself.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

#[must_use]
pub fn fingerprint(secret: &str) -> String {
	let mut hasher = Sha256::new();
	hasher.update(secret.as_bytes());
	format!("{:x}", hasher.finalize())
}

/// Mints a random, URL-safe opaque secret (client secrets, authorization
/// codes, bearer tokens) of `bytes` bytes of entropy before encoding.
#[must_use]
pub fn random_token(bytes: usize) -> String {
	let mut buf = vec![0u8; bytes];
	rand::rng().fill_bytes(&mut buf);
	URL_SAFE_NO_PAD.encode(buf)
}


// vim: ts=4
