//! PKCE verification (RFC 7636). `S256` compares
//! `base64url(sha256(verifier))` against the stored challenge; `plain`
//! compares the verifier directly. Both are constant-shape string
//! comparisons — there is no secret here worth hardening against timing,
//! the code itself is already the one-time secret.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ot_types::model::PkceMethod;
use sha2::{Digest, Sha256};

#[must_use]
pub fn verify(method: PkceMethod, verifier: &str, challenge: &str) -> bool {
	match method {
		PkceMethod::Plain => verifier == challenge,
		PkceMethod::S256 => {
			let mut hasher = Sha256::new();
			hasher.update(verifier.as_bytes());
			let computed = URL_SAFE_NO_PAD.encode(hasher.finalize());
			computed == challenge
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn s256_matches_only_its_own_verifier() {
		// echo -n abc | openssl dgst -sha256 -binary | base64 | tr '+/' '-_' | tr -d '='
		let challenge = "ungWv48Bz-pBQUDeXa4iI7ADYaOWF3qctBD_YfIAFa0";
		assert!(verify(PkceMethod::S256, "abc", challenge));
		assert!(!verify(PkceMethod::S256, "abd", challenge));
		assert!(!verify(PkceMethod::Plain, "abc", challenge));
	}

	#[test]
	fn plain_is_a_direct_comparison() {
		assert!(verify(PkceMethod::Plain, "abc", "abc"));
		assert!(!verify(PkceMethod::Plain, "abc", "abd"));
	}
}

// vim: ts=4
