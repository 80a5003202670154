//! AES-256-GCM wrapping of signing-key private material at rest. The
//! master key itself never touches a repository — it lives only in the
//! process's environment and the [`MasterKey`] it's parsed into.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ot_types::prelude::{ClResult, Error};
use zeroize::Zeroizing;

const NONCE_LEN: usize = 12;

#[derive(Clone)]
pub struct MasterKey(Zeroizing<[u8; 32]>);

impl MasterKey {
	/// Parses a base64-encoded 32-byte key, the shape `OT_MASTER_KEY` is
	/// expected to hold.
	pub fn from_base64(encoded: &str) -> ClResult<Self> {
		let bytes = STANDARD
			.decode(encoded.trim())
			.map_err(|_| Error::ConfigError("OT_MASTER_KEY is not valid base64".into()))?;
		let array: [u8; 32] =
			bytes.try_into().map_err(|_| Error::ConfigError("OT_MASTER_KEY must decode to 32 bytes".into()))?;
		Ok(Self(Zeroizing::new(array)))
	}

	fn cipher(&self) -> Aes256Gcm {
		Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(self.0.as_ref()))
	}

	/// Encrypts `plaintext` and prepends the random nonce to the
	/// ciphertext so [`unwrap`](Self::unwrap) needs nothing else stored
	/// alongside it.
	pub fn wrap(&self, plaintext: &[u8]) -> ClResult<Vec<u8>> {
		let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
		let ciphertext = self
			.cipher()
			.encrypt(&nonce, plaintext)
			.map_err(|_| Error::Internal("key wrap failed".into()))?;

		let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
		out.extend_from_slice(&nonce);
		out.extend_from_slice(&ciphertext);
		Ok(out)
	}

	pub fn unwrap(&self, wrapped: &[u8]) -> ClResult<Zeroizing<Vec<u8>>> {
		if wrapped.len() < NONCE_LEN {
			return Err(Error::Internal("wrapped key material is truncated".into()));
		}
		let (nonce_bytes, ciphertext) = wrapped.split_at(NONCE_LEN);
		let nonce = Nonce::from_slice(nonce_bytes);
		let plaintext =
			self.cipher().decrypt(nonce, ciphertext).map_err(|_| Error::Internal("key unwrap failed".into()))?;
		Ok(Zeroizing::new(plaintext))
	}
}


// vim: ts=4
