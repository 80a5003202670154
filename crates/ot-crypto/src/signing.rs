//! RS256 signing keys. Keypair generation and JWT signing are CPU-bound
//! and always run through the worker pool, mirroring [`crate::password`].

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use ot_types::ids::KeyId;
use ot_types::prelude::{ClResult, Error};
use rsa::pkcs1::EncodeRsaPublicKey;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use serde::Serialize;

use crate::worker::{Priority, WorkerPool};

const RSA_KEY_BITS: usize = 2048;

pub struct GeneratedKeyPair {
	pub kid: KeyId,
	pub public_key_pem: String,
	/// PKCS#8 DER of the private key, ready to be wrapped by [`crate::keywrap`].
	pub private_key_der: Vec<u8>,
}

fn generate_keypair_sync() -> ClResult<GeneratedKeyPair> {
	let mut rng = rand::rngs::OsRng;
	let private = RsaPrivateKey::new(&mut rng, RSA_KEY_BITS)
		.map_err(|err| Error::Internal(format!("rsa key generation failed: {err}")))?;
	let public = private.to_public_key();

	let public_key_pem =
		public.to_public_key_pem(LineEnding::LF).map_err(|err| Error::Internal(format!("pem encode failed: {err}")))?;
	let private_key_der = private
		.to_pkcs8_der()
		.map_err(|err| Error::Internal(format!("der encode failed: {err}")))?
		.as_bytes()
		.to_vec();

	Ok(GeneratedKeyPair { kid: KeyId::new(), public_key_pem, private_key_der })
}

pub async fn generate_keypair(worker: &WorkerPool) -> ClResult<GeneratedKeyPair> {
	worker
		.spawn(Priority::High, generate_keypair_sync)
		.await
		.ok_or_else(|| Error::Internal("worker pool lost keypair generation job".into()))?
}

fn sign_claims_sync<T>(claims: T, kid: KeyId, private_key_der: Vec<u8>) -> ClResult<String>
where
	T: Serialize + Send + 'static,
{
	let private = RsaPrivateKey::from_pkcs8_der(&private_key_der)
		.map_err(|err| Error::Internal(format!("private key decode failed: {err}")))?;
	let pem = private.to_pkcs8_pem(LineEnding::LF).map_err(|err| Error::Internal(format!("pem encode failed: {err}")))?;

	let mut header = Header::new(Algorithm::RS256);
	header.kid = Some(kid.to_string());

	let key = EncodingKey::from_rsa_pem(pem.as_bytes())
		.map_err(|err| Error::Internal(format!("encoding key construction failed: {err}")))?;

	jsonwebtoken::encode(&header, &claims, &key).map_err(|err| Error::Internal(format!("jwt signing failed: {err}")))
}

/// Signs an ID token or any other RS256 JWT with the given key material.
/// `private_key_der` must already be unwrapped by [`crate::keywrap`].
pub async fn sign_claims<T>(worker: &WorkerPool, claims: T, kid: KeyId, private_key_der: Vec<u8>) -> ClResult<String>
where
	T: Serialize + Send + 'static,
{
	worker
		.spawn(Priority::High, move || sign_claims_sync(claims, kid, private_key_der))
		.await
		.ok_or_else(|| Error::Internal("worker pool lost jwt signing job".into()))?
}

/// One entry of a JWKS `keys` array (RFC 7517 §4, RSA key type per §6.3.1).
#[derive(Debug, Clone, Serialize)]
pub struct JwkRsa {
	pub kty: &'static str,
	pub r#use: &'static str,
	pub alg: &'static str,
	pub kid: String,
	pub n: String,
	pub e: String,
}

pub fn public_key_to_jwk(kid: &KeyId, public_key_pem: &str) -> ClResult<JwkRsa> {
	let public = rsa::RsaPublicKey::from_public_key_pem(public_key_pem)
		.map_err(|err| Error::Internal(format!("public key decode failed: {err}")))?;
	let _ = public.to_pkcs1_der(); // validates the key round-trips through PKCS#1 too

	Ok(JwkRsa {
		kty: "RSA",
		r#use: "sig",
		alg: "RS256",
		kid: kid.to_string(),
		n: URL_SAFE_NO_PAD.encode(public.n().to_bytes_be()),
		e: URL_SAFE_NO_PAD.encode(public.e().to_bytes_be()),
	})
}

// vim: ts=4
