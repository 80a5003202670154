//! Cryptographic primitives for OpenTrusty: Argon2id password hashing,
//! SHA-256 fingerprinting of secrets and tokens, RS256 signing key
//! generation, and AES-GCM wrapping of private key material — all
//! offloaded to [`worker::WorkerPool`] so the async runtime never blocks
//! on CPU-bound cryptography.

pub mod fingerprint;
pub mod keywrap;
pub mod password;
pub mod signing;
pub mod worker;

// vim: ts=4
