//! The OAuth2 / OIDC engine: the authorize step, the token endpoint's
//! two grant types, revoke, userinfo claims, ID-token claims, and
//! discovery/JWKS. Every module here is storage-agnostic — it takes
//! `&dyn ot_types::repo::*` trait objects and returns plain values or
//! [`error::OAuthError`]; the HTTP wiring (cookies, redirects,
//! query-string parsing) lives in the `server` crate.

pub mod authorize;
pub mod client_auth;
pub mod discovery;
pub mod error;
pub mod id_token;
pub mod pkce;
pub mod revoke;
pub mod scope;
pub mod token;
pub mod userinfo;

#[cfg(test)]
mod test_support;

// vim: ts=4
