//! Scope strings are space-separated lists of opaque tokens (RFC 6749
//! §3.3). This module is the one place that splits, joins, and checks
//! subset relationships so every call site agrees on the separator.

#[must_use]
pub fn parse(scope: &str) -> Vec<String> {
	scope.split_whitespace().map(str::to_string).collect()
}

#[must_use]
pub fn join(scopes: &[String]) -> String {
	scopes.join(" ")
}

/// True when every requested scope is among the client's allowed scopes.
#[must_use]
pub fn is_subset(requested: &[String], allowed: &[String]) -> bool {
	requested.iter().all(|s| allowed.iter().any(|a| a == s))
}

#[must_use]
pub fn contains(scopes: &[String], scope: &str) -> bool {
	scopes.iter().any(|s| s == scope)
}

pub const OPENID: &str = "openid";
pub const PROFILE: &str = "profile";
pub const EMAIL: &str = "email";
pub const ROLES: &str = "roles";


// vim: ts=4
