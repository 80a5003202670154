//! Session cookie formatting, shared by the login and logout handlers.

use axum::http::HeaderValue;

use crate::state::AppState;

#[must_use]
pub fn set_session_cookie(state: &AppState, name: &str, value: &str, max_age_seconds: i64) -> Option<HeaderValue> {
	let mut attrs = format!("Max-Age={max_age_seconds}; Path=/; SameSite={}", state.cookie_same_site);
	if state.cookie_secure {
		attrs.push_str("; Secure");
	}
	if state.cookie_http_only {
		attrs.push_str("; HttpOnly");
	}
	HeaderValue::from_str(&format!("{name}={value}; {attrs}")).ok()
}

#[must_use]
pub fn clear_session_cookie(state: &AppState, name: &str) -> Option<HeaderValue> {
	set_session_cookie(state, name, "", 0)
}

// vim: ts=4
