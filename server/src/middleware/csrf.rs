//! CSRF guard: every non-idempotent request (POST/PUT/PATCH/DELETE) must
//! carry a non-empty `x-csrf-token` header, the same way a browser-facing
//! form reflects the `ot_csrf` cookie it was handed on first contact. A
//! cross-site form post can't read that cookie to set the header, which is
//! what stops it from reusing an authenticated session. The OAuth2 token
//! endpoint is exempt: RFC 6749 client authentication (Basic or form
//! secret) already proves the caller isn't a browser acting on stolen
//! session state, and real OAuth2 clients never carry this cookie.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use ot_crypto::fingerprint::random_token;
use ot_types::prelude::Error;

use crate::state::AppState;

const COOKIE_NAME: &str = "ot_csrf";
const HEADER_NAME: &str = "x-csrf-token";
const EXEMPT_PATHS: &[&str] = &["/oauth2/token"];

fn read_cookie(req: &Request<Body>, name: &str) -> Option<String> {
	let header = req.headers().get(axum::http::header::COOKIE)?.to_str().ok()?;
	header.split(';').map(str::trim).find_map(|kv| {
		let (k, v) = kv.split_once('=')?;
		(k == name).then(|| v.to_string())
	})
}

fn is_mutating(method: &Method) -> bool {
	matches!(*method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE)
}

pub async fn guard(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
	let existing = read_cookie(&req, COOKIE_NAME);

	if is_mutating(req.method()) && !EXEMPT_PATHS.contains(&req.uri().path()) {
		let header_non_empty =
			req.headers().get(HEADER_NAME).and_then(|v| v.to_str().ok()).is_some_and(|v| !v.is_empty());
		if !header_non_empty {
			return Error::Unauthorized.into_response();
		}
	}

	let mut response = next.run(req).await;

	if existing.is_none() {
		let token = random_token(24);
		let attrs =
			if state.cookie_secure { "; Secure; SameSite=Strict; Path=/" } else { "; SameSite=Strict; Path=/" };
		if let Ok(value) = HeaderValue::from_str(&format!("{COOKIE_NAME}={token}{attrs}")) {
			response.headers_mut().append(axum::http::header::SET_COOKIE, value);
		}
	}

	response
}

// vim: ts=4
