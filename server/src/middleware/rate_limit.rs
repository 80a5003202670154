//! Per-route rate limiting backed by `governor`'s GCRA implementation.
//! Each named limiter tracks its own keyspace (IP address, client id, or
//! user id depending on the route) so a burst against one endpoint never
//! consumes another's budget.

use std::num::NonZeroU32;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use std::net::SocketAddr;

use ot_types::prelude::Error;

use crate::state::AppState;

type KeyedLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

fn quota_per_minute(count: u32) -> Quota {
	let n = NonZeroU32::new(count).unwrap_or(NonZeroU32::MIN);
	Quota::per_minute(n)
}

fn quota_per_hour(count: u32) -> Quota {
	let n = NonZeroU32::new(count).unwrap_or(NonZeroU32::MIN);
	Quota::per_hour(n)
}

/// Named limiters for every rate-limited route. Constructed once at
/// startup and shared via `Arc` across every request.
pub struct RateLimitManager {
	global: KeyedLimiter,
	login: KeyedLimiter,
	authorize: KeyedLimiter,
	token: KeyedLimiter,
	password_change: KeyedLimiter,
}

impl Default for RateLimitManager {
	fn default() -> Self {
		Self {
			global: RateLimiter::keyed(quota_per_minute(100)),
			login: RateLimiter::keyed(quota_per_minute(5)),
			authorize: RateLimiter::keyed(quota_per_minute(10)),
			token: RateLimiter::keyed(quota_per_minute(20)),
			password_change: RateLimiter::keyed(quota_per_hour(3)),
		}
	}
}

impl RateLimitManager {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	fn check(limiter: &KeyedLimiter, key: &str) -> Result<(), Error> {
		limiter.check_key(&key.to_string()).map_err(|_| Error::RateLimited("rate limit exceeded".into()))
	}
}

fn peer_ip(req: &Request<Body>) -> String {
	req.extensions().get::<ConnectInfo<SocketAddr>>().map(|ConnectInfo(addr)| addr.ip().to_string()).unwrap_or_else(
		|| {
			req.headers()
				.get("x-forwarded-for")
				.and_then(|v| v.to_str().ok())
				.map(str::to_string)
				.unwrap_or_else(|| "unknown".to_string())
		},
	)
}

async fn limited(
	limiter: &KeyedLimiter,
	key: String,
	req: Request<Body>,
	next: Next,
) -> Response {
	match RateLimitManager::check(limiter, &key) {
		Ok(()) => next.run(req).await,
		Err(err) => err.into_response(),
	}
}

pub async fn global(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
	let key = peer_ip(&req);
	limited(&state.rate_limits.global, key, req, next).await
}

pub async fn login(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
	let key = peer_ip(&req);
	limited(&state.rate_limits.login, key, req, next).await
}

pub async fn authorize(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
	let key = peer_ip(&req);
	limited(&state.rate_limits.authorize, key, req, next).await
}

pub async fn password_change(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
	let key = peer_ip(&req);
	limited(&state.rate_limits.password_change, key, req, next).await
}

/// The token endpoint is keyed on `client_id`, which may arrive either via
/// HTTP Basic auth (checked first, since it needs no body read) or in the
/// form body (`client_id=...`). When it's in the body, the request has to
/// be buffered, inspected, and reconstructed so the real handler still
/// sees an intact body afterward.
pub async fn token(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
	if let Some(basic_client_id) = req
		.headers()
		.get(axum::http::header::AUTHORIZATION)
		.and_then(|v| v.to_str().ok())
		.and_then(|v| v.strip_prefix("Basic "))
		.and_then(|encoded| {
			use base64::Engine;
			base64::engine::general_purpose::STANDARD.decode(encoded).ok()
		})
		.and_then(|bytes| String::from_utf8(bytes).ok())
		.and_then(|decoded| decoded.split_once(':').map(|(user, _)| user.to_string()))
	{
		return limited(&state.rate_limits.token, basic_client_id, req, next).await;
	}

	let (parts, body) = req.into_parts();
	let bytes = match to_bytes(body, 1024 * 1024).await {
		Ok(bytes) => bytes,
		Err(_) => return Error::ValidationError("invalid request body".into()).into_response(),
	};

	let client_id = serde_urlencoded::from_bytes::<Vec<(String, String)>>(&bytes)
		.ok()
		.and_then(|pairs| pairs.into_iter().find(|(k, _)| k == "client_id").map(|(_, v)| v))
		.unwrap_or_else(|| peer_ip_from_parts(&parts));

	let rebuilt = Request::from_parts(parts, Body::from(bytes));
	limited(&state.rate_limits.token, client_id, rebuilt, next).await
}

fn peer_ip_from_parts(parts: &axum::http::request::Parts) -> String {
	parts
		.extensions
		.get::<ConnectInfo<SocketAddr>>()
		.map(|ConnectInfo(addr)| addr.ip().to_string())
		.unwrap_or_else(|| "unknown".to_string())
}

// vim: ts=4
