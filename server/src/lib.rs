//! OpenTrusty HTTP binary: a multi-tenant OAuth2/OIDC authorization server
//! with embedded RBAC. Two routers share one [`AppState`]: `auth_plane`
//! (anonymous-reachable, session- and token-facing) and `admin_plane`
//! (JSON-only, RBAC-gated management surface).

pub mod admin_plane;
pub mod auth_plane;
pub mod bootstrap;
pub mod config;
pub mod cookies;
pub mod health;
pub mod middleware;
pub mod state;
pub mod templates;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Assembles the full router over a constructed [`AppState`]. Split out of
/// `main` so integration tests can drive it directly with
/// `tower::ServiceExt::oneshot` instead of binding a real socket.
///
/// Each rate-limited surface gets its own small `Router`, layered with its
/// named limiter and merged in, since `route_layer` middleware applies to
/// every route already registered on the `Router` it's called on.
#[must_use]
pub fn build_router(state: AppState) -> Router {
	let authorize_router = Router::new()
		.route("/oauth2/authorize", get(auth_plane::authorize::authorize))
		.route_layer(from_fn_with_state(state.clone(), middleware::rate_limit::authorize));

	let login_router = Router::new()
		.route("/login", get(auth_plane::login::show_form).post(auth_plane::login::submit_form))
		.route("/api/v1/auth/login", axum::routing::post(auth_plane::login::api_login))
		.route_layer(from_fn_with_state(state.clone(), middleware::rate_limit::login));

	let token_router = Router::new()
		.route("/oauth2/token", axum::routing::post(auth_plane::token::token))
		.route_layer(from_fn_with_state(state.clone(), middleware::rate_limit::token));

	let password_router = Router::new()
		.route("/api/v1/auth/password", axum::routing::post(auth_plane::password::change_password))
		.route_layer(from_fn_with_state(state.clone(), middleware::rate_limit::password_change));

	let remaining_auth_plane = Router::new()
		.route("/api/v1/auth/register", axum::routing::post(auth_plane::register::register))
		.route("/api/v1/auth/logout", axum::routing::post(auth_plane::logout::logout))
		.route("/api/v1/auth/me", get(auth_plane::me::me))
		.route("/oauth2/revoke", axum::routing::post(auth_plane::revoke::revoke))
		.route("/oauth2/jwks", get(auth_plane::discovery::jwks))
		.route("/.well-known/openid-configuration", get(auth_plane::discovery::discovery))
		.route("/userinfo", get(auth_plane::userinfo::userinfo));

	Router::new()
		.route("/health", get(health::health))
		.merge(remaining_auth_plane)
		.merge(authorize_router)
		.merge(login_router)
		.merge(token_router)
		.merge(password_router)
		.merge(admin_plane::router())
		// Layers added later wrap those added earlier, so declaration order
		// here is the reverse of execution order: the global rate limiter
		// must turn away excess traffic before the tenant/CSRF guards spend
		// any cycles on it, so it's declared last among the three.
		.route_layer(from_fn_with_state(state.clone(), middleware::csrf::guard))
		.route_layer(from_fn_with_state(state.clone(), middleware::tenant::guard))
		.route_layer(from_fn_with_state(state.clone(), middleware::rate_limit::global))
		.layer(from_fn(middleware::logging::request_span))
		.layer(TraceLayer::new_for_http())
		.layer(CatchPanicLayer::new())
		.layer(CorsLayer::very_permissive())
		.with_state(state)
}

// vim: ts=4
