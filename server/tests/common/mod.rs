#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::body::{to_bytes, Body, Bytes};
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tower::ServiceExt;

use ot_adapter_memory::MemoryStore;
use ot_audit::TracingAuditSink;
use ot_crypto::keywrap::MasterKey;
use ot_crypto::signing::generate_keypair;
use ot_crypto::worker::WorkerPool;
use ot_identity::{IdentityService, NewProfile};
use ot_rbac::{catalog, RbacAuthority};
use ot_session::SessionService;
use ot_types::extract::HasRepositories;
use ot_types::ids::{ClientId, TenantId, UserId};
use ot_types::model::{
	ClientKind, GrantType, OAuthClient, SessionNamespace, SigningAlgorithm, Tenant, TokenEndpointAuthMethod,
};
use ot_types::repo::Repositories;
use ot_types::types::Timestamp;

use opentrusty_server::config::Settings;
use opentrusty_server::middleware::rate_limit::RateLimitManager;
use opentrusty_server::state::AppState;
use opentrusty_server::{bootstrap, build_router, templates};

/// A running app wired exactly like `main.rs` wires one, minus the TCP
/// listener: same state construction, same signing-key bootstrap, same
/// router. Every test drives `router` with `tower::ServiceExt::oneshot`
/// instead of a real socket.
pub struct TestApp {
	pub state: AppState,
	pub router: Router,
}

pub async fn build() -> TestApp {
	let master_key = MasterKey::from_base64(&STANDARD.encode([7u8; 32])).expect("test master key");
	let templates = templates::build().expect("templates");

	let state = AppState {
		store: Arc::new(MemoryStore::new()),
		worker: Arc::new(WorkerPool::new(1, 1, 1)),
		audit: Arc::new(TracingAuditSink),
		master_key,
		issuer: Arc::from("https://auth.test.local"),
		cookie_secure: false,
		cookie_http_only: true,
		cookie_same_site: Arc::from("Lax"),
		rate_limits: Arc::new(RateLimitManager::new()),
		templates: Arc::new(templates),
	};

	ensure_signing_key(&state).await;

	let settings = Settings {
		port: 0,
		issuer: "https://auth.test.local".to_string(),
		log_level: "info".to_string(),
		master_key_b64: String::new(),
		session_cookie_secure: false,
		session_cookie_http_only: true,
		session_cookie_same_site: "Lax".to_string(),
		bootstrap_admin_email: Some("platform-admin@opentrusty.test".to_string()),
		bootstrap_admin_tenant_id: None,
	};
	bootstrap::bootstrap(&state, &settings).await.expect("bootstrap");

	let router = build_router(state.clone());
	TestApp { state, router }
}

async fn ensure_signing_key(state: &AppState) {
	let repo = state.repositories();
	let generated = generate_keypair(state.worker.as_ref()).await.expect("keypair");
	let wrapped_private_key = state.master_key.wrap(&generated.private_key_der).expect("wrap");
	repo.signing_keys()
		.store_signing_key(ot_types::model::SigningKey {
			kid: generated.kid,
			algorithm: SigningAlgorithm::Rs256,
			public_key_pem: generated.public_key_pem,
			wrapped_private_key,
			created_at: Timestamp::now(),
			expires_at: None,
			retired: false,
		})
		.await
		.expect("store signing key");
}

/// Inserts a tenant directly through the repository layer, bypassing the
/// admin-plane HTTP surface (which is exercised separately in
/// `admin_plane.rs`).
pub async fn seed_tenant(state: &AppState, name: &str) -> TenantId {
	let tenant =
		Tenant { id: TenantId::new(), name: name.to_string(), created_at: Timestamp::now(), suspended: false };
	state.repositories().tenants().create_tenant(tenant).await.expect("create tenant").id
}

pub struct SeededUser {
	pub id: UserId,
	pub email: String,
	pub password: String,
}

pub async fn seed_user(state: &AppState, tenant_id: TenantId, email: &str, password: &str) -> SeededUser {
	let repo = state.repositories();
	let identity = IdentityService::new(repo.identities(), state.worker.as_ref(), state.audit.as_ref());
	let user = identity
		.create_identity(tenant_id, NewProfile { email: email.to_string(), display_name: email.to_string() })
		.await
		.expect("create identity");
	identity.set_credential(user.id, password.to_string()).await.expect("set credential");
	SeededUser { id: user.id, email: email.to_string(), password: password.to_string() }
}

pub async fn assign_role(state: &AppState, user_id: UserId, tenant_id: TenantId, role_name: &str) {
	let rbac = RbacAuthority::new(state.repositories().rbac());
	rbac.assign(user_id, tenant_id, role_name).await.expect("assign role");
}

pub async fn seed_confidential_client(
	state: &AppState,
	tenant_id: TenantId,
	redirect_uri: &str,
	scopes: &[&str],
) -> (ClientId, String) {
	let secret = "s3cret-for-tests";
	let client = OAuthClient {
		id: ClientId::new(),
		tenant_id,
		kind: ClientKind::Confidential,
		name: "test client".to_string(),
		secret_hash: Some(ot_crypto::fingerprint::fingerprint(secret)),
		redirect_uris: vec![redirect_uri.to_string()],
		scopes: scopes.iter().map(|s| (*s).to_string()).collect(),
		grant_types: vec![GrantType::AuthorizationCode, GrantType::RefreshToken],
		response_types: vec!["code".to_string()],
		token_endpoint_auth_method: TokenEndpointAuthMethod::ClientSecretBasic,
		access_token_ttl_seconds: 3600,
		refresh_token_ttl_seconds: 86400,
		id_token_ttl_seconds: 3600,
		is_active: true,
		created_at: Timestamp::now(),
	};
	let created = state.repositories().clients().create_client(client).await.expect("create client");
	(created.id, secret.to_string())
}

/// Logs a user in directly through `ot_session`, skipping the HTTP login
/// form, and returns a `Cookie` header value ready to attach to a request.
pub async fn login_cookie(state: &AppState, user_id: UserId, tenant_id: TenantId, namespace: SessionNamespace) -> String {
	let sessions = SessionService::new(state.repositories().sessions());
	let session = sessions.create(user_id, tenant_id, namespace).await.expect("create session");
	let cookie_name = match namespace {
		SessionNamespace::Auth => "ot_auth_session",
		SessionNamespace::Admin => "ot_admin_session",
	};
	format!("{cookie_name}={}", session.id)
}

pub struct TestResponse {
	pub status: StatusCode,
	pub headers: axum::http::HeaderMap,
	pub body: Bytes,
}

impl TestResponse {
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}

	pub fn json(&self) -> serde_json::Value {
		serde_json::from_slice(&self.body).expect("response body is valid json")
	}
}

async fn collect(response: Response<Body>) -> TestResponse {
	let status = response.status();
	let headers = response.headers().clone();
	let body = to_bytes(response.into_body(), 1024 * 1024).await.expect("read body");
	TestResponse { status, headers, body }
}

pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
	let response = router.clone().oneshot(request).await.expect("router call never fails at the Service layer");
	collect(response).await
}

/// A double-submit CSRF cookie plus its matching header, minted by
/// issuing a throwaway `GET /health` first. Every mutating request in
/// these tests needs both attached.
pub struct Csrf {
	pub cookie: String,
	pub header: String,
}

pub async fn mint_csrf(router: &Router) -> Csrf {
	let request = Request::builder().method("GET").uri("/health").body(Body::empty()).expect("request");
	let response = router.clone().oneshot(request).await.expect("health call");
	let set_cookie = response
		.headers()
		.get(axum::http::header::SET_COOKIE)
		.and_then(|v| v.to_str().ok())
		.expect("health response mints an ot_csrf cookie");
	let pair = set_cookie.split(';').next().expect("cookie pair");
	let (name, value) = pair.split_once('=').expect("cookie name=value");
	assert_eq!(name, "ot_csrf");
	Csrf { cookie: pair.to_string(), header: value.to_string() }
}

// vim: ts=4
