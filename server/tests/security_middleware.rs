#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};

use ot_types::model::SessionNamespace;

#[tokio::test]
async fn mutating_request_without_matching_csrf_header_is_rejected() {
	let app = common::build().await;
	let tenant_id = common::seed_tenant(&app.state, "acme").await;
	let user = common::seed_user(&app.state, tenant_id, "carol@acme.test", "a-fine-password-1").await;

	let csrf = common::mint_csrf(&app.router).await;

	// Cookie present but header missing: double submit can't be verified.
	let request = Request::builder()
		.method("POST")
		.uri("/api/v1/auth/login")
		.header(header::CONTENT_TYPE, "application/json")
		.header(header::COOKIE, &csrf.cookie)
		.body(Body::from(format!(
			r#"{{"tenant_id":"{tenant_id}","email":"{}","password":"a-fine-password-1"}}"#,
			user.email
		)))
		.unwrap();
	let response = common::send(&app.router, request).await;
	assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn mutating_request_with_matching_csrf_pair_succeeds() {
	let app = common::build().await;
	let tenant_id = common::seed_tenant(&app.state, "acme").await;
	let user = common::seed_user(&app.state, tenant_id, "dave@acme.test", "another-fine-password").await;

	let csrf = common::mint_csrf(&app.router).await;

	let request = Request::builder()
		.method("POST")
		.uri("/api/v1/auth/login")
		.header(header::CONTENT_TYPE, "application/json")
		.header(header::COOKIE, &csrf.cookie)
		.header("x-csrf-token", &csrf.header)
		.body(Body::from(format!(
			r#"{{"tenant_id":"{tenant_id}","email":"{}","password":"another-fine-password"}}"#,
			user.email
		)))
		.unwrap();
	let response = common::send(&app.router, request).await;
	assert_eq!(response.status, StatusCode::OK, "body: {:?}", response.json());
}

#[tokio::test]
async fn x_tenant_id_header_is_rejected_on_any_authenticated_request() {
	let app = common::build().await;
	let tenant_a = common::seed_tenant(&app.state, "tenant-a").await;
	let tenant_b = common::seed_tenant(&app.state, "tenant-b").await;
	let user = common::seed_user(&app.state, tenant_a, "erin@a.test", "password-for-erin").await;
	common::assign_role(&app.state, user.id, tenant_a, ot_rbac::catalog::TENANT_ADMIN).await;

	let session_cookie = common::login_cookie(&app.state, user.id, tenant_a, SessionNamespace::Admin).await;
	let csrf = common::mint_csrf(&app.router).await;

	// Without the header, the session's own tenant is used and the request
	// succeeds.
	let unheadered_request = Request::builder()
		.method("GET")
		.uri(format!("/api/v1/tenants/{tenant_a}/users"))
		.header(header::COOKIE, format!("{session_cookie}; {}", csrf.cookie))
		.body(Body::empty())
		.unwrap();
	let unheadered_response = common::send(&app.router, unheadered_request).await;
	assert_eq!(unheadered_response.status, StatusCode::OK, "body: {:?}", unheadered_response.json());

	// Even the caller's own tenant in the header is rejected: an
	// authenticated request must never carry this header at all.
	let own_tenant_request = Request::builder()
		.method("GET")
		.uri(format!("/api/v1/tenants/{tenant_a}/users"))
		.header(header::COOKIE, format!("{session_cookie}; {}", csrf.cookie))
		.header("x-tenant-id", tenant_a.to_string())
		.body(Body::empty())
		.unwrap();
	let own_tenant_response = common::send(&app.router, own_tenant_request).await;
	assert_eq!(own_tenant_response.status, StatusCode::BAD_REQUEST);

	// A different tenant's id in the header is rejected the same way.
	let spoofed_request = Request::builder()
		.method("GET")
		.uri(format!("/api/v1/tenants/{tenant_a}/users"))
		.header(header::COOKIE, format!("{session_cookie}; {}", csrf.cookie))
		.header("x-tenant-id", tenant_b.to_string())
		.body(Body::empty())
		.unwrap();
	let spoofed_response = common::send(&app.router, spoofed_request).await;
	assert_eq!(spoofed_response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bootstrap_is_idempotent_and_never_creates_a_second_platform_admin() {
	let app = common::build().await;
	let repo = {
		use ot_types::extract::HasRepositories;
		app.state.repositories()
	};
	let (_, total_before) = repo.tenants().list_tenants(200, 0).await.unwrap();

	let settings = opentrusty_server::config::Settings {
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

	opentrusty_server::bootstrap::bootstrap(&app.state, &settings).await.unwrap();
	opentrusty_server::bootstrap::bootstrap(&app.state, &settings).await.unwrap();

	let (_, total_after) = repo.tenants().list_tenants(200, 0).await.unwrap();
	assert_eq!(total_before, total_after, "a second bootstrap call must not create another tenant or admin");
}

// vim: ts=4
