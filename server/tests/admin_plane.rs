#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};

use ot_types::model::SessionNamespace;

#[tokio::test]
async fn tenant_admin_cannot_manage_users_in_a_different_tenant() {
	let app = common::build().await;
	let tenant_a = common::seed_tenant(&app.state, "tenant-a").await;
	let tenant_b = common::seed_tenant(&app.state, "tenant-b").await;

	let admin_of_a = common::seed_user(&app.state, tenant_a, "admin-a@acme.test", "admin-a-password").await;
	common::assign_role(&app.state, admin_of_a.id, tenant_a, ot_rbac::catalog::TENANT_ADMIN).await;

	let target_user = common::seed_user(&app.state, tenant_b, "target@other.test", "target-password").await;

	let session_cookie = common::login_cookie(&app.state, admin_of_a.id, tenant_a, SessionNamespace::Admin).await;
	let csrf = common::mint_csrf(&app.router).await;

	let request = Request::builder()
		.method("POST")
		.uri("/api/v1/rbac/assignments")
		.header(header::CONTENT_TYPE, "application/json")
		.header(header::COOKIE, format!("{session_cookie}; {}", csrf.cookie))
		.header("x-csrf-token", &csrf.header)
		.body(Body::from(format!(
			r#"{{"user_id":"{}","tenant_id":"{tenant_b}","role_name":"tenant_member"}}"#,
			target_user.id
		)))
		.unwrap();

	let response = common::send(&app.router, request).await;
	assert_eq!(response.status, StatusCode::FORBIDDEN, "a tenant_a admin must not manage tenant_b assignments");
}

#[tokio::test]
async fn platform_admin_can_assign_roles_in_any_tenant() {
	let app = common::build().await;
	let tenant_id = common::seed_tenant(&app.state, "acme").await;
	let member = common::seed_user(&app.state, tenant_id, "member@acme.test", "member-password").await;

	let platform_admin = common::seed_user(&app.state, tenant_id, "root@opentrusty.test", "root-password").await;
	common::assign_role(&app.state, platform_admin.id, tenant_id, ot_rbac::catalog::PLATFORM_ADMIN).await;

	let session_cookie =
		common::login_cookie(&app.state, platform_admin.id, tenant_id, SessionNamespace::Admin).await;
	let csrf = common::mint_csrf(&app.router).await;

	let request = Request::builder()
		.method("POST")
		.uri("/api/v1/rbac/assignments")
		.header(header::CONTENT_TYPE, "application/json")
		.header(header::COOKIE, format!("{session_cookie}; {}", csrf.cookie))
		.header("x-csrf-token", &csrf.header)
		.body(Body::from(format!(
			r#"{{"user_id":"{}","tenant_id":"{tenant_id}","role_name":"tenant_member"}}"#,
			member.id
		)))
		.unwrap();

	let response = common::send(&app.router, request).await;
	assert_eq!(response.status, StatusCode::CREATED, "body: {:?}", response.json());
}

#[tokio::test]
async fn anonymous_request_to_the_admin_plane_is_unauthorized() {
	let app = common::build().await;
	let tenant_id = common::seed_tenant(&app.state, "acme").await;
	let csrf = common::mint_csrf(&app.router).await;

	let request = Request::builder()
		.method("GET")
		.uri(format!("/api/v1/tenants/{tenant_id}/users"))
		.header(header::COOKIE, &csrf.cookie)
		.body(Body::empty())
		.unwrap();

	let response = common::send(&app.router, request).await;
	assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

// vim: ts=4
