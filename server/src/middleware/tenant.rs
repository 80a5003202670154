//! Rejects an `X-Tenant-ID` header on any authenticated request. The
//! header exists for admin-plane clients to make their target tenant
//! explicit, but a caller who already has a session must address tenants
//! through that session alone — accepting the header from an
//! authenticated caller at all would let a stolen or reused header value
//! pick a tenant the session's own cookie didn't establish, so it is
//! rejected unconditionally rather than only when it disagrees with the
//! session.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use ot_types::extract::has_authenticated_session;
use ot_types::prelude::Error;

use crate::state::AppState;

pub async fn guard(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
	let (parts, body) = req.into_parts();

	let header_present = parts.headers.contains_key("x-tenant-id");

	if header_present && has_authenticated_session(&parts, &state).await {
		return Error::ValidationError("X-Tenant-ID is not permitted on an authenticated request".into())
			.into_response();
	}

	let req = Request::from_parts(parts, body);
	next.run(req).await
}

// vim: ts=4
