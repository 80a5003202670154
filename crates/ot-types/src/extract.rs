//! Axum extractors shared between the auth-plane and admin-plane routers.
//! Generic over any state exposing [`HasRepositories`], the same way the
//! upstream `TnId`/`Auth` extractors are generic over the concrete `App`
//! state via a resolver trait rather than hard-coding one state type.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::Error;
use crate::ids::{SessionId, TenantId, UserId};
use crate::model::SessionNamespace;
use crate::repo::Repositories;

/// Implemented by server `AppState`-alikes so extractors in this crate
/// never need to know the concrete state type.
pub trait HasRepositories: Clone + Send + Sync + 'static {
	fn repositories(&self) -> &dyn Repositories;
}

fn read_cookie(parts: &Parts, name: &str) -> Option<String> {
	let header = parts.headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
	header.split(';').map(str::trim).find_map(|kv| {
		let (k, v) = kv.split_once('=')?;
		(k == name).then(|| v.to_string())
	})
}

#[derive(Debug, Clone)]
pub struct AuthCtx {
	pub session_id: SessionId,
	pub namespace: SessionNamespace,
	pub tenant_id: TenantId,
	pub user_id: UserId,
}

async fn resolve<S>(parts: &Parts, state: &S, namespace: SessionNamespace) -> Option<AuthCtx>
where
	S: HasRepositories,
{
	let cookie_name = match namespace {
		SessionNamespace::Auth => "ot_auth_session",
		SessionNamespace::Admin => "ot_admin_session",
	};
	let raw = read_cookie(parts, cookie_name)?;
	let session = state.repositories().sessions().get_session(&SessionId(raw)).await.ok().flatten()?;
	if session.namespace != namespace || session.expires_at.is_past() || session.idle_expires_at.is_past() {
		return None;
	}
	Some(AuthCtx {
		session_id: session.id,
		namespace: session.namespace,
		tenant_id: session.tenant_id,
		user_id: session.user_id,
	})
}

/// Requires a live, non-expired session in the given plane's namespace.
pub struct Auth(pub AuthCtx);

#[async_trait]
impl<S> FromRequestParts<S> for Auth
where
	S: HasRepositories + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		resolve(parts, state, SessionNamespace::Auth).await.map(Auth).ok_or(Error::Unauthorized)
	}
}

/// Same as [`Auth`] but resolved against the admin-plane session cookie.
pub struct AdminAuth(pub AuthCtx);

#[async_trait]
impl<S> FromRequestParts<S> for AdminAuth
where
	S: HasRepositories + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		resolve(parts, state, SessionNamespace::Admin).await.map(AdminAuth).ok_or(Error::Unauthorized)
	}
}

/// Never rejects; endpoints that behave differently when logged in
/// (e.g. the authorize step skipping the login form) use this instead
/// of [`Auth`].
pub struct OptionalAuth(pub Option<AuthCtx>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuth
where
	S: HasRepositories + Sync,
{
	type Rejection = std::convert::Infallible;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		Ok(OptionalAuth(resolve(parts, state, SessionNamespace::Auth).await))
	}
}

/// True if either plane's session cookie resolves to a live session.
/// Backs the server's `X-Tenant-ID` header-spoofing guard: the header is
/// rejected outright on any request this returns true for, since an
/// anonymous request has no session tenant for the header to threaten.
pub async fn has_authenticated_session<S>(parts: &Parts, state: &S) -> bool
where
	S: HasRepositories + Sync,
{
	resolve(parts, state, SessionNamespace::Auth).await.is_some()
		|| resolve(parts, state, SessionNamespace::Admin).await.is_some()
}

/// Correlates a request across log lines; echoes an inbound
/// `x-request-id` header or mints a fresh one.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for RequestId
where
	S: Send + Sync,
{
	type Rejection = std::convert::Infallible;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let id = parts
			.headers
			.get("x-request-id")
			.and_then(|v| v.to_str().ok())
			.map(str::to_string)
			.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
		Ok(RequestId(id))
	}
}

// vim: ts=4
