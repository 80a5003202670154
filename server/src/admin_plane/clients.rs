use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use ot_crypto::fingerprint::{fingerprint, random_token};
use ot_rbac::catalog::perm;
use ot_types::extract::{AdminAuth, HasRepositories};
use ot_types::ids::{ClientId, TenantId};
use ot_types::model::{ClientKind, GrantType, OAuthClient, TokenEndpointAuthMethod};
use ot_types::prelude::{ApiResponse, ClResult, Patch};
use ot_types::types::{PaginationInfo, Timestamp};

use super::{require_permission, PageQuery};
use crate::state::AppState;

const SECRET_ENTROPY_BYTES: usize = 32;
const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: i64 = 3600;
const DEFAULT_REFRESH_TOKEN_TTL_SECONDS: i64 = 86400;
const DEFAULT_ID_TOKEN_TTL_SECONDS: i64 = 3600;

#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
	pub name: String,
	pub kind: ClientKind,
	pub redirect_uris: Vec<String>,
	pub scopes: Vec<String>,
	#[serde(default)]
	pub grant_types: Option<Vec<GrantType>>,
	#[serde(default)]
	pub token_endpoint_auth_method: Option<TokenEndpointAuthMethod>,
	#[serde(default)]
	pub access_token_ttl_seconds: Option<i64>,
	#[serde(default)]
	pub refresh_token_ttl_seconds: Option<i64>,
	#[serde(default)]
	pub id_token_ttl_seconds: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateClientRequest {
	#[serde(default)]
	pub name: Patch<String>,
	#[serde(default)]
	pub redirect_uris: Patch<Vec<String>>,
	#[serde(default)]
	pub scopes: Patch<Vec<String>>,
	#[serde(default)]
	pub is_active: Patch<bool>,
}

#[derive(Debug, Serialize)]
pub struct ClientView {
	pub id: ClientId,
	pub tenant_id: TenantId,
	pub kind: ClientKind,
	pub name: String,
	pub redirect_uris: Vec<String>,
	pub scopes: Vec<String>,
	pub grant_types: Vec<GrantType>,
	pub response_types: Vec<String>,
	pub token_endpoint_auth_method: TokenEndpointAuthMethod,
	pub access_token_ttl_seconds: i64,
	pub refresh_token_ttl_seconds: i64,
	pub id_token_ttl_seconds: i64,
	pub is_active: bool,
	pub created_at: Timestamp,
}

impl From<OAuthClient> for ClientView {
	fn from(client: OAuthClient) -> Self {
		Self {
			id: client.id,
			tenant_id: client.tenant_id,
			kind: client.kind,
			name: client.name,
			redirect_uris: client.redirect_uris,
			scopes: client.scopes,
			grant_types: client.grant_types,
			response_types: client.response_types,
			token_endpoint_auth_method: client.token_endpoint_auth_method,
			access_token_ttl_seconds: client.access_token_ttl_seconds,
			refresh_token_ttl_seconds: client.refresh_token_ttl_seconds,
			id_token_ttl_seconds: client.id_token_ttl_seconds,
			is_active: client.is_active,
			created_at: client.created_at,
		}
	}
}

#[derive(Debug, Serialize)]
pub struct CreateClientResponse {
	#[serde(flatten)]
	pub client: ClientView,
	/// Shown exactly once: only the fingerprint is persisted.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub client_secret: Option<String>,
}

pub async fn create(
	State(state): State<AppState>,
	AdminAuth(ctx): AdminAuth,
	Path(tenant_id): Path<TenantId>,
	Json(body): Json<CreateClientRequest>,
) -> ClResult<(StatusCode, Json<CreateClientResponse>)> {
	require_permission(&state, &ctx, perm::TENANT_MANAGE_CLIENTS, tenant_id).await?;

	let (secret_hash, client_secret) = match body.kind {
		ClientKind::Confidential => {
			let secret = random_token(SECRET_ENTROPY_BYTES);
			(Some(fingerprint(&secret)), Some(secret))
		}
		ClientKind::Public => (None, None),
	};

	let client = OAuthClient {
		id: ClientId::new(),
		tenant_id,
		kind: body.kind,
		name: body.name,
		secret_hash,
		redirect_uris: body.redirect_uris,
		scopes: body.scopes,
		grant_types: body.grant_types.unwrap_or_else(|| vec![GrantType::AuthorizationCode, GrantType::RefreshToken]),
		response_types: vec!["code".to_string()],
		token_endpoint_auth_method: body.token_endpoint_auth_method.unwrap_or(TokenEndpointAuthMethod::ClientSecretBasic),
		access_token_ttl_seconds: body.access_token_ttl_seconds.unwrap_or(DEFAULT_ACCESS_TOKEN_TTL_SECONDS),
		refresh_token_ttl_seconds: body.refresh_token_ttl_seconds.unwrap_or(DEFAULT_REFRESH_TOKEN_TTL_SECONDS),
		id_token_ttl_seconds: body.id_token_ttl_seconds.unwrap_or(DEFAULT_ID_TOKEN_TTL_SECONDS),
		is_active: true,
		created_at: Timestamp::now(),
	};

	let created = state.repositories().clients().create_client(client).await?;
	Ok((StatusCode::CREATED, Json(CreateClientResponse { client: created.into(), client_secret })))
}

pub async fn list(
	State(state): State<AppState>,
	AdminAuth(ctx): AdminAuth,
	Path(tenant_id): Path<TenantId>,
	Query(page): Query<PageQuery>,
) -> ClResult<Json<ApiResponse<Vec<ClientView>>>> {
	require_permission(&state, &ctx, perm::TENANT_VIEW, tenant_id).await?;

	let (clients, total) = state.repositories().clients().list_clients(tenant_id, page.limit(), page.offset()).await?;
	let data = clients.into_iter().map(ClientView::from).collect();
	Ok(Json(ApiResponse::paginated(data, PaginationInfo { total, limit: page.limit(), offset: page.offset() })))
}

pub async fn update(
	State(state): State<AppState>,
	AdminAuth(ctx): AdminAuth,
	Path((tenant_id, client_id)): Path<(TenantId, ClientId)>,
	Json(body): Json<UpdateClientRequest>,
) -> ClResult<Json<ClientView>> {
	require_permission(&state, &ctx, perm::TENANT_MANAGE_CLIENTS, tenant_id).await?;

	let repo = state.repositories();
	let mut client = repo.clients().get_client(client_id).await?;
	if let Patch::Value(name) = body.name {
		client.name = name;
	}
	if let Patch::Value(redirect_uris) = body.redirect_uris {
		client.redirect_uris = redirect_uris;
	}
	if let Patch::Value(scopes) = body.scopes {
		client.scopes = scopes;
	}
	if let Patch::Value(is_active) = body.is_active {
		client.is_active = is_active;
	}
	let updated = repo.clients().update_client(client).await?;
	Ok(Json(updated.into()))
}

pub async fn delete(
	State(state): State<AppState>,
	AdminAuth(ctx): AdminAuth,
	Path((tenant_id, client_id)): Path<(TenantId, ClientId)>,
) -> ClResult<StatusCode> {
	require_permission(&state, &ctx, perm::TENANT_MANAGE_CLIENTS, tenant_id).await?;
	state.repositories().clients().delete_client(client_id).await?;
	Ok(StatusCode::NO_CONTENT)
}

// vim: ts=4
