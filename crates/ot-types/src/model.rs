//! The data model. Every field here is something a repository adapter
//! persists; nothing in this module knows how it is stored.

use crate::ids::{AssignmentId, ClientId, KeyId, RoleId, SessionId, TenantId, UserId};
use crate::types::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
	pub id: TenantId,
	pub name: String,
	pub created_at: Timestamp,
	pub suspended: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
	pub id: UserId,
	pub tenant_id: TenantId,
	pub email: String,
	pub display_name: String,
	pub created_at: Timestamp,
	pub disabled: bool,
}

/// A password credential. `password_hash` is the Argon2id PHC string;
/// the plaintext password is never constructed as a field on this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
	pub user_id: UserId,
	pub password_hash: String,
	pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionNamespace {
	Auth,
	Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
	pub id: SessionId,
	pub namespace: SessionNamespace,
	pub tenant_id: TenantId,
	pub user_id: UserId,
	pub created_at: Timestamp,
	pub expires_at: Timestamp,
	pub idle_expires_at: Timestamp,
}

/// Scope a role's permissions are evaluated within. `Platform` roles are
/// tenant-independent (there is exactly one platform); `Tenant` roles
/// apply to a single tenant; `Client` roles scope a machine identity to
/// the set of operations its client registration was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleScope {
	Platform,
	Tenant,
	Client,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
	pub id: RoleId,
	pub name: String,
	pub scope: RoleScope,
	pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
	pub id: AssignmentId,
	pub user_id: UserId,
	pub tenant_id: TenantId,
	pub role_id: RoleId,
	pub granted_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientKind {
	Confidential,
	Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrantType {
	AuthorizationCode,
	RefreshToken,
}

/// The token endpoint supports exactly these two client authentication
/// methods; `None` is reserved for public clients, which authenticate
/// only via PKCE and never present a secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenEndpointAuthMethod {
	ClientSecretBasic,
	ClientSecretPost,
	None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthClient {
	pub id: ClientId,
	pub tenant_id: TenantId,
	pub kind: ClientKind,
	pub name: String,
	/// SHA-256 hex digest of the client secret. `None` for public clients.
	pub secret_hash: Option<String>,
	pub redirect_uris: Vec<String>,
	pub scopes: Vec<String>,
	pub grant_types: Vec<GrantType>,
	/// Discovery only ever advertises `"code"`; stored per client anyway
	/// since a registration could in principle narrow it.
	pub response_types: Vec<String>,
	pub token_endpoint_auth_method: TokenEndpointAuthMethod,
	pub access_token_ttl_seconds: i64,
	pub refresh_token_ttl_seconds: i64,
	pub id_token_ttl_seconds: i64,
	pub is_active: bool,
	pub created_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PkceMethod {
	Plain,
	S256,
}

/// A single-use authorization code issued at the end of the authorize
/// step. `consumed_at` being set is what makes redemption single-use;
/// a second redemption attempt after that point is a replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationCode {
	pub code: String,
	pub client_id: ClientId,
	pub tenant_id: TenantId,
	pub user_id: UserId,
	pub redirect_uri: String,
	pub scopes: Vec<String>,
	pub code_challenge: Option<String>,
	pub code_challenge_method: Option<PkceMethod>,
	pub nonce: Option<String>,
	pub created_at: Timestamp,
	pub expires_at: Timestamp,
	pub consumed_at: Option<Timestamp>,
}

/// Access tokens are bearer-opaque to clients; only their SHA-256 digest
/// is persisted, mirroring how secrets are handled everywhere else in
/// this codebase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
	pub token_hash: String,
	pub client_id: ClientId,
	pub tenant_id: TenantId,
	pub user_id: UserId,
	pub scopes: Vec<String>,
	pub created_at: Timestamp,
	pub expires_at: Timestamp,
	pub revoked_at: Option<Timestamp>,
	/// The authorization code this token was minted from, `None` when
	/// minted by a refresh-token rotation. Lets replay defense find and
	/// revoke every token a single code redemption ever produced.
	pub source_code: Option<String>,
}

/// Refresh tokens rotate on every use: redeeming one mints a new refresh
/// token and marks this one consumed, carrying `rotated_from` forward so
/// reuse of a stale token in the same family can be detected and the
/// whole family revoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshToken {
	pub token_hash: String,
	pub family_id: uuid::Uuid,
	pub client_id: ClientId,
	pub tenant_id: TenantId,
	pub user_id: UserId,
	pub scopes: Vec<String>,
	/// Hash of the access token minted in the same call as this refresh
	/// token — lets rotation and family revocation reach that exact
	/// access token directly, without scanning every access token a user
	/// or client ever held.
	pub paired_access_token_hash: String,
	/// The authorization code this token's family was first minted from,
	/// if any. Lets replay-driven revocation reach refresh tokens the
	/// same way it reaches access tokens, even after rotation has moved
	/// them to a new `token_hash`.
	pub source_code: Option<String>,
	pub created_at: Timestamp,
	pub expires_at: Timestamp,
	pub consumed_at: Option<Timestamp>,
	pub revoked_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SigningAlgorithm {
	Rs256,
}

/// An RS256 signing keypair. The private key is AES-wrapped at rest
/// under the server's master key; only `public_key_pem` and `kid` are
/// ever exposed through the JWKS endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningKey {
	pub kid: KeyId,
	pub algorithm: SigningAlgorithm,
	pub public_key_pem: String,
	pub wrapped_private_key: Vec<u8>,
	pub created_at: Timestamp,
	pub expires_at: Option<Timestamp>,
	pub retired: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
	pub id: uuid::Uuid,
	pub tenant_id: Option<TenantId>,
	pub actor_user_id: Option<UserId>,
	pub action: String,
	pub outcome: String,
	pub detail: serde_json::Value,
	pub at: Timestamp,
}

// vim: ts=4
