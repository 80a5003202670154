//! Convenience re-exports for crates that consume `ot-types` heavily.

pub use crate::error::{ClResult, Error};
pub use crate::ids::{AssignmentId, ClientId, KeyId, RoleId, SessionId, TenantId, UserId};
pub use crate::model::{
	AccessToken, Assignment, AuditEvent, AuthorizationCode, ClientKind, Credential, GrantType, OAuthClient,
	PkceMethod, RefreshToken, Role, RoleScope, Session, SessionNamespace, SigningAlgorithm, SigningKey, Tenant,
	TokenEndpointAuthMethod, User,
};
pub use crate::repo::{
	AuditRepository, AuthorizationCodeRepository, ClientRepository, IdentityRepository, RbacRepository,
	Repositories, SessionRepository, SigningKeyRepository, TenantRepository, TokenRepository,
};
pub use crate::types::{ApiResponse, PaginationInfo, Patch, Timestamp};

// vim: ts=4
