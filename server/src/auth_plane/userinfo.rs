use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use ot_oauth2::userinfo::{build_claims, UserInfoClaims, UserInfoInput};
use ot_rbac::RbacAuthority;
use ot_types::extract::HasRepositories;
use ot_types::prelude::{ClResult, Error};

use crate::auth_plane::resolve_bearer_token;
use crate::state::AppState;

pub async fn userinfo(State(state): State<AppState>, headers: HeaderMap) -> ClResult<Json<UserInfoClaims>> {
	let token = resolve_bearer_token(&headers, &state).await?;
	let repo = state.repositories();

	let user = repo.identities().get_user(token.tenant_id, token.user_id).await.map_err(|_| Error::Unauthorized)?;
	let rbac = RbacAuthority::new(repo.rbac());
	let roles = rbac.roles_for_user(token.tenant_id, token.user_id).await?;

	Ok(Json(build_claims(UserInfoInput {
		subject: &user.id.to_string(),
		scopes: &token.scopes,
		email: &user.email,
		name: &user.display_name,
		roles: roles.into_iter().map(|role| role.name).collect(),
	})))
}

// vim: ts=4
