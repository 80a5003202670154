//! `POST /oauth2/revoke` (RFC 7009). Looks a presented
//! token up by its SHA-256 fingerprint in both the access and refresh
//! tables — `token_type_hint` is only a lookup-order optimization, never
//! a requirement, since RFC 7009 mandates checking both regardless.
//! Revoking a refresh token cascades to the access token minted
//! alongside it. Unknown tokens return success either way (RFC 7009
//! §2.2: "the authorization server responds with HTTP status code 200").

use ot_crypto::fingerprint::fingerprint;
use ot_types::prelude::ClResult;
use ot_types::repo::TokenRepository;

async fn revoke_if_refresh(tokens: &dyn TokenRepository, hash: &str) -> ClResult<bool> {
	if let Some(refresh) = tokens.get_refresh_token(hash).await? {
		tokens.revoke_token_family(refresh.family_id).await?;
		return Ok(true);
	}
	Ok(false)
}

async fn revoke_if_access(tokens: &dyn TokenRepository, hash: &str) -> ClResult<bool> {
	if tokens.get_access_token(hash).await?.is_some() {
		tokens.revoke_access_token(hash).await?;
		return Ok(true);
	}
	Ok(false)
}

pub async fn revoke(tokens: &dyn TokenRepository, token: &str, token_type_hint: Option<&str>) -> ClResult<()> {
	let hash = fingerprint(token);

	if token_type_hint == Some("refresh_token") {
		if revoke_if_refresh(tokens, &hash).await? {
			return Ok(());
		}
		revoke_if_access(tokens, &hash).await?;
	} else {
		if revoke_if_access(tokens, &hash).await? {
			return Ok(());
		}
		revoke_if_refresh(tokens, &hash).await?;
	}
	Ok(())
}


// vim: ts=4
