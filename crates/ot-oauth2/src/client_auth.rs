//! Client authentication at the token endpoint: either
//! `client_secret_basic` (HTTP Basic) or `client_secret_post` (form
//! fields), compared as `SHA-256(secret)` against the stored fingerprint.
//! Public clients carry no secret and authenticate only through PKCE.

use ot_crypto::fingerprint::fingerprint;
use ot_types::ids::ClientId;
use ot_types::model::{ClientKind, OAuthClient};
use ot_types::repo::ClientRepository;

use crate::error::OAuthError;

/// Loads the client and, for confidential clients, verifies `secret`
/// against the stored fingerprint. Any failure collapses to
/// `invalid_client` so a caller can never distinguish "no such client"
/// from "wrong secret."
pub async fn authenticate_client(
	repo: &dyn ClientRepository,
	client_id: ClientId,
	secret: Option<&str>,
) -> Result<OAuthClient, OAuthError> {
	let client = repo.get_client(client_id).await.map_err(|_| OAuthError::invalid_client("unknown client"))?;

	if !client.is_active {
		return Err(OAuthError::invalid_client("client is not active"));
	}

	match client.kind {
		ClientKind::Public => Ok(client),
		ClientKind::Confidential => {
			let expected = client.secret_hash.as_deref().ok_or_else(|| OAuthError::invalid_client("client misconfigured"))?;
			let presented = secret.ok_or_else(|| OAuthError::invalid_client("client secret required"))?;
			if fingerprint(presented) == expected {
				Ok(client)
			} else {
				Err(OAuthError::invalid_client("client authentication failed"))
			}
		}
	}
}


// vim: ts=4
