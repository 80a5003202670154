//! Token minting and the two grant types this engine supports:
//! `authorization_code` (with PKCE and single-use/replay enforcement)
//! and `refresh_token` (with rotation). Every bearer string here is
//! returned to the caller exactly once, in plaintext, and persisted only
//! as its SHA-256 fingerprint.

use ot_crypto::fingerprint::{fingerprint, random_token};
use ot_types::ids::{ClientId, TenantId, UserId};
use ot_types::model::{AccessToken, AuthorizationCode, OAuthClient, RefreshToken};
use ot_types::repo::{AuthorizationCodeRepository, ConsumeOutcome, TokenRepository};
use ot_types::types::Timestamp;
use uuid::Uuid;

use crate::error::OAuthError;
use crate::pkce;
use crate::scope;

/// Bytes of entropy in a minted bearer token, before base64url encoding.
const TOKEN_ENTROPY_BYTES: usize = 32;

pub struct MintedPair {
	pub access_token: String,
	pub access_token_expires_at: Timestamp,
	pub refresh_token: Option<String>,
}

/// The `authorization_code` grant: consumes `code` via the repository's
/// atomic compare-and-set, validates it against the presented
/// client/redirect_uri/PKCE verifier, and on success mints a fresh
/// access token (and, if the code's scope allows refreshing, a refresh
/// token in a new family). A replayed code (already consumed by an
/// earlier presentation) revokes every token that first presentation
/// ever minted.
pub async fn redeem_authorization_code(
	codes: &dyn AuthorizationCodeRepository,
	tokens: &dyn TokenRepository,
	client: &OAuthClient,
	code: &str,
	redirect_uri: &str,
	code_verifier: Option<&str>,
) -> Result<(AuthorizationCode, MintedPair), OAuthError> {
	let consumed = codes.consume_code(code).await.map_err(OAuthError::from)?;

	let record = match consumed {
		ConsumeOutcome::NotFound => return Err(OAuthError::invalid_grant("unknown or expired authorization code")),
		ConsumeOutcome::AlreadyUsed => {
			tracing::warn!(code = %code, "authorization code replay detected, revoking derived tokens");
			tokens.revoke_tokens_by_source_code(code).await.map_err(OAuthError::from)?;
			return Err(OAuthError::invalid_grant("authorization code has already been used"));
		}
		ConsumeOutcome::Consumed(record) => record,
	};

	if record.expires_at.is_past() {
		return Err(OAuthError::invalid_grant("authorization code has expired"));
	}
	if record.client_id != client.id {
		return Err(OAuthError::invalid_grant("authorization code was not issued to this client"));
	}
	if record.redirect_uri != redirect_uri {
		return Err(OAuthError::invalid_grant("redirect_uri does not match the one used at authorize time"));
	}

	match (&record.code_challenge, &record.code_challenge_method) {
		(Some(challenge), Some(method)) => {
			let verifier = code_verifier.ok_or_else(|| OAuthError::invalid_grant("code_verifier is required"))?;
			if !pkce::verify(*method, verifier, challenge) {
				return Err(OAuthError::invalid_grant("code_verifier does not match code_challenge"));
			}
		}
		(None, None) => {}
		_ => return Err(OAuthError::invalid_grant("malformed authorization code")),
	}

	let pair = mint_pair(
		tokens,
		client,
		record.tenant_id,
		record.user_id,
		&record.scopes,
		Some(code.to_string()),
		None,
	)
	.await
	.map_err(OAuthError::from)?;

	Ok((record, pair))
}

/// The `refresh_token` grant: validates the presented token, revokes it
/// (rotation), and mints a fresh pair in the same token family so a
/// reused, already-rotated refresh token can be traced back and its
/// whole family revoked.
pub async fn rotate_refresh_token(
	tokens: &dyn TokenRepository,
	client: &OAuthClient,
	presented_refresh_token: &str,
) -> Result<MintedPair, OAuthError> {
	let token_hash = fingerprint(presented_refresh_token);
	let existing = tokens.get_refresh_token(&token_hash).await.map_err(OAuthError::from)?;
	let existing = existing.ok_or_else(|| OAuthError::invalid_grant("unknown refresh token"))?;

	if existing.client_id != client.id {
		return Err(OAuthError::invalid_grant("refresh token was not issued to this client"));
	}
	if existing.revoked_at.is_some() || existing.expires_at.is_past() {
		return Err(OAuthError::invalid_grant("refresh token is revoked or expired"));
	}
	if existing.consumed_at.is_some() {
		// Reuse of an already-rotated token: the whole family is compromised.
		tracing::warn!(family_id = %existing.family_id, "refresh token reuse detected, revoking family");
		tokens.revoke_token_family(existing.family_id).await.map_err(OAuthError::from)?;
		return Err(OAuthError::invalid_grant("refresh token has already been used"));
	}

	tokens.consume_refresh_token(&token_hash).await.map_err(OAuthError::from)?;
	// Rotating a refresh token revokes the access token minted alongside
	// it too, not just the refresh token itself.
	tokens.revoke_access_token(&existing.paired_access_token_hash).await.map_err(OAuthError::from)?;

	mint_pair(
		tokens,
		client,
		existing.tenant_id,
		existing.user_id,
		&existing.scopes,
		existing.source_code.clone(),
		Some(existing.family_id),
	)
	.await
	.map_err(OAuthError::from)
}

async fn mint_pair(
	tokens: &dyn TokenRepository,
	client: &OAuthClient,
	tenant_id: TenantId,
	user_id: UserId,
	scopes: &[String],
	source_code: Option<String>,
	family_id: Option<Uuid>,
) -> ot_types::error::ClResult<MintedPair> {
	let now = Timestamp::now();
	let access_plaintext = random_token(TOKEN_ENTROPY_BYTES);
	let access_hash = fingerprint(&access_plaintext);
	let access_expires_at = now.add_seconds(client.access_token_ttl_seconds);
	tokens
		.store_access_token(AccessToken {
			token_hash: access_hash.clone(),
			client_id: client.id,
			tenant_id,
			user_id,
			scopes: scopes.to_vec(),
			created_at: now,
			expires_at: access_expires_at,
			revoked_at: None,
			source_code: source_code.clone(),
		})
		.await?;

	let refresh_plaintext = if client.refresh_token_ttl_seconds > 0 {
		let plaintext = random_token(TOKEN_ENTROPY_BYTES);
		tokens
			.store_refresh_token(RefreshToken {
				token_hash: fingerprint(&plaintext),
				family_id: family_id.unwrap_or_else(Uuid::new_v4),
				client_id: client.id,
				tenant_id,
				user_id,
				scopes: scopes.to_vec(),
				paired_access_token_hash: access_hash,
				source_code,
				created_at: now,
				expires_at: now.add_seconds(client.refresh_token_ttl_seconds),
				consumed_at: None,
				revoked_at: None,
			})
			.await?;
		Some(plaintext)
	} else {
		None
	};

	Ok(MintedPair { access_token: access_plaintext, access_token_expires_at: access_expires_at, refresh_token: refresh_plaintext })
}

#[must_use]
pub fn scope_string(scopes: &[String]) -> String {
	scope::join(scopes)
}


// vim: ts=4
