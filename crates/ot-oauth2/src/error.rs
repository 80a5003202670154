//! The protocol error vocabulary (RFC 6749 §5.2 / §4.1.2.1 code set).
//! Deliberately separate from [`ot_types::error::Error`]'s
//! `IntoResponse` impl: this one's wire shape is a JSON error object with
//! an optional `state`, and authorize-step failures need the same fields
//! echoed onto a redirect's query string instead of a response body —
//! two different renderings of one error value, not two error types.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

/// RFC 6749 §5.2 / §4.1.2.1 error codes, restricted to the subset this
/// server's endpoints actually emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthErrorCode {
	InvalidRequest,
	InvalidClient,
	InvalidGrant,
	UnauthorizedClient,
	UnsupportedGrantType,
	UnsupportedResponseType,
	InvalidScope,
	ServerError,
	TemporarilyUnavailable,
}

impl OAuthErrorCode {
	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			Self::InvalidRequest => "invalid_request",
			Self::InvalidClient => "invalid_client",
			Self::InvalidGrant => "invalid_grant",
			Self::UnauthorizedClient => "unauthorized_client",
			Self::UnsupportedGrantType => "unsupported_grant_type",
			Self::UnsupportedResponseType => "unsupported_response_type",
			Self::InvalidScope => "invalid_scope",
			Self::ServerError => "server_error",
			Self::TemporarilyUnavailable => "temporarily_unavailable",
		}
	}

	#[must_use]
	pub fn status(self) -> StatusCode {
		match self {
			Self::InvalidClient => StatusCode::UNAUTHORIZED,
			Self::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
			Self::TemporarilyUnavailable => StatusCode::SERVICE_UNAVAILABLE,
			_ => StatusCode::BAD_REQUEST,
		}
	}
}

/// A protocol failure. `state` is carried along so an authorize-step
/// handler can echo it back on the error redirect; token-endpoint
/// handlers simply drop it since RFC 6749 doesn't define `state` for the
/// token response.
#[derive(Debug, Clone)]
pub struct OAuthError {
	pub code: OAuthErrorCode,
	pub description: String,
	pub state: Option<String>,
}

impl OAuthError {
	#[must_use]
	pub fn new(code: OAuthErrorCode, description: impl Into<String>) -> Self {
		Self { code, description: description.into(), state: None }
	}

	#[must_use]
	pub fn with_state(mut self, state: Option<String>) -> Self {
		self.state = state;
		self
	}

	#[must_use]
	pub fn invalid_grant(description: impl Into<String>) -> Self {
		Self::new(OAuthErrorCode::InvalidGrant, description)
	}

	#[must_use]
	pub fn invalid_client(description: impl Into<String>) -> Self {
		Self::new(OAuthErrorCode::InvalidClient, description)
	}

	#[must_use]
	pub fn invalid_request(description: impl Into<String>) -> Self {
		Self::new(OAuthErrorCode::InvalidRequest, description)
	}

	#[must_use]
	pub fn invalid_scope(description: impl Into<String>) -> Self {
		Self::new(OAuthErrorCode::InvalidScope, description)
	}

	/// Query-string pairs for an authorize-step redirect: `error`,
	/// `error_description`, and `state` when present. Never includes a
	/// `error_uri` — this deployment doesn't publish one.
	#[must_use]
	pub fn redirect_pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = vec![("error", self.code.as_str().to_string()), ("error_description", self.description.clone())];
		if let Some(state) = &self.state {
			pairs.push(("state", state.clone()));
		}
		pairs
	}
}

impl std::fmt::Display for OAuthError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}: {}", self.code.as_str(), self.description)
	}
}

impl std::error::Error for OAuthError {}

#[derive(Debug, Serialize)]
struct OAuthErrorBody {
	error: &'static str,
	error_description: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	state: Option<String>,
}

impl IntoResponse for OAuthError {
	fn into_response(self) -> axum::response::Response {
		let status = self.code.status();
		let body =
			OAuthErrorBody { error: self.code.as_str(), error_description: self.description, state: self.state };
		(status, Json(body)).into_response()
	}
}

impl From<ot_types::error::Error> for OAuthError {
	fn from(err: ot_types::error::Error) -> Self {
		match err {
			ot_types::error::Error::NotFound => Self::invalid_grant("resource not found"),
			ot_types::error::Error::Unauthorized | ot_types::error::Error::PermissionDenied => {
				Self::invalid_client("client authentication failed")
			}
			ot_types::error::Error::ValidationError(msg) => Self::invalid_request(msg),
			other => {
				tracing::warn!("oauth2 engine internal error: {other}");
				Self::new(OAuthErrorCode::ServerError, "internal error")
			}
		}
	}
}

// vim: ts=4
