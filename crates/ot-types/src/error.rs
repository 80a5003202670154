//! Error handling subsystem. A single domain-error enum shared by every
//! crate in the workspace; handlers translate it into whichever wire
//! vocabulary (management JSON or OAuth2 protocol JSON) the endpoint uses.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

pub type ClResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	NotFound,
	PermissionDenied,
	Unauthorized,

	ValidationError(String),
	Conflict(String),
	RateLimited(String),

	ConfigError(String),
	Internal(String),

	Io(std::io::Error),
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{self:?}")
	}
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		tracing::warn!("io error: {}", err);
		Self::Io(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		tracing::warn!("json error: {}", err);
		Self::Internal("serialization failure".into())
	}
}

/// Management-error wire shape: kinds are validation, unauthenticated,
/// forbidden, not_found, conflict, rate_limited, internal.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
	pub error: &'static str,
	pub message: String,
}

impl IntoResponse for Error {
	fn into_response(self) -> axum::response::Response {
		let (status, kind, message) = match self {
			Error::NotFound => (StatusCode::NOT_FOUND, "not_found", "Resource not found".to_string()),
			Error::PermissionDenied => {
				(StatusCode::FORBIDDEN, "forbidden", "You do not have permission to access this resource".to_string())
			}
			Error::Unauthorized => {
				(StatusCode::UNAUTHORIZED, "unauthenticated", "Authentication required".to_string())
			}
			Error::ValidationError(msg) => (StatusCode::BAD_REQUEST, "validation", msg),
			Error::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
			Error::RateLimited(msg) => (StatusCode::TOO_MANY_REQUESTS, "rate_limited", msg),
			Error::ConfigError(msg) => {
				tracing::warn!("config error: {}", msg);
				(StatusCode::INTERNAL_SERVER_ERROR, "internal", "Internal server error".to_string())
			}
			Error::Internal(msg) => {
				tracing::warn!("internal error: {}", msg);
				(StatusCode::INTERNAL_SERVER_ERROR, "internal", "Internal server error".to_string())
			}
			Error::Io(err) => {
				tracing::warn!("io error: {}", err);
				(StatusCode::INTERNAL_SERVER_ERROR, "internal", "Internal server error".to_string())
			}
		};

		(status, Json(ErrorBody { error: kind, message })).into_response()
	}
}

// vim: ts=4
