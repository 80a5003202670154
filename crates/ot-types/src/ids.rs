//! Newtype identifiers. Every entity id is a distinct type so a tenant id
//! can never be passed where a user id is expected — the compiler catches
//! what a stringly-typed id would let slide into a log line or a query.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
	($name:ident) => {
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(pub Uuid);

		impl $name {
			#[must_use]
			pub fn new() -> Self {
				Self(Uuid::new_v4())
			}
		}

		impl Default for $name {
			fn default() -> Self {
				Self::new()
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl std::str::FromStr for $name {
			type Err = uuid::Error;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Ok(Self(Uuid::parse_str(s)?))
			}
		}
	};
}

uuid_id!(TenantId);
uuid_id!(UserId);
uuid_id!(RoleId);
uuid_id!(AssignmentId);
uuid_id!(ClientId);
uuid_id!(KeyId);

/// Server-side session id: 32 random bytes, base64url-encoded by
/// `ot-session`. Opaque to every consumer but the session store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

// vim: ts=4
