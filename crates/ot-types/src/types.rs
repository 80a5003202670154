//! Small ambient helpers used across the whole workspace: a UTC timestamp
//! newtype, a tri-state patch value for partial updates, and the envelope
//! shapes the management plane wraps every response in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
	#[must_use]
	pub fn now() -> Self {
		Self(Utc::now().timestamp())
	}

	#[must_use]
	pub fn from_now(delta_seconds: i64) -> Self {
		Self(Utc::now().timestamp() + delta_seconds)
	}

	#[must_use]
	pub fn add_seconds(self, seconds: i64) -> Self {
		Self(self.0 + seconds)
	}

	#[must_use]
	pub fn is_past(self) -> bool {
		self.0 < Utc::now().timestamp()
	}

	#[must_use]
	pub fn to_chrono(self) -> Option<DateTime<Utc>> {
		DateTime::from_timestamp(self.0, 0)
	}
}

/// A field that can be left alone, cleared, or set to a new value — the
/// difference between "absent from the request body" and "present and
/// null" that a plain `Option<T>` cannot express.
#[derive(Debug, Clone, Default)]
pub enum Patch<T> {
	#[default]
	Undefined,
	Null,
	Value(T),
}

impl<T> Patch<T> {
	#[must_use]
	pub fn is_undefined(&self) -> bool {
		matches!(self, Patch::Undefined)
	}

	pub fn into_option(self) -> Option<T> {
		match self {
			Patch::Undefined | Patch::Null => None,
			Patch::Value(v) => Some(v),
		}
	}
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Option::<T>::deserialize(deserializer).map(|opt| match opt {
			Some(v) => Patch::Value(v),
			None => Patch::Null,
		})
	}
}

impl<T: Serialize> Serialize for Patch<T> {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		match self {
			Patch::Undefined | Patch::Null => serializer.serialize_none(),
			Patch::Value(v) => v.serialize(serializer),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationInfo {
	pub total: u64,
	pub limit: u32,
	pub offset: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
	pub data: T,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub pagination: Option<PaginationInfo>,
}

impl<T> ApiResponse<T> {
	#[must_use]
	pub fn new(data: T) -> Self {
		Self { data, pagination: None }
	}

	#[must_use]
	pub fn paginated(data: T, pagination: PaginationInfo) -> Self {
		Self { data, pagination: Some(pagination) }
	}
}

// vim: ts=4
