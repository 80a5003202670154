//! The audit sink: every security-relevant state transition in the
//! identity, session, RBAC, and OAuth2 crates writes through an
//! [`AuditSink`], with redaction of sensitive detail fields applied
//! centrally before a sink ever sees them.

use async_trait::async_trait;
use ot_types::ids::{TenantId, UserId};
use ot_types::model::AuditEvent;
use ot_types::prelude::ClResult;
use ot_types::types::Timestamp;
use serde_json::{Map, Value};
use std::sync::Mutex;

/// Keys whose values are replaced by `[REDACTED]` before a sink ever sees
/// them. Case-insensitive substring match on the key.
const DENYLIST: &[&str] = &["secret", "password", "token", "key", "authorization"];

/// Walks `metadata` and blanks any key whose lowercased form contains a
/// denylisted substring. Applied once, centrally, so individual call
/// sites can never forget it.
pub fn redact(metadata: &mut Map<String, Value>) {
	for (key, value) in metadata.iter_mut() {
		let lower = key.to_lowercase();
		if DENYLIST.iter().any(|d| lower.contains(d)) {
			*value = Value::String("[REDACTED]".to_string());
		}
	}
}

#[async_trait]
pub trait AuditSink: Send + Sync {
	async fn record(&self, event: AuditEvent);
}

/// Builds an [`AuditEvent`] with redaction already applied and hands it to
/// a sink. Sink failures are logged at `warn` and never surfaced to the
/// caller — an audit sink going down must never fail the operation it's
/// observing.
pub async fn emit(
	sink: &dyn AuditSink,
	tenant_id: Option<TenantId>,
	actor_user_id: Option<UserId>,
	action: &str,
	outcome: &str,
	mut detail: Map<String, Value>,
) {
	redact(&mut detail);
	let event = AuditEvent {
		id: uuid::Uuid::new_v4(),
		tenant_id,
		actor_user_id,
		action: action.to_string(),
		outcome: outcome.to_string(),
		detail: Value::Object(detail),
		at: Timestamp::now(),
	};
	sink.record(event).await;
}

/// Writes one structured `tracing` event per audit event. This is the
/// sink a production deployment wires by default — persistence of audit
/// events into durable storage is an external collaborator's job; this
/// just guarantees every event reaches the log stream.
#[derive(Debug, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
	async fn record(&self, event: AuditEvent) {
		tracing::info!(
			audit = true,
			event_id = %event.id,
			tenant_id = event.tenant_id.map(|t| t.to_string()),
			actor_user_id = event.actor_user_id.map(|u| u.to_string()),
			action = %event.action,
			outcome = %event.outcome,
			detail = %event.detail,
			"audit event"
		);
	}
}

/// Captures events in memory for assertions in tests.
#[derive(Default)]
pub struct InMemoryAuditSink {
	events: Mutex<Vec<AuditEvent>>,
}

impl InMemoryAuditSink {
	#[must_use]
	pub fn events(&self) -> Vec<AuditEvent> {
		self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
	}

	#[must_use]
	pub fn contains_action(&self, action: &str) -> bool {
		self.events.lock().unwrap_or_else(|e| e.into_inner()).iter().any(|e| e.action == action)
	}
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
	async fn record(&self, event: AuditEvent) {
		self.events.lock().unwrap_or_else(|e| e.into_inner()).push(event);
	}
}

// Audit events implementing `ClResult` plumbing isn't needed today since
// `record` cannot fail by construction; kept as a type alias so call
// sites that want to propagate a future fallible sink don't need to
// change their signature.
pub type AuditResult = ClResult<()>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn redacts_keys_matching_the_denylist_case_insensitively() {
		let mut metadata = Map::new();
		metadata.insert("client_secret".into(), json!("shh"));
		metadata.insert("Password".into(), json!("hunter2"));
		metadata.insert("Authorization".into(), json!("Bearer abc"));
		metadata.insert("email".into(), json!("alice@acme.local"));

		redact(&mut metadata);

		assert_eq!(metadata["client_secret"], json!("[REDACTED]"));
		assert_eq!(metadata["Password"], json!("[REDACTED]"));
		assert_eq!(metadata["Authorization"], json!("[REDACTED]"));
		assert_eq!(metadata["email"], json!("alice@acme.local"));
	}

	#[tokio::test]
	async fn emit_writes_a_redacted_event_to_the_sink() {
		let sink = InMemoryAuditSink::default();
		let mut detail = Map::new();
		detail.insert("token".into(), json!("super-secret-value"));

		emit(&sink, None, None, "platform_admin_bootstrapped", "success", detail).await;

		let events = sink.events();
		assert_eq!(events.len(), 1);
		assert_eq!(events[0].action, "platform_admin_bootstrapped");
		assert_eq!(events[0].detail["token"], json!("[REDACTED]"));
	}
}

// vim: ts=4
