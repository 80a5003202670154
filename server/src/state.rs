//! Shared application state handed to every router and extractor.

use std::sync::Arc;

use handlebars::Handlebars;
use ot_adapter_memory::MemoryStore;
use ot_audit::AuditSink;
use ot_crypto::keywrap::MasterKey;
use ot_crypto::worker::WorkerPool;
use ot_types::extract::HasRepositories;
use ot_types::repo::Repositories;

use crate::middleware::rate_limit::RateLimitManager;

/// Cheaply `Clone`: every field is an `Arc` or a `Copy` scalar, so handing
/// a fresh clone to each request (as axum's `State` extractor does) never
/// duplicates the underlying store, worker pool, or key material.
#[derive(Clone)]
pub struct AppState {
	pub store: Arc<MemoryStore>,
	pub worker: Arc<WorkerPool>,
	pub audit: Arc<dyn AuditSink>,
	pub master_key: MasterKey,
	pub issuer: Arc<str>,
	pub cookie_secure: bool,
	pub cookie_http_only: bool,
	pub cookie_same_site: Arc<str>,
	pub rate_limits: Arc<RateLimitManager>,
	pub templates: Arc<Handlebars<'static>>,
}

/// `AppState` itself (not `Arc<AppState>`) carries the impl: `Arc` is a
/// foreign type for a foreign trait from this crate's perspective, so
/// implementing `HasRepositories` on `Arc<AppState>` would violate the
/// orphan rule. Implementing it directly on the local `AppState` avoids
/// that and reads no differently at call sites, since `AppState` is
/// already cheap to clone and pass by value.
impl HasRepositories for AppState {
	fn repositories(&self) -> &dyn Repositories {
		self.store.as_ref()
	}
}

// vim: ts=4
