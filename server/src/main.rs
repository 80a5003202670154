//! Entry point: loads configuration, generates the server's RS256 signing
//! key on first boot, seeds the RBAC catalog and platform admin, and serves
//! both routers behind one listener.

use std::sync::Arc;

use clap::Parser;
use ot_adapter_memory::MemoryStore;
use ot_audit::TracingAuditSink;
use ot_crypto::keywrap::MasterKey;
use ot_crypto::signing::generate_keypair;
use ot_crypto::worker::WorkerPool;
use ot_types::extract::HasRepositories;
use ot_types::model::SigningAlgorithm;
use ot_types::prelude::{ClResult, Error};
use ot_types::repo::Repositories;
use ot_types::types::Timestamp;

use opentrusty_server::config::Settings;
use opentrusty_server::middleware::rate_limit::RateLimitManager;
use opentrusty_server::state::AppState;
use opentrusty_server::{bootstrap, build_router, templates};

/// `--migrate` is accepted and does nothing against this in-memory store.
/// It exists as the extension point a relational adapter's schema
/// migrations would hook into; this deployment has no schema to migrate.
#[derive(Parser, Debug)]
#[command(name = "opentrusty-server")]
struct Cli {
	#[arg(long)]
	migrate: bool,
}

async fn ensure_signing_key(state: &AppState) -> ClResult<()> {
	let repo = state.repositories();
	if repo.signing_keys().active_signing_key().await?.is_some() {
		return Ok(());
	}

	let generated = generate_keypair(state.worker.as_ref()).await?;
	let wrapped_private_key = state.master_key.wrap(&generated.private_key_der)?;

	repo.signing_keys()
		.store_signing_key(ot_types::model::SigningKey {
			kid: generated.kid,
			algorithm: SigningAlgorithm::Rs256,
			public_key_pem: generated.public_key_pem,
			wrapped_private_key,
			created_at: Timestamp::now(),
			expires_at: None,
			retired: false,
		})
		.await?;
	Ok(())
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ClResult<()> {
	let cli = Cli::parse();

	let settings = Settings::from_env()?;

	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::new(settings.log_level.clone()))
		.with_target(false)
		.init();

	if cli.migrate {
		tracing::info!("--migrate has no effect against the in-memory store; nothing to do");
		return Ok(());
	}

	let master_key = MasterKey::from_base64(&settings.master_key_b64)?;
	let templates = templates::build()?;

	let state = AppState {
		store: Arc::new(MemoryStore::new()),
		worker: Arc::new(WorkerPool::new(1, 1, 1)),
		audit: Arc::new(TracingAuditSink),
		master_key,
		issuer: Arc::from(settings.issuer.as_str()),
		cookie_secure: settings.session_cookie_secure,
		cookie_http_only: settings.session_cookie_http_only,
		cookie_same_site: Arc::from(settings.session_cookie_same_site.as_str()),
		rate_limits: Arc::new(RateLimitManager::new()),
		templates: Arc::new(templates),
	};

	ensure_signing_key(&state).await.map_err(|err| {
		tracing::error!(%err, "failed to provision signing key");
		err
	})?;

	// Bootstrap runs to completion before the listener ever accepts, unlike
	// background-scheduled startup tasks elsewhere in this codebase: a
	// request served against a store with an unseeded RBAC catalog would
	// fail every permission check vacuously.
	bootstrap::bootstrap(&state, &settings).await.map_err(|err| {
		tracing::error!(%err, "bootstrap failed");
		err
	})?;

	let router = build_router(state);

	let addr = format!("0.0.0.0:{}", settings.port);
	let listener = tokio::net::TcpListener::bind(&addr)
		.await
		.map_err(|err| Error::Internal(format!("failed to bind {addr}: {err}")))?;
	tracing::info!(%addr, "listening");

	axum::serve(listener, router)
		.with_graceful_shutdown(shutdown_signal())
		.await
		.map_err(|err| Error::Internal(format!("server error: {err}")))?;

	Ok(())
}

async fn shutdown_signal() {
	if tokio::signal::ctrl_c().await.is_err() {
		tracing::error!("failed to install ctrl_c handler");
	}
	tracing::info!("shutdown signal received");
}

// vim: ts=4
