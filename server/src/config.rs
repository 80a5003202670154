//! Environment-sourced configuration. Fails fast at startup rather than
//! lazily at first use — a misconfigured deployment should never accept
//! its first connection.

use ot_types::ids::TenantId;
use ot_types::prelude::{ClResult, Error};

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn require_env(name: &str) -> ClResult<String> {
	env_var(name).ok_or_else(|| Error::ConfigError(format!("{name} is required but not set")))
}

pub struct Settings {
	pub port: u16,
	pub issuer: String,
	pub log_level: String,
	pub master_key_b64: String,
	pub session_cookie_secure: bool,
	pub session_cookie_http_only: bool,
	pub session_cookie_same_site: String,
	pub bootstrap_admin_email: Option<String>,
	pub bootstrap_admin_tenant_id: Option<TenantId>,
}

impl Settings {
	/// Reads every `OT_*` variable this binary understands. `OT_MASTER_KEY`
	/// and `ISSUER` are the only two that fail startup outright when
	/// missing; everything else falls back to a typed default. `DB_*`
	/// variables (`DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`, `DB_PASSWORD`)
	/// are read by nothing in this binary — they exist as the extension
	/// point a future relational adapter would bind against, and this
	/// in-memory deployment simply ignores them rather than reject an
	/// operator who has already set them up for that adapter.
	pub fn from_env() -> ClResult<Self> {
		let master_key_b64 = require_env("OT_MASTER_KEY")?;
		let issuer = require_env("ISSUER")?;

		let port = env_var("PORT").and_then(|v| v.parse().ok()).unwrap_or(8080);
		let log_level = env_var("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

		let session_cookie_secure = env_var("SESSION_COOKIE_SECURE").map(|v| v != "false").unwrap_or(true);
		let session_cookie_http_only = env_var("SESSION_COOKIE_HTTP_ONLY").map(|v| v != "false").unwrap_or(true);
		let session_cookie_same_site = env_var("SESSION_COOKIE_SAME_SITE").unwrap_or_else(|| "Lax".to_string());

		let bootstrap_admin_email = env_var("OT_BOOTSTRAP_ADMIN_EMAIL");
		let bootstrap_admin_tenant_id = env_var("OT_BOOTSTRAP_ADMIN_TENANT_ID")
			.map(|v| {
				v.parse::<TenantId>()
					.map_err(|_| Error::ConfigError("OT_BOOTSTRAP_ADMIN_TENANT_ID is not a valid UUID".into()))
			})
			.transpose()?;

		Ok(Self {
			port,
			issuer,
			log_level,
			master_key_b64,
			session_cookie_secure,
			session_cookie_http_only,
			session_cookie_same_site,
			bootstrap_admin_email,
			bootstrap_admin_tenant_id,
		})
	}
}

// vim: ts=4
