//! Handlebars setup for the one server-rendered surface this binary has:
//! the login form shown when a browser hits `/oauth2/authorize` without a
//! live session. There is no consent screen — see `DESIGN.md`.

use handlebars::Handlebars;
use ot_types::prelude::{ClResult, Error};

const LOGIN_TEMPLATE: &str = include_str!("templates/login.hbs");

/// Templates are compiled from `include_str!` constants rather than read
/// from disk at startup the way the teacher's `TemplateEngine` walks a
/// directory — this binary ships a single page, so embedding it removes a
/// runtime file-not-found failure mode for no loss of flexibility.
pub fn build() -> ClResult<Handlebars<'static>> {
	let mut handlebars = Handlebars::new();
	handlebars.set_strict_mode(true);
	handlebars
		.register_template_string("login", LOGIN_TEMPLATE)
		.map_err(|err| Error::ConfigError(format!("failed to register login template: {err}")))?;
	Ok(handlebars)
}

// vim: ts=4
