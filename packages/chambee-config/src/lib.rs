mod error;
mod types;

pub use error::{Error, Result};
pub use types::{CompletionProviderConfig, Config, Conversation, Postgres, Providers, Service, Storage};

use std::{env, fs, path::Path};

pub const API_STYLE_OPENAI_CHAT: &str = "openai_chat";
pub const API_STYLE_GEMINI: &str = "gemini";

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::invalid("service.http_bind", "must be non-empty."));
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::invalid("storage.postgres.dsn", "must be non-empty."));
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::invalid("storage.postgres.pool_max_conns", "must be greater than zero."));
	}
	if cfg.storage.postgres.acquire_timeout_ms == 0 {
		return Err(Error::invalid(
			"storage.postgres.acquire_timeout_ms",
			"must be greater than zero.",
		));
	}

	let completion = &cfg.providers.completion;

	if !matches!(completion.api_style.as_str(), API_STYLE_OPENAI_CHAT | API_STYLE_GEMINI) {
		return Err(Error::invalid(
			"providers.completion.api_style",
			format!("must be one of {API_STYLE_OPENAI_CHAT} or {API_STYLE_GEMINI}."),
		));
	}

	for (field, value) in [
		("providers.completion.api_base", &completion.api_base),
		("providers.completion.path", &completion.path),
		("providers.completion.model", &completion.model),
	] {
		if value.trim().is_empty() {
			return Err(Error::invalid(field, "must be non-empty."));
		}
	}

	if completion.api_key.trim().is_empty() {
		let message = match completion.api_key_env.as_deref() {
			Some(var) => format!("must be non-empty; environment variable {var} is unset or empty."),
			None => "must be non-empty.".to_string(),
		};

		return Err(Error::invalid("providers.completion.api_key", message));
	}
	if !completion.temperature.is_finite() {
		return Err(Error::invalid("providers.completion.temperature", "must be a finite number."));
	}
	if completion.temperature < 0.0 {
		return Err(Error::invalid("providers.completion.temperature", "must be zero or greater."));
	}
	if completion.timeout_ms == 0 {
		return Err(Error::invalid("providers.completion.timeout_ms", "must be greater than zero."));
	}
	if cfg.conversation.max_message_chars == 0 {
		return Err(Error::invalid("conversation.max_message_chars", "must be greater than zero."));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let completion = &mut cfg.providers.completion;

	if completion.api_key.trim().is_empty()
		&& let Some(var) = completion.api_key_env.as_deref()
		&& let Ok(value) = env::var(var)
	{
		completion.api_key = value.trim().to_string();
	}

	cfg.service.cors_allowed_origins.retain(|origin| !origin.trim().is_empty());
}
