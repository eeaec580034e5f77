mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	ChatProviderConfig, ChatProviderKind, Config, Journal, MAX_CONTEXT_ENTRIES, MaxTokens,
	Postgres, Providers, Security, Service, Storage,
};

use std::{fs, path::Path};

use jiff::tz::TimeZone;

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
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	let chat = &cfg.providers.chat;

	for (label, value) in [
		("providers.chat.provider_id", &chat.provider_id),
		("providers.chat.api_base", &chat.api_base),
		("providers.chat.api_key", &chat.api_key),
		("providers.chat.model", &chat.model),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if !chat.api_base.starts_with("http://") && !chat.api_base.starts_with("https://") {
		return Err(Error::Validation {
			message: "providers.chat.api_base must start with http:// or https://.".to_string(),
		});
	}
	if chat.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.chat.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if chat.connect_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.chat.connect_timeout_ms must be greater than zero.".to_string(),
		});
	}

	validate_temperature("providers.chat.temperature", chat.temperature)?;
	validate_temperature("journal.summary_temperature", cfg.journal.summary_temperature)?;

	let journal = &cfg.journal;

	if journal.context_entries == 0 || journal.context_entries > MAX_CONTEXT_ENTRIES {
		return Err(Error::Validation {
			message: format!("journal.context_entries must be in the range 1-{MAX_CONTEXT_ENTRIES}."),
		});
	}
	if journal.prompt_excerpt_chars == 0 {
		return Err(Error::Validation {
			message: "journal.prompt_excerpt_chars must be greater than zero.".to_string(),
		});
	}
	if journal.summary_input_chars == 0 {
		return Err(Error::Validation {
			message: "journal.summary_input_chars must be greater than zero.".to_string(),
		});
	}
	if journal.max_page_size == 0 {
		return Err(Error::Validation {
			message: "journal.max_page_size must be greater than zero.".to_string(),
		});
	}
	if journal.no_entries_response.trim().is_empty() {
		return Err(Error::Validation {
			message: "journal.no_entries_response must be non-empty.".to_string(),
		});
	}
	if TimeZone::get(&journal.default_timezone).is_err() {
		return Err(Error::Validation {
			message: format!(
				"journal.default_timezone {:?} is not a known IANA time zone.",
				journal.default_timezone
			),
		});
	}

	for (label, value) in [
		("journal.max_tokens.chat", journal.max_tokens.chat),
		("journal.max_tokens.prompts", journal.max_tokens.prompts),
		("journal.max_tokens.suggestion", journal.max_tokens.suggestion),
		("journal.max_tokens.summary", journal.max_tokens.summary),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	Ok(())
}

fn validate_temperature(label: &str, value: f32) -> Result<()> {
	if !value.is_finite() {
		return Err(Error::Validation { message: format!("{label} must be a finite number.") });
	}
	if !(0.0..=2.0).contains(&value) {
		return Err(Error::Validation {
			message: format!("{label} must be in the range 0.0-2.0."),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.security.api_auth_token.as_deref().map(|token| token.trim().is_empty()).unwrap_or(false)
	{
		cfg.security.api_auth_token = None;
	}

	let chat = &mut cfg.providers.chat;

	chat.api_base = chat.api_base.trim().trim_end_matches('/').to_string();

	if !chat.path.is_empty() && !chat.path.starts_with('/') {
		chat.path = format!("/{}", chat.path);
	}
}
