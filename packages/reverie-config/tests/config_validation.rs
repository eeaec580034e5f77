use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use reverie_config::{ChatProviderKind, Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml_with(edit: impl FnOnce(&mut toml::Table)) -> String {
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let root = value.as_table_mut().expect("Template config must be a table.");

	edit(root);

	toml::to_string(&value).expect("Failed to render template config.")
}

fn table<'a>(root: &'a mut toml::Table, path: &[&str]) -> &'a mut toml::Table {
	let mut current = root;

	for key in path {
		current = current
			.get_mut(*key)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Template config must include [{key}]."));
	}

	current
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("reverie_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> reverie_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = reverie_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn base_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse test config.")
}

#[test]
fn sample_config_loads_and_normalizes() {
	let cfg = load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string())
		.expect("Sample config must be valid.");

	assert_eq!(cfg.providers.chat.kind, ChatProviderKind::Gemini);
	assert_eq!(cfg.providers.chat.api_base, "https://generativelanguage.googleapis.com");
	assert_eq!(cfg.providers.chat.path, "/v1beta/models");
	assert_eq!(cfg.providers.chat.connect_timeout_ms, 10_000);
	assert!(cfg.security.api_auth_token.is_none(), "Blank auth token must normalize to None.");
}

#[test]
fn journal_section_defaults_when_absent() {
	let payload = sample_toml_with(|root| {
		root.remove("journal");
	});
	let cfg = load_payload(payload).expect("Config without [journal] must be valid.");

	assert_eq!(cfg.journal.context_entries, 50);
	assert_eq!(cfg.journal.prompt_entries, 2);
	assert_eq!(cfg.journal.max_tokens.chat, 500);
	assert_eq!(cfg.journal.max_tokens.summary, 50);
	assert_eq!(cfg.journal.default_timezone, "UTC");
	assert!(!cfg.journal.no_entries_response.is_empty());
}

#[test]
fn openai_kind_is_accepted() {
	let payload = sample_toml_with(|root| {
		let chat = table(root, &["providers", "chat"]);

		chat.insert("kind".to_string(), Value::String("openai".to_string()));
		chat.insert("path".to_string(), Value::String("/v1/chat/completions".to_string()));
	});
	let cfg = load_payload(payload).expect("OpenAI config must be valid.");

	assert_eq!(cfg.providers.chat.kind, ChatProviderKind::OpenAi);
}

#[test]
fn unknown_provider_kind_fails_to_parse() {
	let payload = sample_toml_with(|root| {
		table(root, &["providers", "chat"])
			.insert("kind".to_string(), Value::String("cohere".to_string()));
	});
	let err = load_payload(payload).expect_err("Expected parse error for unknown kind.");

	assert!(matches!(err, Error::ParseConfig { .. }), "Unexpected error: {err:?}");
}

#[test]
fn context_entries_must_not_exceed_fifty() {
	let mut cfg = base_config();

	cfg.journal.context_entries = 60;

	let err = reverie_config::validate(&cfg).expect_err("Expected context_entries error.");

	assert!(
		err.to_string().contains("journal.context_entries must be in the range 1-50."),
		"Unexpected error: {err}"
	);

	cfg.journal.context_entries = 0;

	assert!(reverie_config::validate(&cfg).is_err());
}

#[test]
fn default_timezone_must_be_known() {
	let mut cfg = base_config();

	cfg.journal.default_timezone = "Mars/Olympus_Mons".to_string();

	let err = reverie_config::validate(&cfg).expect_err("Expected time zone error.");

	assert!(err.to_string().contains("is not a known IANA time zone."), "Unexpected error: {err}");

	cfg.journal.default_timezone = "America/New_York".to_string();

	assert!(reverie_config::validate(&cfg).is_ok());
}

#[test]
fn api_key_must_be_non_empty() {
	let mut cfg = base_config();

	cfg.providers.chat.api_key = " ".to_string();

	let err = reverie_config::validate(&cfg).expect_err("Expected api_key error.");

	assert!(
		err.to_string().contains("providers.chat.api_key must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn temperatures_must_be_in_range() {
	let mut cfg = base_config();

	cfg.providers.chat.temperature = 2.5;

	let err = reverie_config::validate(&cfg).expect_err("Expected temperature error.");

	assert!(
		err.to_string().contains("providers.chat.temperature must be in the range 0.0-2.0."),
		"Unexpected error: {err}"
	);

	let mut cfg = base_config();

	cfg.journal.summary_temperature = f32::NAN;

	let err = reverie_config::validate(&cfg).expect_err("Expected summary temperature error.");

	assert!(
		err.to_string().contains("journal.summary_temperature must be a finite number."),
		"Unexpected error: {err}"
	);
}

#[test]
fn token_caps_must_be_positive() {
	let mut cfg = base_config();

	cfg.journal.max_tokens.suggestion = 0;

	let err = reverie_config::validate(&cfg).expect_err("Expected max_tokens error.");

	assert!(
		err.to_string().contains("journal.max_tokens.suggestion must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn pool_size_must_be_positive() {
	let mut cfg = base_config();

	cfg.storage.postgres.pool_max_conns = 0;

	assert!(reverie_config::validate(&cfg).is_err());
}
