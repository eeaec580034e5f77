use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub journal: Journal,
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub chat: ChatProviderConfig,
}

/// Wire protocol spoken by the chat provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatProviderKind {
	/// Stateless chat-completions API; the whole conversation travels in one message list.
	#[serde(rename = "openai")]
	OpenAi,
	/// Chat-session API; history is replayed as priming turns before the new message.
	Gemini,
}

#[derive(Debug, Deserialize)]
pub struct ChatProviderConfig {
	pub provider_id: String,
	pub kind: ChatProviderKind,
	pub api_base: String,
	pub api_key: String,
	/// Appended to `api_base`. For `gemini` this is the models collection, e.g. `/v1beta/models`.
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default = "default_connect_timeout_ms")]
	pub connect_timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Journal {
	/// Upper bound on entries rendered into the chat grounding text.
	pub context_entries: u32,
	pub prompt_entries: u32,
	pub prompt_excerpt_chars: usize,
	pub summary_input_chars: usize,
	pub summary_temperature: f32,
	pub max_page_size: u32,
	pub default_timezone: String,
	pub no_entries_response: String,
	pub max_tokens: MaxTokens,
}
impl Default for Journal {
	fn default() -> Self {
		Self {
			context_entries: 50,
			prompt_entries: 2,
			prompt_excerpt_chars: 500,
			summary_input_chars: 1_000,
			summary_temperature: 0.5,
			max_page_size: 100,
			default_timezone: "UTC".to_string(),
			no_entries_response: default_no_entries_response(),
			max_tokens: MaxTokens::default(),
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MaxTokens {
	pub chat: u32,
	pub prompts: u32,
	pub suggestion: u32,
	pub summary: u32,
}
impl Default for MaxTokens {
	fn default() -> Self {
		Self { chat: 500, prompts: 300, suggestion: 100, summary: 50 }
	}
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
	/// When set, every `/v1` request must carry `Authorization: Bearer <token>`.
	pub api_auth_token: Option<String>,
}

pub const MAX_CONTEXT_ENTRIES: u32 = 50;

fn default_connect_timeout_ms() -> u64 {
	10_000
}

fn default_no_entries_response() -> String {
	"There are no journal entries to look back on yet. Write a few entries and then we can talk \
	 through your reflections together."
		.to_string()
}
