use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub conversation: Conversation,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	/// Origins allowed by CORS. Empty means any origin.
	#[serde(default)]
	pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
	#[serde(default = "default_acquire_timeout_ms")]
	pub acquire_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub completion: CompletionProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct CompletionProviderConfig {
	pub provider_id: String,
	/// Wire format spoken by the endpoint, either "openai_chat" or "gemini".
	pub api_style: String,
	pub api_base: String,
	#[serde(default)]
	pub api_key: String,
	/// Environment variable consulted when `api_key` is empty.
	pub api_key_env: Option<String>,
	/// Request path. A literal `{model}` is replaced with `model`.
	pub path: String,
	#[serde(default = "default_models_path")]
	pub models_path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}
impl CompletionProviderConfig {
	pub fn request_path(&self) -> String {
		self.path.replace("{model}", &self.model)
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Conversation {
	pub max_message_chars: u32,
}
impl Default for Conversation {
	fn default() -> Self {
		Self { max_message_chars: 2_000 }
	}
}

fn default_acquire_timeout_ms() -> u64 {
	5_000
}

fn default_models_path() -> String {
	"/v1/models".to_string()
}
