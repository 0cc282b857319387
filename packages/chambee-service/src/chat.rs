use serde::{Deserialize, Serialize};
use tracing::Instrument;

use chambee_domain::{
	ConversationTurn, Intent, IntentResult, ProviderRecord, SearchFilters,
	conversation::{render_outbound_sequence, render_persisted_history},
	intent::parse_model_reply,
	messages::{self, MISSING_PROFESSION_TEXT, NO_MATCHES_TEXT, STORE_ERROR_TEXT},
};

use crate::{ChambeeService, Error, Result};

const LOGGED_REPLY_CHARS: usize = 200;

#[derive(Clone, Debug, Deserialize)]
pub struct ChatRequest {
	#[serde(alias = "mensaje")]
	pub message: String,
	#[serde(default)]
	pub session_id: Option<String>,
	#[serde(default, alias = "historial")]
	pub history: Option<Vec<ConversationTurn>>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChatResponse {
	pub assistant_text: String,
	pub intent: Intent,
	pub filters: SearchFilters,
	pub results: Vec<ProviderRecord>,
	/// Conversation state to echo back on the next request.
	pub history: Vec<ConversationTurn>,
}

impl ChambeeService {
	/// Runs one conversational turn. Completion, parsing and directory failures degrade to canned
	/// assistant texts; only a malformed request is an error.
	pub async fn chat(&self, req: ChatRequest) -> Result<ChatResponse> {
		let span =
			tracing::info_span!("chat", session_id = req.session_id.as_deref().unwrap_or_default());

		self.chat_turn(req).instrument(span).await
	}

	async fn chat_turn(&self, req: ChatRequest) -> Result<ChatResponse> {
		let message = self.validate_message(&req.message)?;
		let history = req.history.unwrap_or_default();
		let outbound = render_outbound_sequence(&history, message);
		let mut result = self.extract_intent(&outbound).await;

		apply_search_gate(&mut result);

		let results = if result.intent == Intent::SearchProvider {
			self.search(&mut result).await
		} else {
			Vec::new()
		};
		let history = render_persisted_history(&history, message, &result.assistant_text);

		Ok(ChatResponse {
			assistant_text: result.assistant_text,
			intent: result.intent,
			filters: result.filters,
			results,
			history,
		})
	}

	fn validate_message<'a>(&self, message: &'a str) -> Result<&'a str> {
		let message = message.trim();

		if message.is_empty() {
			return Err(Error::InvalidRequest { message: "message must not be empty.".to_string() });
		}

		let max_chars = self.cfg.conversation.max_message_chars as usize;

		if message.chars().count() > max_chars {
			return Err(Error::InvalidRequest {
				message: format!("message must be at most {max_chars} characters."),
			});
		}

		Ok(message)
	}

	async fn extract_intent(&self, outbound: &[ConversationTurn]) -> IntentResult {
		let cfg = &self.cfg.providers.completion;
		let raw = match self.providers.completion.complete(cfg, outbound).await {
			Ok(raw) => raw,
			Err(err) => {
				tracing::warn!(error = %err, provider_id = %cfg.provider_id, "Completion request failed.");

				return IntentResult::api_error();
			},
		};

		match parse_model_reply(&raw) {
			Ok(parsed) => {
				for issue in &parsed.issues {
					tracing::warn!(path = %issue.path, reason = %issue.message, "Dropped filter field.");
				}

				parsed.result
			},
			Err(err) => {
				let excerpt: String = raw.chars().take(LOGGED_REPLY_CHARS).collect();

				tracing::warn!(error = %err, raw = %excerpt, "Model reply could not be interpreted.");

				IntentResult::parse_error()
			},
		}
	}

	async fn search(&self, result: &mut IntentResult) -> Vec<ProviderRecord> {
		match self.directory.search_providers(&result.filters).await {
			Ok(records) => {
				tracing::info!(results = records.len(), "Directory search executed.");

				if records.is_empty() {
					result.assistant_text = no_match_text(&result.filters);
				}

				records
			},
			Err(err) => {
				tracing::error!(error = %err, "Directory search failed.");

				result.assistant_text = STORE_ERROR_TEXT.to_string();

				Vec::new()
			},
		}
	}
}

/// A search intent without a profession is turned into a clarification request.
pub fn apply_search_gate(result: &mut IntentResult) {
	if result.intent == Intent::SearchProvider && result.filters.profession.is_none() {
		result.intent = Intent::Clarify;
		result.assistant_text = MISSING_PROFESSION_TEXT.to_string();
	}
}

pub fn no_match_text(filters: &SearchFilters) -> String {
	match filters.profession.as_deref() {
		Some(profession) if filters.is_profession_only() =>
			messages::category_without_matches(profession),
		_ => NO_MATCHES_TEXT.to_string(),
	}
}
