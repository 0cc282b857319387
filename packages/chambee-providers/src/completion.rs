use serde_json::Value;

use chambee_config::CompletionProviderConfig;
use chambee_domain::{ConversationTurn, Role};

use crate::{ApiStyle, Error, Result};

/// Sends the turn sequence to the completion endpoint and returns the reply text. One round
/// trip; callers decide what a failure means.
pub async fn complete(cfg: &CompletionProviderConfig, turns: &[ConversationTurn]) -> Result<String> {
	let style = ApiStyle::from_config(cfg)?;
	let client = crate::http_client(cfg)?;
	let url = crate::endpoint(cfg, &cfg.request_path());
	let body = request_body(style, cfg, turns);
	let res = client
		.post(url)
		.headers(style.headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_reply(style, &json)
}

pub fn request_body(
	style: ApiStyle,
	cfg: &CompletionProviderConfig,
	turns: &[ConversationTurn],
) -> Value {
	match style {
		ApiStyle::OpenAiChat => {
			let messages: Vec<Value> = turns
				.iter()
				.map(|turn| {
					let role = match turn.role {
						Role::User => "user",
						Role::Assistant => "assistant",
					};

					serde_json::json!({ "role": role, "content": turn.text() })
				})
				.collect();

			serde_json::json!({
				"model": cfg.model,
				"temperature": cfg.temperature,
				"messages": messages,
			})
		},
		ApiStyle::Gemini => {
			let contents: Vec<Value> = turns
				.iter()
				.map(|turn| {
					let role = match turn.role {
						Role::User => "user",
						Role::Assistant => "model",
					};
					let parts: Vec<Value> = turn
						.parts
						.iter()
						.map(|part| serde_json::json!({ "text": part.text }))
						.collect();

					serde_json::json!({ "role": role, "parts": parts })
				})
				.collect();

			serde_json::json!({
				"contents": contents,
				"generationConfig": { "temperature": cfg.temperature },
			})
		},
	}
}

pub fn parse_reply(style: ApiStyle, json: &Value) -> Result<String> {
	match style {
		ApiStyle::OpenAiChat => parse_chat_reply(json),
		ApiStyle::Gemini => parse_gemini_reply(json),
	}
}

fn parse_chat_reply(json: &Value) -> Result<String> {
	json.get("choices")
		.and_then(Value::as_array)
		.and_then(|choices| choices.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|message| message.get("content"))
		.and_then(Value::as_str)
		.map(str::to_string)
		.ok_or_else(|| Error::InvalidResponse {
			message: "Completion response is missing choices[0].message.content.".to_string(),
		})
}

fn parse_gemini_reply(json: &Value) -> Result<String> {
	let parts = json
		.get("candidates")
		.and_then(Value::as_array)
		.and_then(|candidates| candidates.first())
		.and_then(|candidate| candidate.get("content"))
		.and_then(|content| content.get("parts"))
		.and_then(Value::as_array);
	let text: String = parts
		.map(|parts| parts.iter().filter_map(|part| part.get("text").and_then(Value::as_str)).collect())
		.unwrap_or_default();

	if !text.is_empty() {
		return Ok(text);
	}

	let reason = json
		.get("promptFeedback")
		.and_then(|feedback| feedback.get("blockReason"))
		.and_then(Value::as_str)
		.or_else(|| {
			json.get("candidates")
				.and_then(Value::as_array)
				.and_then(|candidates| candidates.first())
				.and_then(|candidate| candidate.get("finishReason"))
				.and_then(Value::as_str)
		})
		.unwrap_or("no text parts");

	Err(Error::InvalidResponse { message: format!("Completion response has no text ({reason}).") })
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_choice_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "role": "assistant", "content": "{\"intent\": \"clarify\"}" } }
			]
		});

		assert_eq!(
			parse_reply(ApiStyle::OpenAiChat, &json).expect("parse failed"),
			"{\"intent\": \"clarify\"}"
		);
	}

	#[test]
	fn joins_gemini_parts() {
		let json = serde_json::json!({
			"candidates": [
				{ "content": { "role": "model", "parts": [{ "text": "{\"a\":" }, { "text": " 1}" }] } }
			]
		});

		assert_eq!(parse_reply(ApiStyle::Gemini, &json).expect("parse failed"), "{\"a\": 1}");
	}

	#[test]
	fn reports_gemini_block_reason() {
		let json = serde_json::json!({ "promptFeedback": { "blockReason": "SAFETY" } });
		let err = parse_reply(ApiStyle::Gemini, &json).expect_err("blocked reply must fail");

		assert!(err.to_string().contains("SAFETY"));
	}
}
