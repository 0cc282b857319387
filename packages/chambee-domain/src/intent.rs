use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
	filters::{FilterIssue, SearchFilters},
	messages::{API_ERROR_TEXT, DEFAULT_ASSISTANT_TEXT, PARSE_ERROR_TEXT},
};

const TEXT_KEYS: [&str; 2] = ["respuesta_texto", "assistant_text"];
const FILTER_KEYS: [&str; 2] = ["data", "filters"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
	SearchProvider,
	Clarify,
	Emergency,
	Reject,
	ParseError,
	ApiError,
	Unknown,
}
impl Intent {
	/// Accepts the English tags and the Spanish tags used by earlier prompt revisions.
	pub fn from_tag(tag: &str) -> Self {
		match tag.trim().to_lowercase().as_str() {
			"search_provider" | "buscar_prestador" => Self::SearchProvider,
			"clarify" | "aclarar_duda" => Self::Clarify,
			"emergency" | "emergencia" => Self::Emergency,
			"reject" | "rechazo" => Self::Reject,
			"parse_error" | "error_parseo" => Self::ParseError,
			"api_error" | "error_api" => Self::ApiError,
			_ => Self::Unknown,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::SearchProvider => "search_provider",
			Self::Clarify => "clarify",
			Self::Emergency => "emergency",
			Self::Reject => "reject",
			Self::ParseError => "parse_error",
			Self::ApiError => "api_error",
			Self::Unknown => "unknown",
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct IntentResult {
	pub assistant_text: String,
	pub intent: Intent,
	pub filters: SearchFilters,
}
impl IntentResult {
	pub fn api_error() -> Self {
		Self {
			assistant_text: API_ERROR_TEXT.to_string(),
			intent: Intent::ApiError,
			filters: SearchFilters::default(),
		}
	}

	pub fn parse_error() -> Self {
		Self {
			assistant_text: PARSE_ERROR_TEXT.to_string(),
			intent: Intent::ParseError,
			filters: SearchFilters::default(),
		}
	}
}

#[derive(Clone, Debug)]
pub struct ParsedReply {
	pub result: IntentResult,
	/// Filter fields dropped during validation.
	pub issues: Vec<FilterIssue>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReplyError {
	#[error("Model reply is not valid JSON.")]
	NotJson {
		#[source]
		source: serde_json::Error,
	},
	#[error("Model reply must be a JSON object.")]
	NotObject,
}

/// Removes a surrounding fenced code block (```json ... ```), if any.
pub fn strip_code_fence(raw: &str) -> &str {
	let trimmed = raw.trim();
	let Some(rest) = trimmed.strip_prefix("```") else {
		return trimmed;
	};
	let rest = rest
		.strip_prefix("json")
		.or_else(|| rest.strip_prefix("JSON"))
		.unwrap_or(rest);
	let rest = rest.strip_suffix("```").unwrap_or(rest);

	rest.trim()
}

/// Interprets the completion text as the `{respuesta_texto, intent, data}` contract.
pub fn parse_model_reply(raw: &str) -> Result<ParsedReply, ReplyError> {
	let value = parse_json_lenient(strip_code_fence(raw))?;
	let Value::Object(obj) = value else {
		return Err(ReplyError::NotObject);
	};
	let assistant_text = first_string(&obj, &TEXT_KEYS)
		.filter(|text| !text.trim().is_empty())
		.unwrap_or(DEFAULT_ASSISTANT_TEXT)
		.to_string();
	let intent = match obj.get("intent") {
		Some(Value::String(tag)) => Intent::from_tag(tag),
		None | Some(Value::Null) => Intent::SearchProvider,
		Some(_) => Intent::Unknown,
	};
	let parsed = FILTER_KEYS
		.iter()
		.find_map(|key| obj.get(*key))
		.map(SearchFilters::from_payload)
		.unwrap_or_default();

	Ok(ParsedReply {
		result: IntentResult { assistant_text, intent, filters: parsed.filters },
		issues: parsed.issues,
	})
}

fn parse_json_lenient(text: &str) -> Result<Value, ReplyError> {
	match serde_json::from_str::<Value>(text) {
		Ok(value) => Ok(value),
		Err(source) => {
			// Models sometimes wrap the object in prose; retry on the outermost braces.
			if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}'))
				&& start < end
				&& let Ok(value) = serde_json::from_str::<Value>(&text[start..=end])
			{
				return Ok(value);
			}

			Err(ReplyError::NotJson { source })
		},
	}
}

fn first_string<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
	keys.iter().find_map(|key| obj.get(*key).and_then(Value::as_str))
}
