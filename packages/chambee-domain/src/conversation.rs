use serde::{Deserialize, Serialize};

use crate::prompt::{PRIMING_REPLY, SYSTEM_INSTRUCTIONS};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
	User,
	#[serde(alias = "model")]
	Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnPart {
	#[serde(default)]
	pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
	pub role: Role,
	#[serde(default)]
	pub parts: Vec<TurnPart>,
}
impl ConversationTurn {
	pub fn new(role: Role, text: impl Into<String>) -> Self {
		Self { role, parts: vec![TurnPart { text: text.into() }] }
	}

	pub fn user(text: impl Into<String>) -> Self {
		Self::new(Role::User, text)
	}

	pub fn assistant(text: impl Into<String>) -> Self {
		Self::new(Role::Assistant, text)
	}

	/// Joins the text parts with newlines.
	pub fn text(&self) -> String {
		self.parts.iter().map(|part| part.text.as_str()).collect::<Vec<_>>().join("\n")
	}

	/// Drops blank parts. Returns `None` when nothing is left.
	pub fn sanitized(&self) -> Option<Self> {
		let parts: Vec<TurnPart> =
			self.parts.iter().filter(|part| !part.text.trim().is_empty()).cloned().collect();

		(!parts.is_empty()).then_some(Self { role: self.role, parts })
	}
}

pub fn sanitize_history(history: &[ConversationTurn]) -> Vec<ConversationTurn> {
	history.iter().filter_map(ConversationTurn::sanitized).collect()
}

/// Builds the turn sequence sent to the completion service. A conversation without usable
/// history starts with the priming pair; the new message is always last.
pub fn render_outbound_sequence(
	history: &[ConversationTurn],
	message: &str,
) -> Vec<ConversationTurn> {
	let replayed = sanitize_history(history);
	let mut sequence = Vec::with_capacity(replayed.len() + 3);

	if replayed.is_empty() {
		sequence.push(ConversationTurn::user(SYSTEM_INSTRUCTIONS));
		sequence.push(ConversationTurn::assistant(PRIMING_REPLY));
	}

	sequence.extend(replayed);
	sequence.push(ConversationTurn::user(message));

	sequence
}

/// Builds the history handed back to the caller. `assistant_text` must be the text actually
/// shown, after any search-driven rewrite.
pub fn render_persisted_history(
	history: &[ConversationTurn],
	message: &str,
	assistant_text: &str,
) -> Vec<ConversationTurn> {
	let mut persisted = sanitize_history(history);

	persisted.push(ConversationTurn::user(message));
	persisted.push(ConversationTurn::assistant(assistant_text));

	persisted
}
