use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	User,
	Assistant,
}
impl Role {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::User => "user",
			Self::Assistant => "assistant",
		}
	}
}

/// One message of a conversation. The grounding text is never a `ChatTurn`; providers prepend it
/// on their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
	pub role: Role,
	pub content: String,
}
impl ChatTurn {
	pub fn user(content: impl Into<String>) -> Self {
		Self { role: Role::User, content: content.into() }
	}

	pub fn assistant(content: impl Into<String>) -> Self {
		Self { role: Role::Assistant, content: content.into() }
	}
}

/// Returns the index of the first turn whose content is blank.
pub fn first_blank_turn(turns: &[ChatTurn]) -> Option<usize> {
	turns.iter().position(|turn| turn.content.trim().is_empty())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn roles_use_lowercase_wire_names() {
		let turn: ChatTurn =
			serde_json::from_str(r#"{"role":"assistant","content":"hi"}"#).expect("parse failed");

		assert_eq!(turn, ChatTurn::assistant("hi"));
		assert!(serde_json::from_str::<ChatTurn>(r#"{"role":"system","content":"x"}"#).is_err());
	}

	#[test]
	fn finds_blank_turns() {
		let turns = vec![ChatTurn::user("a"), ChatTurn::assistant("  "), ChatTurn::user("")];

		assert_eq!(first_blank_turn(&turns), Some(1));
		assert_eq!(first_blank_turn(&turns[..1]), None);
	}
}
