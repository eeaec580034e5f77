//! Default instruction copy for the one-shot model tasks.

use jiff::tz::TimeZone;

use crate::{EntryContextItem, Result, timezone};

/// Model-side reply used to close the priming exchange on chat-session providers.
pub const CHAT_ACKNOWLEDGEMENT: &str =
	"Understood. I'm ready to help you reflect on your journal entries.";

pub const REFLECTION_SYSTEM: &str = "You are a gentle journaling guide. Help the user reflect on \
	their day and their feelings. Be warm and encouraging, and keep each prompt short.";

pub const SUGGESTION_SYSTEM: &str = "You are a supportive journaling companion. When the user \
	finishes a paragraph, offer one short reflective question or nudge that helps them go deeper. \
	Never judge, and never write more than two sentences.";

pub const SUMMARY_SYSTEM: &str = "You summarize journal entries in one short sentence of at most \
	fifteen words that captures the main theme or feeling.";

const PROMPT_FORMAT_RULE: &str =
	"Reply with the prompts only, one per line, with no numbering or bullet points.";

/// Truncates to `max_chars` characters, appending `...` when anything was cut.
pub fn excerpt(text: &str, max_chars: usize) -> String {
	match text.char_indices().nth(max_chars) {
		Some((cut, _)) => format!("{}...", &text[..cut]),
		None => text.to_string(),
	}
}

pub fn reflection_request(
	recent: &[EntryContextItem],
	tz: &TimeZone,
	excerpt_chars: usize,
) -> Result<String> {
	if recent.is_empty() {
		return Ok(format!(
			"The user is opening their journal for the first time. Suggest 2-3 gentle, open-ended \
			 prompts to help them start, focusing on present feelings, gratitude, or small \
			 observations.\n\n{PROMPT_FORMAT_RULE}"
		));
	}

	let mut lines = Vec::with_capacity(recent.len());

	for (index, item) in recent.iter().enumerate() {
		let date = timezone::format_entry_date(item.created_at, tz)?;

		lines.push(format!(
			"Entry {} ({date}): {}",
			index + 1,
			excerpt(&item.content, excerpt_chars)
		));
	}

	Ok(format!(
		"Using the recent journal entries below, suggest 2-3 reflection prompts for today's \
		 session. They should build on what the user wrote and help them notice patterns.\n\n\
		 Recent entries:\n\"\"\"\n{}\n\"\"\"\n\n{PROMPT_FORMAT_RULE}",
		lines.join("\n\n")
	))
}

/// Splits a model reply into prompts, dropping blank lines.
pub fn parse_prompt_lines(reply: &str) -> Vec<String> {
	reply.lines().map(str::trim).filter(|line| !line.is_empty()).map(str::to_string).collect()
}

pub fn suggestion_request(current_paragraph: &str, previous_content: &str) -> String {
	let mut request = String::from("The user is writing in their journal.\n\n");

	if !previous_content.trim().is_empty() {
		request.push_str(&format!("Earlier in this entry:\n\"\"\"{previous_content}\"\"\"\n\n"));
	}

	request.push_str(&format!(
		"Paragraph they just finished:\n\"\"\"\n{current_paragraph}\n\"\"\"\n\nOffer one brief, \
		 gentle follow-up question or prompt that helps them keep reflecting."
	));

	request
}

pub fn summary_request(content: &str, max_chars: usize) -> String {
	let head = match content.char_indices().nth(max_chars) {
		Some((cut, _)) => &content[..cut],
		None => content,
	};

	format!("Summarize this journal entry in one short sentence:\n\n{head}")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn excerpt_cuts_on_char_boundaries() {
		assert_eq!(excerpt("héllo wörld", 5), "héllo...");
		assert_eq!(excerpt("short", 5), "short");
		assert_eq!(excerpt("", 3), "");
	}

	#[test]
	fn prompt_lines_skip_blanks() {
		let reply = "What felt heavy today?\n\n  Who made you smile?  \n";

		assert_eq!(parse_prompt_lines(reply), vec![
			"What felt heavy today?".to_string(),
			"Who made you smile?".to_string(),
		]);
	}

	#[test]
	fn suggestion_omits_empty_previous_content() {
		let request = suggestion_request("Today was long.", "  ");

		assert!(!request.contains("Earlier in this entry"));
		assert!(request.contains("Today was long."));
	}

	#[test]
	fn summary_request_is_bounded() {
		let content = "a".repeat(2_000);
		let request = summary_request(&content, 1_000);

		assert!(request.ends_with(&"a".repeat(1_000)));
		assert!(!request.contains(&"a".repeat(1_001)));
	}
}
