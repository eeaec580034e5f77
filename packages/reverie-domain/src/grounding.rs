//! Renders journal entries into the grounding text placed ahead of a conversation.

use jiff::tz::TimeZone;

use crate::{EntryContextItem, Result, timezone};

pub const ENTRY_SEPARATOR: &str = "\n\n---\n\n";

/// `[Mon, Jan 5, 2026 - "Title" (feeling calm)]`; title and mood are omitted when absent.
pub fn entry_header(item: &EntryContextItem, tz: &TimeZone) -> Result<String> {
	let date = timezone::format_entry_date(item.created_at, tz)?;
	let mut header = format!("[{date}");

	if let Some(title) = item.title.as_deref().map(str::trim).filter(|title| !title.is_empty()) {
		header.push_str(&format!(" - \"{title}\""));
	}
	if let Some(mood) = item.mood {
		header.push_str(&format!(" (feeling {mood})"));
	}

	header.push(']');

	Ok(header)
}

/// Renders entries in the order given. Returns `None` when there is nothing to render so callers
/// cannot mistake an empty journal for an empty context block.
pub fn render_entries(items: &[EntryContextItem], tz: &TimeZone) -> Result<Option<String>> {
	if items.is_empty() {
		return Ok(None);
	}

	let mut blocks = Vec::with_capacity(items.len());

	for item in items {
		blocks.push(format!("{}\n{}", entry_header(item, tz)?, item.content));
	}

	Ok(Some(blocks.join(ENTRY_SEPARATOR)))
}

pub fn chat_system_prompt(entries_context: &str, zone: &str) -> String {
	format!(
		"You are a warm, attentive companion who can read the user's journal. Help them notice \
		 patterns and themes in their writing, answer questions about past entries, and offer \
		 gentle, non-judgmental support. Mention specific entries when they are relevant and keep \
		 replies concise.\n\nThe user's time zone is {zone}; interpret every date relative to their \
		 local time.\n\nJournal entries, newest first:\n\n{entries_context}"
	)
}
