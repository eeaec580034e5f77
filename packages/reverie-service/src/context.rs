//! Loads a user's recent entries and renders them into grounding text.

use jiff::tz::TimeZone;

use reverie_config::MAX_CONTEXT_ENTRIES;
use reverie_domain::{EntryContextItem, Mood, grounding};
use reverie_storage::models::EntryContextRow;

use crate::{ReverieService, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntriesContext {
	/// The user has no entries; callers answer with the canned response instead of the model.
	Empty,
	Rendered(String),
}

impl ReverieService {
	/// Fetches at most `journal.context_entries` entries, newest first. Read failures are fatal.
	pub async fn entries_context(&self, user_id: &str, tz: &TimeZone) -> Result<EntriesContext> {
		let items = self.recent_items(user_id, self.cfg.journal.context_entries).await?;

		Ok(match grounding::render_entries(&items, tz)? {
			Some(text) => EntriesContext::Rendered(text),
			None => EntriesContext::Empty,
		})
	}

	pub(crate) async fn recent_items(
		&self,
		user_id: &str,
		limit: u32,
	) -> Result<Vec<EntryContextItem>> {
		let limit = limit.min(MAX_CONTEXT_ENTRIES);
		let mut rows = self.store.recent_context(user_id, limit).await?;

		rows.truncate(limit as usize);

		tracing::debug!(user_id, entries = rows.len(), "Loaded entries for grounding.");

		rows.into_iter().map(context_item).collect()
	}
}

fn context_item(row: EntryContextRow) -> Result<EntryContextItem> {
	let mood = row.mood.as_deref().map(str::parse::<Mood>).transpose()?;

	Ok(EntryContextItem { content: row.content, created_at: row.created_at, title: row.title, mood })
}
