use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use reverie_domain::{ChatTurn, EntryKind, Mood, prompts};
use reverie_providers::ModelRequest;
use reverie_storage::models::{EntryUpdate, JournalEntry, NewEntry};

use crate::{Error, ReverieService, Result};

const DEFAULT_PAGE_SIZE: u32 = 50;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntryView {
	pub id: Uuid,
	pub title: Option<String>,
	pub content: String,
	pub mood: Option<Mood>,
	pub summary: Option<String>,
	pub entry_type: EntryKind,
	pub chat_history: Option<Vec<ChatTurn>>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl TryFrom<JournalEntry> for EntryView {
	type Error = Error;

	fn try_from(entry: JournalEntry) -> Result<Self> {
		let chat_history =
			entry.chat_history.map(serde_json::from_value::<Vec<ChatTurn>>).transpose()?;

		Ok(Self {
			id: entry.entry_id,
			title: entry.title,
			content: entry.content,
			mood: entry.mood.as_deref().map(str::parse::<Mood>).transpose()?,
			summary: entry.summary,
			entry_type: entry.entry_type.parse::<EntryKind>()?,
			chat_history,
			created_at: entry.created_at,
			updated_at: entry.updated_at,
		})
	}
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ListEntriesRequest {
	pub limit: Option<u32>,
	pub offset: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateEntryRequest {
	#[serde(default)]
	pub title: Option<String>,
	pub content: String,
	#[serde(default)]
	pub mood: Option<Mood>,
}

/// Title and mood are replaced as given; `content: None` keeps the stored content.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateEntryRequest {
	pub id: Uuid,
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub content: Option<String>,
	#[serde(default)]
	pub mood: Option<Mood>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntriesResponse {
	pub entries: Vec<EntryView>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntryResponse {
	pub entry: EntryView,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteEntryResponse {
	pub success: bool,
}

impl ReverieService {
	pub async fn list_entries(
		&self,
		user_id: &str,
		req: ListEntriesRequest,
	) -> Result<EntriesResponse> {
		let user_id = crate::require_user(user_id)?;
		let limit = req.limit.unwrap_or(DEFAULT_PAGE_SIZE);
		let max_page_size = self.cfg.journal.max_page_size;

		if limit == 0 || limit > max_page_size {
			return Err(Error::InvalidRequest {
				message: format!("limit must be in the range 1-{max_page_size}."),
			});
		}

		let rows = self.store.list_entries(user_id, limit, req.offset.unwrap_or(0)).await?;
		let entries = rows.into_iter().map(EntryView::try_from).collect::<Result<Vec<_>>>()?;

		Ok(EntriesResponse { entries })
	}

	pub async fn create_entry(
		&self,
		user_id: &str,
		req: CreateEntryRequest,
	) -> Result<EntryResponse> {
		let user_id = crate::require_user(user_id)?;

		if req.content.trim().is_empty() {
			return Err(Error::InvalidRequest { message: "content must be non-empty.".to_string() });
		}

		let summary = self.summarize(&req.content).await;
		let entry = NewEntry {
			entry_id: Uuid::new_v4(),
			user_id: user_id.to_string(),
			title: clean_title(req.title),
			content: req.content,
			mood: req.mood.map(|mood| mood.as_str().to_string()),
			summary,
			entry_type: EntryKind::Regular.as_str().to_string(),
			chat_history: None,
			created_at: OffsetDateTime::now_utc(),
		};
		let stored = self.store.insert_entry(&entry).await?;

		tracing::info!(user_id, entry_id = %stored.entry_id, "Created journal entry.");

		Ok(EntryResponse { entry: EntryView::try_from(stored)? })
	}

	pub async fn update_entry(
		&self,
		user_id: &str,
		req: UpdateEntryRequest,
	) -> Result<EntryResponse> {
		let user_id = crate::require_user(user_id)?;
		let existing = self
			.store
			.get_entry(user_id, req.id)
			.await?
			.ok_or_else(|| Error::NotFound { message: "Entry not found.".to_string() })?;
		let content = match req.content {
			Some(content) if content.trim().is_empty() => {
				return Err(Error::InvalidRequest {
					message: "content must be non-empty.".to_string(),
				});
			},
			Some(content) => content,
			None => existing.content.clone(),
		};
		// A failed summary clears the old one; it described content that is gone.
		let summary = if content != existing.content {
			Some(self.summarize(&content).await)
		} else {
			None
		};
		let update = EntryUpdate {
			entry_id: existing.entry_id,
			user_id: user_id.to_string(),
			title: clean_title(req.title),
			content,
			mood: req.mood.map(|mood| mood.as_str().to_string()),
			summary,
			updated_at: OffsetDateTime::now_utc(),
		};
		let stored = self.store.update_entry(&update).await?;

		tracing::info!(user_id, entry_id = %stored.entry_id, "Updated journal entry.");

		Ok(EntryResponse { entry: EntryView::try_from(stored)? })
	}

	pub async fn delete_entry(&self, user_id: &str, entry_id: Uuid) -> Result<DeleteEntryResponse> {
		let user_id = crate::require_user(user_id)?;

		if !self.store.delete_entry(user_id, entry_id).await? {
			return Err(Error::NotFound { message: "Entry not found.".to_string() });
		}

		tracing::info!(user_id, entry_id = %entry_id, "Deleted journal entry.");

		Ok(DeleteEntryResponse { success: true })
	}

	/// Best effort: a provider failure is logged and leaves the entry without a summary.
	pub(crate) async fn summarize(&self, content: &str) -> Option<String> {
		let journal = &self.cfg.journal;
		let request = ModelRequest {
			system: prompts::SUMMARY_SYSTEM.to_string(),
			history: Vec::new(),
			message: prompts::summary_request(content, journal.summary_input_chars),
			max_tokens: journal.max_tokens.summary,
			temperature: journal.summary_temperature,
		};

		match self.model.complete(&self.cfg.providers.chat, &request).await {
			Ok(reply) => Some(reply.trim().to_string()).filter(|summary| !summary.is_empty()),
			Err(err) => {
				tracing::warn!(error = %err, "Entry summary generation failed.");

				None
			},
		}
	}
}

pub(crate) fn clean_title(title: Option<String>) -> Option<String> {
	title.map(|title| title.trim().to_string()).filter(|title| !title.is_empty())
}
