use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use reverie_domain::{ChatTurn, EntryKind, chat, transcript};
use reverie_storage::models::NewEntry;

use crate::{EntryResponse, EntryView, Error, ReverieService, Result, entries};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptRequest {
	#[serde(default)]
	pub title: Option<String>,
	pub chat_history: Vec<ChatTurn>,
}

impl ReverieService {
	/// Persists a finished conversation as a chat entry. Turns are stored verbatim.
	pub async fn save_transcript(
		&self,
		user_id: &str,
		req: TranscriptRequest,
	) -> Result<EntryResponse> {
		let user_id = crate::require_user(user_id)?;

		if req.chat_history.is_empty() {
			return Err(Error::InvalidRequest {
				message: "chatHistory must contain at least one turn.".to_string(),
			});
		}
		if let Some(index) = chat::first_blank_turn(&req.chat_history) {
			return Err(Error::InvalidRequest {
				message: format!("chatHistory[{index}].content must be non-empty."),
			});
		}

		let entry = NewEntry {
			entry_id: Uuid::new_v4(),
			user_id: user_id.to_string(),
			title: entries::clean_title(req.title),
			content: transcript::render_transcript(&req.chat_history),
			mood: None,
			summary: None,
			entry_type: EntryKind::Chat.as_str().to_string(),
			chat_history: Some(serde_json::to_value(&req.chat_history)?),
			created_at: OffsetDateTime::now_utc(),
		};
		let stored = self.store.insert_entry(&entry).await?;

		tracing::info!(
			user_id,
			entry_id = %stored.entry_id,
			turns = req.chat_history.len(),
			"Saved chat transcript."
		);

		Ok(EntryResponse { entry: EntryView::try_from(stored)? })
	}
}
