use serde::{Deserialize, Serialize};

use reverie_domain::{ChatTurn, chat, grounding};
use reverie_providers::ModelRequest;

use crate::{Error, Relay, ReverieService, Result, context::EntriesContext};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
	pub message: String,
	#[serde(default)]
	pub chat_history: Vec<ChatTurn>,
	#[serde(default)]
	pub user_timezone: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatResponse {
	pub response: String,
}

pub enum ChatReply {
	/// Answer produced without calling the model.
	Canned(String),
	Streaming(Relay),
}

enum Prepared {
	Canned(String),
	Model(ModelRequest),
}

impl ReverieService {
	pub async fn chat(&self, user_id: &str, req: ChatRequest) -> Result<ChatResponse> {
		let response = match self.prepare_chat(user_id, req).await? {
			Prepared::Canned(text) => text,
			Prepared::Model(request) =>
				self.model.complete(&self.cfg.providers.chat, &request).await?,
		};

		Ok(ChatResponse { response })
	}

	/// Opens the model stream. A provider failure here happens before any byte is written, so
	/// it surfaces as an ordinary error.
	pub async fn chat_stream(&self, user_id: &str, req: ChatRequest) -> Result<ChatReply> {
		match self.prepare_chat(user_id, req).await? {
			Prepared::Canned(text) => Ok(ChatReply::Canned(text)),
			Prepared::Model(request) => {
				let source = self.model.stream(&self.cfg.providers.chat, &request).await?;

				Ok(ChatReply::Streaming(Relay::new(source)))
			},
		}
	}

	async fn prepare_chat(&self, user_id: &str, req: ChatRequest) -> Result<Prepared> {
		let user_id = crate::require_user(user_id)?;

		if req.message.trim().is_empty() {
			return Err(Error::InvalidRequest { message: "message is required.".to_string() });
		}
		if let Some(index) = chat::first_blank_turn(&req.chat_history) {
			return Err(Error::InvalidRequest {
				message: format!("chatHistory[{index}].content must be non-empty."),
			});
		}

		let (zone, tz) = self.resolve_timezone(req.user_timezone.as_deref())?;
		let entries_context = match self.entries_context(user_id, &tz).await? {
			EntriesContext::Empty => {
				tracing::info!(user_id, "No journal entries; answering without the model.");

				return Ok(Prepared::Canned(self.cfg.journal.no_entries_response.clone()));
			},
			EntriesContext::Rendered(text) => text,
		};

		tracing::debug!(
			user_id,
			history_turns = req.chat_history.len(),
			zone = %zone,
			"Prepared chat request."
		);

		Ok(Prepared::Model(ModelRequest {
			system: grounding::chat_system_prompt(&entries_context, &zone),
			history: req.chat_history,
			message: req.message,
			max_tokens: self.cfg.journal.max_tokens.chat,
			temperature: self.cfg.providers.chat.temperature,
		}))
	}
}
