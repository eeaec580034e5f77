use serde::{Deserialize, Serialize};

use reverie_domain::prompts;
use reverie_providers::ModelRequest;

use crate::{Error, ReverieService, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
	pub current_paragraph: String,
	#[serde(default)]
	pub previous_content: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuggestionResponse {
	pub suggestion: String,
}

impl ReverieService {
	pub async fn suggest(&self, req: SuggestionRequest) -> Result<SuggestionResponse> {
		if req.current_paragraph.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "currentParagraph must be non-empty.".to_string(),
			});
		}

		let request = ModelRequest {
			system: prompts::SUGGESTION_SYSTEM.to_string(),
			history: Vec::new(),
			message: prompts::suggestion_request(&req.current_paragraph, &req.previous_content),
			max_tokens: self.cfg.journal.max_tokens.suggestion,
			temperature: self.cfg.providers.chat.temperature,
		};
		let reply = self.model.complete(&self.cfg.providers.chat, &request).await?;

		Ok(SuggestionResponse { suggestion: reply.trim().to_string() })
	}
}
