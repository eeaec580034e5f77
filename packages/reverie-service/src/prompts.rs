use serde::{Deserialize, Serialize};

use reverie_domain::prompts;
use reverie_providers::ModelRequest;

use crate::{ReverieService, Result};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptsRequest {
	#[serde(default)]
	pub user_timezone: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PromptsResponse {
	pub prompts: Vec<String>,
}

impl ReverieService {
	/// Asks for a few reflection prompts that build on the user's latest entries.
	pub async fn reflection_prompts(
		&self,
		user_id: &str,
		req: PromptsRequest,
	) -> Result<PromptsResponse> {
		let user_id = crate::require_user(user_id)?;
		let (_, tz) = self.resolve_timezone(req.user_timezone.as_deref())?;
		let journal = &self.cfg.journal;
		let recent = self.recent_items(user_id, journal.prompt_entries).await?;
		let request = ModelRequest {
			system: prompts::REFLECTION_SYSTEM.to_string(),
			history: Vec::new(),
			message: prompts::reflection_request(&recent, &tz, journal.prompt_excerpt_chars)?,
			max_tokens: journal.max_tokens.prompts,
			temperature: self.cfg.providers.chat.temperature,
		};
		let reply = self.model.complete(&self.cfg.providers.chat, &request).await?;

		Ok(PromptsResponse { prompts: prompts::parse_prompt_lines(&reply) })
	}
}
