//! Chat-session backend. The session is rebuilt on every call: the system text and an
//! acknowledgement are replayed as priming turns, then the history, then the new message.

use futures::{TryStreamExt, future};
use serde_json::Value;

use reverie_config::ChatProviderConfig;
use reverie_domain::{Role, prompts::CHAT_ACKNOWLEDGEMENT};

use crate::{Error, ModelRequest, Result, TextStream};

const API_KEY_HEADER: &str = "x-goog-api-key";

pub async fn complete(cfg: &ChatProviderConfig, req: &ModelRequest) -> Result<String> {
	let client = crate::http_client(cfg, false)?;
	let res = client
		.post(endpoint(cfg, false))
		.headers(crate::api_key_headers(API_KEY_HEADER, &cfg.api_key, &cfg.default_headers)?)
		.json(&request_body(req))
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_candidate_text(&json)
}

pub async fn stream(cfg: &ChatProviderConfig, req: &ModelRequest) -> Result<TextStream> {
	let client = crate::http_client(cfg, true)?;
	let res = client
		.post(endpoint(cfg, true))
		.headers(crate::api_key_headers(API_KEY_HEADER, &cfg.api_key, &cfg.default_headers)?)
		.json(&request_body(req))
		.send()
		.await?
		.error_for_status()?;

	tracing::debug!(
		provider_id = %cfg.provider_id,
		model = %cfg.model,
		"Opened chat session stream."
	);

	let fragments = crate::sse::data_events(res.bytes_stream()).try_filter_map(|data| {
		future::ready(
			serde_json::from_str::<Value>(&data)
				.map_err(Error::from)
				.and_then(|json| parse_candidate_text(&json))
				.map(|text| if text.is_empty() { None } else { Some(text) }),
		)
	});

	Ok(Box::pin(fragments))
}

pub fn endpoint(cfg: &ChatProviderConfig, stream: bool) -> String {
	let method = if stream { "streamGenerateContent?alt=sse" } else { "generateContent" };

	format!("{}{}/{}:{method}", cfg.api_base, cfg.path, cfg.model)
}

pub fn request_body(req: &ModelRequest) -> Value {
	let mut contents = Vec::with_capacity(req.history.len() + 3);

	contents.push(content("user", &req.system));
	contents.push(content("model", CHAT_ACKNOWLEDGEMENT));

	for turn in &req.history {
		let role = match turn.role {
			Role::User => "user",
			Role::Assistant => "model",
		};

		contents.push(content(role, &turn.content));
	}

	contents.push(content("user", &req.message));

	serde_json::json!({
		"contents": contents,
		"generationConfig": {
			"temperature": req.temperature,
			"maxOutputTokens": req.max_tokens,
		},
	})
}

fn content(role: &str, text: &str) -> Value {
	serde_json::json!({ "role": role, "parts": [{ "text": text }] })
}

/// Concatenates the text parts of the first candidate. A response without candidates is empty
/// unless the prompt was blocked.
fn parse_candidate_text(json: &Value) -> Result<String> {
	if let Some(err) = crate::upstream_error(json) {
		return Err(err);
	}

	let Some(candidate) =
		json.get("candidates").and_then(|v| v.as_array()).and_then(|arr| arr.first())
	else {
		if let Some(reason) = json
			.get("promptFeedback")
			.and_then(|feedback| feedback.get("blockReason"))
			.and_then(|v| v.as_str())
		{
			return Err(Error::Upstream { message: format!("Prompt was blocked: {reason}.") });
		}

		return Ok(String::new());
	};
	let mut text = String::new();

	if let Some(parts) =
		candidate.get("content").and_then(|c| c.get("parts")).and_then(|v| v.as_array())
	{
		for part in parts {
			if let Some(fragment) = part.get("text").and_then(|v| v.as_str()) {
				text.push_str(fragment);
			}
		}
	}

	Ok(text)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn joins_candidate_parts() {
		let json = serde_json::json!({
			"candidates": [
				{ "content": { "role": "model", "parts": [{ "text": "Hello " }, { "text": "again." }] } },
				{ "content": { "role": "model", "parts": [{ "text": "ignored" }] } }
			]
		});

		assert_eq!(parse_candidate_text(&json).expect("parse failed"), "Hello again.");
	}

	#[test]
	fn blocked_prompts_are_errors() {
		let json = serde_json::json!({ "promptFeedback": { "blockReason": "SAFETY" } });
		let err = parse_candidate_text(&json).expect_err("expected blocked prompt");

		assert!(err.to_string().contains("SAFETY"));
	}

	#[test]
	fn missing_candidates_are_empty() {
		let json = serde_json::json!({ "usageMetadata": {} });

		assert_eq!(parse_candidate_text(&json).expect("parse failed"), "");
	}
}
