//! Chat-completions backend. Stateless: the full conversation is sent as one message list.

use futures::{TryStreamExt, future};
use serde_json::Value;

use reverie_config::ChatProviderConfig;

use crate::{Error, ModelRequest, Result, TextStream};

const DONE_SENTINEL: &str = "[DONE]";

pub async fn complete(cfg: &ChatProviderConfig, req: &ModelRequest) -> Result<String> {
	let client = crate::http_client(cfg, false)?;
	let res = client
		.post(endpoint(cfg))
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&request_body(cfg, req, false))
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_completion(&json)
}

pub async fn stream(cfg: &ChatProviderConfig, req: &ModelRequest) -> Result<TextStream> {
	let client = crate::http_client(cfg, true)?;
	let res = client
		.post(endpoint(cfg))
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&request_body(cfg, req, true))
		.send()
		.await?
		.error_for_status()?;

	tracing::debug!(
		provider_id = %cfg.provider_id,
		model = %cfg.model,
		"Opened completion stream."
	);

	let fragments = crate::sse::data_events(res.bytes_stream())
		.try_take_while(|data| future::ready(Ok(data.trim() != DONE_SENTINEL)))
		.try_filter_map(|data| future::ready(parse_stream_event(&data)));

	Ok(Box::pin(fragments))
}

pub fn endpoint(cfg: &ChatProviderConfig) -> String {
	format!("{}{}", cfg.api_base, cfg.path)
}

pub fn request_body(cfg: &ChatProviderConfig, req: &ModelRequest, stream: bool) -> Value {
	let mut messages = Vec::with_capacity(req.history.len() + 2);

	messages.push(serde_json::json!({ "role": "system", "content": req.system }));

	for turn in &req.history {
		messages.push(serde_json::json!({ "role": turn.role.as_str(), "content": turn.content }));
	}

	messages.push(serde_json::json!({ "role": "user", "content": req.message }));

	serde_json::json!({
		"model": cfg.model,
		"messages": messages,
		"temperature": req.temperature,
		"max_tokens": req.max_tokens,
		"stream": stream,
	})
}

fn parse_completion(json: &Value) -> Result<String> {
	if let Some(err) = crate::upstream_error(json) {
		return Err(err);
	}

	let choice = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Completion response is missing choices.".to_string(),
		})?;

	Ok(choice
		.get("message")
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.unwrap_or_default()
		.to_string())
}

/// Returns the text carried by one stream event, or `None` for events without text.
fn parse_stream_event(data: &str) -> Result<Option<String>> {
	let json: Value = serde_json::from_str(data)?;

	if let Some(err) = crate::upstream_error(&json) {
		return Err(err);
	}

	let text = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("delta"))
		.and_then(|delta| delta.get("content"))
		.and_then(|c| c.as_str())
		.filter(|text| !text.is_empty())
		.map(str::to_string);

	Ok(text)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_choice_content() {
		let json = serde_json::json!({
			"choices": [{ "message": { "role": "assistant", "content": "Hello there." } }]
		});

		assert_eq!(parse_completion(&json).expect("parse failed"), "Hello there.");
	}

	#[test]
	fn null_content_is_empty_text() {
		let json = serde_json::json!({ "choices": [{ "message": { "content": null } }] });

		assert_eq!(parse_completion(&json).expect("parse failed"), "");
	}

	#[test]
	fn surfaces_error_payloads() {
		let json = serde_json::json!({ "error": { "message": "quota exceeded" } });
		let err = parse_completion(&json).expect_err("expected upstream error");

		assert!(matches!(err, Error::Upstream { ref message } if message == "quota exceeded"));
	}

	#[test]
	fn stream_events_yield_only_text() {
		assert_eq!(
			parse_stream_event(r#"{"choices":[{"delta":{"content":"Hi"}}]}"#)
				.expect("parse failed"),
			Some("Hi".to_string())
		);
		assert_eq!(
			parse_stream_event(r#"{"choices":[{"delta":{"role":"assistant"}}]}"#)
				.expect("parse failed"),
			None
		);
		assert_eq!(
			parse_stream_event(r#"{"choices":[{"delta":{"content":""}}]}"#).expect("parse failed"),
			None
		);
		assert!(parse_stream_event("not json").is_err());
	}
}
