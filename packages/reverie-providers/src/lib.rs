pub mod gemini;
pub mod openai;
pub mod sse;

mod error;

pub use error::{Error, Result};

use std::{pin::Pin, time::Duration};

use futures::Stream;
use reqwest::{
	Client,
	header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue},
};
use serde_json::{Map, Value};

use reverie_config::{ChatProviderConfig, ChatProviderKind};
use reverie_domain::ChatTurn;

/// Lazily produced model output. Finite and single-consumer; dropping it closes the upstream
/// connection.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Everything a backend needs for one completion. The grounding text travels in `system` and is
/// never part of `history`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
	pub system: String,
	pub history: Vec<ChatTurn>,
	pub message: String,
	pub max_tokens: u32,
	pub temperature: f32,
}

/// Runs a completion against whichever backend `cfg.kind` selects.
pub async fn complete(cfg: &ChatProviderConfig, req: &ModelRequest) -> Result<String> {
	match cfg.kind {
		ChatProviderKind::OpenAi => openai::complete(cfg, req).await,
		ChatProviderKind::Gemini => gemini::complete(cfg, req).await,
	}
}

/// Opens a streaming completion against whichever backend `cfg.kind` selects.
pub async fn stream(cfg: &ChatProviderConfig, req: &ModelRequest) -> Result<TextStream> {
	match cfg.kind {
		ChatProviderKind::OpenAi => openai::stream(cfg, req).await,
		ChatProviderKind::Gemini => gemini::stream(cfg, req).await,
	}
}

pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);

	extend_default_headers(headers, default_headers)
}

pub fn api_key_headers(
	header: &'static str,
	api_key: &str,
	default_headers: &Map<String, Value>,
) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(HeaderName::from_static(header), HeaderValue::from_str(api_key)?);

	extend_default_headers(headers, default_headers)
}

fn extend_default_headers(
	mut headers: HeaderMap,
	default_headers: &Map<String, Value>,
) -> Result<HeaderMap> {
	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

/// Non-streaming calls are bounded by the request timeout; streamed bodies only by the connect
/// timeout, since a long reply is not a failure.
pub(crate) fn http_client(cfg: &ChatProviderConfig, streaming: bool) -> Result<Client> {
	let mut builder =
		Client::builder().connect_timeout(Duration::from_millis(cfg.connect_timeout_ms));

	if !streaming {
		builder = builder.timeout(Duration::from_millis(cfg.timeout_ms));
	}

	Ok(builder.build()?)
}

/// Extracts `error.message` from a provider error payload, if there is one.
pub(crate) fn upstream_error(json: &Value) -> Option<Error> {
	let error = json.get("error")?;
	let message = error
		.get("message")
		.and_then(|v| v.as_str())
		.map(str::to_string)
		.unwrap_or_else(|| error.to_string());

	Some(Error::Upstream { message })
}
