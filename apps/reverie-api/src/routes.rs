use axum::{
	Json, Router,
	body::Body,
	extract::{
		FromRequestParts, Query, State,
		rejection::{JsonRejection, QueryRejection},
	},
	http::{
		HeaderMap, StatusCode,
		header::{AUTHORIZATION, CONTENT_TYPE},
		request::Parts,
	},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use reverie_service::{
	ChatReply, ChatRequest, ChatResponse, CreateEntryRequest, DeleteEntryResponse,
	EntriesResponse, EntryResponse, Error as ServiceError, ListEntriesRequest, PromptsRequest,
	PromptsResponse, SuggestionRequest, SuggestionResponse, TranscriptRequest,
	UpdateEntryRequest,
};

use crate::state::AppState;

pub const HEADER_USER_ID: &str = "X-Reverie-User-Id";

const STREAM_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/chat", post(chat))
		.route("/v1/chat/stream", post(chat_stream))
		.route(
			"/v1/entries",
			get(list_entries).post(create_entry).put(update_entry).delete(delete_entry),
		)
		.route("/v1/prompts", get(reflection_prompts))
		.route("/v1/suggestions", post(suggest))
		.route("/v1/transcripts", post(save_transcript))
		.with_state(state)
}

/// Caller identity resolved by the fronting proxy. Requests without it never reach the service.
#[derive(Debug, Clone)]
pub struct UserId(pub String);

impl FromRequestParts<AppState> for UserId {
	type Rejection = ApiError;

	async fn from_request_parts(
		parts: &mut Parts,
		state: &AppState,
	) -> Result<Self, Self::Rejection> {
		if let Some(expected) = state.service.cfg.security.api_auth_token.as_deref()
			&& read_bearer_token(&parts.headers) != Some(expected)
		{
			return Err(unauthorized());
		}

		let user_id = parts
			.headers
			.get(HEADER_USER_ID)
			.and_then(|value| value.to_str().ok())
			.map(str::trim)
			.filter(|value| !value.is_empty())
			.ok_or_else(unauthorized)?;

		Ok(Self(user_id.to_string()))
	}
}

#[derive(Debug, Deserialize)]
pub struct DeleteEntryQuery {
	pub id: Uuid,
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn chat(
	State(state): State<AppState>,
	UserId(user_id): UserId,
	payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
	let Json(req) = payload?;
	let response = state.service.chat(&user_id, req).await?;

	Ok(Json(response))
}

/// Streams the reply as raw UTF-8 fragments. A model failure after the headers are sent aborts
/// the body, so clients see a truncated chunked message instead of a clean end.
async fn chat_stream(
	State(state): State<AppState>,
	UserId(user_id): UserId,
	payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
	let Json(req) = payload?;

	match state.service.chat_stream(&user_id, req).await? {
		ChatReply::Canned(response) => Ok(Json(ChatResponse { response }).into_response()),
		ChatReply::Streaming(relay) =>
			Ok(([(CONTENT_TYPE, STREAM_CONTENT_TYPE)], Body::from_stream(relay)).into_response()),
	}
}

async fn list_entries(
	State(state): State<AppState>,
	UserId(user_id): UserId,
	query: Result<Query<ListEntriesRequest>, QueryRejection>,
) -> Result<Json<EntriesResponse>, ApiError> {
	let Query(req) = query?;
	let response = state.service.list_entries(&user_id, req).await?;

	Ok(Json(response))
}

async fn create_entry(
	State(state): State<AppState>,
	UserId(user_id): UserId,
	payload: Result<Json<CreateEntryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EntryResponse>), ApiError> {
	let Json(req) = payload?;
	let response = state.service.create_entry(&user_id, req).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn update_entry(
	State(state): State<AppState>,
	UserId(user_id): UserId,
	payload: Result<Json<UpdateEntryRequest>, JsonRejection>,
) -> Result<Json<EntryResponse>, ApiError> {
	let Json(req) = payload?;
	let response = state.service.update_entry(&user_id, req).await?;

	Ok(Json(response))
}

async fn delete_entry(
	State(state): State<AppState>,
	UserId(user_id): UserId,
	query: Result<Query<DeleteEntryQuery>, QueryRejection>,
) -> Result<Json<DeleteEntryResponse>, ApiError> {
	let Query(query) = query?;
	let response = state.service.delete_entry(&user_id, query.id).await?;

	Ok(Json(response))
}

async fn reflection_prompts(
	State(state): State<AppState>,
	UserId(user_id): UserId,
	query: Result<Query<PromptsRequest>, QueryRejection>,
) -> Result<Json<PromptsResponse>, ApiError> {
	let Query(req) = query?;
	let response = state.service.reflection_prompts(&user_id, req).await?;

	Ok(Json(response))
}

async fn suggest(
	State(state): State<AppState>,
	UserId(_): UserId,
	payload: Result<Json<SuggestionRequest>, JsonRejection>,
) -> Result<Json<SuggestionResponse>, ApiError> {
	let Json(req) = payload?;
	let response = state.service.suggest(req).await?;

	Ok(Json(response))
}

async fn save_transcript(
	State(state): State<AppState>,
	UserId(user_id): UserId,
	payload: Result<Json<TranscriptRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EntryResponse>), ApiError> {
	let Json(req) = payload?;
	let response = state.service.save_transcript(&user_id, req).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

fn read_bearer_token(headers: &HeaderMap) -> Option<&str> {
	let raw = headers.get(AUTHORIZATION)?;
	let value = raw.to_str().ok()?.trim();
	let token = value.strip_prefix("Bearer ")?.trim();

	if token.is_empty() { None } else { Some(token) }
}

fn unauthorized() -> ApiError {
	json_error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "A signed-in user is required.")
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message),
			ServiceError::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "NOT_FOUND", message),
			ServiceError::Provider { message } => {
				tracing::error!(error = %message, "Model provider request failed.");

				json_error(
					StatusCode::BAD_GATEWAY,
					"PROVIDER_ERROR",
					"The model provider could not complete the request.",
				)
			},
			ServiceError::Storage { message } => {
				tracing::error!(error = %message, "Journal storage request failed.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"STORAGE_ERROR",
					"Journal entries could not be read or written.",
				)
			},
		}
	}
}

impl From<JsonRejection> for ApiError {
	fn from(err: JsonRejection) -> Self {
		json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", err.body_text())
	}
}

impl From<QueryRejection> for ApiError {
	fn from(err: QueryRejection) -> Self {
		json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", err.body_text())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError::new(status, code, message)
}
