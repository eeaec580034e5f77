pub mod chat;
pub mod context;
pub mod entries;
pub mod prompts;
pub mod relay;
pub mod suggestions;
pub mod time_serde;
pub mod transcripts;

mod error;

pub use chat::{ChatReply, ChatRequest, ChatResponse};
pub use entries::{
	CreateEntryRequest, DeleteEntryResponse, EntriesResponse, EntryResponse, EntryView,
	ListEntriesRequest, UpdateEntryRequest,
};
pub use error::{Error, Result};
pub use prompts::{PromptsRequest, PromptsResponse};
pub use relay::{Relay, RelayError, RelayState};
pub use suggestions::{SuggestionRequest, SuggestionResponse};
pub use transcripts::TranscriptRequest;

use std::{future::Future, pin::Pin, sync::Arc};

use jiff::tz::TimeZone;
use uuid::Uuid;

use reverie_config::{ChatProviderConfig, Config};
use reverie_providers::{ModelRequest, TextStream};
use reverie_storage::{
	db::Db,
	models::{EntryContextRow, EntryUpdate, JournalEntry, NewEntry},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Persistence seam for journal entries. Every call is scoped to one user.
pub trait JournalStore
where
	Self: Send + Sync,
{
	fn recent_context<'a>(
		&'a self,
		user_id: &'a str,
		limit: u32,
	) -> BoxFuture<'a, reverie_storage::Result<Vec<EntryContextRow>>>;

	fn list_entries<'a>(
		&'a self,
		user_id: &'a str,
		limit: u32,
		offset: u32,
	) -> BoxFuture<'a, reverie_storage::Result<Vec<JournalEntry>>>;

	fn get_entry<'a>(
		&'a self,
		user_id: &'a str,
		entry_id: Uuid,
	) -> BoxFuture<'a, reverie_storage::Result<Option<JournalEntry>>>;

	fn insert_entry<'a>(
		&'a self,
		entry: &'a NewEntry,
	) -> BoxFuture<'a, reverie_storage::Result<JournalEntry>>;

	fn update_entry<'a>(
		&'a self,
		update: &'a EntryUpdate,
	) -> BoxFuture<'a, reverie_storage::Result<JournalEntry>>;

	fn delete_entry<'a>(
		&'a self,
		user_id: &'a str,
		entry_id: Uuid,
	) -> BoxFuture<'a, reverie_storage::Result<bool>>;
}

/// Model seam. The default implementation dispatches to the configured provider backend.
pub trait ChatModel
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a ChatProviderConfig,
		req: &'a ModelRequest,
	) -> BoxFuture<'a, reverie_providers::Result<String>>;

	fn stream<'a>(
		&'a self,
		cfg: &'a ChatProviderConfig,
		req: &'a ModelRequest,
	) -> BoxFuture<'a, reverie_providers::Result<TextStream>>;
}

pub struct ReverieService {
	pub cfg: Config,
	pub store: Arc<dyn JournalStore>,
	pub model: Arc<dyn ChatModel>,
}
impl ReverieService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, store: Arc::new(db), model: Arc::new(DefaultChatModel) }
	}

	pub fn with_parts(
		cfg: Config,
		store: Arc<dyn JournalStore>,
		model: Arc<dyn ChatModel>,
	) -> Self {
		Self { cfg, store, model }
	}

	/// Resolves the caller's zone, falling back to the configured default when absent or blank.
	pub(crate) fn resolve_timezone(&self, zone: Option<&str>) -> Result<(String, TimeZone)> {
		let zone = zone
			.map(str::trim)
			.filter(|zone| !zone.is_empty())
			.unwrap_or(self.cfg.journal.default_timezone.as_str());
		let tz = reverie_domain::timezone::resolve(zone)?;

		Ok((zone.to_string(), tz))
	}
}

pub struct DefaultChatModel;

impl ChatModel for DefaultChatModel {
	fn complete<'a>(
		&'a self,
		cfg: &'a ChatProviderConfig,
		req: &'a ModelRequest,
	) -> BoxFuture<'a, reverie_providers::Result<String>> {
		Box::pin(reverie_providers::complete(cfg, req))
	}

	fn stream<'a>(
		&'a self,
		cfg: &'a ChatProviderConfig,
		req: &'a ModelRequest,
	) -> BoxFuture<'a, reverie_providers::Result<TextStream>> {
		Box::pin(reverie_providers::stream(cfg, req))
	}
}

impl JournalStore for Db {
	fn recent_context<'a>(
		&'a self,
		user_id: &'a str,
		limit: u32,
	) -> BoxFuture<'a, reverie_storage::Result<Vec<EntryContextRow>>> {
		Box::pin(reverie_storage::entries::recent_context(&self.pool, user_id, limit))
	}

	fn list_entries<'a>(
		&'a self,
		user_id: &'a str,
		limit: u32,
		offset: u32,
	) -> BoxFuture<'a, reverie_storage::Result<Vec<JournalEntry>>> {
		Box::pin(reverie_storage::entries::list_entries(&self.pool, user_id, limit, offset))
	}

	fn get_entry<'a>(
		&'a self,
		user_id: &'a str,
		entry_id: Uuid,
	) -> BoxFuture<'a, reverie_storage::Result<Option<JournalEntry>>> {
		Box::pin(reverie_storage::entries::get_entry(&self.pool, user_id, entry_id))
	}

	fn insert_entry<'a>(
		&'a self,
		entry: &'a NewEntry,
	) -> BoxFuture<'a, reverie_storage::Result<JournalEntry>> {
		Box::pin(reverie_storage::entries::insert_entry(&self.pool, entry))
	}

	fn update_entry<'a>(
		&'a self,
		update: &'a EntryUpdate,
	) -> BoxFuture<'a, reverie_storage::Result<JournalEntry>> {
		Box::pin(reverie_storage::entries::update_entry(&self.pool, update))
	}

	fn delete_entry<'a>(
		&'a self,
		user_id: &'a str,
		entry_id: Uuid,
	) -> BoxFuture<'a, reverie_storage::Result<bool>> {
		Box::pin(reverie_storage::entries::delete_entry(&self.pool, user_id, entry_id))
	}
}

pub(crate) fn require_user(user_id: &str) -> Result<&str> {
	let user_id = user_id.trim();

	if user_id.is_empty() {
		return Err(Error::InvalidRequest { message: "user_id is required.".to_string() });
	}

	Ok(user_id)
}
