use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JournalEntry {
	pub entry_id: Uuid,
	pub user_id: String,
	pub title: Option<String>,
	pub content: String,
	pub mood: Option<String>,
	pub summary: Option<String>,
	pub entry_type: String,
	pub chat_history: Option<Value>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

/// The columns read to ground a chat; everything else on the row is irrelevant there.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EntryContextRow {
	pub content: String,
	pub created_at: OffsetDateTime,
	pub title: Option<String>,
	pub mood: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewEntry {
	pub entry_id: Uuid,
	pub user_id: String,
	pub title: Option<String>,
	pub content: String,
	pub mood: Option<String>,
	pub summary: Option<String>,
	pub entry_type: String,
	pub chat_history: Option<Value>,
	pub created_at: OffsetDateTime,
}

/// Field replacement for an existing entry. `summary: None` leaves the stored summary untouched.
#[derive(Debug, Clone)]
pub struct EntryUpdate {
	pub entry_id: Uuid,
	pub user_id: String,
	pub title: Option<String>,
	pub content: String,
	pub mood: Option<String>,
	pub summary: Option<Option<String>>,
	pub updated_at: OffsetDateTime,
}
