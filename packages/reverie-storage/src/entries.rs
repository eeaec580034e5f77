use sqlx::PgExecutor;
use uuid::Uuid;

use crate::{
	Error, Result,
	models::{EntryContextRow, EntryUpdate, JournalEntry, NewEntry},
};

const ENTRY_COLUMNS: &str = "entry_id, user_id, title, content, mood, summary, entry_type, \
	chat_history, created_at, updated_at";

/// Most recent entries first, at most `limit` of them.
pub async fn recent_context<'e, E>(
	executor: E,
	user_id: &str,
	limit: u32,
) -> Result<Vec<EntryContextRow>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, EntryContextRow>(
		"\
SELECT content, created_at, title, mood
FROM journal_entries
WHERE user_id = $1
ORDER BY created_at DESC
LIMIT $2",
	)
	.bind(user_id)
	.bind(i64::from(limit))
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn list_entries<'e, E>(
	executor: E,
	user_id: &str,
	limit: u32,
	offset: u32,
) -> Result<Vec<JournalEntry>>
where
	E: PgExecutor<'e>,
{
	let sql = format!(
		"SELECT {ENTRY_COLUMNS} FROM journal_entries WHERE user_id = $1 \
		 ORDER BY created_at DESC LIMIT $2 OFFSET $3"
	);
	let rows = sqlx::query_as::<_, JournalEntry>(&sql)
		.bind(user_id)
		.bind(i64::from(limit))
		.bind(i64::from(offset))
		.fetch_all(executor)
		.await?;

	Ok(rows)
}

pub async fn get_entry<'e, E>(
	executor: E,
	user_id: &str,
	entry_id: Uuid,
) -> Result<Option<JournalEntry>>
where
	E: PgExecutor<'e>,
{
	let sql =
		format!("SELECT {ENTRY_COLUMNS} FROM journal_entries WHERE entry_id = $1 AND user_id = $2");
	let row = sqlx::query_as::<_, JournalEntry>(&sql)
		.bind(entry_id)
		.bind(user_id)
		.fetch_optional(executor)
		.await?;

	Ok(row)
}

pub async fn insert_entry<'e, E>(executor: E, entry: &NewEntry) -> Result<JournalEntry>
where
	E: PgExecutor<'e>,
{
	if entry.user_id.trim().is_empty() {
		return Err(Error::InvalidArgument("user_id must be non-empty.".to_string()));
	}

	let sql = format!(
		"INSERT INTO journal_entries \
		 (entry_id, user_id, title, content, mood, summary, entry_type, chat_history, created_at, \
		 updated_at) \
		 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9) \
		 RETURNING {ENTRY_COLUMNS}"
	);
	let row = sqlx::query_as::<_, JournalEntry>(&sql)
		.bind(entry.entry_id)
		.bind(entry.user_id.as_str())
		.bind(entry.title.as_deref())
		.bind(entry.content.as_str())
		.bind(entry.mood.as_deref())
		.bind(entry.summary.as_deref())
		.bind(entry.entry_type.as_str())
		.bind(entry.chat_history.as_ref())
		.bind(entry.created_at)
		.fetch_one(executor)
		.await?;

	Ok(row)
}

/// Updates an entry owned by `update.user_id`. Fails with `NotFound` when no such entry exists.
pub async fn update_entry<'e, E>(executor: E, update: &EntryUpdate) -> Result<JournalEntry>
where
	E: PgExecutor<'e>,
{
	let sql = format!(
		"UPDATE journal_entries \
		 SET title = $3, content = $4, mood = $5, \
		 summary = CASE WHEN $6 THEN $7 ELSE summary END, updated_at = $8 \
		 WHERE entry_id = $1 AND user_id = $2 \
		 RETURNING {ENTRY_COLUMNS}"
	);
	let (replace_summary, summary) = match &update.summary {
		Some(summary) => (true, summary.as_deref()),
		None => (false, None),
	};
	let row = sqlx::query_as::<_, JournalEntry>(&sql)
		.bind(update.entry_id)
		.bind(update.user_id.as_str())
		.bind(update.title.as_deref())
		.bind(update.content.as_str())
		.bind(update.mood.as_deref())
		.bind(replace_summary)
		.bind(summary)
		.bind(update.updated_at)
		.fetch_optional(executor)
		.await?;

	row.ok_or_else(|| Error::NotFound(format!("Entry {} was not found.", update.entry_id)))
}

/// Returns whether a row was deleted.
pub async fn delete_entry<'e, E>(executor: E, user_id: &str, entry_id: Uuid) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query("DELETE FROM journal_entries WHERE entry_id = $1 AND user_id = $2")
		.bind(entry_id)
		.bind(user_id)
		.execute(executor)
		.await?;

	Ok(result.rows_affected() > 0)
}
