use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use reverie_config::Postgres;
use reverie_storage::{
	Error,
	db::Db,
	entries,
	models::{EntryUpdate, NewEntry},
};
use reverie_testkit::TestDatabase;

fn new_entry(user_id: &str, content: &str, created_at: OffsetDateTime) -> NewEntry {
	NewEntry {
		entry_id: Uuid::new_v4(),
		user_id: user_id.to_string(),
		title: Some(format!("Title for {content}")),
		content: content.to_string(),
		mood: Some("calm".to_string()),
		summary: None,
		entry_type: "regular".to_string(),
		chat_history: None,
		created_at,
	}
}

async fn bootstrap(test_db: &TestDatabase) -> Db {
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 2 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	db
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set REVERIE_PG_DSN to run."]
async fn db_connects_and_bootstraps_twice() {
	let Some(base_dsn) = reverie_testkit::env_dsn() else {
		eprintln!("Skipping db_connects_and_bootstraps_twice; set REVERIE_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;

	db.ensure_schema().await.expect("Schema bootstrap must be idempotent.");

	let count: i64 = sqlx::query_scalar(
		"SELECT count(*) FROM information_schema.tables WHERE table_name = 'journal_entries'",
	)
	.fetch_one(&db.pool)
	.await
	.expect("Failed to query schema tables.");

	assert_eq!(count, 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set REVERIE_PG_DSN to run."]
async fn recent_context_is_newest_first_and_bounded() {
	let Some(base_dsn) = reverie_testkit::env_dsn() else {
		eprintln!("Skipping recent_context_is_newest_first_and_bounded; set REVERIE_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let base = OffsetDateTime::now_utc() - Duration::days(10);

	for day in 0..5 {
		let entry = new_entry("alice", &format!("day {day}"), base + Duration::days(day));

		entries::insert_entry(&db.pool, &entry).await.expect("Failed to insert entry.");
	}

	entries::insert_entry(&db.pool, &new_entry("bob", "not alice", base))
		.await
		.expect("Failed to insert entry.");

	let rows = entries::recent_context(&db.pool, "alice", 3).await.expect("Query failed.");
	let contents: Vec<&str> = rows.iter().map(|row| row.content.as_str()).collect();

	assert_eq!(contents, vec!["day 4", "day 3", "day 2"]);
	assert!(entries::recent_context(&db.pool, "carol", 50).await.expect("Query failed.").is_empty());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set REVERIE_PG_DSN to run."]
async fn updates_and_deletes_are_scoped_to_the_owner() {
	let Some(base_dsn) = reverie_testkit::env_dsn() else {
		eprintln!("Skipping updates_and_deletes_are_scoped_to_the_owner; set REVERIE_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let mut entry = new_entry("alice", "original", OffsetDateTime::now_utc());

	entry.summary = Some("First summary.".to_string());

	let stored = entries::insert_entry(&db.pool, &entry).await.expect("Failed to insert entry.");
	let mut update = EntryUpdate {
		entry_id: stored.entry_id,
		user_id: "mallory".to_string(),
		title: None,
		content: "rewritten".to_string(),
		mood: None,
		summary: None,
		updated_at: OffsetDateTime::now_utc(),
	};
	let err = entries::update_entry(&db.pool, &update).await.expect_err("Expected not found.");

	assert!(matches!(err, Error::NotFound(_)));

	update.user_id = "alice".to_string();

	let updated = entries::update_entry(&db.pool, &update).await.expect("Failed to update entry.");

	assert_eq!(updated.content, "rewritten");
	assert_eq!(updated.title, None);
	assert_eq!(updated.mood, None);
	assert_eq!(updated.summary.as_deref(), Some("First summary."));

	update.summary = Some(None);

	let cleared = entries::update_entry(&db.pool, &update).await.expect("Failed to update entry.");

	assert_eq!(cleared.summary, None);
	assert!(
		!entries::delete_entry(&db.pool, "mallory", stored.entry_id).await.expect("Delete failed.")
	);
	assert!(entries::delete_entry(&db.pool, "alice", stored.entry_id).await.expect("Delete failed."));
	assert!(
		entries::get_entry(&db.pool, "alice", stored.entry_id).await.expect("Query failed.").is_none()
	);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
