// crates.io
use time::{Duration, OffsetDateTime, macros};
// self
use refresh_broker::{
	auth::{RefreshRecord, RefreshTokenId, SessionId, UserId},
	store::{ConsumeOutcome, MemoryStore, RotationStore},
};

fn build_record(id: &str, session: &str) -> RefreshRecord {
	RefreshRecord::builder(
		RefreshTokenId::new(id).expect("Token id fixture should be valid for store tests."),
		UserId::new("42").expect("User fixture should be valid for store tests."),
		SessionId::new(session).expect("Session fixture should be valid for store tests."),
	)
	.issued_at(macros::datetime!(2025-11-10 12:00 UTC))
	.expires_in(Duration::days(7))
	.build()
	.expect("Refresh record fixture should build successfully.")
}

#[tokio::test]
async fn save_and_fetch_round_trip() {
	let store = MemoryStore::default();
	let record = build_record("jti-1", "s1");

	store.save(record.clone()).await.expect("Saving record fixture should succeed.");

	let fetched = store
		.fetch(&record.id)
		.await
		.expect("Fetching the record should succeed.")
		.expect("Stored record should remain present.");

	assert_eq!(fetched, record);
	assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn consume_reports_every_outcome() {
	let store = MemoryStore::default();
	let record = build_record("jti-old", "s1");

	store.save(record.clone()).await.expect("Saving the initial record should succeed.");

	let instant = macros::datetime!(2025-11-11 12:00 UTC);
	let replaced = store
		.consume_and_replace(&record.id, instant, build_record("jti-new", "s1"))
		.await
		.expect("First consume should succeed.");

	assert_eq!(replaced, ConsumeOutcome::Replaced);

	let replayed = store
		.consume_and_replace(&record.id, instant, build_record("jti-other", "s1"))
		.await
		.expect("Replayed consume should report rather than fail.");

	assert_eq!(replayed, ConsumeOutcome::AlreadyConsumed);

	let missing = store
		.consume_and_replace(&RefreshTokenId::random(), instant, build_record("jti-x", "s1"))
		.await
		.expect("Unknown-token consume should report rather than fail.");

	assert_eq!(missing, ConsumeOutcome::Missing);

	store
		.revoke_session(&record.session, instant)
		.await
		.expect("Session revocation should succeed.");

	let new_id =
		RefreshTokenId::new("jti-new").expect("Token id fixture should be valid for store tests.");
	let revoked = store
		.consume_and_replace(&new_id, instant, build_record("jti-y", "s1"))
		.await
		.expect("Revoked-token consume should report rather than fail.");

	assert_eq!(revoked, ConsumeOutcome::Revoked);
}

#[tokio::test]
async fn concurrent_consume_allows_single_winner() {
	let store = MemoryStore::default();
	let record = build_record("jti-contested", "s1");

	store.save(record.clone()).await.expect("Saving the contested record should succeed.");

	let instant = OffsetDateTime::now_utc();
	let store_a = store.clone();
	let store_b = store.clone();
	let id_a = record.id.clone();
	let id_b = record.id.clone();
	let task_a = tokio::spawn(async move {
		store_a
			.consume_and_replace(&id_a, instant, build_record("jti-a", "s1"))
			.await
			.expect("Consume task A should complete successfully.")
	});
	let task_b = tokio::spawn(async move {
		store_b
			.consume_and_replace(&id_b, instant, build_record("jti-b", "s1"))
			.await
			.expect("Consume task B should complete successfully.")
	});
	let (outcome_a, outcome_b) = tokio::join!(task_a, task_b);
	let outcome_a = outcome_a.expect("Consume task A should not panic.");
	let outcome_b = outcome_b.expect("Consume task B should not panic.");
	let winners = [outcome_a, outcome_b]
		.iter()
		.filter(|outcome| matches!(outcome, ConsumeOutcome::Replaced))
		.count();

	assert_eq!(winners, 1, "exactly one consume should win");

	let consumed = store
		.fetch(&record.id)
		.await
		.expect("Fetching the contested record should succeed.")
		.expect("Contested record should remain present for replay detection.");

	assert!(consumed.is_consumed());
}

#[tokio::test]
async fn consumed_records_remain_for_replay_detection() {
	let store = MemoryStore::default();
	let record = build_record("jti-old", "s1");

	store.save(record.clone()).await.expect("Saving the record should succeed.");

	let instant = macros::datetime!(2025-11-11 12:00 UTC);

	store
		.consume_and_replace(&record.id, instant, build_record("jti-new", "s1"))
		.await
		.expect("Consume should succeed.");

	let consumed = store
		.fetch(&record.id)
		.await
		.expect("Fetching the consumed record should succeed.")
		.expect("Consumed record should not be deleted.");

	assert_eq!(consumed.consumed_at, Some(instant));
	assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn revoke_session_counts_only_fresh_revocations() {
	let store = MemoryStore::default();

	store.save(build_record("jti-1", "s1")).await.expect("Saving s1 record should succeed.");
	store.save(build_record("jti-2", "s2")).await.expect("Saving s2 record should succeed.");

	let session = SessionId::new("s1").expect("Session fixture should be valid for store tests.");
	let instant = OffsetDateTime::now_utc();
	let first = store
		.revoke_session(&session, instant)
		.await
		.expect("First revocation should succeed.");

	assert_eq!(first, 1);

	let second = store
		.revoke_session(&session, instant)
		.await
		.expect("Second revocation should succeed.");

	assert_eq!(second, 0, "already revoked records should not be counted again");
}
