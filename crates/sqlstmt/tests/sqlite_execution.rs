//! Runs rendered statements against an in-memory SQLite database.

use sqlstmt::prelude::*;
use sqlstmt::{HookAction, QueryContext, QueryHook, QueryResult};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn open_db() -> SqliteDb {
    let mut db = SqliteDb::in_memory()
        .with_config(SqliteConfig::new().with_busy_timeout(Duration::from_secs(1)));
    db.open().unwrap();
    db.execute(&raw(
        "CREATE TABLE Accounts (Id INTEGER PRIMARY KEY, Name TEXT NOT NULL UNIQUE, Email TEXT)",
    ))
    .unwrap();
    db.execute(&raw(
        "CREATE TABLE Characters (Id INTEGER PRIMARY KEY, AccountId INTEGER, Name TEXT, Class TEXT)",
    ))
    .unwrap();
    db
}

fn insert_account(db: &SqliteDb, name: &str, email: &str) -> i64 {
    let mut q = insert();
    q.to("Accounts").fields(["Name", "Email"]).values([name, email]);
    db.execute(&q).unwrap().last_insert_id
}

fn insert_character(db: &SqliteDb, account_id: i64, name: &str, class: &str) {
    let mut q = insert();
    q.to("Characters")
        .fields(["AccountId", "Name", "Class"])
        .values([Value::from(account_id), Value::from(name), Value::from(class)]);
    db.execute(&q).unwrap();
}

#[test]
fn insert_then_select_by_name() {
    let db = open_db();
    let bob = insert_account(&db, "Bob", "bob@example.com");
    insert_account(&db, "Alice", "alice@example.com");
    insert_account(&db, "Carol", "carol@example.com");

    let mut q = select();
    q.from("Accounts")
        .fields(["Id", "Name"])
        .where_("Name", Condition::Equals, "Bob")
        .or("Name", Condition::Equals, "Alice");
    q.order_ascending("Name");

    let rows = db.query(&q).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get_by_name("Name").and_then(Value::as_str), Some("Alice"));
    assert_eq!(rows[1].get_by_name("Id").and_then(Value::as_i64), Some(bob));
}

#[test]
fn select_with_left_join() {
    let db = open_db();
    let bob = insert_account(&db, "Bob", "bob@example.com");
    let alice = insert_account(&db, "Alice", "alice@example.com");
    insert_character(&db, bob, "Grom", "Warrior");
    insert_character(&db, alice, "Jaina", "Mage");
    insert_character(&db, alice, "Valeera", "Rogue");

    let mut q = select();
    q.exclude_join_targets(true).skip_empty_where_groups(true);
    q.from("Accounts").fields(["Name"]);
    q.also_from("Characters", Conjunction::And)
        .fields(["Name"])
        .where_("Class", Condition::Equals, "Warrior")
        .or("Class", Condition::Equals, "Mage");
    q.join("Accounts", "Characters").on("Id", "AccountId");
    q.order_descending("Characters.Name");

    let rows = db.query(&q).unwrap();
    let pairs: Vec<(String, String)> = rows
        .iter()
        .map(|r| {
            (
                r.get(0).and_then(Value::as_str).unwrap_or_default().to_string(),
                r.get(1).and_then(Value::as_str).unwrap_or_default().to_string(),
            )
        })
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("Alice".to_string(), "Jaina".to_string()),
            ("Bob".to_string(), "Grom".to_string()),
        ]
    );
}

#[test]
fn update_and_delete() {
    let db = open_db();
    let bob = insert_account(&db, "Bob", "bob@example.com");

    let mut q = update();
    q.table("Accounts")
        .set("Email", "robert@example.com")
        .where_("Id", Condition::Equals, bob);
    assert_eq!(db.execute(&q).unwrap().rows_affected, 1);

    let mut q = select();
    q.from("Accounts")
        .fields(["Email"])
        .where_("Id", Condition::Equals, bob);
    let row = db.query_one(&q).unwrap();
    assert_eq!(row.get(0).and_then(Value::as_str), Some("robert@example.com"));

    let mut q = delete();
    q.from("Accounts").where_("Id", Condition::Equals, bob);
    assert_eq!(db.execute(&q).unwrap().rows_affected, 1);

    let mut q = select();
    q.from("Accounts").fields(["Id"]);
    assert!(db.query_opt(&q).unwrap().is_none());
}

#[test]
fn insert_or_ignore_skips_duplicates() {
    let db = open_db();
    insert_account(&db, "Bob", "bob@example.com");

    let mut dup = insert();
    dup.to("Accounts").fields(["Name"]).values(["Bob"]);
    let err = db.execute(&dup).unwrap_err();
    assert!(err.is_constraint_violation());

    dup.ignore();
    assert_eq!(db.execute(&dup).unwrap().rows_affected, 0);
}

#[test]
fn null_checks_and_limits() {
    let db = open_db();
    insert_account(&db, "Bob", "bob@example.com");
    let mut q = insert();
    q.to("Accounts").fields(["Name", "Email"]).values([Value::from("Ghost"), Value::Null]);
    db.execute(&q).unwrap();
    insert_account(&db, "Carol", "carol@example.com");

    let mut q = select();
    q.from("Accounts")
        .fields(["Name"])
        .where_("Email", Condition::IsNull, Value::Null);
    let rows = db.query(&q).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get(0).and_then(Value::as_str), Some("Ghost"));

    let mut q = select();
    q.from("Accounts")
        .fields(["Name"])
        .where_("Email", Condition::IsNotNull, Value::Null)
        .and("Name", Condition::Like, "%o%");
    q.order_ascending("Name").limit(1, 1);
    let rows = db.query(&q).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get(0).and_then(Value::as_str), Some("Carol"));
}

#[test]
fn closed_database_rejects_queries() {
    let mut db = open_db();
    db.close().unwrap();
    let mut q = select();
    q.from("Accounts").fields(["Id"]);
    assert!(matches!(db.query(&q), Err(StmtError::NotOpen)));
}

#[derive(Default)]
struct Recorder {
    before: Mutex<Vec<String>>,
    after: Mutex<Vec<QueryResult>>,
}

struct SharedRecorder(Arc<Recorder>);

impl QueryHook for SharedRecorder {
    fn before_query(&self, ctx: &QueryContext) -> HookAction {
        self.0.before.lock().unwrap().push(ctx.sql.clone());
        HookAction::Continue
    }

    fn after_query(&self, _ctx: &QueryContext, _duration: Duration, result: &QueryResult) {
        self.0.after.lock().unwrap().push(result.clone());
    }
}

struct ReadOnlyGuard;

impl QueryHook for ReadOnlyGuard {
    fn before_query(&self, ctx: &QueryContext) -> HookAction {
        if ctx.query_type == sqlstmt::QueryType::Delete {
            HookAction::Abort("deletes are disabled".to_string())
        } else {
            HookAction::Continue
        }
    }
}

#[test]
fn hooks_observe_and_veto_queries() {
    let recorder = Arc::new(Recorder::default());
    let mut db = SqliteDb::in_memory()
        .with_hook(SharedRecorder(Arc::clone(&recorder)))
        .with_hook(ReadOnlyGuard)
        .with_hook(sqlstmt::TracingSqlHook::new());
    db.open().unwrap();
    db.execute(&raw("CREATE TABLE Accounts (Id INTEGER PRIMARY KEY, Name TEXT)"))
        .unwrap();

    let mut q = insert();
    q.to("Accounts").fields(["Name"]).values(["Bob"]);
    db.execute(&q).unwrap();

    let mut q = delete();
    q.from("Accounts").where_("Id", Condition::Equals, 1);
    match db.execute(&q) {
        Err(StmtError::Aborted(reason)) => assert_eq!(reason, "deletes are disabled"),
        other => panic!("expected abort, got {other:?}"),
    }

    let before = recorder.before.lock().unwrap();
    assert_eq!(before.len(), 3);
    assert_eq!(before[1], "INSERT INTO Accounts (Name) VALUES (?)");
    assert_eq!(before[2], "DELETE FROM Accounts WHERE (Id=?)");

    // The aborted DELETE never ran, so only two completions were reported.
    let after = recorder.after.lock().unwrap();
    assert_eq!(after.as_slice(), [QueryResult::Affected(0), QueryResult::Affected(1)]);
}

#[test]
fn failed_query_is_reported_to_hooks() {
    let recorder = Arc::new(Recorder::default());
    let mut db = SqliteDb::in_memory().with_hook(SharedRecorder(Arc::clone(&recorder)));
    db.open().unwrap();

    let mut q = select();
    q.from("Missing").fields(["Id"]);
    assert!(matches!(db.query(&q), Err(StmtError::Query(_))));

    let after = recorder.after.lock().unwrap();
    assert!(matches!(after.as_slice(), [QueryResult::Error(_)]));
}
