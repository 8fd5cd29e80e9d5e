use super::*;
use sw_db::DuckDbBackend;

fn store() -> (Arc<dyn Database>, MigrationStateStore) {
    let db: Arc<dyn Database> = Arc::new(DuckDbBackend::in_memory().unwrap());
    let store = MigrationStateStore::new(db.clone(), "schema_migrations");
    (db, store)
}

#[tokio::test]
async fn test_read_creates_default_record() {
    let (db, store) = store();

    let record = store.read().await.unwrap();

    assert_eq!(record, MigrationRecord::default());
    assert!(db.relation_exists("schema_migrations").await.unwrap());
    assert_eq!(
        db.query_count("SELECT * FROM schema_migrations").await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_read_is_idempotent() {
    let (db, store) = store();

    store.read().await.unwrap();
    store.read().await.unwrap();
    store.ensure_initialized().await.unwrap();

    assert_eq!(
        db.query_count("SELECT * FROM schema_migrations").await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_mark_applied_then_dirty() {
    let (_db, store) = store();
    store.read().await.unwrap();

    store.mark_applied(1).await.unwrap();
    assert_eq!(
        store.read().await.unwrap(),
        MigrationRecord {
            version: 1,
            dirty: false
        }
    );

    store.mark_dirty(2).await.unwrap();
    assert_eq!(
        store.read().await.unwrap(),
        MigrationRecord {
            version: 2,
            dirty: true
        }
    );
}

#[tokio::test]
async fn test_peek_does_not_create() {
    let (db, store) = store();

    assert_eq!(store.peek().await.unwrap(), None);
    assert!(!db.relation_exists("schema_migrations").await.unwrap());

    store.read().await.unwrap();
    store.mark_applied(3).await.unwrap();
    assert_eq!(
        store.peek().await.unwrap(),
        Some(MigrationRecord {
            version: 3,
            dirty: false
        })
    );
}

#[tokio::test]
async fn test_existing_row_is_kept() {
    let (db, store) = store();
    db.execute_batch(
        "CREATE TABLE schema_migrations (version INTEGER NOT NULL DEFAULT 0, dirty BOOLEAN NOT NULL DEFAULT false);
         INSERT INTO schema_migrations VALUES (5, true);",
    )
    .await
    .unwrap();

    assert_eq!(
        store.read().await.unwrap(),
        MigrationRecord {
            version: 5,
            dirty: true
        }
    );
}

#[tokio::test]
async fn test_schema_qualified_table() {
    let db: Arc<dyn Database> = Arc::new(DuckDbBackend::in_memory().unwrap());
    let store = MigrationStateStore::new(db.clone(), "ops.versions");

    store.read().await.unwrap();
    store.mark_applied(2).await.unwrap();

    assert!(db.relation_exists("ops.versions").await.unwrap());
    assert_eq!(store.peek().await.unwrap().map(|r| r.version), Some(2));
}

#[tokio::test]
async fn test_negative_version_is_rejected() {
    let (db, store) = store();
    store.read().await.unwrap();
    db.execute("UPDATE schema_migrations SET version = -1")
        .await
        .unwrap();

    assert!(matches!(
        store.read().await,
        Err(DbError::ExecutionError(_))
    ));
}
