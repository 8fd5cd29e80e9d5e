use super::*;
use crate::resource::StaticSource;
use sw_core::parse_item_list;
use sw_db::DuckDbBackend;
use tempfile::tempdir;

fn memory_db() -> Arc<dyn Database> {
    Arc::new(DuckDbBackend::in_memory().unwrap())
}

#[test]
fn test_defaults() {
    let migrator = Migrator::new(memory_db());
    assert_eq!(
        migrator.item_list_path(),
        PathBuf::from("./migrations").join("migrate.txt")
    );
    assert_eq!(migrator.state_table, "schema_migrations");
}

#[test]
fn test_from_config() {
    let config = MigrateConfig {
        migrations_dir: PathBuf::from("/srv/db"),
        item_list: "order.txt".to_string(),
        state_table: "versions".to_string(),
        ..Default::default()
    };
    let migrator = Migrator::from_config(memory_db(), &config).unwrap();
    assert_eq!(migrator.item_list_path(), PathBuf::from("/srv/db/order.txt"));
    assert_eq!(migrator.state_table, "versions");
}

#[test]
fn test_from_config_rejects_bad_table() {
    let config = MigrateConfig {
        state_table: "drop table;".to_string(),
        ..Default::default()
    };
    assert!(Migrator::from_config(memory_db(), &config).is_err());
}

#[tokio::test]
async fn test_run_rejects_bad_table_before_reading_list() {
    let dir = tempdir().unwrap();
    let migrator = Migrator::new(memory_db())
        .with_migrations_dir(dir.path().join("migrations"))
        .with_state_table("bad name");

    let err = migrator.run(&RunContext::new()).await.unwrap_err();

    assert!(matches!(
        err,
        MigrateError::Core(CoreError::ConfigInvalid { .. })
    ));
    assert!(!dir.path().join("migrations").exists());
}

#[tokio::test]
async fn test_run_with_missing_list_creates_it() {
    let dir = tempdir().unwrap();
    let migrations = dir.path().join("migrations");
    let db = memory_db();
    let migrator = Migrator::new(db.clone()).with_migrations_dir(&migrations);

    let report = migrator.run(&RunContext::new()).await.unwrap();

    assert!(report.is_noop());
    assert_eq!(report.version, 0);
    assert!(migrations.join("migrate.txt").is_file());
    assert!(db.relation_exists("schema_migrations").await.unwrap());
}

#[tokio::test]
async fn test_with_static_resources() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("migrate.txt"), "1_create.sql\n").unwrap();
    let db = memory_db();
    let migrator = Migrator::new(db.clone())
        .with_migrations_dir(dir.path())
        .with_resources(Arc::new(
            StaticSource::new().with("1_create.sql", "CREATE TABLE embedded (id INT);"),
        ));

    let report = migrator.run(&RunContext::new()).await.unwrap();

    assert_eq!(report.applied, vec![1]);
    assert!(db.relation_exists("embedded").await.unwrap());
}

#[test]
fn test_status_pending() {
    let items = parse_item_list("a.sql\nb.sql\nc.sql").unwrap();

    let fresh = Status {
        record: None,
        items: items.clone(),
    };
    assert_eq!(fresh.pending().len(), 3);
    assert!(!fresh.is_dirty());

    let applied = Status {
        record: Some(MigrationRecord {
            version: 2,
            dirty: false,
        }),
        items: items.clone(),
    };
    assert_eq!(applied.pending()[0].identifier(), "c.sql");

    let dirty = Status {
        record: Some(MigrationRecord {
            version: 2,
            dirty: true,
        }),
        items: items.clone(),
    };
    assert_eq!(dirty.pending()[0].identifier(), "b.sql");

    let overflow = Status {
        record: Some(MigrationRecord {
            version: 7,
            dirty: false,
        }),
        items,
    };
    assert!(overflow.pending().is_empty());
}
