use super::*;

#[test]
fn test_kind_from_sql_suffix() {
    assert_eq!(ItemKind::from_identifier("1_create.sql"), ItemKind::Sql);
}

#[test]
fn test_kind_without_suffix_is_procedure() {
    assert_eq!(ItemKind::from_identifier("Seed"), ItemKind::Procedure);
}

#[test]
fn test_kind_unknown_suffix() {
    assert_eq!(
        ItemKind::from_identifier("2.mongodb"),
        ItemKind::Unsupported(".mongodb".to_string())
    );
}

#[test]
fn test_kind_uses_last_segment_only() {
    assert_eq!(ItemKind::from_identifier("v1.2/Backfill"), ItemKind::Procedure);
    assert_eq!(ItemKind::from_identifier("nested/3_alter.sql"), ItemKind::Sql);
}

#[test]
fn test_kind_is_case_sensitive() {
    assert_eq!(
        ItemKind::from_identifier("4_drop.SQL"),
        ItemKind::Unsupported(".SQL".to_string())
    );
}

#[test]
fn test_item_name_rejects_empty() {
    assert!(ItemName::try_new("").is_none());
    assert_eq!(ItemName::try_new("Seed").unwrap(), "Seed");
}

#[test]
fn test_schema_item_accessors() {
    let item = SchemaItem::new(ItemName::try_new("1_create.sql").unwrap(), 1);
    assert_eq!(item.identifier(), "1_create.sql");
    assert_eq!(item.ordinal(), 1);
    assert_eq!(item.kind(), &ItemKind::Sql);
    assert_eq!(item.kind().to_string(), "sql");
}
