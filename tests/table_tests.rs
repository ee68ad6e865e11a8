mod common;

use common::{table_text, zookeeper_records, HEADER, RULE, SEPARATOR};
use proof_census::parser::{parse_table, FileRecord};
use proof_census::utils::TableError;

#[test]
fn test_five_row_table() {
    let text = [
        "| file | Trusted | Spec | Proof | Exec | Proof+Exec |",
        "|---|---|---|---|---|---|",
        "x|pkg/exec/foo.rs|0|2|3|10|1",
        "| ---------------- | | | | | |",
        "| total | 0 | 2 | 3 | 10 | 1 |",
    ]
    .join("\n");

    let table = parse_table(&text).unwrap();
    assert_eq!(table.records, vec![FileRecord::new("pkg/exec/foo.rs", 0, 2, 3, 10, 1)]);
}

#[test]
fn test_rows_kept_in_order() {
    let records = zookeeper_records();
    let table = parse_table(&table_text(&records)).unwrap();

    assert_eq!(table.records, records);
    assert_eq!(table.totals_match(), Some(true));
}

#[test]
fn test_missing_separator_row() {
    let text = [HEADER, RULE, "| a.rs | 0 | 0 | 0 | 0 | 0 | 0 | 0 | 0 | 0 |", "| total | 0 | 0 | 0 | 0 | 0 | 0 | 0 | 0 | 0 |"]
        .join("\n");
    assert!(matches!(
        parse_table(&text),
        Err(TableError::SchemaViolation { row: 3, .. })
    ));
}

#[test]
fn test_relabeled_header_column() {
    let text = table_text(&[]).replacen("| Spec |", "| Specs |", 1);
    match parse_table(&text) {
        Err(TableError::SchemaViolation { row, expected, found, .. }) => {
            assert_eq!(row, 1);
            assert_eq!(expected, "Spec");
            assert_eq!(found, "Specs");
        }
        other => panic!("expected schema violation, got {:?}", other),
    }
}

#[test]
fn test_header_is_case_sensitive() {
    let text = table_text(&[]).replacen("| file |", "| File |", 1);
    assert!(matches!(parse_table(&text), Err(TableError::SchemaViolation { .. })));
}

#[test]
fn test_malformed_count_identifies_row() {
    let mut text = table_text(&[FileRecord::new("a.rs", 0, 1, 1, 1, 1)]);
    text = text.replacen("| a.rs | 0 | 1 | 1 | 1 | 1 |", "| a.rs | 0 | 1 | 1.5 | 1 | 1 |", 1);

    let err = parse_table(&text).unwrap_err();
    assert!(matches!(err, TableError::MalformedCount { row: 3, label: "Proof", .. }));
    assert!(err.to_string().contains("row 3"));
}

#[test]
fn test_separator_only_needs_dash_run() {
    let text = [HEADER, RULE, SEPARATOR, "| total | 0 | 0 | 0 | 0 | 0 |"].join("\n");
    assert!(parse_table(&text).unwrap().records.is_empty());
}
