//! End-to-end tests for the reconciliation pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use proptest::prelude::*;
use tempfile::TempDir;

use recon_cli::pipeline::{clean, clean_with_report, reconcile};
use recon_model::{Column, RawValue, SourceShape, Table};
use recon_output::to_csv_string;
use recon_transform::{IdentifierOrigin, MergeStrategy};

const USERS: &str = r#"[
  {"user_id": 1, "name": "Ann Lee", "email": "ann@example.com", "national_id": "123456789",
   "profile": {"phone": "+33 6 12 34 56 78", "tier": "gold"}},
  {"user_id": 2, "name": "Bo", "email": "b@example.org", "national_id": "12",
   "profile": {"phone": null, "tier": "silver"}}
]"#;

const TRANSACTIONS: &str = r#"{"tx_id": "T1", "user_id": 1, "amount": "12.5", "created_at": "2024-01-15T10:30:00Z", "notes": "Paid by card 4242, contact ann@example.com"}
{"tx_id": "T2", "user_id": 3, "amount": 7, "created_at": 1700000000, "notes": null}
not json
{"tx_id": "T3", "user_id": 2, "amount": "n/a", "created_at": "03/04/2024", "notes": "ok"}
"#;

fn write_sources(dir: &Path, users: &str, transactions: &str) -> (PathBuf, PathBuf) {
    let users_path = dir.join("users.json");
    let transactions_path = dir.join("transactions.json");
    fs::write(&users_path, users).unwrap();
    fs::write(&transactions_path, transactions).unwrap();
    (users_path, transactions_path)
}

#[test]
fn cleans_and_writes_expected_csv() {
    let dir = TempDir::new().unwrap();
    let (users, transactions) = write_sources(dir.path(), USERS, TRANSACTIONS);
    let output = dir.path().join("out").join("cleaned.csv");

    let frame = clean(&users, &transactions, &output).unwrap();

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(written, to_csv_string(&frame).unwrap());
    insta::assert_snapshot!(written.trim_end(), @r#"
ID,user_id,amount,created_at,notes,name,email,national_id,profile.phone,profile.tier
T1,1.00,12.50,15/01/2024 10:30:00,"Paid by card XXXX, contact <masked_email>",Ann Lee,a****@example.com,123XXXXXX,+XX X XX XX XX XX,gold
T2,3.00,7.00,14/11/2023 22:13:20,,,,,,
T3,2.00,n/a,04/03/2024 00:00:00,ok,Bo,*@example.org,12,,silver
"#);
}

#[test]
fn report_describes_every_decision() {
    let dir = TempDir::new().unwrap();
    let (users, transactions) = write_sources(dir.path(), USERS, TRANSACTIONS);

    let (frame, report) = clean_with_report(&users, &transactions, None).unwrap();

    assert_eq!(frame.height(), 3);
    assert_eq!(report.rows, 3);
    assert_eq!(report.output, None);
    assert_eq!(report.users.shape, Some(SourceShape::Array));
    assert_eq!(
        report.transactions.shape,
        Some(SourceShape::NewlineDelimited {
            parsed: 3,
            skipped: 1
        })
    );
    assert_eq!(
        report.merge,
        MergeStrategy::Joined {
            key: "user_id".to_string(),
            matched_rows: 2
        }
    );
    assert_eq!(
        report.identifier,
        IdentifierOrigin::Renamed("tx_id".to_string())
    );
    assert_eq!(report.columns[0].name, "ID");
    assert!(!dir.path().join("cleaned.csv").exists());
}

#[test]
fn identical_inputs_give_identical_output() {
    let dir = TempDir::new().unwrap();
    let (users, transactions) = write_sources(dir.path(), USERS, TRANSACTIONS);
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");

    clean(&users, &transactions, &first).unwrap();
    clean(&users, &transactions, &second).unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn synthesizes_identifier_and_unions_without_key() {
    let dir = TempDir::new().unwrap();
    let (users, transactions) = write_sources(
        dir.path(),
        r#"{"users": [{"id": 1, "segment": "b2b"}]}"#,
        r#"[{"id": 10, "amount": 1}, {"id": 11, "amount": 2.346}]"#,
    );
    let output = dir.path().join("cleaned.csv");

    let (frame, report) = clean_with_report(&users, &transactions, Some(&output)).unwrap();

    assert_eq!(report.merge, MergeStrategy::Union);
    assert_eq!(report.identifier, IdentifierOrigin::Synthesized);
    assert_eq!(frame.width(), 4);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "ID,id,amount,segment\nTXN000001,10.00,1.00,\nTXN000002,11.00,2.35,\n"
    );
}

#[test]
fn unparseable_users_still_produce_output() {
    let dir = TempDir::new().unwrap();
    let (users, transactions) = write_sources(
        dir.path(),
        "this is not json",
        r#"[{"TXN_ID": "A-1", "updated": "Jan 5, 2024 4pm"}]"#,
    );
    let output = dir.path().join("cleaned.csv");

    let (_, report) = clean_with_report(&users, &transactions, Some(&output)).unwrap();

    assert_eq!(report.users.shape, None);
    assert_eq!(report.merge, MergeStrategy::Union);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "ID,updated\nA-1,05/01/2024 16:00:00\n"
    );
}

#[test]
fn missing_source_is_an_error() {
    let dir = TempDir::new().unwrap();
    let (_, transactions) = write_sources(dir.path(), "[]", "[]");
    let output = dir.path().join("cleaned.csv");

    let err = clean(&dir.path().join("absent.json"), &transactions, &output).unwrap_err();

    assert!(format!("{err:#}").contains("absent.json"));
    assert!(!output.exists());
}

fn transaction_table(amounts: &[Option<i64>]) -> Table {
    let values: Vec<RawValue> = amounts.iter().map(|a| RawValue::from(*a)).collect();
    let user_ids: Vec<RawValue> = (0..amounts.len())
        .map(|i| RawValue::from((i % 3) as i64))
        .collect();
    Table::from_columns(vec![
        Column::new("user_id", user_ids),
        Column::new("amount", values),
    ])
    .unwrap()
}

fn user_table() -> Table {
    Table::from_columns(vec![
        Column::new("user_id", vec![RawValue::from(0), RawValue::from(1)]),
        Column::new(
            "email",
            vec![RawValue::from("zero@example.com"), RawValue::from("one@example.com")],
        ),
    ])
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn reconcile_is_deterministic_and_keeps_rows(
        amounts in prop::collection::vec(prop::option::of(-10_000i64..10_000), 0..20)
    ) {
        let first = reconcile(user_table(), transaction_table(&amounts)).unwrap();
        let second = reconcile(user_table(), transaction_table(&amounts)).unwrap();

        prop_assert_eq!(first.normalized.frame.height(), amounts.len());
        prop_assert_eq!(
            to_csv_string(&first.normalized.frame).unwrap(),
            to_csv_string(&second.normalized.frame).unwrap()
        );
        prop_assert_eq!(first.identifier, IdentifierOrigin::Synthesized);
    }
}
