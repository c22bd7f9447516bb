// End-to-end tests for the `shoprec` binary.
// Run with: cargo test -p shoprec-cli --test run_tests

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn shoprec() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_shoprec"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd.env_remove("SHOPREC_ORDERS");
    cmd.env_remove("SHOPREC_TRANSACTIONS");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn run(args: &[&str], out_dir: &Path) -> Output {
    let output = out_dir.join("summary.csv");
    shoprec()
        .arg("run")
        .args(args)
        .arg("--output")
        .arg(&output)
        .output()
        .expect("failed to execute shoprec")
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
fn run_writes_summary_and_prints_table() {
    let dir = tempfile::tempdir().unwrap();
    let orders = fixture("orders.csv");
    let txns = fixture("transactions.csv");
    let out = run(
        &["--orders", orders.to_str().unwrap(), "--transactions", txns.to_str().unwrap()],
        dir.path(),
    );

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("Reconciliation complete."));

    let table = stdout(&out);
    assert!(table.starts_with("Month"), "{table}");
    assert!(table.contains("2024-04"));

    let csv = std::fs::read_to_string(dir.path().join("summary.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("Month,Gross Revenue (recognized),"));
    assert!(lines[1].starts_with("2024-01,20,2,5,1,23,"));
    assert!(lines[4].starts_with("2024-04,0,0,0,0,0,0,0,0,0,0,10,"));
}

#[test]
fn missing_transactions_file_stops_before_run() {
    let dir = tempfile::tempdir().unwrap();
    let orders = fixture("orders.csv");
    let out = run(&["--orders", orders.to_str().unwrap()], dir.path());

    assert_eq!(out.status.code(), Some(2));
    let err = stderr(&out);
    assert!(err.contains("Please provide both the Orders and Payment Transactions CSV files."));
    assert!(err.contains("--transactions"), "{err}");
    assert!(!dir.path().join("summary.csv").exists());
}

#[test]
fn nonexistent_orders_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let txns = fixture("transactions.csv");
    let out = run(
        &["--orders", "nope/orders.csv", "--transactions", txns.to_str().unwrap()],
        dir.path(),
    );
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("orders file not found"));
}

#[test]
fn json_output() {
    let dir = tempfile::tempdir().unwrap();
    let orders = fixture("orders.csv");
    let txns = fixture("transactions.csv");
    let out = run(
        &[
            "--orders",
            orders.to_str().unwrap(),
            "--transactions",
            txns.to_str().unwrap(),
            "--json",
            "-q",
        ],
        dir.path(),
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stderr(&out).is_empty(), "quiet run wrote: {}", stderr(&out));

    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json["summary"]["months"], 4);
    assert_eq!(json["summary"]["dropped_deferred"], 1);
    assert_eq!(json["report"]["rows"][0]["month"], "2024-01");
    assert_eq!(json["report"]["columns"][12], "Net Cash Received");
}

#[test]
fn missing_column_exits_with_schema_code() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("orders.csv");
    std::fs::write(&bad, "Paid at,Fulfilled at\n2024-01-01,\n").unwrap();
    let txns = fixture("transactions.csv");
    let out = run(
        &["--orders", bad.to_str().unwrap(), "--transactions", txns.to_str().unwrap()],
        dir.path(),
    );
    assert_eq!(out.status.code(), Some(5));
    assert!(stderr(&out).contains("orders: missing column 'Fulfillment Status'"));
}

#[test]
fn semicolon_inputs_detected() {
    let dir = tempfile::tempdir().unwrap();
    let orders = dir.path().join("orders.csv");
    let txns = dir.path().join("txns.csv");
    std::fs::write(
        &orders,
        "Paid at;Fulfilled at;Fulfillment Status;Financial Status;Lineitem quantity;\
Lineitem price;Discount Amount;Shipping;Taxes\n\
2024-01-10;2024-01-15;fulfilled;paid;2;10;2;5;1\n",
    )
    .unwrap();
    std::fs::write(&txns, "Transaction Date;Type;Amount;Fee;Net\n2024-01-10;charge;24;1;23\n")
        .unwrap();

    let out = run(
        &["--orders", orders.to_str().unwrap(), "--transactions", txns.to_str().unwrap(), "--no-table"],
        dir.path(),
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).is_empty());
    let csv = std::fs::read_to_string(dir.path().join("summary.csv")).unwrap();
    assert_eq!(csv.lines().nth(1), Some("2024-01,20,2,5,1,23,0,0,0,0,0,24,1,23"));
}

#[test]
fn out_of_range_totals_fail_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let txns = dir.path().join("txns.csv");
    std::fs::write(
        &txns,
        "Transaction Date,Type,Amount,Fee,Net\n\
2024-01-10,charge,50000000000000000000000000000,1,1\n\
2024-01-11,charge,50000000000000000000000000000,1,1\n",
    )
    .unwrap();
    let orders = fixture("orders.csv");
    let out = run(
        &["--orders", orders.to_str().unwrap(), "--transactions", txns.to_str().unwrap()],
        dir.path(),
    );
    assert_eq!(out.status.code(), Some(4));
    assert!(stderr(&out).contains("out of range"), "{}", stderr(&out));
    assert!(!dir.path().join("summary.csv").exists());
}

#[test]
fn validate_rejects_bad_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "[rules]\npaid_status = \"\"\n").unwrap();
    let out = shoprec().arg("validate").arg(&config).output().unwrap();
    assert_eq!(out.status.code(), Some(3));
    assert!(stderr(&out).contains("rules.paid_status"));
}

#[test]
fn default_config_validates() {
    let dir = tempfile::tempdir().unwrap();
    let out = shoprec().arg("config").output().unwrap();
    assert!(out.status.success());
    let config = dir.path().join("default.toml");
    std::fs::write(&config, &out.stdout).unwrap();

    let out = shoprec().arg("validate").arg(&config).output().unwrap();
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("OK"));
}
