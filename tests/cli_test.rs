//! Integration tests for the coin-exchange CLI.
//!
//! These run the actual binary against a ledger file in a scratch
//! directory; each invocation is a fresh process, so they also cover
//! reopening the ledger between operations.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;

fn run(ledger: &Path, args: &[&str]) -> Value {
    let mut cmd = Command::cargo_bin("coin-exchange").unwrap();
    let assert = cmd.arg(ledger).args(args).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    serde_json::from_str(&stdout).unwrap()
}

fn create_user(ledger: &Path, username: &str) -> String {
    let account = run(ledger, &["create", username]);
    assert_eq!(account["username"], username);
    assert_eq!(account["balance"], 100);
    account["id"].as_str().unwrap().to_string()
}

#[test]
fn test_create_prints_account_with_starting_balance() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("ledger.json");

    let account = run(&ledger, &["create", "alice"]);
    assert_eq!(account["username"], "alice");
    assert_eq!(account["balance"], 100);
    assert!(!account["id"].as_str().unwrap().is_empty());
}

#[test]
fn test_get_returns_created_account() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("ledger.json");
    let id = create_user(&ledger, "alice");

    let account = run(&ledger, &["get", &id]);
    assert_eq!(account["id"], id.as_str());
    assert_eq!(account["username"], "alice");
}

#[test]
fn test_get_unknown_id_fails() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("ledger.json");

    let mut cmd = Command::cargo_bin("coin-exchange").unwrap();
    cmd.arg(&ledger)
        .args(["get", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("account not found"));
}

#[test]
fn test_list_preserves_creation_order() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("ledger.json");
    let alice = create_user(&ledger, "alice");
    let bob = create_user(&ledger, "bob");

    let listed = run(&ledger, &["list"]);
    let ids: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![alice.as_str(), bob.as_str()]);
}

#[test]
fn test_send_updates_and_persists_both_balances() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("ledger.json");
    let alice = create_user(&ledger, "alice");
    let bob = create_user(&ledger, "bob");

    let receipt = run(&ledger, &["send", &alice, &bob, "30"]);
    assert_eq!(receipt["sender"]["balance"], 70);
    assert_eq!(receipt["receiver"]["balance"], 130);

    // A later invocation reads the committed balances back.
    let account = run(&ledger, &["get", &alice]);
    assert_eq!(account["balance"], 70);
    let account = run(&ledger, &["get", &bob]);
    assert_eq!(account["balance"], 130);
}

#[test]
fn test_send_to_self_fails() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("ledger.json");
    let alice = create_user(&ledger, "alice");

    let mut cmd = Command::cargo_bin("coin-exchange").unwrap();
    cmd.arg(&ledger)
        .args(["send", &alice, &alice, "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("yourself"));
}

#[test]
fn test_send_rejects_non_positive_amounts() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("ledger.json");
    let alice = create_user(&ledger, "alice");
    let bob = create_user(&ledger, "bob");

    for amount in ["0", "-5", "ten"] {
        let mut cmd = Command::cargo_bin("coin-exchange").unwrap();
        cmd.arg(&ledger)
            .args(["send", &alice, &bob, amount])
            .assert()
            .failure()
            .stderr(predicate::str::contains("positive"));
    }

    let account = run(&ledger, &["get", &alice]);
    assert_eq!(account["balance"], 100);
}

#[test]
fn test_send_with_insufficient_balance_fails() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("ledger.json");
    let alice = create_user(&ledger, "alice");
    let bob = create_user(&ledger, "bob");

    let mut cmd = Command::cargo_bin("coin-exchange").unwrap();
    cmd.arg(&ledger)
        .args(["send", &alice, &bob, "150"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot send 150"));

    let account = run(&ledger, &["get", &alice]);
    assert_eq!(account["balance"], 100);
}

#[test]
fn test_missing_arguments_print_usage() {
    let mut cmd = Command::cargo_bin("coin-exchange").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage: coin-exchange"));
}

#[test]
fn test_unknown_command_prints_usage() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("ledger.json");

    let mut cmd = Command::cargo_bin("coin-exchange").unwrap();
    cmd.arg(&ledger)
        .arg("destroy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: coin-exchange"));
}
