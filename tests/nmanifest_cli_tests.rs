//! Integration tests for the `nmanifest` binary using `assert_cmd`.

use anyhow::{Context, Result, ensure};
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn summary_prints_the_replayed_manifest() -> Result<()> {
    let output = Command::cargo_bin("nmanifest")
        .context("locate nmanifest binary")?
        .arg("summary")
        .arg("tests/data/project.json")
        .output()
        .context("run nmanifest summary")?;
    ensure!(output.status.success(), "summary should succeed");

    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).context("summary should be JSON")?;
    let nodes = summary["nodes"].as_array().context("nodes array")?;
    ensure!(nodes.len() == 2, "expected two nodes, got {}", nodes.len());
    ensure!(
        summary["nodes"][0]["path"] == "/proj/src/a.c",
        "unexpected first node {}",
        summary["nodes"][0]
    );
    Ok(())
}

#[test]
fn summary_fails_on_a_rejected_declaration() -> Result<()> {
    Command::cargo_bin("nmanifest")
        .context("locate nmanifest binary")?
        .arg("summary")
        .arg("tests/data/duplicate_rule.json")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("duplicate rule 'cc'"));
    Ok(())
}

#[test]
fn summary_reports_malformed_scripts() -> Result<()> {
    let temp = tempdir().context("create temp dir for script")?;
    let script = temp.path().join("broken.json");
    fs::write(&script, r#"{"declarations": [{"op": "pool", "name": "p", "depth": 0}]}"#)
        .context("write script")?;
    Command::cargo_bin("nmanifest")
        .context("locate nmanifest binary")?
        .arg("summary")
        .arg(&script)
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("invalid depth 0 for pool 'p'")
                .and(predicate::str::contains("pool depth must be a positive integer")),
        );
    Ok(())
}

#[test]
fn resolve_prints_canonical_paths() -> Result<()> {
    Command::cargo_bin("nmanifest")
        .context("locate nmanifest binary")?
        .args(["resolve", "-C", "/proj/sub", "../src/a.c", "./b.c", "/abs/c.c"])
        .assert()
        .success()
        .stdout("/proj/src/a.c\n/proj/sub/b.c\n/abs/c.c\n");
    Ok(())
}

#[test]
fn resolve_rejects_a_relative_working_directory() -> Result<()> {
    Command::cargo_bin("nmanifest")
        .context("locate nmanifest binary")?
        .args(["resolve", "-C", "proj", "a.c"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not an absolute path"));
    Ok(())
}
