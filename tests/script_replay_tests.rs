//! Tests for replaying declaration scripts and capturing summaries.

use anyhow::{Context, Result, ensure};
use ninja_manifest::DeclarationError;
use ninja_manifest::script::{DeclarationScript, ScriptError};
use ninja_manifest::summary::{ManifestSummary, NodeSummary, PoolSummary};
use rstest::rstest;

#[rstest]
fn project_script_interns_and_declares() -> Result<()> {
    let manifest = DeclarationScript::from_path("tests/data/project.json")?.replay()?;
    let summary = ManifestSummary::capture(&manifest);

    ensure!(
        summary.nodes
            == vec![
                NodeSummary {
                    path: "/proj/src/a.c".into(),
                    descriptor: "src/a.c".into(),
                },
                NodeSummary {
                    path: "/proj/sub/b.c".into(),
                    descriptor: "./b.c".into(),
                },
            ],
        "unexpected nodes {:?}",
        summary.nodes
    );
    ensure!(
        summary.pools
            == vec![
                PoolSummary {
                    name: "console".into(),
                    depth: 1,
                },
                PoolSummary {
                    name: "link".into(),
                    depth: 2,
                },
            ],
        "unexpected pools {:?}",
        summary.pools
    );

    let root = summary.scopes.first().context("root scope")?;
    let names: Vec<_> = root.rules.iter().map(|rule| rule.name.as_str()).collect();
    ensure!(names == ["phony", "cc", "link"], "unexpected root rules {names:?}");
    ensure!(
        root.variables.get("builddir").map(String::as_str) == Some("out"),
        "builddir should be bound in the root scope"
    );
    let sub = summary.scopes.get(1).context("sub scope")?;
    ensure!(sub.parent == Some(0), "sub should nest under root");
    let cc = sub.rules.first().context("sub cc")?;
    ensure!(
        cc.parameters.get("command").map(String::as_str) == Some("clang -c $in -o $out"),
        "sub scope should hold the shadowing cc"
    );

    let link = manifest
        .lookup_rule(manifest.root_scope(), "link")
        .and_then(|id| manifest.rule(id))
        .context("link rule")?;
    ensure!(
        link.pool() == manifest.lookup_pool("link"),
        "link rule should bind the link pool"
    );
    Ok(())
}

#[rstest]
#[case("tests/data/duplicate_rule.json", 1, DeclarationError::DuplicateRule { name: "cc".into() })]
#[case("tests/data/unknown_parameter.json", 0, DeclarationError::UnknownParameter { rule: "cc".into(), parameter: "Command".into() })]
fn rejected_scripts_report_the_failing_declaration(
    #[case] path: &str,
    #[case] expected_index: usize,
    #[case] expected: DeclarationError,
) -> Result<()> {
    let err = DeclarationScript::from_path(path)?
        .replay()
        .expect_err("script should be rejected");
    match err {
        ScriptError::Declaration { index, source } => {
            ensure!(index == expected_index, "unexpected index {index}");
            ensure!(source == expected, "unexpected error {source:?}");
        }
        other => anyhow::bail!("expected a declaration error, got {other:?}"),
    }
    Ok(())
}

#[rstest]
fn missing_script_reports_a_read_error() {
    let err = DeclarationScript::from_path("tests/data/does_not_exist.json")
        .expect_err("missing file should fail");
    assert!(matches!(err, ScriptError::Read { .. }));
}

#[rstest]
fn summary_serialises_without_empty_collections() -> Result<()> {
    let manifest = DeclarationScript::from_json(r#"{"declarations": []}"#)?.replay()?;
    let json = serde_json::to_value(ManifestSummary::from(&manifest))?;
    let expected = serde_json::json!({
        "nodes": [],
        "pools": [{ "name": "console", "depth": 1 }],
        "scopes": [{ "rules": [{ "name": "phony" }] }],
    });
    ensure!(json == expected, "unexpected summary {json}");
    Ok(())
}
