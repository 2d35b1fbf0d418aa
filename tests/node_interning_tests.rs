//! Tests for path interning through the manifest node table.

use anyhow::{Context, Result, ensure};
use ninja_manifest::Manifest;
use rstest::{fixture, rstest};

#[fixture]
fn manifest() -> Manifest {
    Manifest::new()
}

#[rstest]
#[case("/x", "a/b.c")]
#[case("/x", "./a/../a/b.c")]
#[case("/", "top")]
#[case("/x/y", "/abs/out.o")]
fn interning_twice_yields_the_same_node(
    mut manifest: Manifest,
    #[case] cwd: &str,
    #[case] descriptor: &str,
) {
    let first = manifest.find_or_create_node(cwd, descriptor);
    let second = manifest.find_or_create_node(cwd, descriptor);
    assert_eq!(first, second);
    assert_eq!(manifest.nodes().len(), 1);
}

#[rstest]
fn relative_and_absolute_forms_collapse(mut manifest: Manifest) -> Result<()> {
    let relative = manifest.find_or_create_node("/x", "./a/b.c");
    let absolute = manifest.find_or_create_node("/x", "/x/a/b.c");
    ensure!(relative == absolute, "both spellings should intern to one node");
    let node = manifest.node(relative).context("node should exist")?;
    ensure!(node.path().as_str() == "/x/a/b.c", "unexpected path {}", node.path());
    Ok(())
}

#[rstest]
#[case("/")]
#[case("/x")]
#[case("/somewhere/else/entirely")]
fn absolute_descriptors_ignore_the_working_directory(mut manifest: Manifest, #[case] cwd: &str) {
    let baseline = manifest.find_or_create_node("/", "/abs/file.o");
    assert_eq!(manifest.find_or_create_node(cwd, "/abs/file.o"), baseline);
    assert_eq!(manifest.find_node(cwd, "/abs/file.o"), Some(baseline));
}

#[rstest]
fn find_misses_until_created(mut manifest: Manifest) {
    assert_eq!(manifest.find_node("/x", "a/b.c"), None);
    assert_eq!(manifest.find_node("/x", "/x/a/b.c"), None);
    assert!(manifest.nodes().is_empty(), "lookups must not create nodes");

    let id = manifest.find_or_create_node("/x", "/x/a/b.c");
    assert_eq!(manifest.find_node("/x", "a/b.c"), Some(id));
    assert_eq!(manifest.find_node("/x/a", "b.c"), Some(id));
    assert_eq!(manifest.find_node("/x", "a/c.b"), None);
}

#[rstest]
fn first_seen_descriptor_is_retained(mut manifest: Manifest) -> Result<()> {
    let id = manifest.find_or_create_node("/proj", "src/a.c");
    manifest.find_or_create_node("/proj", "/proj/src/a.c");
    let node = manifest.node(id).context("node should exist")?;
    ensure!(
        node.descriptor() == "src/a.c",
        "descriptor should be the first spelling, got {}",
        node.descriptor()
    );
    Ok(())
}

#[rstest]
fn distinct_paths_get_distinct_nodes_in_interning_order(mut manifest: Manifest) {
    let b = manifest.find_or_create_node("/p", "b");
    let a = manifest.find_or_create_node("/p", "a");
    assert_ne!(a, b);
    let paths: Vec<_> = manifest
        .nodes()
        .iter()
        .map(|(id, node)| (id, node.path().as_str()))
        .collect();
    assert_eq!(paths, vec![(b, "/p/b"), (a, "/p/a")]);
    assert_eq!(manifest.nodes().by_path("/p/a".as_ref()), Some(a));
}

#[rstest]
#[case("/x/./a")]
#[case("/x//a/")]
#[case("/x/a/")]
#[case("/x/b/../a")]
fn absolute_descriptors_are_not_normalised(
    mut manifest: Manifest,
    #[case] spelling: &str,
) -> Result<()> {
    let plain = manifest.find_or_create_node("/x", "/x/a");
    let other = manifest.find_or_create_node("/x", spelling);
    ensure!(plain != other, "{spelling} should not merge with /x/a");
    ensure!(manifest.nodes().len() == 2, "expected two nodes");
    let node = manifest.node(other).context("node should exist")?;
    ensure!(node.path().as_str() == spelling, "stored path {} rewritten", node.path());
    ensure!(
        manifest.find_node("/", spelling) == Some(other),
        "exact spelling should find its own node"
    );
    ensure!(
        manifest.nodes().by_path(spelling.as_ref()) == Some(other),
        "by_path should match the exact string"
    );
    Ok(())
}

#[rstest]
fn absolute_parent_reference_is_distinct_from_its_target(mut manifest: Manifest) {
    let target = manifest.find_or_create_node("/", "/x");
    let dotted = manifest.find_or_create_node("/", "/x/a/..");
    assert_ne!(target, dotted);
    assert_eq!(manifest.find_node("/x", "a/.."), Some(target));
}

#[rstest]
#[should_panic(expected = "must be absolute")]
fn relative_working_directory_panics(mut manifest: Manifest) {
    manifest.find_or_create_node("proj", "a.c");
}

#[rstest]
fn all_spellings_of_a_source_file_share_one_node(mut manifest: Manifest) -> Result<()> {
    let from_root = manifest.find_or_create_node("/proj", "src/a.c");
    let absolute = manifest.find_or_create_node("/proj", "/proj/src/a.c");
    let from_sibling = manifest.find_or_create_node("/sub", "../proj/src/a.c");
    let from_subdir = manifest.find_or_create_node("/proj/sub", "../src/a.c");
    ensure!(
        [absolute, from_sibling, from_subdir]
            .iter()
            .all(|id| *id == from_root),
        "every spelling should intern to the same node"
    );
    ensure!(manifest.nodes().len() == 1, "only one node should exist");
    let node = manifest.node(from_root).context("node should exist")?;
    ensure!(node.path().as_str() == "/proj/src/a.c", "unexpected path {}", node.path());
    Ok(())
}
