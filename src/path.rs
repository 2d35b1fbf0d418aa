//! Lexical path canonicalisation.
//!
//! Node identity is keyed by the string produced here, so two descriptors that
//! name the same file from different working directories must resolve to the
//! same canonical path. Resolution is purely lexical: symlinks are not
//! followed and the filesystem is never consulted.
//!
//! # Examples
//!
//! ```
//! use camino::Utf8Path;
//! use ninja_manifest::path::resolve;
//!
//! assert_eq!(resolve(Utf8Path::new("/x"), "./a/b.c").as_str(), "/x/a/b.c");
//! assert_eq!(resolve(Utf8Path::new("/proj/sub"), "../src/a.c").as_str(), "/proj/src/a.c");
//! assert_eq!(resolve(Utf8Path::new("/ignored"), "/x//a/").as_str(), "/x//a/");
//! ```

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Resolve `descriptor` against `working_directory`.
///
/// Absolute descriptors are returned unmodified. Relative descriptors are
/// joined onto the working directory and normalised: `.` components vanish,
/// `..` removes the preceding component and is discarded at the root.
///
/// # Panics
///
/// Panics if the resolved path has no root. This only happens when the caller
/// supplies a relative working directory, which is a contract violation.
#[must_use]
pub fn resolve(working_directory: &Utf8Path, descriptor: &str) -> Utf8PathBuf {
    let path = Utf8Path::new(descriptor);
    if path.has_root() {
        return path.to_path_buf();
    }
    let resolved = normalise(&working_directory.join(path));
    assert!(
        resolved.has_root(),
        "working directory '{working_directory}' must be absolute (resolving '{descriptor}')"
    );
    resolved
}

fn normalise(path: &Utf8Path) -> Utf8PathBuf {
    let mut parts: Vec<Utf8Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => match parts.last() {
                Some(Utf8Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Utf8Component::RootDir | Utf8Component::Prefix(_)) => {}
                Some(Utf8Component::ParentDir | Utf8Component::CurDir) | None => {
                    parts.push(component);
                }
            },
            other => parts.push(other),
        }
    }
    parts.iter().map(Utf8Component::as_str).collect()
}
