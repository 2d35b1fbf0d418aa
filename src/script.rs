//! JSON declaration scripts.
//!
//! A script is a flat list of the calls a manifest parser would make, in
//! source order. Replaying one drives a [`Manifest`] through its public API,
//! which makes it handy for inspecting interning behaviour from the command
//! line and for fixtures in tests.
//!
//! ```json
//! {
//!   "declarations": [
//!     { "op": "pool", "name": "link", "depth": 2 },
//!     { "op": "rule", "name": "cc", "parameters": { "command": "cc -c $in" } },
//!     { "op": "node", "working_directory": "/proj", "path": "src/a.c" }
//!   ]
//! }
//! ```

// See `error.rs`: the miette/thiserror derives trip `unused_assignments` on
// some toolchains only.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use camino::Utf8PathBuf;
use indexmap::IndexMap;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Manifest;
use crate::error::DeclarationError;
use crate::scope::ScopeId;

/// Ordered list of declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclarationScript {
    /// Declarations in the order they are replayed.
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

/// A single manifest-building call.
///
/// Scopes are referred to by the label given in a [`Declaration::Scope`]
/// entry; an omitted label means the root scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Declaration {
    /// Intern a path.
    Node {
        /// Directory relative descriptors are resolved against.
        working_directory: Utf8PathBuf,
        /// Path as written in the manifest.
        path: String,
    },
    /// Declare a pool.
    Pool {
        /// Pool name.
        name: String,
        /// Concurrency limit.
        depth: usize,
    },
    /// Open a nested scope.
    Scope {
        /// Label later declarations use to target this scope.
        name: String,
        /// Label of the enclosing scope.
        #[serde(default)]
        parent: Option<String>,
    },
    /// Declare a rule with its parameters.
    Rule {
        /// Rule name.
        name: String,
        /// Label of the scope to bind the rule in.
        #[serde(default)]
        scope: Option<String>,
        /// Parameters keyed by manifest name.
        #[serde(default)]
        parameters: IndexMap<String, String>,
    },
    /// Bind a variable.
    Variable {
        /// Label of the scope to bind the variable in.
        #[serde(default)]
        scope: Option<String>,
        /// Variable name.
        name: String,
        /// Unevaluated value.
        value: String,
    },
}

/// Failures while loading or replaying a script.
#[derive(Debug, Error, Diagnostic)]
pub enum ScriptError {
    /// The script file could not be read.
    #[error("failed to read declaration script {path}")]
    #[diagnostic(code(ninja_manifest::script::read))]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The script is not valid JSON or does not match the schema.
    #[error("failed to parse declaration script")]
    #[diagnostic(code(ninja_manifest::script::parse))]
    Parse {
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// The manifest rejected a declaration.
    #[error("declaration #{index} was rejected")]
    #[diagnostic(code(ninja_manifest::script::declaration))]
    Declaration {
        /// Zero-based position of the failing declaration.
        index: usize,
        /// Reason given by the manifest.
        #[source]
        source: DeclarationError,
    },

    /// A declaration referred to a scope label that was never opened.
    #[error("declaration #{index} refers to unknown scope '{label}'")]
    #[diagnostic(code(ninja_manifest::script::unknown_scope))]
    UnknownScope {
        /// Zero-based position of the failing declaration.
        index: usize,
        /// The unknown label.
        label: String,
    },

    /// A scope label was opened twice.
    #[error("declaration #{index} reopens scope '{label}'")]
    #[diagnostic(code(ninja_manifest::script::duplicate_scope))]
    DuplicateScope {
        /// Zero-based position of the failing declaration.
        index: usize,
        /// The repeated label.
        label: String,
    },

    /// A node declaration used a relative working directory.
    #[error("declaration #{index} has relative working directory '{working_directory}'")]
    #[diagnostic(
        code(ninja_manifest::script::relative_working_directory),
        help("working directories must be absolute paths")
    )]
    RelativeWorkingDirectory {
        /// Zero-based position of the failing declaration.
        index: usize,
        /// The rejected directory.
        working_directory: Utf8PathBuf,
    },
}

impl DeclarationScript {
    /// Parse a script from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Parse`] if the text does not match the schema.
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        serde_json::from_str(json).map_err(|source| ScriptError::Parse { source })
    }

    /// Read and parse a script file.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Read`] or [`ScriptError::Parse`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path_ref = path.as_ref();
        let data = fs::read_to_string(path_ref).map_err(|source| ScriptError::Read {
            path: path_ref.display().to_string(),
            source,
        })?;
        Self::from_json(&data)
    }

    /// Replay the script into a fresh manifest.
    ///
    /// # Errors
    ///
    /// Stops at, and reports, the first declaration that fails.
    pub fn replay(&self) -> Result<Manifest, ScriptError> {
        let mut manifest = Manifest::new();
        self.apply(&mut manifest)?;
        Ok(manifest)
    }

    /// Replay the script into an existing manifest.
    ///
    /// Declarations before the failing one stay applied; the failing one
    /// itself leaves no trace.
    ///
    /// # Errors
    ///
    /// Stops at, and reports, the first declaration that fails.
    pub fn apply(&self, manifest: &mut Manifest) -> Result<(), ScriptError> {
        let mut replay = Replay {
            manifest,
            labels: HashMap::new(),
        };
        for (index, declaration) in self.declarations.iter().enumerate() {
            replay.step(index, declaration)?;
        }
        Ok(())
    }
}

struct Replay<'a> {
    manifest: &'a mut Manifest,
    labels: HashMap<String, ScopeId>,
}

impl Replay<'_> {
    fn step(&mut self, index: usize, declaration: &Declaration) -> Result<(), ScriptError> {
        let rejected = |source| ScriptError::Declaration { index, source };
        match declaration {
            Declaration::Node {
                working_directory,
                path,
            } => {
                if !working_directory.has_root() {
                    return Err(ScriptError::RelativeWorkingDirectory {
                        index,
                        working_directory: working_directory.clone(),
                    });
                }
                self.manifest.find_or_create_node(working_directory, path);
            }
            Declaration::Pool { name, depth } => {
                self.manifest.declare_pool(name, *depth).map_err(rejected)?;
            }
            Declaration::Scope { name, parent } => {
                if self.labels.contains_key(name) {
                    return Err(ScriptError::DuplicateScope {
                        index,
                        label: name.clone(),
                    });
                }
                let parent = self.resolve(index, parent.as_deref())?;
                let scope = self.manifest.create_scope(parent).map_err(rejected)?;
                self.labels.insert(name.clone(), scope);
            }
            Declaration::Rule {
                name,
                scope,
                parameters,
            } => {
                let scope = self.resolve(index, scope.as_deref())?;
                self.manifest
                    .declare_rule_with_parameters(
                        scope,
                        name,
                        parameters.iter().map(|(k, v)| (k, v.as_str())),
                    )
                    .map_err(rejected)?;
            }
            Declaration::Variable { scope, name, value } => {
                let scope = self.resolve(index, scope.as_deref())?;
                self.manifest
                    .bind_variable(scope, name, value.as_str())
                    .map_err(rejected)?;
            }
        }
        Ok(())
    }

    fn resolve(&self, index: usize, label: Option<&str>) -> Result<ScopeId, ScriptError> {
        let Some(label) = label else {
            return Ok(self.manifest.root_scope());
        };
        self.labels
            .get(label)
            .copied()
            .ok_or_else(|| ScriptError::UnknownScope {
                index,
                label: label.to_owned(),
            })
    }
}
