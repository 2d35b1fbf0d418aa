//! Serialisable snapshot of a populated manifest.
//!
//! Handles are replaced by names and table positions so the snapshot can be
//! printed or compared without access to the manifest that produced it.

use camino::Utf8PathBuf;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Manifest;

/// Read-only view of every entity in a [`Manifest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestSummary {
    /// Nodes in interning order.
    pub nodes: Vec<NodeSummary>,
    /// Pools in declaration order, `console` first.
    pub pools: Vec<PoolSummary>,
    /// Scopes in creation order, root first.
    pub scopes: Vec<ScopeSummary>,
}

/// One interned node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSummary {
    /// Canonical absolute path.
    pub path: Utf8PathBuf,
    /// Descriptor as first seen.
    pub descriptor: String,
}

/// One declared pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSummary {
    /// Pool name.
    pub name: String,
    /// Concurrency limit.
    pub depth: usize,
}

/// One scope and its local bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeSummary {
    /// Index of the enclosing scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
    /// Rules bound locally, in declaration order.
    pub rules: Vec<RuleSummary>,
    /// Variables bound locally.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, String>,
}

/// One rule and the parameters it declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSummary {
    /// Rule name.
    pub name: String,
    /// Parameters keyed by their manifest name.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, String>,
}

impl ManifestSummary {
    /// Capture the current state of `manifest`.
    #[must_use]
    pub fn capture(manifest: &Manifest) -> Self {
        let nodes = manifest
            .nodes()
            .iter()
            .map(|(_, node)| NodeSummary {
                path: node.path().to_path_buf(),
                descriptor: node.descriptor().to_owned(),
            })
            .collect();
        let pools = manifest
            .pools()
            .iter()
            .map(|(_, pool)| PoolSummary {
                name: pool.name().to_owned(),
                depth: pool.depth().get(),
            })
            .collect();
        let scopes = manifest
            .scopes()
            .map(|(_, scope)| ScopeSummary {
                parent: scope.parent().map(|id| id.index()),
                rules: scope
                    .rules()
                    .filter_map(|(_, id)| manifest.rule(id))
                    .map(|rule| RuleSummary {
                        name: rule.name().to_owned(),
                        parameters: rule
                            .parameters()
                            .map(|(param, value)| (param.as_str().to_owned(), value.to_owned()))
                            .collect(),
                    })
                    .collect(),
                variables: scope
                    .variables()
                    .map(|(name, value)| (name.to_owned(), value.to_owned()))
                    .collect(),
            })
            .collect();
        Self {
            nodes,
            pools,
            scopes,
        }
    }
}

impl From<&Manifest> for ManifestSummary {
    fn from(manifest: &Manifest) -> Self {
        Self::capture(manifest)
    }
}
