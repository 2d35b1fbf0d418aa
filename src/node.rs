//! Interned build-graph nodes.
//!
//! A [`NodeTable`] maps canonical paths to [`Node`] entries. The table never
//! removes entries, so a [`NodeId`] stays valid for the life of its owner and
//! two references to the same file always compare equal by id.
//!
//! Entries are keyed by the exact canonical string produced by [`resolve`],
//! not by path components: `/x/./a` and `/x/a` are different nodes.

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::handle::Owner;
use crate::path::resolve;

/// Handle to a [`Node`] owned by a [`NodeTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    owner: Owner,
    index: usize,
}

impl NodeId {
    /// Position of the node in interning order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

/// One file-system path participating in the build graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    path: Utf8PathBuf,
    descriptor: String,
}

impl Node {
    /// Canonical absolute path; the node's identity key.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// The descriptor exactly as it was first written in the manifest.
    ///
    /// Later references through other spellings do not replace it.
    #[must_use]
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }
}

/// Canonical-path keyed store of [`Node`] entries.
#[derive(Debug, Clone)]
pub struct NodeTable {
    owner: Owner,
    nodes: IndexMap<String, Node>,
}

impl NodeTable {
    pub(crate) fn with_owner(owner: Owner) -> Self {
        Self {
            owner,
            nodes: IndexMap::new(),
        }
    }

    const fn id(&self, index: usize) -> NodeId {
        NodeId {
            owner: self.owner,
            index,
        }
    }

    /// Look up the node for `descriptor` without creating it.
    ///
    /// # Panics
    ///
    /// Panics if `working_directory` is needed and is not absolute; see
    /// [`resolve`].
    #[must_use]
    pub fn find(&self, working_directory: &Utf8Path, descriptor: &str) -> Option<NodeId> {
        let path = resolve(working_directory, descriptor);
        self.nodes
            .get_index_of(path.as_str())
            .map(|index| self.id(index))
    }

    /// Return the node for `descriptor`, creating it on first sight.
    ///
    /// # Panics
    ///
    /// Panics if `working_directory` is needed and is not absolute; see
    /// [`resolve`].
    pub fn find_or_create(&mut self, working_directory: &Utf8Path, descriptor: &str) -> NodeId {
        let path = resolve(working_directory, descriptor);
        let owner = self.owner;
        match self.nodes.entry(path.as_str().to_owned()) {
            Entry::Occupied(entry) => {
                tracing::trace!(path = %entry.key(), descriptor, "node already interned");
                NodeId {
                    owner,
                    index: entry.index(),
                }
            }
            Entry::Vacant(entry) => {
                let id = NodeId {
                    owner,
                    index: entry.index(),
                };
                tracing::debug!(path = %entry.key(), descriptor, index = id.index, "interned node");
                entry.insert(Node {
                    path,
                    descriptor: descriptor.to_owned(),
                });
                id
            }
        }
    }

    /// Node behind `id`, if this table minted it.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.owner != self.owner {
            return None;
        }
        self.nodes.get_index(id.index).map(|(_, node)| node)
    }

    /// Look up a node by its exact canonical path string.
    #[must_use]
    pub fn by_path(&self, path: &Utf8Path) -> Option<NodeId> {
        self.nodes
            .get_index_of(path.as_str())
            .map(|index| self.id(index))
    }

    /// Iterate nodes in interning order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .values()
            .enumerate()
            .map(|(index, node)| (self.id(index), node))
    }

    /// Number of interned nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node has been interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for NodeTable {
    fn default() -> Self {
        Self::with_owner(Owner::fresh())
    }
}
