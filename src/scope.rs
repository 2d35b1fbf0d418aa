//! Lexical binding containers.
//!
//! Each included manifest fragment gets its own [`Scope`] with a link to the
//! scope that included it. Lookups try the local tables first and then walk
//! the parent chain to the root; see [`crate::Manifest::lookup_rule`].

use indexmap::IndexMap;

use crate::handle::Owner;
use crate::rule::RuleId;

/// Handle to a [`Scope`] owned by a [`crate::Manifest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId {
    pub(crate) owner: Owner,
    pub(crate) index: usize,
}

impl ScopeId {
    /// Position of the scope in creation order; the root scope is 0.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

/// Rule and variable bindings for one level of manifest nesting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    parent: Option<ScopeId>,
    rules: IndexMap<String, RuleId>,
    variables: IndexMap<String, String>,
}

impl Scope {
    pub(crate) fn child_of(parent: ScopeId) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    /// Enclosing scope; `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Rule bound under `name` in this scope only.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<RuleId> {
        self.rules.get(name).copied()
    }

    /// Locally bound rules in declaration order.
    pub fn rules(&self) -> impl ExactSizeIterator<Item = (&str, RuleId)> + '_ {
        self.rules.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Variable bound under `name` in this scope only.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Locally bound variables in first-binding order.
    pub fn variables(&self) -> impl ExactSizeIterator<Item = (&str, &str)> + '_ {
        self.variables
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub(crate) fn bind_rule(&mut self, name: &str, rule: RuleId) {
        self.rules.insert(name.to_owned(), rule);
    }

    pub(crate) fn bind_variable(&mut self, name: &str, value: String) {
        self.variables.insert(name.to_owned(), value);
    }
}
