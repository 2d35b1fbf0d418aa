//! The manifest aggregate.
//!
//! [`Manifest`] owns every node, pool, rule and scope created while a build
//! description is parsed. Entities are stored in tables and handed out as
//! `Copy` handles, so nothing borrows from the manifest across calls and
//! nothing outlives it.
//!
//! A fresh manifest already contains the `console` pool (depth 1) and the
//! `phony` rule bound in the root scope.
//!
//! # Examples
//!
//! ```
//! use ninja_manifest::Manifest;
//!
//! let mut manifest = Manifest::new();
//! let a = manifest.find_or_create_node("/x", "./a/b.c");
//! let b = manifest.find_or_create_node("/x", "/x/a/b.c");
//! assert_eq!(a, b);
//!
//! let root = manifest.root_scope();
//! let cc = manifest
//!     .declare_rule_with_parameters(root, "cc", [("command", "cc -c $in -o $out")])
//!     .expect("declare cc");
//! assert_eq!(manifest.lookup_rule(root, "cc"), Some(cc));
//! ```

use camino::Utf8Path;

use crate::error::DeclarationError;
use crate::handle::Owner;
use crate::node::{Node, NodeId, NodeTable};
use crate::pool::{Pool, PoolId, PoolRegistry};
use crate::rule::{PHONY_RULE_NAME, Rule, RuleId, RuleParameter};
use crate::scope::{Scope, ScopeId};

const ROOT_SCOPE_INDEX: usize = 0;
const PHONY_RULE_INDEX: usize = 0;

/// In-memory model of a Ninja build description.
///
/// Handles minted by one manifest are rejected by every other manifest:
/// accessors return `None` and mutations fail with
/// [`DeclarationError::UnknownHandle`]. A clone shares its source's handles.
#[derive(Debug, Clone)]
pub struct Manifest {
    owner: Owner,
    nodes: NodeTable,
    pools: PoolRegistry,
    rules: Vec<Rule>,
    scopes: Vec<Scope>,
}

impl Manifest {
    /// Create a manifest holding only the built-in `console` pool and `phony`
    /// rule.
    #[must_use]
    pub fn new() -> Self {
        let owner = Owner::fresh();
        let mut root = Scope::default();
        root.bind_rule(
            PHONY_RULE_NAME,
            RuleId {
                owner,
                index: PHONY_RULE_INDEX,
            },
        );
        Self {
            owner,
            nodes: NodeTable::with_owner(owner),
            pools: PoolRegistry::with_owner(owner),
            rules: vec![Rule::new(PHONY_RULE_NAME)],
            scopes: vec![root],
        }
    }

    /// Find the node a path descriptor refers to, without creating it.
    ///
    /// # Panics
    ///
    /// Panics if `descriptor` is relative and `working_directory` is not
    /// absolute.
    #[must_use]
    pub fn find_node(
        &self,
        working_directory: impl AsRef<Utf8Path>,
        descriptor: &str,
    ) -> Option<NodeId> {
        self.nodes.find(working_directory.as_ref(), descriptor)
    }

    /// Intern a path descriptor, returning the existing node for its canonical
    /// path or creating one.
    ///
    /// # Panics
    ///
    /// Panics if `descriptor` is relative and `working_directory` is not
    /// absolute.
    pub fn find_or_create_node(
        &mut self,
        working_directory: impl AsRef<Utf8Path>,
        descriptor: &str,
    ) -> NodeId {
        self.nodes.find_or_create(working_directory.as_ref(), descriptor)
    }

    /// Node behind `id`.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// All interned nodes.
    #[must_use]
    pub const fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    /// Declare a user pool.
    ///
    /// # Errors
    ///
    /// Fails when `depth` is zero or the name is already declared, including
    /// the reserved `console` name.
    pub fn declare_pool(&mut self, name: &str, depth: usize) -> Result<PoolId, DeclarationError> {
        self.pools.declare(name, depth)
    }

    /// Find a pool by name.
    #[must_use]
    pub fn lookup_pool(&self, name: &str) -> Option<PoolId> {
        self.pools.lookup(name)
    }

    /// Pool behind `id`.
    #[must_use]
    pub fn pool(&self, id: PoolId) -> Option<&Pool> {
        self.pools.get(id)
    }

    /// All declared pools.
    #[must_use]
    pub const fn pools(&self) -> &PoolRegistry {
        &self.pools
    }

    /// The built-in `console` pool.
    #[must_use]
    pub const fn console_pool(&self) -> PoolId {
        self.pools.console()
    }

    /// The scope every manifest starts in.
    #[must_use]
    pub const fn root_scope(&self) -> ScopeId {
        self.scope_id(ROOT_SCOPE_INDEX)
    }

    /// Scope behind `id`.
    #[must_use]
    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scope_index(id).and_then(|index| self.scopes.get(index))
    }

    /// All scopes in creation order, root first.
    pub fn scopes(&self) -> impl ExactSizeIterator<Item = (ScopeId, &Scope)> + '_ {
        self.scopes
            .iter()
            .enumerate()
            .map(|(index, scope)| (self.scope_id(index), scope))
    }

    /// Open a nested scope whose lookups fall back to `parent`.
    ///
    /// # Errors
    ///
    /// Fails with [`DeclarationError::UnknownHandle`] if `parent` does not
    /// belong to this manifest.
    pub fn create_scope(&mut self, parent: ScopeId) -> Result<ScopeId, DeclarationError> {
        if self.scope(parent).is_none() {
            return Err(DeclarationError::unknown_handle("scope", parent.index));
        }
        let id = self.scope_id(self.scopes.len());
        tracing::debug!(scope = id.index, parent = parent.index, "created scope");
        self.scopes.push(Scope::child_of(parent));
        Ok(id)
    }

    /// The built-in `phony` rule.
    #[must_use]
    pub const fn phony_rule(&self) -> RuleId {
        self.rule_id(PHONY_RULE_INDEX)
    }

    /// Rule behind `id`.
    #[must_use]
    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rule_index(id).and_then(|index| self.rules.get(index))
    }

    /// All rules in declaration order, `phony` first.
    pub fn rules(&self) -> impl ExactSizeIterator<Item = (RuleId, &Rule)> + '_ {
        self.rules
            .iter()
            .enumerate()
            .map(|(index, rule)| (self.rule_id(index), rule))
    }

    /// Declare an empty rule in `scope`.
    ///
    /// # Errors
    ///
    /// Fails with [`DeclarationError::DuplicateRule`] when `scope` already
    /// binds `name`. Shadowing a rule from an enclosing scope is allowed.
    pub fn declare_rule(
        &mut self,
        scope: ScopeId,
        name: &str,
    ) -> Result<RuleId, DeclarationError> {
        self.register_rule(scope, Rule::new(name))
    }

    /// Declare a rule together with its parameters.
    ///
    /// Every parameter is validated before anything is registered, so a
    /// failure leaves the manifest exactly as it was.
    ///
    /// # Errors
    ///
    /// Fails on a duplicate rule name, an unknown or repeated parameter, or a
    /// `pool` value naming an undeclared pool.
    pub fn declare_rule_with_parameters<I, K, V>(
        &mut self,
        scope: ScopeId,
        name: &str,
        parameters: I,
    ) -> Result<RuleId, DeclarationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut rule = Rule::new(name);
        for (param_name, value) in parameters {
            let value = value.into();
            let (param, pool) = check_parameter(&self.pools, &rule, param_name.as_ref(), &value)?;
            rule.insert_parameter(param, value, pool);
        }
        self.register_rule(scope, rule)
    }

    /// Attach a parameter to a previously declared rule.
    ///
    /// # Errors
    ///
    /// Fails for the built-in `phony` rule, an unknown or repeated parameter,
    /// or a `pool` value naming an undeclared pool. The rule is unchanged on
    /// failure.
    pub fn set_rule_parameter(
        &mut self,
        rule: RuleId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DeclarationError> {
        if rule == self.phony_rule() {
            return Err(DeclarationError::BuiltinRule {
                name: PHONY_RULE_NAME.to_owned(),
            });
        }
        let target = self
            .rule_index(rule)
            .and_then(|index| self.rules.get_mut(index))
            .ok_or_else(|| DeclarationError::unknown_handle("rule", rule.index))?;
        let value = value.into();
        let (param, pool) = check_parameter(&self.pools, target, name, &value)?;
        tracing::debug!(rule = target.name(), parameter = %param, "set rule parameter");
        target.insert_parameter(param, value, pool);
        Ok(())
    }

    /// Resolve a rule name from `scope`, falling back through enclosing
    /// scopes up to the root.
    #[must_use]
    pub fn lookup_rule(&self, scope: ScopeId, name: &str) -> Option<RuleId> {
        self.scope_chain(scope).find_map(|s| s.rule(name))
    }

    /// Bind a variable in `scope`, replacing any earlier binding there.
    ///
    /// # Errors
    ///
    /// Fails with [`DeclarationError::UnknownHandle`] if `scope` does not
    /// belong to this manifest.
    pub fn bind_variable(
        &mut self,
        scope: ScopeId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DeclarationError> {
        let target = self
            .scope_index(scope)
            .and_then(|index| self.scopes.get_mut(index))
            .ok_or_else(|| DeclarationError::unknown_handle("scope", scope.index))?;
        target.bind_variable(name, value.into());
        Ok(())
    }

    /// Resolve a variable from `scope`, falling back through enclosing scopes.
    #[must_use]
    pub fn lookup_variable(&self, scope: ScopeId, name: &str) -> Option<&str> {
        self.scope_chain(scope).find_map(|s| s.variable(name))
    }

    fn register_rule(&mut self, scope: ScopeId, rule: Rule) -> Result<RuleId, DeclarationError> {
        let id = self.rule_id(self.rules.len());
        let target = self
            .scope_index(scope)
            .and_then(|index| self.scopes.get_mut(index))
            .ok_or_else(|| DeclarationError::unknown_handle("scope", scope.index))?;
        if target.rule(rule.name()).is_some() {
            return Err(DeclarationError::DuplicateRule {
                name: rule.name().to_owned(),
            });
        }
        tracing::debug!(rule = rule.name(), scope = scope.index, "declared rule");
        target.bind_rule(rule.name(), id);
        self.rules.push(rule);
        Ok(id)
    }

    fn scope_chain(&self, start: ScopeId) -> impl Iterator<Item = &Scope> + '_ {
        std::iter::successors(self.scope(start), |scope| {
            scope.parent().and_then(|parent| self.scope(parent))
        })
    }

    const fn scope_id(&self, index: usize) -> ScopeId {
        ScopeId {
            owner: self.owner,
            index,
        }
    }

    const fn rule_id(&self, index: usize) -> RuleId {
        RuleId {
            owner: self.owner,
            index,
        }
    }

    fn scope_index(&self, id: ScopeId) -> Option<usize> {
        (id.owner == self.owner).then_some(id.index)
    }

    fn rule_index(&self, id: RuleId) -> Option<usize> {
        (id.owner == self.owner).then_some(id.index)
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}

fn check_parameter(
    pools: &PoolRegistry,
    rule: &Rule,
    name: &str,
    value: &str,
) -> Result<(RuleParameter, Option<PoolId>), DeclarationError> {
    let Some(param) = RuleParameter::from_name(name) else {
        return Err(DeclarationError::UnknownParameter {
            rule: rule.name().to_owned(),
            parameter: name.to_owned(),
        });
    };
    if rule.has_parameter(param) {
        return Err(DeclarationError::DuplicateParameter {
            rule: rule.name().to_owned(),
            parameter: name.to_owned(),
        });
    }
    if param != RuleParameter::Pool || value.is_empty() {
        return Ok((param, None));
    }
    pools
        .lookup(value)
        .map(|pool| (param, Some(pool)))
        .ok_or_else(|| DeclarationError::UnknownPool {
            rule: rule.name().to_owned(),
            pool: value.to_owned(),
        })
}
