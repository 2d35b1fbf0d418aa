//! Build-step templates.
//!
//! A [`Rule`] carries a fixed, closed set of parameters. Anything outside
//! [`RuleParameter::ALL`] is a declaration error, which the parser checks with
//! [`is_valid_parameter_name`] before attaching a value.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::handle::Owner;
use crate::pool::PoolId;

/// Name of the built-in no-op rule.
pub const PHONY_RULE_NAME: &str = "phony";

/// Handle to a [`Rule`] owned by a [`crate::Manifest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId {
    pub(crate) owner: Owner,
    pub(crate) index: usize,
}

impl RuleId {
    /// Position of the rule in declaration order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

/// Parameters a rule declaration may set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleParameter {
    /// Command line to run.
    Command,
    /// Short human-readable summary printed while the step runs.
    Description,
    /// Format of dependency information emitted by the command.
    Deps,
    /// Makefile-style dependency file written by the command.
    Depfile,
    /// Marks steps that regenerate the manifest itself.
    Generator,
    /// Pool the step is scheduled in.
    Pool,
    /// Re-stat outputs after the command and prune unchanged dependants.
    Restat,
    /// Response file written before the command runs.
    Rspfile,
    /// Contents of the response file.
    RspfileContent,
}

impl RuleParameter {
    /// Every recognised parameter, in canonical order.
    pub const ALL: [Self; 9] = [
        Self::Command,
        Self::Description,
        Self::Deps,
        Self::Depfile,
        Self::Generator,
        Self::Pool,
        Self::Restat,
        Self::Rspfile,
        Self::RspfileContent,
    ];

    /// Name as written in a manifest.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Description => "description",
            Self::Deps => "deps",
            Self::Depfile => "depfile",
            Self::Generator => "generator",
            Self::Pool => "pool",
            Self::Restat => "restat",
            Self::Rspfile => "rspfile",
            Self::RspfileContent => "rspfile_content",
        }
    }

    /// Exact, case-sensitive match against the recognised names.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|param| param.as_str() == name)
    }
}

impl fmt::Display for RuleParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised parameter name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a rule parameter")]
pub struct UnknownParameterName(pub String);

impl FromStr for RuleParameter {
    type Err = UnknownParameterName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownParameterName(s.to_owned()))
    }
}

/// Whether `name` may appear inside a rule declaration.
///
/// ```
/// use ninja_manifest::rule::is_valid_parameter_name;
///
/// assert!(is_valid_parameter_name("rspfile_content"));
/// assert!(!is_valid_parameter_name("Command"));
/// ```
#[must_use]
pub fn is_valid_parameter_name(name: &str) -> bool {
    RuleParameter::from_name(name).is_some()
}

/// A named build-step template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    name: String,
    parameters: IndexMap<RuleParameter, String>,
    pool: Option<PoolId>,
}

impl Rule {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            parameters: IndexMap::new(),
            pool: None,
        }
    }

    /// Rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw value of `param`, if set.
    #[must_use]
    pub fn parameter(&self, param: RuleParameter) -> Option<&str> {
        self.parameters.get(&param).map(String::as_str)
    }

    /// Parameters in the order they were declared.
    pub fn parameters(&self) -> impl ExactSizeIterator<Item = (RuleParameter, &str)> + '_ {
        self.parameters
            .iter()
            .map(|(param, value)| (*param, value.as_str()))
    }

    /// Whether `param` has been given a value.
    #[must_use]
    pub fn has_parameter(&self, param: RuleParameter) -> bool {
        self.parameters.contains_key(&param)
    }

    /// Command template; `None` for `phony`.
    #[must_use]
    pub fn command(&self) -> Option<&str> {
        self.parameter(RuleParameter::Command)
    }

    /// Description template.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.parameter(RuleParameter::Description)
    }

    /// Dependency format, e.g. `gcc` or `msvc`.
    #[must_use]
    pub fn deps(&self) -> Option<&str> {
        self.parameter(RuleParameter::Deps)
    }

    /// Depfile path template.
    #[must_use]
    pub fn depfile(&self) -> Option<&str> {
        self.parameter(RuleParameter::Depfile)
    }

    /// Response file path template.
    #[must_use]
    pub fn rspfile(&self) -> Option<&str> {
        self.parameter(RuleParameter::Rspfile)
    }

    /// Response file contents template.
    #[must_use]
    pub fn rspfile_content(&self) -> Option<&str> {
        self.parameter(RuleParameter::RspfileContent)
    }

    /// Pool the rule was bound to through its `pool` parameter.
    #[must_use]
    pub const fn pool(&self) -> Option<PoolId> {
        self.pool
    }

    /// Whether `generator` is set to a non-empty value.
    #[must_use]
    pub fn is_generator(&self) -> bool {
        self.flag(RuleParameter::Generator)
    }

    /// Whether `restat` is set to a non-empty value.
    #[must_use]
    pub fn restat(&self) -> bool {
        self.flag(RuleParameter::Restat)
    }

    fn flag(&self, param: RuleParameter) -> bool {
        self.parameter(param).is_some_and(|value| !value.is_empty())
    }

    pub(crate) fn insert_parameter(
        &mut self,
        param: RuleParameter,
        value: String,
        pool: Option<PoolId>,
    ) {
        if param == RuleParameter::Pool {
            self.pool = pool;
        }
        self.parameters.insert(param, value);
    }
}
