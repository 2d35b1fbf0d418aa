//! In-memory model of a Ninja build description.
//!
//! The [`Manifest`] interns every path it is shown into a single [`Node`] per
//! canonical absolute path, and keeps the rules, pools and scopes a manifest
//! parser declares. Build engines read the populated manifest; parsing and
//! scheduling live elsewhere.

pub mod cli;
pub mod error;
mod handle;
pub mod manifest;
pub mod node;
pub mod path;
pub mod pool;
pub mod rule;
pub mod runner;
pub mod scope;
pub mod script;
pub mod summary;

pub use error::DeclarationError;
pub use manifest::Manifest;
pub use node::{Node, NodeId};
pub use pool::{CONSOLE_POOL_NAME, Pool, PoolId};
pub use rule::{PHONY_RULE_NAME, Rule, RuleId, RuleParameter, is_valid_parameter_name};
pub use scope::{Scope, ScopeId};
