//! Declaration errors surfaced to the manifest parser.
//!
//! The manifest never formats or logs these itself; callers attach source
//! locations and render them. Each variant names the offending entity so the
//! caller can point at it.

// The miette/thiserror derives trip `unused_assignments` on some toolchains
// but not others, so `#[expect]` cannot be used here.
// FIXME(rust-lang/rust#130021): remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use miette::Diagnostic;
use thiserror::Error;

/// Failures raised while declaring rules, pools, scopes, or rule parameters.
///
/// Every mutation that returns this error leaves the manifest untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum DeclarationError {
    /// A rule with this name is already bound in the target scope.
    #[error("duplicate rule '{name}'")]
    #[diagnostic(code(ninja_manifest::declaration::duplicate_rule))]
    DuplicateRule {
        /// Name of the rule being redeclared.
        name: String,
    },

    /// A pool with this name already exists.
    #[error("duplicate pool '{name}'")]
    #[diagnostic(
        code(ninja_manifest::declaration::duplicate_pool),
        help("pool names are global to the manifest, including the built-in 'console' pool")
    )]
    DuplicatePool {
        /// Name of the pool being redeclared.
        name: String,
    },

    /// A pool was declared with a depth of zero.
    #[error("invalid depth {depth} for pool '{name}'")]
    #[diagnostic(
        code(ninja_manifest::declaration::invalid_pool_depth),
        help("pool depth must be a positive integer")
    )]
    InvalidPoolDepth {
        /// Name of the pool being declared.
        name: String,
        /// The rejected depth.
        depth: usize,
    },

    /// A rule parameter outside the recognised set.
    #[error("unexpected variable '{parameter}' in rule '{rule}'")]
    #[diagnostic(
        code(ninja_manifest::declaration::unknown_parameter),
        help(
            "valid rule parameters are command, description, deps, depfile, generator, pool, restat, rspfile and rspfile_content"
        )
    )]
    UnknownParameter {
        /// Rule the parameter was attached to.
        rule: String,
        /// The unrecognised parameter name.
        parameter: String,
    },

    /// A rule parameter was set twice.
    #[error("duplicate parameter '{parameter}' in rule '{rule}'")]
    #[diagnostic(code(ninja_manifest::declaration::duplicate_parameter))]
    DuplicateParameter {
        /// Rule the parameter was attached to.
        rule: String,
        /// The repeated parameter name.
        parameter: String,
    },

    /// A rule's `pool` parameter names a pool that has not been declared.
    #[error("unknown pool '{pool}' in rule '{rule}'")]
    #[diagnostic(code(ninja_manifest::declaration::unknown_pool))]
    UnknownPool {
        /// Rule referencing the pool.
        rule: String,
        /// The undeclared pool name.
        pool: String,
    },

    /// Built-in rules cannot be given parameters.
    #[error("cannot modify built-in rule '{name}'")]
    #[diagnostic(code(ninja_manifest::declaration::builtin_rule))]
    BuiltinRule {
        /// Name of the built-in rule.
        name: String,
    },

    /// A handle minted by a different manifest, or out of range.
    #[error("unknown {kind} handle #{index}")]
    #[diagnostic(code(ninja_manifest::declaration::unknown_handle))]
    UnknownHandle {
        /// Kind of entity the handle refers to.
        kind: &'static str,
        /// Raw table index carried by the handle.
        index: usize,
    },
}

impl DeclarationError {
    pub(crate) const fn unknown_handle(kind: &'static str, index: usize) -> Self {
        Self::UnknownHandle { kind, index }
    }
}
