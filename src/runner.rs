//! CLI execution and command dispatch logic.
//!
//! Keeps `main` minimal: every command writes to the supplied writer so the
//! same code paths serve the binary and tests.

use std::io::Write;

use anyhow::{Context, Result};
use miette::Diagnostic;
use tracing::{debug, info};

use crate::cli::{Cli, Commands};
use crate::error::DeclarationError;
use crate::path::resolve;
use crate::script::{DeclarationScript, ScriptError};
use crate::summary::ManifestSummary;

/// Execute the parsed [`Cli`] command, writing results to `out`.
///
/// # Errors
///
/// Returns an error if the script cannot be loaded or replayed, or if writing
/// the output fails.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    match &cli.command {
        Commands::Summary { script } => {
            debug!(script = %script.display(), "loading declaration script");
            let parsed = DeclarationScript::from_path(script)?;
            let manifest = parsed
                .replay()
                .with_context(|| format!("replay {}", script.display()))?;
            let summary = ManifestSummary::capture(&manifest);
            info!(
                nodes = summary.nodes.len(),
                pools = summary.pools.len(),
                scopes = summary.scopes.len(),
                "replayed declaration script"
            );
            serde_json::to_writer_pretty(&mut *out, &summary).context("serialise summary")?;
            writeln!(out).context("write summary")?;
        }
        Commands::Resolve {
            working_directory,
            paths,
        } => {
            for descriptor in paths {
                writeln!(out, "{}", resolve(working_directory, descriptor))
                    .context("write canonical path")?;
            }
        }
    }
    Ok(())
}

/// First diagnostic help attached anywhere in `err`'s source chain.
#[must_use]
pub fn help_for(err: &anyhow::Error) -> Option<String> {
    err.chain().find_map(|cause| {
        let help = if let Some(diag) = cause.downcast_ref::<DeclarationError>() {
            diag.help()
        } else {
            cause.downcast_ref::<ScriptError>()?.help()
        };
        help.map(|text| text.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use rstest::rstest;

    #[rstest]
    fn help_is_found_below_context_layers() {
        let err = anyhow::Error::new(ScriptError::Declaration {
            index: 0,
            source: DeclarationError::InvalidPoolDepth {
                name: "p".into(),
                depth: 0,
            },
        })
        .context("replay broken.json");
        assert_eq!(
            help_for(&err).as_deref(),
            Some("pool depth must be a positive integer")
        );
    }

    #[rstest]
    fn plain_errors_have_no_help() {
        assert_eq!(help_for(&anyhow!("boom")), None);
    }
}
