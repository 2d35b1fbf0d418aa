//! Command line interface definition using clap.
//!
//! The `nmanifest` binary is a small inspection tool: it replays declaration
//! scripts into a [`crate::Manifest`] and shows how paths canonicalise.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inspect how build-description entities intern into a manifest.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available top-level commands.
#[derive(Debug, Subcommand, PartialEq, Eq, Clone)]
pub enum Commands {
    /// Replay a JSON declaration script and print the resulting manifest.
    Summary {
        /// Path to the declaration script.
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,
    },

    /// Print the canonical path of each descriptor, one per line.
    Resolve {
        /// Absolute directory relative descriptors are resolved against.
        #[arg(short = 'C', long, value_name = "DIR", value_parser = parse_working_directory)]
        working_directory: Utf8PathBuf,

        /// Path descriptors as written in a manifest.
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<String>,
    },
}

fn parse_working_directory(s: &str) -> Result<Utf8PathBuf, String> {
    let dir = Utf8PathBuf::from(s);
    if dir.has_root() {
        Ok(dir)
    } else {
        Err(format!("{s} is not an absolute path"))
    }
}
