//! Command-line interface parsing for opscat
//!
//! Two subcommands: `ls` lists commands issued inside a time window, and
//! `cat` prints the per-instance, per-plugin output of one command.
//! Endpoint and cache locations are global so they can follow either
//! subcommand.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inspect remote command executions and their outputs
#[derive(Parser, Debug)]
#[command(name = "opscat")]
#[command(about = "Inspect remote command executions and their outputs")]
#[command(version)]
pub struct Cli {
    /// Base URL of the remote service
    #[arg(long, env = "OPSCAT_ENDPOINT", value_name = "URL", global = true)]
    pub endpoint: Option<String>,

    /// Directory for the local caches (defaults to the user cache dir)
    #[arg(long, value_name = "DIR", global = true)]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List commands issued inside a time window
    Ls {
        /// Only commands invoked after this instant (YYYY-MM-DDTHH:mm:SSZ, UTC only)
        #[arg(short, long, value_name = "INSTANT")]
        after: Option<String>,

        /// Only commands invoked before this instant (YYYY-MM-DDTHH:mm:SSZ, UTC only)
        #[arg(short, long, value_name = "INSTANT")]
        before: Option<String>,

        /// Relative window lower bound: <N><d|h|m>, e.g. 12h
        #[arg(short, long, default_value = "1d")]
        delta: String,
    },

    /// Show per-instance output for one command
    Cat {
        /// Command id to inspect
        command_id: String,
    },
}
