//! Defines the command-line arguments and subcommands for inline-expand.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Strategy;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "inline-expand",
    version,
    about = "Expands %inline('<module>').<fn>(<args>) macro sites in JavaScript sources."
)]
pub struct InlineArgs {
    /// Raise log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Expand a file, or every script under a directory.
    Expand {
        /// File or directory to transform.
        #[arg(required = true)]
        path: PathBuf,
        /// Output file (or directory when PATH is a directory). Defaults to stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// YAML configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the configured site strategy.
        #[arg(long, value_enum)]
        strategy: Option<Strategy>,
        /// Expand sites inside target modules before inlining from them.
        #[arg(long)]
        recursive: bool,
        /// Substitute one parameter at a time instead of all at once.
        #[arg(long)]
        sequential: bool,
        /// List the modules each file depends on.
        #[arg(long)]
        deps: bool,
        /// Print a line diff against the input instead of the output.
        #[arg(long, conflicts_with = "out")]
        diff: bool,
    },
    /// Show the functions a module exports for inlining.
    Exports {
        /// The module to inspect.
        #[arg(required = true)]
        module: PathBuf,
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Expand a file with both strategies and compare the results.
    Check {
        /// The file to check.
        #[arg(required = true)]
        file: PathBuf,
        /// YAML configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
