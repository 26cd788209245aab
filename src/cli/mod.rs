//! The inline-expand Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions. The CLI plays the part of the host build
//! pipeline: it reads files from disk through [`FsHost`], prints reported
//! diagnostics and writes the transformed sources.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use crate::cli::args::{Command, InlineArgs};
use crate::config::{ExpandConfig, Strategy, SubstitutionMode};
use crate::errors::{InlineError, SourceContext};
use crate::host::FsHost;
use crate::macros::{exports, transform};
use crate::syntax::parser::parse_program;

pub mod args;
pub mod output;

/// File extensions picked up when expanding a directory.
const SCRIPT_EXTENSIONS: [&str; 3] = ["js", "mjs", "cjs"];

/// Options of the `expand` subcommand after parsing.
struct ExpandOptions {
    out: Option<PathBuf>,
    deps: bool,
    diff: bool,
}

/// The main entry point for the CLI.
pub fn run() {
    let args = InlineArgs::parse();
    init_tracing(args.verbose);

    // Dispatch to the appropriate subcommand handler.
    let result = match args.command {
        Command::Expand {
            path,
            out,
            config,
            strategy,
            recursive,
            sequential,
            deps,
            diff,
        } => load_config(config.as_deref())
            .map(|config| apply_overrides(config, strategy, recursive, sequential))
            .and_then(|config| handle_expand(&path, &config, &ExpandOptions { out, deps, diff })),
        Command::Exports { module, json } => handle_exports(&module, json),
        Command::Check { file, config } => {
            load_config(config.as_deref()).and_then(|config| handle_check(&file, &config))
        }
    };

    match result {
        Ok(0) => {}
        Ok(code) => process::exit(code),
        Err(e) => {
            output::print_diagnostic(e);
            process::exit(2);
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<ExpandConfig, InlineError> {
    match path {
        Some(path) => ExpandConfig::from_yaml_file(path),
        None => Ok(ExpandConfig::default()),
    }
}

fn apply_overrides(
    mut config: ExpandConfig,
    strategy: Option<Strategy>,
    recursive: bool,
    sequential: bool,
) -> ExpandConfig {
    if let Some(strategy) = strategy {
        config.strategy = strategy;
    }
    if recursive {
        config.recursive = true;
    }
    if sequential {
        config.substitution = SubstitutionMode::Sequential;
    }
    config
}

fn read_source(path: &Path) -> Result<String, InlineError> {
    fs::read_to_string(path).map_err(|e| InlineError::io("read", path, e))
}

/// Transforms one file with a fresh host; returns the input, the output and
/// the host.
fn expand_file(file: &Path, config: &ExpandConfig) -> Result<(String, String, FsHost), InlineError> {
    let source = read_source(file)?;
    let mut host = FsHost::new();
    let expanded = transform(&source, file, &mut host, config);
    Ok((source, expanded, host))
}

/// Discovers all script files recursively under the given root directory.
pub fn discover_scripts<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .map(|ext| SCRIPT_EXTENSIONS.iter().any(|known| ext == *known))
                    .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

// ============================================================================
// SUBCOMMANDS
// ============================================================================

/// Handles the `expand` subcommand. Returns 1 when any diagnostic was reported.
fn handle_expand(
    path: &Path,
    config: &ExpandConfig,
    options: &ExpandOptions,
) -> Result<i32, InlineError> {
    let directory = path.is_dir();
    let files = if directory {
        discover_scripts(path)
    } else {
        vec![path.to_path_buf()]
    };

    let mut reported = 0;
    for file in &files {
        let (source, expanded, mut host) = expand_file(file, config)?;
        let diagnostics = host.take_diagnostics();
        tracing::debug!(
            file = %file.display(),
            diagnostics = diagnostics.len(),
            dependencies = host.dependencies.len(),
            "expanded file"
        );
        reported += diagnostics.len();
        for diagnostic in diagnostics {
            output::print_diagnostic(diagnostic);
        }

        if options.deps {
            output::print_dependencies(file, &host.dependencies);
        } else if options.diff {
            output::print_file_diff(file, &source, &expanded);
        } else {
            match (&options.out, directory) {
                (Some(out), true) => {
                    let relative = file.strip_prefix(path).unwrap_or(file.as_path());
                    let target = out.join(relative);
                    output::write_output(&target, &expanded)
                        .map_err(|e| InlineError::io("write", target, e))?;
                }
                (Some(out), false) => output::write_output(out, &expanded)
                    .map_err(|e| InlineError::io("write", out, e))?,
                (None, true) => {
                    println!("// {}", file.display());
                    print!("{}", expanded);
                }
                (None, false) => print!("{}", expanded),
            }
        }
    }
    Ok(if reported > 0 { 1 } else { 0 })
}

/// Handles the `exports` subcommand.
fn handle_exports(module: &Path, json: bool) -> Result<i32, InlineError> {
    let text = read_source(module)?;
    let program = parse_program(&text).map_err(|e| {
        let source = SourceContext::from_file(module.display().to_string(), text.clone());
        e.into_parse_error(format!("module '{}'", module.display()), &source)
    })?;
    let entries = output::export_entries(&exports::resolve(&program));
    if json {
        output::print_exports_json(&entries)
            .map_err(|e| InlineError::io("print exports of", module, e.into()))?;
    } else {
        output::print_exports(&entries);
    }
    Ok(0)
}

/// Handles the `check` subcommand: both strategies must produce the same text.
fn handle_check(file: &Path, config: &ExpandConfig) -> Result<i32, InlineError> {
    let reparse_config = ExpandConfig {
        strategy: Strategy::Reparse,
        ..config.clone()
    };
    let sweep_config = ExpandConfig {
        strategy: Strategy::Sweep,
        ..config.clone()
    };
    let (_, reparse, mut host) = expand_file(file, &reparse_config)?;
    let (_, sweep, _) = expand_file(file, &sweep_config)?;
    for diagnostic in host.take_diagnostics() {
        output::print_diagnostic(diagnostic);
    }
    if reparse == sweep {
        output::print_strategy_agreement(file);
        Ok(0)
    } else {
        output::print_strategy_mismatch(file, &reparse, &sweep);
        Ok(1)
    }
}
