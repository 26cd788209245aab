//! Handles all user-facing output for the CLI.
//!
//! This module is responsible for colorizing diffs, rendering diagnostics and
//! export listings, and generating JSON. By centralizing output logic here,
//! we ensure a consistent user experience across all commands.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use difference::{Changeset, Difference};
use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::errors::InlineError;
use crate::macros::{render, ExportTable};
use crate::syntax::printer::print_pattern;

// ============================================================================
// EXPORT LISTINGS
// ============================================================================

/// One exported function as shown by `inline-expand exports`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportEntry {
    pub name: String,
    pub params: Vec<String>,
    pub body: String,
}

pub fn export_entries(table: &ExportTable) -> Vec<ExportEntry> {
    table
        .iter()
        .map(|(name, function)| ExportEntry {
            name: name.clone(),
            params: function.params.iter().map(print_pattern).collect(),
            body: render(function).text,
        })
        .collect()
}

pub fn print_exports(entries: &[ExportEntry]) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    if entries.is_empty() {
        let _ = writeln!(stdout, "(no inlinable exports)");
        return;
    }
    for entry in entries {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true));
        let _ = write!(stdout, "{}", entry.name);
        let _ = stdout.reset();
        let _ = writeln!(stdout, "({})", entry.params.join(", "));
        for line in entry.body.lines() {
            let _ = writeln!(stdout, "    {}", line);
        }
    }
}

pub fn print_exports_json(entries: &[ExportEntry]) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(entries)?);
    Ok(())
}

// ============================================================================
// EXPANSION RESULTS
// ============================================================================

/// Prints a diagnostic as a miette report on stderr.
pub fn print_diagnostic(error: InlineError) {
    eprintln!("{:?}", miette::Report::new(error));
}

pub fn print_dependencies(file: &Path, dependencies: &[PathBuf]) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
    let _ = writeln!(stdout, "{}:", file.display());
    let _ = stdout.reset();
    if dependencies.is_empty() {
        let _ = writeln!(stdout, "  (none)");
    }
    for dependency in dependencies {
        let _ = writeln!(stdout, "  {}", dependency.display());
    }
}

/// Prints a line diff from `before` to `after` with a header naming `file`.
pub fn print_file_diff(file: &Path, before: &str, after: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
    let _ = writeln!(stdout, "--- {}", file.display());
    let _ = stdout.reset();
    let changeset = Changeset::new(before, after, "\n");
    print_diff(&mut stdout, &changeset.diffs);
}

/// Prints the disagreement between the two strategies for `file`.
pub fn print_strategy_mismatch(file: &Path, reparse: &str, sweep: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = writeln!(stdout, "{}: strategies disagree (- reparse, + sweep)", file.display());
    let _ = stdout.reset();
    let changeset = Changeset::new(reparse, sweep, "\n");
    print_diff(&mut stdout, &changeset.diffs);
}

pub fn print_strategy_agreement(file: &Path) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
    let _ = writeln!(stdout, "{}: strategies agree", file.display());
    let _ = stdout.reset();
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn print_diff(stdout: &mut StandardStream, diffs: &[Difference]) {
    for diff in diffs {
        let (marker, text, color) = match diff {
            Difference::Same(ref x) => (' ', x, None),
            Difference::Add(ref x) => ('+', x, Some(Color::Green)),
            Difference::Rem(ref x) => ('-', x, Some(Color::Red)),
        };
        let _ = stdout.set_color(ColorSpec::new().set_fg(color));
        for line in text.split('\n') {
            let _ = writeln!(stdout, "{}{}", marker, line);
        }
    }
    let _ = stdout.reset();
    let _ = stdout.flush();
}

pub fn write_output(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)
}
