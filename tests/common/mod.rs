//! # inline-expand Test Helpers
//!
//! Shared fixtures for the integration tests. Every host file lives in a
//! [`MemoryHost`]; the file being transformed is always `src/main.js`, so
//! module references such as `./lib/math` resolve under `src/`.

#![allow(dead_code)]

use std::path::Path;

use inline_expand::{transform, ExpandConfig, InlineError, MemoryHost, Strategy};

pub const MAIN: &str = "src/main.js";

pub const MATH: &str = "\
export function double(n) { return n * 2; }
export function square(n) { return n * n; }
export function clamp(x, lo, hi) { return x < lo ? lo : x > hi ? hi : x; }
export function report(label, value) {
  console.log(label);
  console.log(value);
}
";

/// A host containing `files` as `(path, contents)` pairs.
pub fn host_with(files: &[(&str, &str)]) -> MemoryHost {
    files
        .iter()
        .fold(MemoryHost::new(), |host, (path, contents)| {
            host.with_file(path, *contents)
        })
}

pub fn math_host() -> MemoryHost {
    host_with(&[("src/lib/math.js", MATH)])
}

pub fn config(strategy: Strategy) -> ExpandConfig {
    ExpandConfig {
        strategy,
        ..ExpandConfig::default()
    }
}

pub fn expand(host: &mut MemoryHost, source: &str, config: &ExpandConfig) -> String {
    transform(source, Path::new(MAIN), host, config)
}

/// Result of one strategy run.
pub struct Run {
    pub output: String,
    pub host: MemoryHost,
}

/// Expands `source` once per strategy, each with a fresh host over `files`.
pub fn expand_both(files: &[(&str, &str)], source: &str) -> (Run, Run) {
    let run = |strategy| {
        let mut host = host_with(files);
        let output = expand(&mut host, source, &config(strategy));
        Run { output, host }
    };
    (run(Strategy::Reparse), run(Strategy::Sweep))
}

/// Asserts both strategies produce `expected` and returns the two runs.
pub fn assert_both(files: &[(&str, &str)], source: &str, expected: &str) -> (Run, Run) {
    let (reparse, sweep) = expand_both(files, source);
    assert_eq!(reparse.output, expected, "reparse strategy");
    assert_eq!(sweep.output, expected, "sweep strategy");
    (reparse, sweep)
}

/// Short variant names of the reported diagnostics.
pub fn diagnostic_kinds(diagnostics: &[InlineError]) -> Vec<&'static str> {
    diagnostics
        .iter()
        .map(|error| match error {
            InlineError::ModuleNotFound { .. } => "module_not_found",
            InlineError::Parse { .. } => "parse",
            InlineError::UnknownFunction { .. } => "unknown_function",
            InlineError::ArityMismatch { .. } => "arity",
            InlineError::HostSyntax { .. } => "host_syntax",
            InlineError::UnsupportedParameter { .. } => "unsupported_parameter",
            InlineError::SpreadArgument { .. } => "spread_argument",
            InlineError::StatementsInExpression { .. } => "statements_in_expression",
            InlineError::NestedExpansion { .. } => "nested_expansion",
            InlineError::RecursionLimit { .. } => "recursion_limit",
            InlineError::Cycle { .. } => "cycle",
            InlineError::PassLimit { .. } => "pass_limit",
            InlineError::Io { .. } => "io",
            InlineError::Config { .. } => "config",
        })
        .collect()
}
