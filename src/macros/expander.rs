//! Expansion driver.
//!
//! Resolves each macro site against its target module and splices the shaped
//! result back into the host text. Two [`Driver`] strategies decide how sites
//! are found:
//!
//! - [`Reparse`] parses the current text, expands the first site, splices it
//!   over the site's exact byte range and starts again. Ranges are always
//!   fresh, so any number of sites per line is handled.
//! - [`Sweep`] replaces every [`SITE_PATTERN`] match in one regex pass. No
//!   re-parsing of the host happens between matches; the shape of each
//!   replacement is inferred from the text on the site's line.
//!
//! ## Error Handling
//!
//! A failing site never stops the file. The error is reported through the
//! [`Host`] and a placeholder comment takes the site's place. Only a host
//! syntax error (reparse strategy) or the pass limit ends expansion early; the
//! text expanded so far is returned.
//!
//! ## Nested Expansion
//!
//! With `recursive` set, a target module containing sites is transformed
//! first, relative to its own directory, with the same host and
//! configuration. Without it, inlining a function whose body contains a site
//! is an error.

use std::path::{Path, PathBuf};

use regex::Captures;

use crate::config::{ExpandConfig, Strategy};
use crate::errors::{InlineError, SourceContext};
use crate::host::{candidate_paths, normalize_path, Host};
use crate::macros::exports;
use crate::macros::locator::{find_first_site, LocatedSite, SitePosition, SweepMatch, SITE_PATTERN};
use crate::macros::render::{
    line_indent, placeholder_expression, placeholder_statement, render_statements,
    shape_expression, shape_statement, Fragment,
};
use crate::macros::substitute::inline_body;
use crate::syntax::parser::{parse_arguments, parse_program};
use crate::syntax::visit::function_contains_inline_site;
use crate::syntax::Expr;

/// Marker every site starts with; text without it is returned untouched.
const SITE_MARKER: &str = "%inline";

// =============================
// Public API
// =============================

/// Expands every `%inline` site in `source`.
///
/// `resource_path` names the file being transformed; module references are
/// resolved relative to its directory. Failures are reported through `host`
/// and never abort the transform.
pub fn transform(
    source: &str,
    resource_path: &Path,
    host: &mut dyn Host,
    config: &ExpandConfig,
) -> String {
    host.mark_cacheable();
    let mut expander = Expander::new(host, config, resource_path);
    expander.expand_source(source, resource_path)
}

/// A strategy for finding and splicing sites in one source text.
pub trait Driver {
    fn expand(&self, expander: &mut Expander<'_>, source: &str, resource_path: &Path) -> String;
}

/// Strategy object for `strategy`.
pub fn driver(strategy: Strategy) -> &'static dyn Driver {
    match strategy {
        Strategy::Reparse => &Reparse,
        Strategy::Sweep => &Sweep,
    }
}

/// Per-transform state shared by both strategies.
pub struct Expander<'h> {
    host: &'h mut dyn Host,
    config: &'h ExpandConfig,
    /// Files being expanded, outermost first.
    stack: Vec<PathBuf>,
}

impl<'h> Expander<'h> {
    pub fn new(host: &'h mut dyn Host, config: &'h ExpandConfig, resource_path: &Path) -> Self {
        Self {
            host,
            config,
            stack: vec![normalize_path(resource_path)],
        }
    }

    pub fn config(&self) -> &ExpandConfig {
        self.config
    }

    /// Runs the configured strategy over `source`.
    pub fn expand_source(&mut self, source: &str, resource_path: &Path) -> String {
        if !source.contains(SITE_MARKER) {
            return source.to_string();
        }
        driver(self.config.strategy).expand(self, source, resource_path)
    }

    fn report(&mut self, error: InlineError) {
        tracing::warn!(category = ?error.category(), "{}", error);
        self.host.report_diagnostic(error);
    }

    // =============================
    // Site resolution
    // =============================

    /// Inlines `function` from `module` with `args` and renders the result.
    pub fn resolve_site(
        &mut self,
        base_dir: &Path,
        module: &str,
        function: &str,
        args: &[Expr],
    ) -> Result<Fragment, InlineError> {
        let path = self.host.resolve_module_path(base_dir, module);
        let (found, text) = self
            .host
            .read_module(&path, &self.config.extensions)?
            .ok_or_else(|| InlineError::ModuleNotFound {
                reference: module.to_string(),
                tried: candidate_paths(&path, &self.config.extensions)
                    .iter()
                    .map(|candidate| candidate.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;
        self.host.register_dependency(&found);
        tracing::debug!(module, function, path = %found.display(), "resolved macro site");

        let text = if self.config.recursive && text.contains(SITE_MARKER) {
            self.expand_nested(&found, &text)?
        } else {
            text
        };

        let program = parse_program(&text).map_err(|e| {
            let source = SourceContext::from_file(found.display().to_string(), text.clone());
            e.into_parse_error(format!("module '{}'", module), &source)
        })?;
        let table = exports::resolve(&program);
        let definition = table.get(function).ok_or_else(|| {
            InlineError::unknown_function(function, module, table.keys().cloned().collect())
        })?;
        if function_contains_inline_site(definition) {
            return Err(InlineError::NestedExpansion {
                function: function.to_string(),
                module: module.to_string(),
            });
        }

        let body = inline_body(definition, args, function, self.config.substitution)?;
        Ok(render_statements(&body))
    }

    fn expand_nested(&mut self, path: &Path, text: &str) -> Result<String, InlineError> {
        let module = path.display().to_string();
        if self.stack.iter().any(|open| open == path) {
            return Err(InlineError::Cycle { module });
        }
        if self.stack.len() > self.config.max_depth {
            return Err(InlineError::RecursionLimit {
                module,
                limit: self.config.max_depth,
            });
        }
        tracing::debug!(module = %module, depth = self.stack.len(), "expanding nested sites");
        self.stack.push(path.to_path_buf());
        let expanded = self.expand_source(text, path);
        self.stack.pop();
        Ok(expanded)
    }

    // =============================
    // Replacement text
    // =============================

    /// Replacement for a site found in a parsed host.
    fn located_replacement(&mut self, text: &str, located: &LocatedSite, base_dir: &Path) -> String {
        let indent = line_indent(text, located.replace.start);
        let site = &located.site;
        let result = self
            .resolve_site(base_dir, &site.module, &site.function, &site.args)
            .and_then(|fragment| match located.position {
                SitePosition::Statement { braced } => {
                    Ok(shape_statement(&fragment, indent, braced))
                }
                SitePosition::Expression { slot } => {
                    shape_expression(&fragment, indent, &site.function, slot)
                }
            });
        match result {
            Ok(replacement) => replacement,
            Err(error) => {
                let placeholder = match located.position {
                    SitePosition::Statement { braced: false } => placeholder_statement(&error),
                    SitePosition::Statement { braced: true } => {
                        format!("{{ {} }}", placeholder_statement(&error))
                    }
                    SitePosition::Expression { .. } => placeholder_expression(&error),
                };
                self.report(error);
                placeholder
            }
        }
    }

    /// Replacement for a whole sweep match, line prefix included.
    fn sweep_replacement(&mut self, m: &SweepMatch<'_>, base_dir: &Path) -> String {
        let statement = m.is_statement();
        let result = parse_arguments(m.args)
            .map_err(|e| {
                let source = SourceContext::from_file(format!("arguments of '{}'", m.function), m.args);
                e.into_parse_error(format!("arguments of '{}'", m.function), &source)
            })
            .and_then(|args| self.resolve_site(base_dir, m.module, m.function, &args))
            .and_then(|fragment| {
                if statement {
                    Ok(shape_statement(&fragment, m.indent, false))
                } else {
                    shape_expression(&fragment, m.indent, m.function, m.slot())
                        .map(|text| text + ";")
                }
            });
        let replacement = match result {
            Ok(replacement) => replacement,
            Err(error) => {
                let placeholder = if statement {
                    placeholder_statement(&error)
                } else {
                    placeholder_expression(&error) + ";"
                };
                self.report(error);
                placeholder
            }
        };
        format!("{}{}{}", m.indent, m.prefix, replacement)
    }
}

/// Directory module references are resolved against.
fn base_dir(resource_path: &Path) -> &Path {
    resource_path.parent().unwrap_or_else(|| Path::new(""))
}

// =============================
// Strategies
// =============================

/// Parse, expand the first site, splice, repeat.
pub struct Reparse;

impl Driver for Reparse {
    fn expand(&self, expander: &mut Expander<'_>, source: &str, resource_path: &Path) -> String {
        let base_dir = base_dir(resource_path);
        let limit = expander.config().max_passes;
        let mut text = source.to_string();
        for pass in 0..limit {
            if !text.contains(SITE_MARKER) {
                return text;
            }
            let program = match parse_program(&text) {
                Ok(program) => program,
                Err(e) => {
                    let source = SourceContext::from_file(resource_path.display().to_string(), text.clone());
                    expander.report(e.into_host_error(&source));
                    return text;
                }
            };
            let Some(located) = find_first_site(&program) else {
                return text;
            };
            tracing::trace!(
                pass,
                start = located.replace.start,
                end = located.replace.end,
                module = %located.site.module,
                "expanding site"
            );
            let replacement = expander.located_replacement(&text, &located, base_dir);
            text.replace_range(located.replace.start..located.replace.end, &replacement);
        }
        let remaining = parse_program(&text)
            .ok()
            .and_then(|program| find_first_site(&program))
            .is_some();
        if remaining {
            expander.report(InlineError::PassLimit { limit });
        }
        text
    }
}

/// One regex pass over the text.
pub struct Sweep;

impl Driver for Sweep {
    fn expand(&self, expander: &mut Expander<'_>, source: &str, resource_path: &Path) -> String {
        let base_dir = base_dir(resource_path);
        SITE_PATTERN
            .replace_all(source, |caps: &Captures<'_>| {
                match SweepMatch::from_captures(caps) {
                    Some(m) if m.is_commented() => {
                        tracing::trace!(start = m.range.start, "skipping commented site");
                        caps[0].to_string()
                    }
                    Some(m) => {
                        tracing::trace!(start = m.range.start, module = m.module, "expanding site");
                        expander.sweep_replacement(&m, base_dir)
                    }
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SubstitutionMode;
    use crate::host::MemoryHost;

    const MATH: &str = "export function double(x) { return x * 2; }\n\
                        export function log2(a, b) { console.log(a); console.log(b); }\n\
                        export function noop() {}\n";

    fn run(host: &mut MemoryHost, source: &str, config: &ExpandConfig) -> String {
        transform(source, Path::new("src/main.js"), host, config)
    }

    fn both(source: &str) -> (String, String) {
        let mut host = MemoryHost::new().with_file("src/math.js", MATH);
        let reparse = run(&mut host, source, &ExpandConfig::default());
        let sweep_config = ExpandConfig {
            strategy: Strategy::Sweep,
            ..ExpandConfig::default()
        };
        let sweep = run(&mut host, source, &sweep_config);
        (reparse, sweep)
    }

    #[test]
    fn text_without_sites_is_untouched() {
        let mut host = MemoryHost::new();
        let source = "var x = 1;";
        assert_eq!(run(&mut host, source, &ExpandConfig::default()), source);
        assert!(host.cacheable);
        assert!(host.dependencies.is_empty());
    }

    #[test]
    fn expression_site_in_both_strategies() {
        let (reparse, sweep) = both("var y = %inline('./math').double(a + 1);\n");
        assert_eq!(reparse, "var y = (a + 1) * 2;\n");
        assert_eq!(sweep, reparse);
    }

    #[test]
    fn statement_site_keeps_indentation() {
        let source = "function f() {\n  %inline('./math').log2(1, 2);\n}\n";
        let (reparse, sweep) = both(source);
        assert_eq!(
            reparse,
            "function f() {\n  console.log(1);\n  console.log(2);\n}\n"
        );
        assert_eq!(sweep, reparse);
    }

    #[test]
    fn empty_body_in_expression_is_void() {
        let (reparse, sweep) = both("x = %inline('./math').noop();\n");
        assert_eq!(reparse, "x = void 0;\n");
        assert_eq!(sweep, reparse);
    }

    #[test]
    fn commented_sites_are_left_alone() {
        let source = "// y = %inline('./math').double(1);\nz = 2; // %inline('./missing').f(3);\n";
        let mut host = MemoryHost::new().with_file("src/math.js", MATH);
        let config = ExpandConfig {
            strategy: Strategy::Sweep,
            ..ExpandConfig::default()
        };
        assert_eq!(run(&mut host, source, &config), source);
        assert!(host.dependencies.is_empty());
        assert!(host.diagnostics.is_empty());

        let (reparse, sweep) = both(source);
        assert_eq!(reparse, source);
        assert_eq!(sweep, source);
    }

    #[test]
    fn tagged_templates_and_line_breaks_survive_expansion() {
        let mut host = MemoryHost::new().with_file("src/math.js", MATH);
        let source = "const t = html`<b>${%inline('./math').double(n)}</b>`\nx = 1\n++y\n";
        let out = run(&mut host, source, &ExpandConfig::default());
        assert_eq!(out, "const t = html`<b>${n * 2}</b>`\nx = 1\n++y\n");
        assert!(host.diagnostics.is_empty());
    }

    #[test]
    fn bare_if_body_gets_a_block() {
        let mut host = MemoryHost::new().with_file("src/math.js", MATH);
        let out = run(
            &mut host,
            "if (c) %inline('./math').log2(1, 2);\n",
            &ExpandConfig::default(),
        );
        assert_eq!(out, "if (c) {\n  console.log(1);\n  console.log(2);\n}\n");
    }

    #[test]
    fn statements_in_expression_position_degrade() {
        let mut host = MemoryHost::new().with_file("src/math.js", MATH);
        let out = run(
            &mut host,
            "y = %inline('./math').log2(1, 2);\n",
            &ExpandConfig::default(),
        );
        assert!(out.starts_with("y = (void 0 /* %inline failed: "));
        assert!(matches!(
            host.diagnostics.as_slice(),
            [InlineError::StatementsInExpression { .. }]
        ));
    }

    #[test]
    fn sequential_mode_is_configurable() {
        let mut host = MemoryHost::new()
            .with_file("src/ops.js", "export function sub(a, b) { return a - b; }");
        let config = ExpandConfig {
            substitution: SubstitutionMode::Sequential,
            ..ExpandConfig::default()
        };
        let out = run(&mut host, "z = %inline('./ops').sub(b, 1);", &config);
        assert_eq!(out, "z = 1 - 1;");
        let out = run(&mut host, "z = %inline('./ops').sub(b, 1);", &ExpandConfig::default());
        assert_eq!(out, "z = b - 1;");
    }

    #[test]
    fn pass_limit_stops_expansion() {
        let mut host = MemoryHost::new().with_file("src/math.js", MATH);
        let config = ExpandConfig {
            max_passes: 1,
            ..ExpandConfig::default()
        };
        let out = run(
            &mut host,
            "a = %inline('./math').double(1);\nb = %inline('./math').double(2);\n",
            &config,
        );
        assert_eq!(out, "a = 1 * 2;\nb = %inline('./math').double(2);\n");
        assert!(matches!(
            host.diagnostics.as_slice(),
            [InlineError::PassLimit { limit: 1 }]
        ));
    }
}
