//! inline-expand error handling.
//!
//! Every failure the engine can report is an [`InlineError`] variant. Site-level
//! failures never abort a file: the driver reports the error through the host
//! and splices a placeholder in place of the macro site.

use std::path::PathBuf;
use std::sync::Arc;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::syntax::Span;

pub type SourceArc = Arc<NamedSource<String>>;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// Names a piece of source text for diagnostics.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Convert to NamedSource for use with miette error reporting
    pub fn to_named_source(&self) -> SourceArc {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

/// Converts a syntax span into a miette source span.
pub fn to_source_span(span: Span) -> SourceSpan {
    SourceSpan::new(span.start.into(), span.len())
}

// ============================================================================
// ERROR TAXONOMY
// ============================================================================

/// Broad classification used by tests and the CLI summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The referenced module or function could not be found.
    Resolution,
    /// Host, module or argument text failed to parse.
    Syntax,
    /// The site was found but cannot be expanded as written.
    Expansion,
    /// A configured limit was hit.
    Limit,
    Io,
}

#[derive(Debug, Error, Diagnostic)]
pub enum InlineError {
    #[error("cannot find module '{reference}' (tried {tried})")]
    #[diagnostic(
        code(inline::module_not_found),
        help("check the path passed to %inline(); it is resolved relative to the including file")
    )]
    ModuleNotFound { reference: String, tried: String },

    #[error("failed to parse {what}: {message}")]
    #[diagnostic(code(inline::parse))]
    Parse {
        what: String,
        message: String,
        #[source_code]
        src: SourceArc,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("function '{function}' is not exported by '{module}'")]
    #[diagnostic(code(inline::unknown_function))]
    UnknownFunction {
        function: String,
        module: String,
        available: Vec<String>,
        #[help]
        help: String,
    },

    #[error("'{function}' takes {expected} argument(s) but {actual} were supplied")]
    #[diagnostic(code(inline::arity))]
    ArityMismatch {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("syntax error in {file}: {message}; remaining %inline sites left unexpanded")]
    #[diagnostic(code(inline::host_syntax))]
    HostSyntax {
        file: String,
        message: String,
        #[source_code]
        src: SourceArc,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("parameter {index} of '{function}' is not a plain identifier and cannot be inlined")]
    #[diagnostic(code(inline::unsupported_parameter))]
    UnsupportedParameter { function: String, index: usize },

    #[error("spread arguments cannot be inlined into '{function}'")]
    #[diagnostic(code(inline::spread_argument))]
    SpreadArgument { function: String },

    #[error("'{function}' expands to statements but is used inside an expression")]
    #[diagnostic(
        code(inline::statements_in_expression),
        help("use the macro as a standalone statement, or make the function body a single return")
    )]
    StatementsInExpression { function: String },

    #[error("'{function}' in '{module}' contains %inline sites and recursive expansion is disabled")]
    #[diagnostic(
        code(inline::nested_expansion),
        help("enable `recursive` in the configuration (or pass --recursive) to expand nested sites")
    )]
    NestedExpansion { function: String, module: String },

    #[error("nested expansion of '{module}' exceeded the depth limit of {limit}")]
    #[diagnostic(code(inline::recursion_limit))]
    RecursionLimit { module: String, limit: usize },

    #[error("module '{module}' includes itself through %inline")]
    #[diagnostic(code(inline::cycle))]
    Cycle { module: String },

    #[error("expansion stopped after {limit} passes; remaining %inline sites left unexpanded")]
    #[diagnostic(code(inline::pass_limit))]
    PassLimit { limit: usize },

    #[error("{operation} '{}': {source}", .path.display())]
    #[diagnostic(code(inline::io))]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in '{}': {message}", .path.display())]
    #[diagnostic(code(inline::config))]
    Config { path: PathBuf, message: String },
}

fn available_help(available: &[String]) -> String {
    if available.is_empty() {
        "the module exports no inlinable functions".to_string()
    } else {
        format!("exported functions: {}", available.join(", "))
    }
}

impl InlineError {
    pub fn unknown_function(
        function: impl Into<String>,
        module: impl Into<String>,
        available: Vec<String>,
    ) -> Self {
        let help = available_help(&available);
        Self::UnknownFunction {
            function: function.into(),
            module: module.into(),
            available,
            help,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ModuleNotFound { .. } | Self::UnknownFunction { .. } => {
                ErrorCategory::Resolution
            }
            Self::Parse { .. } | Self::HostSyntax { .. } => ErrorCategory::Syntax,
            Self::ArityMismatch { .. }
            | Self::UnsupportedParameter { .. }
            | Self::SpreadArgument { .. }
            | Self::StatementsInExpression { .. }
            | Self::NestedExpansion { .. }
            | Self::Cycle { .. } => ErrorCategory::Expansion,
            Self::RecursionLimit { .. } | Self::PassLimit { .. } => ErrorCategory::Limit,
            Self::Io { .. } | Self::Config { .. } => ErrorCategory::Io,
        }
    }

    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}
