//! Function rendering and replacement shaping.
//!
//! [`render`] turns a function body into a source fragment. The `shape_*`
//! functions fit a fragment into the place it will be spliced: a whole
//! statement or a sub-expression.

use crate::errors::InlineError;
use crate::syntax::printer::{expr_precedence, print_expr, print_statements, starts_ambiguously, Prec};
use crate::syntax::{Function, Stmt, StmtNode};

/// What a rendered fragment contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Empty,
    /// A single expression whose outermost operator binds at `prec`.
    Expression { prec: Prec },
    Statements,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub kind: FragmentKind,
}

impl Fragment {
    fn empty() -> Self {
        Self {
            text: String::new(),
            kind: FragmentKind::Empty,
        }
    }
}

/// Renders the body of `function`.
pub fn render(function: &Function) -> Fragment {
    render_statements(&function.body_statements())
}

/// Renders a function body given as statements.
///
/// A leading `return <expr>` renders as just `<expr>`; anything after it is
/// dropped as unreachable. Otherwise every statement is printed.
pub fn render_statements(body: &[StmtNode]) -> Fragment {
    let Some(first) = body.first() else {
        return Fragment::empty();
    };
    match &first.value {
        Stmt::Return(None) => Fragment::empty(),
        Stmt::Return(Some(expr)) => {
            if starts_ambiguously(expr) {
                Fragment {
                    text: format!("({})", print_expr(expr)),
                    kind: FragmentKind::Expression {
                        prec: Prec::Primary,
                    },
                }
            } else {
                Fragment {
                    text: print_expr(expr),
                    kind: FragmentKind::Expression {
                        prec: expr_precedence(expr),
                    },
                }
            }
        }
        _ => Fragment {
            text: print_statements(body),
            kind: FragmentKind::Statements,
        },
    }
}

/// Prefixes every line after the first with `indent`. Blank lines stay blank.
pub fn reindent(text: &str, indent: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(indent);
            }
        }
        out.push_str(line);
    }
    out
}

/// Leading whitespace of the line containing byte `offset`.
pub fn line_indent(source: &str, offset: usize) -> &str {
    let line_start = source[..offset].rfind('\n').map_or(0, |nl| nl + 1);
    let line = &source[line_start..];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}

// ============================================================================
// SHAPING
// ============================================================================

/// Replacement for a site that is a whole expression statement, including
/// its `;`. `braced` is set when the statement is the bare body of a control
/// statement (`if (c) %inline(..)..;`), where several statements need a block.
pub fn shape_statement(fragment: &Fragment, indent: &str, braced: bool) -> String {
    match fragment.kind {
        FragmentKind::Empty if braced => "{}".to_string(),
        FragmentKind::Empty => String::new(),
        FragmentKind::Expression { .. } => reindent(&format!("{};", fragment.text), indent),
        FragmentKind::Statements if braced => {
            let inner = format!("{}  ", indent);
            format!(
                "{{\n{}{}\n{}}}",
                inner,
                reindent(&fragment.text, &inner),
                indent
            )
        }
        FragmentKind::Statements => reindent(&fragment.text, indent),
    }
}

/// Replacement for a site used as an operand or value. `slot` is the
/// weakest binding the surrounding code accepts without parentheses.
pub fn shape_expression(
    fragment: &Fragment,
    indent: &str,
    function: &str,
    slot: Prec,
) -> Result<String, InlineError> {
    match fragment.kind {
        FragmentKind::Empty => Ok("void 0".to_string()),
        FragmentKind::Expression { prec } if prec >= slot => {
            Ok(reindent(&fragment.text, indent))
        }
        FragmentKind::Expression { .. } => Ok(format!("({})", reindent(&fragment.text, indent))),
        FragmentKind::Statements => Err(InlineError::StatementsInExpression {
            function: function.to_string(),
        }),
    }
}

fn comment_safe(message: &str) -> String {
    message.replace("*/", "* /").replace(['\n', '\r'], " ")
}

pub fn placeholder_statement(error: &InlineError) -> String {
    format!("/* %inline failed: {} */", comment_safe(&error.to_string()))
}

pub fn placeholder_expression(error: &InlineError) -> String {
    format!(
        "(void 0 /* %inline failed: {} */)",
        comment_safe(&error.to_string())
    )
}
