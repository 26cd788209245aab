//! Macro site search.
//!
//! Two ways to find `%inline('<module>').<fn>(<args>)` sites:
//!
//! - [`find_first_site`] walks a parsed program. The grammar knows the site as
//!   an expression node, so the result carries exact byte ranges and typed
//!   arguments.
//! - [`SITE_PATTERN`] matches sites line by line in raw text. The argument
//!   text is left unparsed and the replacement shape is guessed from what
//!   precedes the site on its line.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::syntax::printer::Prec;
use crate::syntax::visit::{walk_class, walk_expr, walk_stmt, walk_stmts, walk_var_decl, Visit};
use crate::syntax::{Class, Expr, ForHead, ForInit, MacroSite, MemberProp, Program, Span, Stmt, StmtNode};

/// Where a located site sits in its enclosing code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitePosition {
    /// The site is a whole expression statement. `braced` is set when that
    /// statement is the bare body of `if`/`else`/`for`/`while`/`do`.
    Statement { braced: bool },
    /// An operand or value. `slot` is the weakest binding the surrounding
    /// code accepts without parentheses.
    Expression { slot: Prec },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocatedSite {
    pub site: MacroSite,
    /// Text to replace: the whole statement (with its `;`) for statement
    /// sites, only the macro call otherwise.
    pub replace: Span,
    pub position: SitePosition,
}

/// The first site in source order, if any.
///
/// Sites nested in another site's arguments come after the outer site.
pub fn find_first_site(program: &Program) -> Option<LocatedSite> {
    let mut finder = SiteFinder {
        found: None,
        slot: Prec::Assign,
    };
    walk_stmts(&mut finder, &program.body);
    finder.found
}

struct SiteFinder {
    found: Option<LocatedSite>,
    /// Slot of the expressions the current node visits as direct children.
    slot: Prec,
}

impl SiteFinder {
    fn child(&mut self, expr: &Expr, slot: Prec) {
        self.slot = slot;
        self.visit_expr(expr);
    }

    fn statement_site(&mut self, stmt: &StmtNode, braced: bool) -> bool {
        match &stmt.value {
            Stmt::Expr(Expr::Inline(site)) => {
                self.found = Some(LocatedSite {
                    site: site.clone(),
                    replace: stmt.span,
                    position: SitePosition::Statement { braced },
                });
                true
            }
            _ => false,
        }
    }

    /// Body of a control statement.
    fn body(&mut self, stmt: &StmtNode) {
        if self.found.is_some() || self.statement_site(stmt, true) {
            return;
        }
        self.visit_stmt(stmt);
    }
}

impl<'ast> Visit<'ast> for SiteFinder {
    fn visit_stmt(&mut self, stmt: &'ast StmtNode) {
        if self.found.is_some() || self.statement_site(stmt, false) {
            return;
        }
        self.slot = Prec::Assign;
        match &stmt.value {
            Stmt::If {
                test,
                consequent,
                alternate,
            } => {
                self.visit_expr(test);
                self.body(consequent);
                if let Some(alternate) = alternate {
                    self.body(alternate);
                }
            }
            Stmt::For {
                init,
                test,
                update,
                body,
            } => {
                match init {
                    Some(ForInit::Var(decl)) => walk_var_decl(self, decl),
                    Some(ForInit::Expr(expr)) => self.visit_expr(expr),
                    None => {}
                }
                for expr in test.iter().chain(update.iter()) {
                    self.visit_expr(expr);
                }
                self.body(body);
            }
            Stmt::ForIn {
                left, right, body, ..
            } => {
                match left {
                    ForHead::Var(_, pattern) => self.visit_pattern(pattern),
                    ForHead::Expr(expr) => self.visit_expr(expr),
                }
                self.visit_expr(right);
                self.body(body);
            }
            Stmt::While { test, body } => {
                self.visit_expr(test);
                self.body(body);
            }
            Stmt::DoWhile { body, test } => {
                self.body(body);
                self.visit_expr(test);
            }
            Stmt::With { object, body } => {
                self.visit_expr(object);
                self.body(body);
            }
            Stmt::Labeled { body, .. } => self.body(body),
            _ => walk_stmt(self, stmt),
        }
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        if self.found.is_some() {
            return;
        }
        let slot = self.slot;
        match expr {
            Expr::Inline(site) => {
                self.found = Some(LocatedSite {
                    site: site.clone(),
                    replace: site.span,
                    position: SitePosition::Expression { slot },
                });
            }
            Expr::Call { callee, args, .. } => {
                self.child(callee, Prec::Call);
                for arg in args {
                    self.child(arg, Prec::Assign);
                }
            }
            Expr::New { callee, args } => {
                self.child(callee, Prec::Primary);
                for arg in args.iter().flatten() {
                    self.child(arg, Prec::Assign);
                }
            }
            Expr::Assign { target, value, .. } => {
                self.child(target, Prec::Call);
                self.child(value, Prec::Assign);
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.child(test, Prec::Call);
                self.child(consequent, Prec::Assign);
                self.child(alternate, Prec::Assign);
            }
            Expr::Member {
                object, property, ..
            } => {
                self.child(object, Prec::Call);
                if let MemberProp::Computed(index) = property {
                    self.child(index, Prec::Assign);
                }
            }
            Expr::TaggedTemplate { tag, exprs, .. } => {
                self.child(tag, Prec::Call);
                for expr in exprs {
                    self.child(expr, Prec::Assign);
                }
            }
            Expr::Unary { .. } | Expr::Update { .. } | Expr::Binary { .. } => {
                self.slot = Prec::Call;
                walk_expr(self, expr);
            }
            _ => {
                self.slot = Prec::Assign;
                walk_expr(self, expr);
            }
        }
        self.slot = slot;
    }

    fn visit_class(&mut self, class: &'ast Class) {
        let slot = self.slot;
        self.slot = Prec::Call;
        walk_class(self, class);
        self.slot = slot;
    }
}

// ============================================================================
// TEXTUAL SWEEP
// ============================================================================

/// A site from its line start through the closing `);`.
///
/// Groups: 1 indentation, 2 same-line prefix, 3/4 module reference in single
/// or double quotes, 5 function name, 6 raw argument text.
pub static SITE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?m)^([ \t]*)([^\n]*?)%inline\(\s*(?:'([^'\n]*)'|"([^"\n]*)")\s*\)\.([\p{ID_Start}_$][\p{ID_Continue}$\x{200C}\x{200D}]*)\(((?s:.*?))\);"#,
    )
    .expect("site pattern is a valid regex")
});

/// One [`SITE_PATTERN`] match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepMatch<'t> {
    pub indent: &'t str,
    pub prefix: &'t str,
    pub module: &'t str,
    pub function: &'t str,
    pub args: &'t str,
    /// Byte range of the whole match, from the start of the line.
    pub range: Range<usize>,
}

impl<'t> SweepMatch<'t> {
    pub fn from_captures(caps: &Captures<'t>) -> Option<Self> {
        let whole = caps.get(0)?;
        Some(Self {
            indent: caps.get(1)?.as_str(),
            prefix: caps.get(2)?.as_str(),
            module: caps.get(3).or_else(|| caps.get(4))?.as_str(),
            function: caps.get(5)?.as_str(),
            args: caps.get(6)?.as_str(),
            range: whole.range(),
        })
    }

    /// Whether the site starts a statement. Nothing, or the end of a
    /// statement or block, may precede it on its line.
    pub fn is_statement(&self) -> bool {
        match self.prefix.trim_end().chars().last() {
            None => true,
            Some(last) => matches!(last, ';' | '{' | '}'),
        }
    }

    /// Whether a `//` or an unclosed `/*` outside a string literal precedes
    /// the site on its line.
    pub fn is_commented(&self) -> bool {
        let mut quote = None;
        let mut block = false;
        let mut chars = self.prefix.chars().peekable();
        while let Some(c) = chars.next() {
            if block {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    block = false;
                }
                continue;
            }
            match quote {
                Some(_) if c == '\\' => {
                    chars.next();
                }
                Some(open) if c == open => quote = None,
                Some(_) => {}
                None => match c {
                    '\'' | '"' | '`' => quote = Some(c),
                    '/' if chars.peek() == Some(&'/') => return true,
                    '/' if chars.peek() == Some(&'*') => {
                        chars.next();
                        block = true;
                    }
                    _ => {}
                },
            }
        }
        block
    }

    /// Slot of an expression site, read off the end of the prefix. Anything
    /// but an assignment, `return` or arrow needs a call-level operand.
    pub fn slot(&self) -> Prec {
        let prefix = self.prefix.trim_end();
        let compares = ["==", "!=", "<=", ">="]
            .iter()
            .any(|op| prefix.ends_with(op));
        let assigns = prefix.ends_with('=') && !compares;
        if assigns || prefix.ends_with("=>") || prefix.ends_with("return") {
            Prec::Assign
        } else {
            Prec::Call
        }
    }
}

/// Every sweep match in `source`, in order.
pub fn sweep_matches(source: &str) -> Vec<SweepMatch<'_>> {
    SITE_PATTERN
        .captures_iter(source)
        .filter_map(|caps| SweepMatch::from_captures(&caps))
        .collect()
}
