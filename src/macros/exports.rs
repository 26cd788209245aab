//! Export resolution.
//!
//! Finds the functions a module makes available to `%inline`. Only top-level
//! statements are inspected. The walk is a left fold: each statement turns the
//! current [`Accumulator`] into the next one, and [`Accumulator::finish`] keeps
//! the entries that ended up exported.
//!
//! Recognized forms:
//!
//! - `export function f() {}`
//! - `function f() {}` (known, not exported)
//! - `var f = function () {}` / `const f = () => ...` (known, not exported;
//!   exported when prefixed with `export`)
//! - `export default class { static f() {} static g = () => ... }`
//! - `module.exports = { f, g: f, h: function () {}, k() {} }`
//! - `export { f, f as g }`
//!
//! A later occurrence of a name replaces an earlier one. Exporting a local
//! under another name keeps any name it is already exported under, so both
//! `f` and `g` above are available; a local that was never exported is
//! renamed.

use std::collections::BTreeMap;

use crate::syntax::{
    AssignOp, Class, ClassMember, ExportDecl, Expr, Function, MemberProp, MethodKind, Program, Prop, PropKey,
    Stmt, VarDecl,
};

/// Exported function name to its definition.
pub type ExportTable = BTreeMap<String, Function>;

#[derive(Debug, Clone)]
struct Entry {
    function: Function,
    exported: bool,
}

/// State threaded through the fold over top-level statements.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    entries: BTreeMap<String, Entry>,
}

impl Accumulator {
    pub fn step(self, stmt: &Stmt) -> Self {
        match stmt {
            Stmt::Function(function) => self.declare_function(function, false),
            Stmt::Var(decl) => self.declare_vars(decl, false),
            Stmt::Export(ExportDecl::Function(function)) => self.declare_function(function, true),
            Stmt::Export(ExportDecl::DefaultFunction(function)) => {
                self.declare_function(function, true)
            }
            Stmt::Export(ExportDecl::Var(decl)) => self.declare_vars(decl, true),
            Stmt::Export(ExportDecl::DefaultClass(class)) => self.declare_static_methods(class),
            Stmt::Export(ExportDecl::Named {
                specifiers,
                source: None,
            }) => specifiers.iter().fold(self, |acc, spec| {
                let exported = spec.exported.as_deref().unwrap_or(&spec.local);
                acc.reexport(&spec.local, exported)
            }),
            Stmt::Expr(Expr::Assign {
                op: AssignOp::Assign,
                target,
                value,
            }) if is_export_bag(target) => match &**value {
                Expr::Object(props) => props.iter().fold(self, Accumulator::bag_property),
                _ => self,
            },
            _ => self,
        }
    }

    /// The exported entries.
    pub fn finish(self) -> ExportTable {
        self.entries
            .into_iter()
            .filter(|(_, entry)| entry.exported)
            .map(|(name, entry)| (name, entry.function))
            .collect()
    }

    fn insert(mut self, name: &str, function: Function, exported: bool) -> Self {
        self.entries
            .insert(name.to_string(), Entry { function, exported });
        self
    }

    fn declare_function(self, function: &Function, exported: bool) -> Self {
        match &function.name {
            Some(name) => self.insert(name, function.clone(), exported),
            None => self,
        }
    }

    fn declare_vars(self, decl: &VarDecl, exported: bool) -> Self {
        decl.declarators.iter().fold(self, |acc, declarator| {
            match (declarator.target.as_ident(), &declarator.init) {
                (Some(name), Some(init)) => match function_value(init) {
                    Some(function) => acc.insert(name, function.clone(), exported),
                    None => acc,
                },
                _ => acc,
            }
        })
    }

    fn declare_static_methods(self, class: &Class) -> Self {
        class.members.iter().fold(self, |acc, member| {
            let (key, function) = match member {
                ClassMember::Method {
                    is_static: true,
                    method,
                } if method.kind == MethodKind::Method => (&method.key, &method.function),
                ClassMember::Field {
                    is_static: true,
                    key,
                    value: Some(value),
                } => match function_value(value) {
                    Some(function) => (key, function),
                    None => return acc,
                },
                _ => return acc,
            };
            match key_name(key) {
                Some(name) => acc.insert(&name, function.clone(), true),
                None => acc,
            }
        })
    }

    fn bag_property(self, prop: &Prop) -> Self {
        match prop {
            Prop::Shorthand(name) => self.reexport(name, name),
            Prop::KeyValue { key, value } => {
                let Some(key) = key_name(key) else {
                    return self;
                };
                match value {
                    Expr::Ident(local) => self.reexport(local, &key),
                    other => match function_value(other) {
                        Some(function) => self.insert(&key, function.clone(), true),
                        None => self,
                    },
                }
            }
            Prop::Method(method) if method.kind == MethodKind::Method => {
                match key_name(&method.key) {
                    Some(key) => self.insert(&key, method.function.clone(), true),
                    None => self,
                }
            }
            _ => self,
        }
    }

    /// Marks `local` exported under `exported`. A local that is not yet
    /// exported is renamed; an exported one keeps its name as well. Unknown
    /// locals are ignored.
    fn reexport(mut self, local: &str, exported: &str) -> Self {
        let Some(entry) = self.entries.get(local).cloned() else {
            return self;
        };
        if !entry.exported {
            self.entries.remove(local);
        }
        self.insert(exported, entry.function, true)
    }
}

/// Resolves the export table of a parsed module.
pub fn resolve(program: &Program) -> ExportTable {
    program
        .body
        .iter()
        .map(|stmt| &stmt.value)
        .fold(Accumulator::default(), Accumulator::step)
        .finish()
}

/// `module.exports` as an assignment target.
fn is_export_bag(target: &Expr) -> bool {
    matches!(
        target,
        Expr::Member {
            object,
            property: MemberProp::Ident(property),
            optional: false,
        } if property == "exports" && matches!(&**object, Expr::Ident(name) if name == "module")
    )
}

fn function_value(expr: &Expr) -> Option<&Function> {
    match expr {
        Expr::Function(function) | Expr::Arrow(function) => Some(function),
        _ => None,
    }
}

/// Static name of a property key; string keys are unquoted.
fn key_name(key: &PropKey) -> Option<String> {
    match key {
        PropKey::Ident(name) => Some(name.clone()),
        PropKey::Str(raw) => Some(crate::syntax::parser::unquote(raw)),
        PropKey::Number(_) | PropKey::Private(_) | PropKey::Computed(_) => None,
    }
}
