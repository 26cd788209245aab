//! # `%inline` Macro Expansion
//!
//! A macro site `%inline('<module>').<fn>(<args>)` is replaced by the body of
//! `<fn>` as exported from `<module>`, with the call-site arguments substituted
//! for the function's parameters.
//!
//! ## Pipeline
//!
//! - [`locator`] finds the next site (in a parsed program or by regex).
//! - [`exports`] builds the export table of the target module.
//! - [`substitute`] binds arguments to parameters and rewrites the body,
//!   leaving shadowed names alone.
//! - [`render`] prints the rewritten body and shapes it for the splice point.
//! - [`expander`] drives all of the above for one source file.
//!
//! Every stage works on the typed tree from [`crate::syntax`]; no stage
//! mutates its input.

pub mod expander;
pub mod exports;
pub mod locator;
pub mod render;
pub mod substitute;

pub use expander::{driver, transform, Driver, Expander, Reparse, Sweep};
pub use exports::{resolve, Accumulator, ExportTable};
pub use locator::{find_first_site, LocatedSite, SitePosition, SweepMatch, SITE_PATTERN};
pub use render::{render, render_statements, Fragment, FragmentKind};
pub use substitute::{bind_params, check_arity, inline_body, substitute, substitute_all, Bindings};
