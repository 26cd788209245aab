pub use crate::config::{ExpandConfig, Strategy, SubstitutionMode};
pub use crate::errors::{ErrorCategory, InlineError, SourceContext};
pub use crate::host::{FsHost, Host, MemoryHost};
pub use crate::macros::transform;

pub mod cli;
pub mod config;
pub mod errors;
pub mod host;
pub mod macros;
pub mod syntax;
