//! The build-pipeline side of an expansion.
//!
//! The engine never touches the filesystem or an output channel directly;
//! everything goes through a [`Host`]. [`FsHost`] backs the command-line tool,
//! [`MemoryHost`] backs tests and embedders that keep sources in memory.

use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::errors::InlineError;

pub trait Host {
    /// Absolute (or base-relative) path for a module reference seen in a file
    /// located in `base_dir`.
    fn resolve_module_path(&self, base_dir: &Path, reference: &str) -> PathBuf {
        normalize_path(&base_dir.join(reference))
    }

    fn read_file(&self, path: &Path) -> io::Result<String>;

    /// Non-fatal; expansion continues after a report.
    fn report_diagnostic(&mut self, error: InlineError);

    fn register_dependency(&mut self, path: &Path);

    fn mark_cacheable(&mut self);

    /// Reads `path` with each suffix in turn; the first readable candidate wins.
    ///
    /// Returns `Ok(None)` when no candidate exists. Other I/O failures are
    /// returned as errors.
    fn read_module(
        &self,
        path: &Path,
        extensions: &[String],
    ) -> Result<Option<(PathBuf, String)>, InlineError> {
        for candidate in candidate_paths(path, extensions) {
            match self.read_file(&candidate) {
                Ok(text) => return Ok(Some((candidate, text))),
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(InlineError::io("read module", candidate, e)),
            }
        }
        Ok(None)
    }
}

/// `path` with each suffix appended, in order.
pub fn candidate_paths(path: &Path, extensions: &[String]) -> Vec<PathBuf> {
    extensions
        .iter()
        .map(|ext| {
            let mut candidate = path.as_os_str().to_owned();
            candidate.push(ext);
            PathBuf::from(candidate)
        })
        .collect()
}

/// Lexically removes `.` components and folds `..` into its parent.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let parent_is_normal =
                    matches!(out.components().next_back(), Some(Component::Normal(_)));
                if parent_is_normal {
                    out.pop();
                } else if !matches!(
                    out.components().next_back(),
                    Some(Component::RootDir | Component::Prefix(_))
                ) {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

// ============================================================================
// FILESYSTEM HOST
// ============================================================================

/// Reads modules from disk and records what the engine reports.
#[derive(Debug, Default)]
pub struct FsHost {
    pub diagnostics: Vec<InlineError>,
    pub dependencies: Vec<PathBuf>,
    pub cacheable: bool,
}

impl FsHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything collected so far.
    pub fn take_diagnostics(&mut self) -> Vec<InlineError> {
        std::mem::take(&mut self.diagnostics)
    }
}

impl Host for FsHost {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        if !path.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a file", path.display()),
            ));
        }
        std::fs::read_to_string(path)
    }

    fn report_diagnostic(&mut self, error: InlineError) {
        self.diagnostics.push(error);
    }

    fn register_dependency(&mut self, path: &Path) {
        if !self.dependencies.iter().any(|p| p == path) {
            self.dependencies.push(path.to_path_buf());
        }
    }

    fn mark_cacheable(&mut self) {
        self.cacheable = true;
    }
}

// ============================================================================
// IN-MEMORY HOST
// ============================================================================

/// A host whose files live in a map keyed by normalized path.
#[derive(Debug, Default)]
pub struct MemoryHost {
    files: HashMap<PathBuf, String>,
    pub diagnostics: Vec<InlineError>,
    pub dependencies: Vec<PathBuf>,
    pub cacheable: bool,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: impl AsRef<Path>, contents: impl Into<String>) {
        self.files
            .insert(normalize_path(path.as_ref()), contents.into());
    }
}

impl Host for MemoryHost {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(&normalize_path(path))
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn report_diagnostic(&mut self, error: InlineError) {
        self.diagnostics.push(error);
    }

    fn register_dependency(&mut self, path: &Path) {
        if !self.dependencies.iter().any(|p| p == path) {
            self.dependencies.push(path.to_path_buf());
        }
    }

    fn mark_cacheable(&mut self) {
        self.cacheable = true;
    }
}
