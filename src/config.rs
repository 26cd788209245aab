//! Expansion configuration.
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! yields the standard behaviour.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::InlineError;

/// How macro sites are found and spliced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Re-parse the file after every expansion; splices exact byte ranges.
    #[default]
    Reparse,
    /// One line-oriented regex pass over the file.
    Sweep,
}

/// How call-site arguments replace formal parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubstitutionMode {
    /// All parameters in one walk with a combined binding map.
    #[default]
    Simultaneous,
    /// One walk per parameter, in declaration order. An argument that
    /// mentions a later parameter's name is rewritten again by that walk.
    Sequential,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ExpandConfig {
    pub strategy: Strategy,
    /// Suffixes tried in order when reading a target module.
    pub extensions: Vec<String>,
    /// Expand `%inline` sites inside target modules before resolving them.
    pub recursive: bool,
    pub substitution: SubstitutionMode,
    pub max_passes: usize,
    pub max_depth: usize,
}

pub const DEFAULT_MAX_PASSES: usize = 10_000;
pub const DEFAULT_MAX_DEPTH: usize = 16;

impl Default for ExpandConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            extensions: vec![String::new(), ".js".to_string()],
            recursive: false,
            substitution: SubstitutionMode::default(),
            max_passes: DEFAULT_MAX_PASSES,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ExpandConfig {
    pub fn from_yaml_str(text: &str, origin: &Path) -> Result<Self, InlineError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| InlineError::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, InlineError> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| InlineError::io("read config", path, e))?;
        Self::from_yaml_str(&contents, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = ExpandConfig::from_yaml_str("", Path::new("inline.yaml")).unwrap();
        assert_eq!(config, ExpandConfig::default());
        assert_eq!(config.extensions, vec!["".to_string(), ".js".to_string()]);
    }

    #[test]
    fn reads_kebab_case_keys() {
        let yaml = "strategy: sweep\nrecursive: true\nsubstitution: sequential\nmax-passes: 5\nextensions: ['.mjs']\n";
        let config = ExpandConfig::from_yaml_str(yaml, Path::new("inline.yaml")).unwrap();
        assert_eq!(config.strategy, Strategy::Sweep);
        assert!(config.recursive);
        assert_eq!(config.substitution, SubstitutionMode::Sequential);
        assert_eq!(config.max_passes, 5);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.extensions, vec![".mjs".to_string()]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = ExpandConfig::from_yaml_str("max_passes: 3\n", Path::new("inline.yaml"))
            .unwrap_err();
        assert!(matches!(error, InlineError::Config { .. }));
    }
}
