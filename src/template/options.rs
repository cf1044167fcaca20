//! Build options.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Deepest layout chain followed before giving up.
pub const DEFAULT_MAX_LAYOUT_DEPTH: usize = 32;

/// Options for a template build.
///
/// ```
/// use mailsmith::TemplateOptions;
///
/// let options = TemplateOptions::from_json(r#"{ "OutputFolder": "dist/mail" }"#).unwrap();
/// assert_eq!(options.output_folder.to_str(), Some("dist/mail"));
/// assert_eq!(options.max_layout_depth, 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateOptions {
    /// Folder merged templates are written to. Created if missing.
    #[serde(alias = "OutputFolder")]
    pub output_folder: PathBuf,

    #[serde(default = "default_max_layout_depth", alias = "MaxLayoutDepth")]
    pub max_layout_depth: usize,
}

fn default_max_layout_depth() -> usize {
    DEFAULT_MAX_LAYOUT_DEPTH
}

impl TemplateOptions {
    /// Options writing to `output_folder` with default limits.
    pub fn new(output_folder: impl Into<PathBuf>) -> Self {
        Self {
            output_folder: output_folder.into(),
            max_layout_depth: DEFAULT_MAX_LAYOUT_DEPTH,
        }
    }

    pub fn with_max_layout_depth(mut self, depth: usize) -> Self {
        self.max_layout_depth = depth;
        self
    }

    /// Parse options from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&json)
    }
}
