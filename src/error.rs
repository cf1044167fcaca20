//! Error types for template builds.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building templates.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid template '{}': {message}", .path.display())]
    Format { path: PathBuf, message: String },

    #[error("could not find a file matching '{pattern}' in '{}'", .directory.display())]
    NotFound { pattern: String, directory: PathBuf },

    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("layout chain loops back to '{}'", .path.display())]
    CircularLayout { path: PathBuf },

    #[error("layout chain is deeper than {limit} levels at '{}'", .path.display())]
    LayoutDepth { path: PathBuf, limit: usize },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Batch(#[from] BatchError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// One source file that failed to build.
#[derive(Debug)]
pub struct FileFailure {
    pub source_file: PathBuf,
    pub error: Error,
}

/// Every failure of a batch build, plus what was written anyway.
#[derive(Debug)]
pub struct BatchError {
    pub failures: Vec<FileFailure>,
    pub outputs: Vec<PathBuf>,
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.failures.len() + self.outputs.len();
        write!(f, "{} of {} templates failed to build", self.failures.len(), total)?;
        for failure in &self.failures {
            write!(f, "\n  {}: {}", failure.source_file.display(), failure.error)?;
        }
        Ok(())
    }
}

impl std::error::Error for BatchError {}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_pattern_and_directory() {
        let err = Error::NotFound {
            pattern: "_layout*.html".into(),
            directory: PathBuf::from("templates/mail"),
        };
        let msg = err.to_string();
        assert!(msg.contains("_layout*.html"));
        assert!(msg.contains("templates/mail"));
    }

    #[test]
    fn test_batch_lists_each_failure() {
        let err = Error::from(BatchError {
            failures: vec![FileFailure {
                source_file: PathBuf::from("a.html"),
                error: Error::Format {
                    path: PathBuf::from("a.html"),
                    message: "multiple layout references".into(),
                },
            }],
            outputs: vec![PathBuf::from("out/b.html")],
        });
        let msg = err.to_string();
        assert!(msg.starts_with("1 of 2 templates failed to build"));
        assert!(msg.contains("a.html: invalid template 'a.html': multiple layout references"));
    }
}
