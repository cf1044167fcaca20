//! Build task for host build pipelines.
//!
//! A host hands over its source items and a destination folder; partials are
//! skipped and everything else is built through a [`TemplateEngine`].

use std::path::PathBuf;

use tracing::debug;

use crate::error::Result;
use crate::template::{TemplateEngine, TemplateOptions, is_partial};

/// One invocation of the template build from a host pipeline.
#[derive(Debug, Clone)]
pub struct BuildTask {
    pub source_files: Vec<PathBuf>,
    pub destination_folder: PathBuf,
    pub max_layout_depth: Option<usize>,
}

impl BuildTask {
    pub fn new(destination_folder: impl Into<PathBuf>) -> Self {
        Self {
            source_files: Vec::new(),
            destination_folder: destination_folder.into(),
            max_layout_depth: None,
        }
    }

    /// Task configured from loaded options.
    pub fn from_options(options: &TemplateOptions) -> Self {
        Self {
            source_files: Vec::new(),
            destination_folder: options.output_folder.clone(),
            max_layout_depth: Some(options.max_layout_depth),
        }
    }

    pub fn with_sources<I, P>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.source_files.extend(sources.into_iter().map(Into::into));
        self
    }

    /// Sources that will actually be built.
    pub fn buildable_sources(&self) -> Vec<&PathBuf> {
        self.source_files
            .iter()
            .filter(|source| {
                let partial = is_partial(source);
                if partial {
                    debug!(source = %source.display(), "skipping partial");
                }
                !partial
            })
            .collect()
    }

    /// Build every non-partial source and return the written paths.
    pub fn execute(&self) -> Result<Vec<PathBuf>> {
        let mut options = TemplateOptions::new(&self.destination_folder);
        if let Some(depth) = self.max_layout_depth {
            options = options.with_max_layout_depth(depth);
        }
        TemplateEngine::new(options).build(&self.buildable_sources())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::error::Error;

    #[test]
    fn test_partials_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("_layout.html"), r#"<div data-render-section="body"></div>"#).unwrap();
        fs::write(src.join("welcome.html"), r#"<meta resource="_layout.html"><p>Hi</p>"#).unwrap();

        let out = dir.path().join("out");
        let task = BuildTask::new(&out).with_sources([src.join("_layout.html"), src.join("welcome.html")]);
        let written = task.execute().unwrap();

        assert_eq!(written, vec![out.join("welcome.html")]);
        assert!(!out.join("_layout.html").exists());
        assert_eq!(fs::read_to_string(out.join("welcome.html")).unwrap(), "<p>Hi</p>");
    }

    #[test]
    fn test_options_carry_depth_limit() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("_a.html"), r#"<meta resource="_b.html"><div data-render-section="body"></div>"#).unwrap();
        fs::write(dir.path().join("_b.html"), r#"<div data-render-section="body"></div>"#).unwrap();
        fs::write(dir.path().join("page.html"), r#"<meta resource="_a.html"><p>x</p>"#).unwrap();

        let options = TemplateOptions::new(dir.path().join("out")).with_max_layout_depth(1);
        let task = BuildTask::from_options(&options).with_sources([dir.path().join("page.html")]);

        match task.execute().unwrap_err() {
            Error::Batch(batch) => {
                assert_eq!(batch.failures.len(), 1);
                assert!(matches!(batch.failures[0].error, Error::LayoutDepth { limit: 1, .. }));
            }
            other => panic!("expected Batch, got {other:?}"),
        }
    }
}
