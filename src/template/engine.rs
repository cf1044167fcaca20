//! Build orchestration: parse, merge layouts, inline includes, write.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};
use walkdir::WalkDir;

use crate::dom::Document;
use crate::error::{BatchError, Error, FileFailure, Result};
use crate::util::read_text;

use super::include::resolve_includes;
use super::layout::merge_layouts;
use super::options::TemplateOptions;

/// File name prefix of layouts and includes that are never built directly.
pub const PARTIAL_PREFIX: &str = "_";

/// Builds content pages into merged email templates.
///
/// ```no_run
/// use mailsmith::{TemplateEngine, TemplateOptions};
///
/// let engine = TemplateEngine::new(TemplateOptions::new("dist/mail"));
/// let sources: Vec<_> = mailsmith::content_files("templates").collect();
/// let written = engine.build(&sources).unwrap();
/// assert_eq!(written.len(), sources.len());
/// ```
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    options: TemplateOptions,
}

impl TemplateEngine {
    pub fn new(options: TemplateOptions) -> Self {
        Self { options }
    }

    /// Build every source, in order, and return the written paths.
    ///
    /// A failing file does not stop the batch: every source is attempted and
    /// all failures are returned together as [`Error::Batch`].
    pub fn build<P: AsRef<Path>>(&self, sources: &[P]) -> Result<Vec<PathBuf>> {
        self.ensure_output_folder()?;

        let mut outputs = Vec::with_capacity(sources.len());
        let mut failures = Vec::new();
        for source in sources {
            let source = source.as_ref();
            match self.write_one(source) {
                Ok(output) => outputs.push(output),
                Err(err) => {
                    error!(source = %source.display(), "{err}");
                    failures.push(FileFailure {
                        source_file: source.to_path_buf(),
                        error: err,
                    });
                }
            }
        }

        if failures.is_empty() {
            Ok(outputs)
        } else {
            Err(BatchError { failures, outputs }.into())
        }
    }

    /// Build a single source and return the written path.
    pub fn build_file(&self, source: impl AsRef<Path>) -> Result<PathBuf> {
        self.ensure_output_folder()?;
        self.write_one(source.as_ref())
    }

    /// Merge a source into its final HTML without writing anything.
    pub fn render(&self, source: impl AsRef<Path>) -> Result<String> {
        let source = source.as_ref();
        let text = read_text(source)?;
        let document = Document::parse(source, &text);
        let document = merge_layouts(document, self.options.max_layout_depth)?;
        let document = resolve_includes(source, document)?;
        Ok(document.to_html())
    }

    /// Where `source` is written: the output folder plus the source's file name.
    pub fn output_path(&self, source: impl AsRef<Path>) -> Result<PathBuf> {
        let source = source.as_ref();
        let name = source.file_name().ok_or_else(|| Error::Format {
            path: source.to_path_buf(),
            message: "source path has no file name".into(),
        })?;
        Ok(self.options.output_folder.join(name))
    }

    fn write_one(&self, source: &Path) -> Result<PathBuf> {
        let output = self.output_path(source)?;
        // Fully rendered before the output is touched: no partial files
        let html = self.render(source)?;
        fs::write(&output, html).map_err(|e| Error::io(&output, e))?;
        info!("compiled '{}'", source.display());
        debug!(output = %output.display(), "wrote template");
        Ok(output)
    }

    fn ensure_output_folder(&self) -> Result<()> {
        let folder = &self.options.output_folder;
        fs::create_dir_all(folder).map_err(|e| Error::io(folder, e))
    }
}

/// Build `sources` into `output_folder` with default options.
pub fn build<P: AsRef<Path>>(output_folder: impl Into<PathBuf>, sources: &[P]) -> Result<Vec<PathBuf>> {
    TemplateEngine::new(TemplateOptions::new(output_folder)).build(sources)
}

/// True for layouts and includes: files whose name starts with `_`.
pub fn is_partial(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with(PARTIAL_PREFIX))
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
}

/// Every buildable page below `source_folder`: `.html` files, recursively,
/// except partials. Sorted by file name within each directory.
///
/// The walk is lazy and each call starts a new one. A blank or missing
/// folder yields nothing.
pub fn content_files(source_folder: impl AsRef<Path>) -> impl Iterator<Item = PathBuf> {
    let folder = source_folder.as_ref();
    let root = (!folder.to_string_lossy().trim().is_empty() && folder.is_dir())
        .then(|| folder.to_path_buf());

    root.into_iter().flat_map(|root| {
        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| is_html(path) && !is_partial(path))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_partial() {
        assert!(is_partial("templates/_layout.html"));
        assert!(is_partial("_footer.html"));
        assert!(!is_partial("templates/welcome.html"));
        assert!(!is_partial("templates/_shared/welcome.html"));
    }

    #[test]
    fn test_output_path_uses_file_name() {
        let engine = TemplateEngine::new(TemplateOptions::new("out"));
        assert_eq!(
            engine.output_path("templates/orders/receipt.html").unwrap(),
            PathBuf::from("out/receipt.html")
        );
        assert!(matches!(engine.output_path(".."), Err(Error::Format { .. })));
    }

    #[test]
    fn test_content_files_blank_or_missing() {
        assert_eq!(content_files("").count(), 0);
        assert_eq!(content_files("   ").count(), 0);
        assert_eq!(content_files("/definitely/not/here").count(), 0);
    }

    #[test]
    fn test_build_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("welcome.html");
        fs::write(&source, "<p>Welcome</p>").unwrap();
        let out = dir.path().join("out/nested");

        let engine = TemplateEngine::new(TemplateOptions::new(&out));
        let written = engine.build_file(&source).unwrap();

        assert_eq!(written, out.join("welcome.html"));
        assert_eq!(fs::read_to_string(written).unwrap(), "<p>Welcome</p>");
    }
}
