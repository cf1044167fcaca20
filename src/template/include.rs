//! Inlining of stylesheets and markup includes.

use std::path::Path;

use tracing::debug;

use crate::dom::roles::{TemplateRole, classify};
use crate::dom::{ArenaNodeId, Document, parent_dir};
use crate::error::Result;
use crate::util::read_text;

use super::resolver::resolve;

/// The two kinds of external reference, resolved in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IncludePass {
    /// `<link href>` becomes `<style>` with the file's text.
    Stylesheets,
    /// `[data-include]` is replaced by the file's markup.
    Fragments,
}

impl IncludePass {
    fn pattern(self, role: TemplateRole) -> Option<String> {
        match (self, role) {
            (IncludePass::Stylesheets, TemplateRole::Stylesheet(pattern)) => Some(pattern),
            (IncludePass::Fragments, TemplateRole::Include(pattern)) => Some(pattern),
            _ => None,
        }
    }
}

/// Replace every stylesheet link and include marker in `document`.
///
/// Patterns resolve against the directory of `source_file` (the page being
/// built), not of whichever layout the reference came from. Markup pulled in
/// by an include is not scanned again.
pub fn resolve_includes(source_file: &Path, mut document: Document) -> Result<Document> {
    let directory = parent_dir(source_file);

    for pass in [IncludePass::Stylesheets, IncludePass::Fragments] {
        let targets: Vec<(ArenaNodeId, String)> = classify(&document.dom, document.root)
            .into_iter()
            .filter_map(|(id, role)| pass.pattern(role).map(|pattern| (id, pattern)))
            .collect();

        for (node, pattern) in targets {
            // Nested inside an include that was already replaced
            if !document.dom.is_within(node, document.root) {
                continue;
            }

            let path = resolve(directory, &pattern)?;
            let text = read_text(&path)?;
            debug!(pattern, path = %path.display(), ?pass, "inlining");

            let replacement = match pass {
                IncludePass::Stylesheets => vec![document.dom.create_style(&text)],
                IncludePass::Fragments => document.parse_detached(&text),
            };
            document.dom.replace(node, &replacement);
        }
    }

    Ok(document)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::error::Error;

    fn run(dir: &Path, text: &str) -> Result<String> {
        let source = dir.join("page.html");
        let doc = Document::parse(&source, text);
        resolve_includes(&source, doc).map(|d| d.to_html())
    }

    #[test]
    fn test_stylesheet_wrapped_in_style() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("site.css"), "td > p { margin: 0; }").unwrap();

        let out = run(dir.path(), r#"<link rel="stylesheet" href="site.css"><p>x</p>"#).unwrap();
        assert_eq!(out, "<style>td > p { margin: 0; }</style><p>x</p>");
    }

    #[test]
    fn test_include_inlined_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("_footer.html"), "<p>Unsubscribe</p><p>Address</p>").unwrap();

        let out = run(
            dir.path(),
            r#"<h1>Title</h1><div data-include="_footer.html"></div>"#,
        )
        .unwrap();
        assert_eq!(out, "<h1>Title</h1><p>Unsubscribe</p><p>Address</p>");
    }

    #[test]
    fn test_row_partial_inlined_inside_table() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("_row.html"), r#"<tr><td class="x">Row</td></tr>"#).unwrap();

        let out = run(
            dir.path(),
            r#"<table><tbody><tr data-include="_row.html"></tr></tbody></table>"#,
        )
        .unwrap();
        assert_eq!(out, r#"<table><tbody><tr><td class="x">Row</td></tr></tbody></table>"#);
    }

    #[test]
    fn test_include_is_not_rescanned() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("_outer.html"),
            r#"<div data-include="_inner.html"></div>"#,
        )
        .unwrap();

        let out = run(dir.path(), r#"<section data-include="_outer.html"></section>"#).unwrap();
        assert_eq!(out, r#"<div data-include="_inner.html"></div>"#);
    }

    #[test]
    fn test_nested_include_inside_replaced_node_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("_card.html"), "<p>card</p>").unwrap();

        // _missing.html would fail, but its marker disappears with its parent
        let out = run(
            dir.path(),
            r#"<div data-include="_card.html"><span data-include="_missing.html"></span></div>"#,
        )
        .unwrap();
        assert_eq!(out, "<p>card</p>");
    }

    #[test]
    fn test_includes_resolve_against_source_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("css")).unwrap();
        fs::write(dir.path().join("css/mail.css"), "body{}").unwrap();

        let out = run(dir.path(), r#"<link href="css/*.css">"#).unwrap();
        assert_eq!(out, "<style>body{}</style>");
    }

    #[test]
    fn test_missing_stylesheet_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(dir.path(), r#"<link href="missing.css">"#).unwrap_err();
        match err {
            Error::NotFound { pattern, .. } => assert_eq!(pattern, "missing.css"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
