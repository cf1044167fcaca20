//! Layout chain resolution and section splicing.
//!
//! A content page names its layout with `<meta resource="pattern">`. The
//! layout is parsed into the page's arena, the page is spliced into the
//! layout's section containers, and the result is treated as content for the
//! layout's own layout, until a document without a reference is reached.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::dom::roles::{TemplateRole, classify};
use crate::dom::{ArenaNodeId, Document};
use crate::error::{Error, Result};
use crate::util::read_text;

use super::resolver::resolve;

/// Follow `content`'s layout chain to the top and return the merged document.
///
/// A document without a layout reference is returned unchanged. The returned
/// document's path is the outermost layout's path.
pub fn merge_layouts(content: Document, max_depth: usize) -> Result<Document> {
    let mut content = content;
    let mut visited: HashSet<PathBuf> = HashSet::new();
    visited.insert(chain_key(content.path()));

    let mut depth = 0;
    while let Some(layout_path) = take_layout_reference(&mut content)? {
        depth += 1;
        if depth > max_depth {
            return Err(Error::LayoutDepth {
                path: layout_path,
                limit: max_depth,
            });
        }
        if !visited.insert(chain_key(&layout_path)) {
            return Err(Error::CircularLayout { path: layout_path });
        }

        let text = read_text(&layout_path)?;
        debug!(
            content = %content.path().display(),
            layout = %layout_path.display(),
            "merging into layout"
        );
        content = splice(content, &layout_path, &text);
    }

    Ok(content)
}

/// Resolve and detach the document's layout reference, if it has one.
///
/// More than one reference is a format error, raised before any lookup.
fn take_layout_reference(document: &mut Document) -> Result<Option<PathBuf>> {
    let references: Vec<(ArenaNodeId, String)> = classify(&document.dom, document.root)
        .into_iter()
        .filter_map(|(id, role)| match role {
            TemplateRole::LayoutReference(pattern) => Some((id, pattern)),
            _ => None,
        })
        .collect();

    let (node, pattern) = match references.as_slice() {
        [] => return Ok(None),
        [single] => single.clone(),
        _ => {
            return Err(Error::Format {
                path: document.path().to_path_buf(),
                message: format!(
                    "found {} <meta resource> layout references, expected at most one",
                    references.len()
                ),
            });
        }
    };

    let layout_path = resolve(document.directory(), &pattern)?;
    document.dom.detach(node);
    Ok(Some(layout_path))
}

/// Parse `layout_text` next to `content` and splice content into its sections.
fn splice(mut content: Document, layout_path: &Path, layout_text: &str) -> Document {
    let mut layout = content.parse_sibling(layout_path, layout_text);

    // Sources are gathered before any node moves and ids stay valid, so a
    // named container still finds its source after the body slot has
    // relocated the page. `content` keeps its root id; its nodes now live in
    // the layout's arena.
    let mut sources: HashMap<String, ArenaNodeId> = HashMap::new();
    for (id, role) in classify(&layout.dom, content.root) {
        if let TemplateRole::SectionSource(name) = role {
            sources.entry(name).or_insert(id);
        }
    }

    let mut body_filled = false;
    for (container, role) in classify(&layout.dom, layout.root) {
        let TemplateRole::SectionContainer(ref name) = role else {
            continue;
        };

        if role.is_body_slot() {
            if body_filled {
                warn!(
                    layout = %layout_path.display(),
                    "ignoring extra body section container; only the first is filled"
                );
                continue;
            }
            let body_nodes = Document::content_nodes_of(&layout.dom, content.root, content.kind);
            layout.dom.insert_all_after(container, &body_nodes);
            layout.dom.detach(container);
            body_filled = true;
        } else if let Some(source) = sources.remove(name) {
            layout.dom.insert_after(container, source);
            layout.dom.detach(container);
        } else {
            debug!(
                section = %name,
                layout = %layout_path.display(),
                "no section source; leaving container in place"
            );
        }
    }

    layout
}

fn chain_key(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
