//! Markup tree used by the template merge.
//!
//! Files are parsed with html5ever into an [`ArenaDom`]. A [`Document`] is a
//! root inside an arena plus the path it came from; parsing a layout or an
//! include "into" an existing document puts the new tree in the same arena so
//! nodes can be moved between the two.

mod arena;
pub mod roles;
mod serialize;
mod tree_sink;

pub use arena::{ArenaDom, ArenaNode, ArenaNodeData, ArenaNodeId, Attribute};
pub use serialize::SerializableNode;

use std::path::{Path, PathBuf};

use html5ever::driver::ParseOpts;
use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{QualName, local_name, ns, parse_document, parse_fragment};

use tree_sink::ArenaSink;

/// How a file's markup was parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Starts with a doctype or `<html>`; kept as parsed.
    Full,
    /// Anything else. Parsed as a fragment, so table parts are kept at the
    /// top level and the nodes sit directly under the document root.
    Fragment,
}

impl DocumentKind {
    /// Decide from the first markup in `text`, skipping a BOM, whitespace
    /// and leading comments.
    pub fn detect(text: &str) -> Self {
        let mut rest = text.trim_start_matches('\u{feff}').trim_start();
        while let Some(after) = rest.strip_prefix("<!--") {
            match after.find("-->") {
                Some(end) => rest = after[end + 3..].trim_start(),
                None => break,
            }
        }
        let head: String = rest.chars().take(9).collect::<String>().to_ascii_lowercase();
        if head.starts_with("<!doctype") || head.starts_with("<html") {
            DocumentKind::Full
        } else {
            DocumentKind::Fragment
        }
    }
}

/// A parsed template file.
#[derive(Debug)]
pub struct Document {
    pub dom: ArenaDom,
    pub root: ArenaNodeId,
    pub kind: DocumentKind,
    path: PathBuf,
}

impl Document {
    /// Parse `text` into a fresh arena.
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Self {
        let mut dom = ArenaDom::new();
        let (root, kind) = parse_into(&mut dom, text);
        Self {
            dom,
            root,
            kind,
            path: path.into(),
        }
    }

    /// Parse `text` into this document's arena, returning the new tree as a
    /// document of its own. `self` is left with an empty arena.
    pub fn parse_sibling(&mut self, path: impl Into<PathBuf>, text: &str) -> Document {
        let mut dom = std::mem::take(&mut self.dom);
        let (root, kind) = parse_into(&mut dom, text);
        Document {
            dom,
            root,
            kind,
            path: path.into(),
        }
    }

    /// Parse `text` into this document's arena and return the nodes that
    /// would be inserted in its place: see [`Document::content_nodes`].
    pub fn parse_detached(&mut self, text: &str) -> Vec<ArenaNodeId> {
        let (root, kind) = parse_into(&mut self.dom, text);
        Self::content_nodes_of(&self.dom, root, kind)
    }

    /// The file this document was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory relative patterns in this document resolve against.
    pub fn directory(&self) -> &Path {
        parent_dir(&self.path)
    }

    /// The nodes that stand for this document when spliced elsewhere: the
    /// top-level nodes of a fragment, or the children of `<head>` followed by
    /// the children of `<body>` of a full document.
    pub fn content_nodes(&self) -> Vec<ArenaNodeId> {
        Self::content_nodes_of(&self.dom, self.root, self.kind)
    }

    /// [`Document::content_nodes`] for a root whose arena has moved elsewhere.
    pub fn content_nodes_of(dom: &ArenaDom, root: ArenaNodeId, kind: DocumentKind) -> Vec<ArenaNodeId> {
        match kind {
            DocumentKind::Fragment => dom.children(root).collect(),
            DocumentKind::Full => ["head", "body"]
                .into_iter()
                .filter_map(|tag| dom.find_by_tag(root, tag))
                .flat_map(|section| dom.children(section))
                .collect(),
        }
    }

    /// Serialize the document back to HTML text.
    pub fn to_html(&self) -> String {
        let mut bytes = Vec::new();
        let node = SerializableNode {
            dom: &self.dom,
            id: self.root,
        };
        let opts = SerializeOpts {
            traversal_scope: TraversalScope::ChildrenOnly(None),
            ..Default::default()
        };
        // Writing into a Vec cannot fail
        let _ = serialize(&mut bytes, &node, opts);
        String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
    }
}

/// Directory of `path`, or `.` for a bare file name.
pub fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

fn parse_into(dom: &mut ArenaDom, text: &str) -> (ArenaNodeId, DocumentKind) {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: false,
            ..Default::default()
        },
        ..Default::default()
    };

    let kind = DocumentKind::detect(text);
    let sink = ArenaSink::new_in(std::mem::take(dom));
    let parser = match kind {
        DocumentKind::Full => parse_document(sink, opts),
        // A <template> context accepts table parts (`<tr>`, `<td>`) at the
        // top level instead of dropping their start tags
        DocumentKind::Fragment => parse_fragment(sink, opts, fragment_context(), Vec::new(), false),
    };
    let (parsed, root) = parser.from_utf8().one(text.as_bytes()).into_parts();
    *dom = parsed;

    if kind == DocumentKind::Fragment {
        lift_fragment_children(dom, root);
    }
    (root, kind)
}

fn fragment_context() -> QualName {
    QualName::new(None, ns!(html), local_name!("template"))
}

/// Fragment parsing puts the nodes under a synthetic `html` element; move
/// them to the document root, in source order.
fn lift_fragment_children(dom: &mut ArenaDom, root: ArenaNodeId) {
    let Some(html) = dom
        .children(root)
        .find(|&c| dom.element_name(c).is_some_and(|n| n.as_ref() == "html"))
    else {
        return;
    };

    for node in dom.children(html).collect::<Vec<_>>() {
        dom.insert_before(html, node);
    }
    dom.detach(html);
}
