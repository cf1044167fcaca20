//! Maps template elements to their roles in a merge.
//!
//! The merge only cares about five constructs, each marked by a tag and/or
//! attribute. One pass over a subtree yields every node that plays a role, in
//! document order, so the layout and include steps never query the tree ad hoc.

use super::arena::{ArenaDom, ArenaNodeId};

/// Attribute on `<meta>` naming the layout this document renders into.
pub const LAYOUT_ATTR: &str = "resource";
/// Attribute marking a placeholder in a layout.
pub const RENDER_SECTION_ATTR: &str = "data-render-section";
/// Attribute marking a named fragment in a content page.
pub const LAYOUT_SECTION_ATTR: &str = "data-layout-section";
/// Attribute marking a generic include.
pub const INCLUDE_ATTR: &str = "data-include";
/// Section name of the default slot.
pub const BODY_SECTION: &str = "body";

/// What a node does during a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateRole {
    /// `<meta resource="...">`: pattern of the enclosing layout.
    LayoutReference(String),
    /// `[data-render-section]`: named placeholder in a layout.
    SectionContainer(String),
    /// `[data-layout-section]`: named fragment routed to a container.
    SectionSource(String),
    /// `<link href="...">`: stylesheet inlined as `<style>`.
    Stylesheet(String),
    /// `[data-include]`: markup file inlined verbatim.
    Include(String),
}

impl TemplateRole {
    /// True for a section container that is the default body slot.
    pub fn is_body_slot(&self) -> bool {
        matches!(self, TemplateRole::SectionContainer(name) if is_body_section(name))
    }
}

/// An empty section name falls back to the body slot.
pub fn is_body_section(name: &str) -> bool {
    let name = name.trim();
    name.is_empty() || name == BODY_SECTION
}

/// Roles played by a single element, in a fixed order.
pub fn element_roles(dom: &ArenaDom, id: ArenaNodeId) -> Vec<TemplateRole> {
    let Some(tag) = dom.element_name(id) else {
        return Vec::new();
    };
    let attr = |name: &str| dom.get_attr(id, name).map(str::to_string);

    let mut roles = Vec::new();
    match tag.as_ref() {
        "meta" => roles.extend(attr(LAYOUT_ATTR).map(TemplateRole::LayoutReference)),
        "link" => roles.extend(attr("href").map(TemplateRole::Stylesheet)),
        _ => {}
    }
    roles.extend(attr(RENDER_SECTION_ATTR).map(TemplateRole::SectionContainer));
    roles.extend(attr(LAYOUT_SECTION_ATTR).map(TemplateRole::SectionSource));
    roles.extend(attr(INCLUDE_ATTR).map(TemplateRole::Include));
    roles
}

/// Classify every node below `root`, in document order.
pub fn classify(dom: &ArenaDom, root: ArenaNodeId) -> Vec<(ArenaNodeId, TemplateRole)> {
    dom.descendants(root)
        .into_iter()
        .flat_map(|id| element_roles(dom, id).into_iter().map(move |role| (id, role)))
        .collect()
}
