//! Template merging.
//!
//! A build takes a content page through three steps:
//!
//! 1. [`merge_layouts`] follows the page's `<meta resource>` chain, splicing
//!    the page into each layout's `data-render-section` containers.
//! 2. [`resolve_includes`] inlines `<link href>` stylesheets and
//!    `data-include` fragments.
//! 3. The merged tree is serialized and written by [`TemplateEngine`].

mod engine;
mod include;
mod layout;
mod options;
mod resolver;

pub use engine::{PARTIAL_PREFIX, TemplateEngine, build, content_files, is_partial};
pub use include::resolve_includes;
pub use layout::merge_layouts;
pub use options::{DEFAULT_MAX_LAYOUT_DEPTH, TemplateOptions};
pub use resolver::resolve;
