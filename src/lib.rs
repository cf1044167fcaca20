//! # mailsmith
//!
//! A build-time compiler for HTML email templates.
//!
//! Content pages name a layout with `<meta resource="_layout.html">`; the page
//! is spliced into the layout's `data-render-section` containers, layouts may
//! name layouts of their own, and `<link href>` stylesheets and
//! `data-include` fragments are inlined before the result is written out.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mailsmith::{content_files, TemplateEngine, TemplateOptions};
//!
//! let sources: Vec<_> = content_files("templates").collect();
//! let engine = TemplateEngine::new(TemplateOptions::new("dist/mail"));
//! for path in engine.build(&sources).unwrap() {
//!     println!("wrote {}", path.display());
//! }
//! ```
//!
//! ## Template vocabulary
//!
//! | Construct | Markup |
//! |---|---|
//! | Layout reference | `<meta resource="pattern">` (at most one) |
//! | Section container | `data-render-section="name"` (`body` = rest of the page) |
//! | Section source | `data-layout-section="name"` |
//! | Stylesheet | `<link href="pattern">`, inlined as `<style>` |
//! | Include | `data-include="pattern"`, inlined verbatim |
//!
//! Files whose name starts with `_` are partials: layouts and includes that
//! are never built on their own.

pub mod dom;
pub mod error;
pub mod task;
pub mod template;
pub(crate) mod util;

pub use dom::Document;
pub use error::{BatchError, Error, FileFailure, Result};
pub use task::BuildTask;
pub use template::{
    TemplateEngine, TemplateOptions, build, content_files, is_partial, merge_layouts,
    resolve_includes,
};
