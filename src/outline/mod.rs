//! Per-page outline: heading ids, level nesting and the collapsible panel.

mod builder;
mod slug;

pub use builder::{build_outline, collect_headings, render_outline, OutlineNode, OutlineToggle};
pub use slug::{slug_base, SlugRegistry};
