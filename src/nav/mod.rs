//! Chapter navigation: header bar, slide-out drawer and back-to-top control.

mod back_to_top;
mod builder;
mod drawer;

pub use back_to_top::{BackToTop, DEFAULT_THRESHOLD};
pub use builder::{render_bar, render_drawer, LinkKind, NavLink, NavModel, NavOptions};
pub use drawer::{apply_open, DrawerEffect, DrawerEvent, DrawerState};
