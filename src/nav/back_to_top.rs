use crate::dom::{has_class, Element};

/// Scroll offset, in pixels, past which the control becomes visible.
pub const DEFAULT_THRESHOLD: f64 = 280.0;

/// Floating "back to top" control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackToTop {
    threshold: f64,
    visible: bool,
}

impl BackToTop {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            visible: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Recompute visibility for the current vertical scroll offset.
    pub fn on_scroll(&mut self, scroll_y: f64) -> bool {
        self.visible = scroll_y > self.threshold;
        self.visible
    }

    pub fn render(&self, glyph: &str) -> Element {
        let mut button = Element::new("button")
            .class("back-to-top")
            .attr("type", "button")
            .attr("aria-label", "Back to top")
            .child(
                Element::new("span")
                    .class("icon")
                    .attr("aria-hidden", "true")
                    .text(glyph),
            );
        button.toggle_class("visible", self.visible);
        button
    }

    /// Append the control to `body` unless the page already has one.
    pub fn attach(&self, body: &mut Element, glyph: &str) -> bool {
        if body.find(has_class("back-to-top")).is_some() {
            return false;
        }
        body.children.push(self.render(glyph).into());
        true
    }
}

impl Default for BackToTop {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}
