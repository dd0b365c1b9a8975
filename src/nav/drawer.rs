use crate::dom::Element;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawerEvent {
    ToggleClicked,
    KeyDown(String),
    /// A click anywhere in the document while the drawer listeners are live.
    DocumentClick { inside_drawer: bool, on_toggle: bool },
    /// A link inside the drawer was followed.
    LinkClicked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerEffect {
    /// Reflect the open state on the panel and the toggle.
    SetOpen(bool),
    /// Start listening for Escape and outside clicks.
    AttachListeners,
    DetachListeners,
    FocusFirstLink,
    FocusToggle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawerState {
    pub open: bool,
}

impl DrawerState {
    pub fn transition(self, event: &DrawerEvent) -> (Self, Vec<DrawerEffect>) {
        match (self.open, event) {
            (false, DrawerEvent::ToggleClicked) => (
                Self { open: true },
                vec![
                    DrawerEffect::SetOpen(true),
                    DrawerEffect::AttachListeners,
                    DrawerEffect::FocusFirstLink,
                ],
            ),
            (true, DrawerEvent::ToggleClicked) | (true, DrawerEvent::LinkClicked) => Self::close(),
            (true, DrawerEvent::KeyDown(key)) if key == "Escape" => {
                let (state, mut effects) = Self::close();
                effects.push(DrawerEffect::FocusToggle);
                (state, effects)
            }
            (
                true,
                DrawerEvent::DocumentClick {
                    inside_drawer: false,
                    on_toggle: false,
                },
            ) => Self::close(),
            _ => (self, Vec::new()),
        }
    }

    fn close() -> (Self, Vec<DrawerEffect>) {
        (
            Self { open: false },
            vec![DrawerEffect::SetOpen(false), DrawerEffect::DetachListeners],
        )
    }
}

/// Mirror the drawer state onto the rendered panel and toggle button.
pub fn apply_open(panel: &mut Element, toggle: &mut Element, open: bool) {
    panel.toggle_class("open", open);
    panel.set_attr("aria-hidden", if open { "false" } else { "true" });
    toggle.set_attr("aria-expanded", if open { "true" } else { "false" });
}
