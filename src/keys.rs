//! Keyboard handling: Escape closes modals, admin pages get shortcuts.

#[cfg(test)]
#[path = "keys_test.rs"]
mod keys_test;

use crate::page::{KeyPress, Page, Selector};

pub const MODAL_CLASS: &str = "modal";
pub const PRIMARY_BUTTON_CLASS: &str = "btn-primary";

/// Admin page shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Ctrl/Cmd+K. Reserved; only the browser default is suppressed.
    Search,
    /// Ctrl/Cmd+N. Activates the page's primary button.
    New,
}

impl Shortcut {
    /// Map a key press to a shortcut. Keys are case sensitive.
    #[must_use]
    pub fn from_key(press: &KeyPress) -> Option<Self> {
        if !press.modifiers.command() {
            return None;
        }
        match press.key.as_str() {
            "k" => Some(Self::Search),
            "n" => Some(Self::New),
            _ => None,
        }
    }
}

#[must_use]
pub fn is_escape(press: &KeyPress) -> bool {
    press.key == "Escape"
}

/// Hide every modal shown with inline `display: block`. Returns how many closed.
pub fn close_open_modals<P: Page>(page: &mut P) -> usize {
    let mut closed = 0;
    for modal in page.query_all(&Selector::Class(MODAL_CLASS)) {
        if page.style(&modal, "display") == "block" {
            page.set_style(&modal, "display", "none");
            closed += 1;
        }
    }
    closed
}

/// First primary button on the page, the target of [`Shortcut::New`].
pub fn primary_button<P: Page>(page: &P) -> Option<P::Node> {
    page.query(&Selector::Class(PRIMARY_BUTTON_CLASS))
}
