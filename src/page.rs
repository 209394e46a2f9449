//! Document seam: the rendered page as an external resource.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every handler in this crate reads and mutates the live page only through
//! the [`Page`] trait. The browser backend implements it over web-sys; tests
//! implement it over an in-memory tree. Nothing here assumes a browser.
//!
//! Event payloads ([`KeyPress`], [`FileInfo`]) and the handler result type
//! ([`Outcome`]) live here too, since both sides of the seam speak them.

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;

use std::fmt;

/// A typed subset of CSS selectors.
///
/// Handlers only ever need single-part selectors, so they are spelled as
/// data rather than strings. Backends either match them structurally or
/// render them with [`Selector::css`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    /// `.name`
    Class(&'a str),
    /// `#name`
    Id(&'a str),
    /// `tag`
    Tag(&'a str),
    /// `[name]`
    Attribute(&'a str),
    /// `[name="value"]`
    AttributeEquals { name: &'a str, value: &'a str },
    /// `[name^="prefix"]`
    AttributePrefix { name: &'a str, prefix: &'a str },
}

impl Selector<'_> {
    /// Render as a CSS selector string.
    #[must_use]
    pub fn css(&self) -> String {
        match self {
            Self::Class(name) => format!(".{name}"),
            Self::Id(name) => format!("#{name}"),
            Self::Tag(name) => (*name).to_owned(),
            Self::Attribute(name) => format!("[{name}]"),
            Self::AttributeEquals { name, value } => format!("[{name}=\"{}\"]", escape_quotes(value)),
            Self::AttributePrefix { name, prefix } => format!("[{name}^=\"{}\"]", escape_quotes(prefix)),
        }
    }
}

impl fmt::Display for Selector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css())
    }
}

fn escape_quotes(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Handle for a scheduled page timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u32);

/// The first file selected in a file input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// File name as reported by the browser.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Declared MIME type; empty when the browser could not guess one.
    pub mime: String,
}

/// Keyboard modifier keys held during a key press.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// A keydown event.
///
/// `key` holds the key name as reported by the browser (e.g. `"Escape"`, `"k"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyPress {
    #[must_use]
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self { key: key.into(), modifiers }
    }

    /// A key press with no modifiers held.
    #[must_use]
    pub fn plain(key: impl Into<String>) -> Self {
        Self::new(key, Modifiers::default())
    }
}

/// What the host must do with an event after a handler ran.
///
/// Activation is deferred to the host because a programmatic click
/// dispatches further events synchronously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<N> {
    /// Cancel the browser's default action for the event.
    pub prevent_default: bool,
    /// Element to click once the handler has returned.
    pub activate: Option<N>,
}

impl<N> Outcome<N> {
    /// Let the event proceed untouched.
    #[must_use]
    pub fn pass() -> Self {
        Self { prevent_default: false, activate: None }
    }

    /// Cancel the default action.
    #[must_use]
    pub fn prevent() -> Self {
        Self { prevent_default: true, activate: None }
    }

    /// Cancel the default action and click `node` afterwards.
    #[must_use]
    pub fn prevent_and_activate(node: N) -> Self {
        Self { prevent_default: true, activate: Some(node) }
    }
}

/// The rendered document plus the window services the handlers use.
///
/// DOM failures are the implementor's concern: mutators are infallible from
/// the caller's point of view and degrade to no-ops, matching how the page
/// script treats a malformed document.
pub trait Page {
    /// Element handle. Cheap to clone; equality is identity.
    type Node: Clone + PartialEq + fmt::Debug;

    // --- Queries ---

    /// First element in document order matching `selector`.
    fn query(&self, selector: &Selector<'_>) -> Option<Self::Node>;

    /// Every element in document order matching `selector`.
    fn query_all(&self, selector: &Selector<'_>) -> Vec<Self::Node>;

    /// Every descendant of `root` matching `selector`.
    fn query_within(&self, root: &Self::Node, selector: &Selector<'_>) -> Vec<Self::Node>;

    /// `node` itself or its nearest ancestor matching `selector`.
    fn closest(&self, node: &Self::Node, selector: &Selector<'_>) -> Option<Self::Node>;

    /// The `<head>` element.
    fn head(&self) -> Option<Self::Node>;

    /// The `<body>` element.
    fn body(&self) -> Option<Self::Node>;

    /// Path component of the current location.
    fn path_name(&self) -> String;

    // --- Tree edits ---

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> Option<Self::Node>;

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);

    /// Append a text node; `text` is never parsed as markup.
    fn append_text(&mut self, parent: &Self::Node, text: &str);

    /// Insert `node` as the next sibling of `anchor`.
    fn insert_after(&mut self, anchor: &Self::Node, node: &Self::Node);

    /// Detach `node`. Detaching a detached node is a no-op.
    fn remove(&mut self, node: &Self::Node);

    /// Whether `node` is currently part of the document.
    fn is_attached(&self, node: &Self::Node) -> bool;

    // --- Attributes and styles ---

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    fn remove_attribute(&mut self, node: &Self::Node, name: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn add_class(&mut self, node: &Self::Node, class: &str);

    fn remove_class(&mut self, node: &Self::Node, class: &str);

    /// Inline style property; empty when unset.
    fn style(&self, node: &Self::Node, property: &str) -> String;

    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str);

    // --- Content and form state ---

    fn inner_html(&self, node: &Self::Node) -> String;

    fn set_inner_html(&mut self, node: &Self::Node, html: &str);

    /// Current value of a form control; empty for anything else.
    fn value(&self, node: &Self::Node) -> String;

    fn set_value(&mut self, node: &Self::Node, value: &str);

    fn set_disabled(&mut self, node: &Self::Node, disabled: bool);

    /// First selected file of a file input.
    fn selected_file(&self, node: &Self::Node) -> Option<FileInfo>;

    // --- Window services ---

    /// Smooth-scroll `node` so its top edge meets the viewport top.
    fn scroll_into_view(&mut self, node: &Self::Node);

    /// Blocking confirmation dialog.
    fn confirm(&mut self, message: &str) -> bool;

    /// Arm a one-shot timer; the host calls back with `id` after `delay_ms`.
    fn set_timeout(&mut self, id: TimerId, delay_ms: u32);

    /// Disarm a timer. Unknown or already fired ids are ignored.
    fn clear_timeout(&mut self, id: TimerId);
}
