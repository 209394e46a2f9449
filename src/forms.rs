//! Required-field validation for form submits.
//!
//! An empty required field gets the `error` class until the user types into
//! it again. The class is styled by a rule the controller installs once.

#[cfg(test)]
#[path = "forms_test.rs"]
mod forms_test;

use crate::page::{Page, Selector};

pub const ERROR_CLASS: &str = "error";
pub const REQUIRED_ATTR: &str = "required";

/// Marker that identifies the installed error stylesheet.
pub const ERROR_STYLE_ATTR: &str = "data-form-error-style";

pub const ERROR_STYLE: &str = "
.form-control.error {
    border-color: var(--danger-color);
}
.form-control.error:focus {
    box-shadow: 0 0 0 3px rgba(239, 68, 68, 0.1);
}
";

/// Empty after trimming whitespace and byte-order marks, as browsers trim.
fn is_blank(value: &str) -> bool {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}').is_empty()
}

/// Fields carrying the error marker, cleared on their next input event.
#[derive(Debug, Clone)]
pub struct FieldErrors<N> {
    marked: Vec<N>,
}

impl<N> Default for FieldErrors<N> {
    fn default() -> Self {
        Self { marked: Vec::new() }
    }
}

impl<N: Clone + PartialEq> FieldErrors<N> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check every required field in `form`. Returns `true` when all hold a value.
    ///
    /// Empty fields are marked even when an earlier one already failed.
    pub fn validate<P>(&mut self, page: &mut P, form: &N) -> bool
    where
        P: Page<Node = N>,
    {
        self.marked.retain(|f| page.is_attached(f));
        let mut valid = true;
        for field in page.query_within(form, &Selector::Attribute(REQUIRED_ATTR)) {
            if is_blank(&page.value(&field)) {
                valid = false;
                page.add_class(&field, ERROR_CLASS);
                if !self.marked.contains(&field) {
                    self.marked.push(field);
                }
            }
        }
        valid
    }

    /// Clear the marker on `target` if it carries one from a failed submit.
    pub fn on_input<P>(&mut self, page: &mut P, target: &N) -> bool
    where
        P: Page<Node = N>,
    {
        let Some(index) = self.marked.iter().position(|f| f == target) else {
            return false;
        };
        let field = self.marked.swap_remove(index);
        page.remove_class(&field, ERROR_CLASS);
        true
    }

    #[must_use]
    pub fn marked_len(&self) -> usize {
        self.marked.len()
    }

    #[must_use]
    pub fn is_marked(&self, field: &N) -> bool {
        self.marked.contains(field)
    }
}

/// Append the `.form-control.error` rules to `<head>` unless already present.
pub fn install_error_style<P: Page>(page: &mut P) -> bool {
    if page.query(&Selector::Attribute(ERROR_STYLE_ATTR)).is_some() {
        return false;
    }
    let Some(head) = page.head() else {
        log::warn!("no <head>; form error style not installed");
        return false;
    };
    let Some(style) = page.create_element("style") else {
        return false;
    };
    page.set_attribute(&style, ERROR_STYLE_ATTR, "");
    page.append_text(&style, ERROR_STYLE);
    page.append_child(&head, &style);
    true
}
