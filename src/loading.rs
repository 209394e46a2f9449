//! Busy state for buttons: disable, show a spinner, restore afterwards.
//!
//! The original content is cached on the element itself in
//! `data-original-text`, so state survives independently of the controller.

#[cfg(test)]
#[path = "loading_test.rs"]
mod loading_test;

use crate::page::Page;

pub const ORIGINAL_CONTENT_ATTR: &str = "data-original-text";

/// Error returned by [`set_loading`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadingError {
    /// Restore requested for an element that was never put in the busy state.
    #[error("element is not in the loading state")]
    NotLoading,
}

/// Markup shown while an element is busy.
#[must_use]
pub fn spinner_html(label: &str) -> String {
    format!("<i class=\"fas fa-spinner fa-spin\"></i> {label}")
}

#[must_use]
pub fn is_loading<P: Page>(page: &P, element: &P::Node) -> bool {
    page.attribute(element, ORIGINAL_CONTENT_ATTR).is_some()
}

/// Enter or leave the busy state.
///
/// Entering twice keeps the content cached the first time. Leaving without
/// having entered fails and leaves the element untouched.
pub fn set_loading<P: Page>(page: &mut P, element: &P::Node, loading: bool, label: &str) -> Result<(), LoadingError> {
    if loading {
        page.set_disabled(element, true);
        if !is_loading(page, element) {
            let original = page.inner_html(element);
            page.set_attribute(element, ORIGINAL_CONTENT_ATTR, &original);
        }
        page.set_inner_html(element, &spinner_html(label));
        return Ok(());
    }

    let original = page.attribute(element, ORIGINAL_CONTENT_ATTR).ok_or(LoadingError::NotLoading)?;
    page.set_disabled(element, false);
    page.set_inner_html(element, &original);
    page.remove_attribute(element, ORIGINAL_CONTENT_ATTR);
    Ok(())
}
