//! Smooth scrolling for in-page anchor links.

#[cfg(test)]
#[path = "scroll_test.rs"]
mod scroll_test;

use crate::page::{Page, Selector};

/// Fragment of an in-page link (`"#votes"` -> `Some("votes")`).
///
/// A bare `"#"` yields `Some("")`; links to other pages yield `None`.
#[must_use]
pub fn in_page_fragment(href: &str) -> Option<&str> {
    href.strip_prefix('#')
}

/// Nearest `<a href="#...">` at or above the click target, with its fragment.
pub fn anchor_link<P: Page>(page: &P, target: &P::Node) -> Option<(P::Node, String)> {
    let anchor = page.closest(target, &Selector::Tag("a"))?;
    let href = page.attribute(&anchor, "href")?;
    let fragment = in_page_fragment(&href)?.to_owned();
    Some((anchor, fragment))
}

/// Scroll the element named by `fragment` into view. Returns whether one was found.
pub fn scroll_to_fragment<P: Page>(page: &mut P, fragment: &str) -> bool {
    if fragment.is_empty() {
        return false;
    }
    let Some(target) = page.query(&Selector::Id(fragment)) else {
        log::debug!("no element with id {fragment:?} to scroll to");
        return false;
    };
    page.scroll_into_view(&target);
    true
}
