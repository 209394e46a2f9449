//! Page behavior for the voting site's server-rendered pages.
//!
//! This crate is compiled to WebAssembly and loaded on every page. It
//! dismisses flash messages, blocks submits with empty required fields,
//! refuses oversized or non-spreadsheet uploads, closes modals on Escape,
//! adds admin keyboard shortcuts, and smooth-scrolls in-page links. Pages
//! call `showMessage`, `confirmDelete`, and `setLoading` from inline markup.
//!
//! All behavior is written against the [`page::Page`] trait and tested
//! natively; the `hydrate` feature adds the web-sys backend.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`controller`] | [`controller::PageController`], the entry point for every event |
//! | [`page`] | The document seam, selectors, and event payload types |
//! | [`config`] | Delays, upload limits, and user-facing texts |
//! | [`notice`] | Severities, icons, notification markup |
//! | [`dismiss`] | Cancellable fade-then-remove timers |
//! | [`forms`] | Required-field validation |
//! | [`upload`] | File size/type checks |
//! | [`keys`] | Escape handling and admin shortcuts |
//! | [`scroll`] | In-page anchor scrolling |
//! | [`loading`] | Busy state for buttons |
//! | `browser` | web-sys backend and JS exports (feature `hydrate`) |

pub mod config;
pub mod controller;
pub mod dismiss;
pub mod forms;
pub mod keys;
pub mod loading;
pub mod notice;
pub mod page;
pub mod scroll;
pub mod upload;

#[cfg(feature = "hydrate")]
pub mod browser;

#[cfg(test)]
mod fake;
