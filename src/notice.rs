//! Notifications ("flash messages"): severity, icon mapping, and markup.
//!
//! Server-rendered flash messages and messages raised from script share the
//! same shape: a `div.alert.alert-<severity>` inside the `.flash-messages`
//! container, which sits directly after the navbar.

#[cfg(test)]
#[path = "notice_test.rs"]
mod notice_test;

use std::fmt;
use std::str::FromStr;

use crate::page::{Page, Selector};

pub const ALERT_CLASS: &str = "alert";
pub const CLOSE_CLASS: &str = "alert-close";
pub const CONTAINER_CLASS: &str = "flash-messages";
pub const NAVBAR_CLASS: &str = "navbar";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

/// Error returned when parsing an unknown severity label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity: {0}")]
pub struct UnknownSeverity(pub String);

impl Severity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    /// Font Awesome icon class for this severity.
    #[must_use]
    pub fn icon_class(self) -> &'static str {
        match self {
            Self::Success => "fa-check-circle",
            Self::Error => "fa-exclamation-circle",
            Self::Warning => "fa-exclamation-triangle",
            Self::Info => "fa-info-circle",
        }
    }

    /// Parse a label from page markup, falling back to [`Severity::Info`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_else(|err: UnknownSeverity| {
            log::warn!("{err}; showing as info");
            Self::Info
        })
    }
}

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            other => Err(UnknownSeverity(other.to_owned())),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Class list for a notification element.
#[must_use]
pub fn alert_class(severity: Severity) -> String {
    format!("{ALERT_CLASS} {ALERT_CLASS}-{severity}")
}

/// Find the notification container, creating it after the navbar if needed.
///
/// Without a navbar the container is appended to `<body>`; without a body
/// there is nowhere to put it.
pub fn flash_container<P: Page>(page: &mut P) -> Option<P::Node> {
    if let Some(existing) = page.query(&Selector::Class(CONTAINER_CLASS)) {
        return Some(existing);
    }
    let container = page.create_element("div")?;
    page.set_attribute(&container, "class", CONTAINER_CLASS);
    if let Some(navbar) = page.query(&Selector::Class(NAVBAR_CLASS)) {
        page.insert_after(&navbar, &container);
    } else {
        log::warn!("no .{NAVBAR_CLASS} on page; appending .{CONTAINER_CLASS} to body");
        let body = page.body()?;
        page.append_child(&body, &container);
    }
    Some(container)
}

/// Build a detached notification element.
///
/// `text` is inserted as a text node. The element carries a close button
/// (`.alert-close`) the page-level click handler reacts to.
pub fn build_notice<P: Page>(page: &mut P, text: &str, severity: Severity) -> Option<P::Node> {
    let alert = page.create_element("div")?;
    page.set_attribute(&alert, "class", &alert_class(severity));

    let icon = page.create_element("i")?;
    page.set_attribute(&icon, "class", &format!("fas {}", severity.icon_class()));
    page.append_child(&alert, &icon);
    page.append_text(&alert, &format!(" {text} "));

    let close = page.create_element("button")?;
    page.set_attribute(&close, "class", CLOSE_CLASS);
    page.set_attribute(&close, "type", "button");
    let close_icon = page.create_element("i")?;
    page.set_attribute(&close_icon, "class", "fas fa-times");
    page.append_child(&close, &close_icon);
    page.append_child(&alert, &close);

    Some(alert)
}
