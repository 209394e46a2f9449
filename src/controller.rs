//! The page controller: one entry point per page event.
//!
//! ARCHITECTURE
//! ============
//! `PageController` owns the [`Page`] plus the little state that outlives a
//! single event: in-flight notification dismissals and fields waiting for
//! input to clear their error marker. The host forwards raw events here and
//! applies the returned [`Outcome`] (cancel default, deferred click).
//!
//! Handlers never fail towards the page. Validation problems become
//! notifications; a malformed document degrades to a logged no-op.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use crate::config::PageConfig;
use crate::dismiss::{Dismissals, Timing};
use crate::forms::{self, FieldErrors};
use crate::keys::{self, Shortcut};
use crate::loading::{self, LoadingError};
use crate::notice::{self, ALERT_CLASS, CLOSE_CLASS, Severity};
use crate::page::{KeyPress, Outcome, Page, Selector, TimerId};
use crate::scroll;
use crate::upload;

pub struct PageController<P: Page> {
    page: P,
    config: PageConfig,
    dismissals: Dismissals<P::Node>,
    field_errors: FieldErrors<P::Node>,
    ready: bool,
}

impl<P: Page> PageController<P> {
    #[must_use]
    pub fn new(page: P, config: PageConfig) -> Self {
        Self { page, config, dismissals: Dismissals::new(), field_errors: FieldErrors::new(), ready: false }
    }

    #[must_use]
    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Number of notifications with a dismissal in flight.
    #[must_use]
    pub fn pending_dismissals(&self) -> usize {
        self.dismissals.len()
    }

    fn timing(&self) -> Timing {
        Timing { visible_ms: self.config.visible_ms, fade_ms: self.config.fade_ms }
    }

    // --- Lifecycle ---

    /// Document finished parsing: schedule server-rendered notifications for
    /// dismissal and install the form error style. Runs once.
    pub fn on_ready(&mut self) {
        if self.ready {
            return;
        }
        self.ready = true;
        let timing = self.timing();
        let alerts = self.page.query_all(&Selector::Class(ALERT_CLASS));
        log::debug!("page ready; {} flash message(s) to dismiss", alerts.len());
        for alert in alerts {
            self.dismissals.schedule(&mut self.page, alert, timing);
        }
        forms::install_error_style(&mut self.page);
    }

    /// A page timer fired.
    pub fn on_timer(&mut self, timer: TimerId) {
        let timing = self.timing();
        if !self.dismissals.on_timer(&mut self.page, timer, timing) {
            log::debug!("timer {timer:?} has no pending dismissal");
        }
    }

    // --- Notifications ---

    /// Show a notification that dismisses itself like server-rendered ones.
    pub fn show_message(&mut self, text: &str, severity: Severity) -> Option<P::Node> {
        let Some(container) = notice::flash_container(&mut self.page) else {
            log::warn!("no place for notification: {text}");
            return None;
        };
        let alert = notice::build_notice(&mut self.page, text, severity)?;
        self.page.append_child(&container, &alert);
        let timing = self.timing();
        self.dismissals.schedule(&mut self.page, alert.clone(), timing);
        Some(alert)
    }

    /// Remove a notification now, disarming its pending dismissal.
    pub fn dismiss(&mut self, alert: &P::Node) {
        self.dismissals.dismiss_now(&mut self.page, alert);
    }

    // --- DOM events ---

    /// A form is being submitted.
    pub fn on_submit(&mut self, form: &P::Node) -> Outcome<P::Node> {
        if self.field_errors.validate(&mut self.page, form) {
            return Outcome::pass();
        }
        let text = self.config.messages.required_fields.clone();
        self.show_message(&text, Severity::Error);
        Outcome::prevent()
    }

    /// A control received input.
    pub fn on_input(&mut self, target: &P::Node) {
        self.field_errors.on_input(&mut self.page, target);
    }

    /// A key went down anywhere on the page.
    pub fn on_keydown(&mut self, press: &KeyPress) -> Outcome<P::Node> {
        if keys::is_escape(press) {
            let closed = keys::close_open_modals(&mut self.page);
            if closed > 0 {
                log::debug!("escape closed {closed} modal(s)");
            }
        }

        if !self.config.is_admin_path(&self.page.path_name()) {
            return Outcome::pass();
        }
        match Shortcut::from_key(press) {
            Some(Shortcut::Search) => Outcome::prevent(),
            Some(Shortcut::New) => match keys::primary_button(&self.page) {
                Some(button) => Outcome::prevent_and_activate(button),
                None => Outcome::prevent(),
            },
            None => Outcome::pass(),
        }
    }

    /// A control's value was committed.
    pub fn on_change(&mut self, target: &P::Node) {
        if !upload::is_file_input(&self.page, target) {
            return;
        }
        if let Err(rejection) = upload::validate_selection(&mut self.page, target, &self.config) {
            let text = upload::rejection_message(&rejection, &self.config);
            self.show_message(&text, Severity::Error);
        }
    }

    /// Something was clicked.
    pub fn on_click(&mut self, target: &P::Node) -> Outcome<P::Node> {
        if let Some(close) = self.page.closest(target, &Selector::Class(CLOSE_CLASS)) {
            if let Some(alert) = self.page.closest(&close, &Selector::Class(ALERT_CLASS)) {
                self.dismiss(&alert);
                return Outcome::prevent();
            }
        }

        if let Some((_anchor, fragment)) = scroll::anchor_link(&self.page, target) {
            scroll::scroll_to_fragment(&mut self.page, &fragment);
            return Outcome::prevent();
        }
        Outcome::pass()
    }

    // --- Page-callable helpers ---

    /// Put `element` into or out of the busy state.
    pub fn set_loading(&mut self, element: &P::Node, loading: bool) -> Result<(), LoadingError> {
        let label = self.config.messages.loading_label.clone();
        loading::set_loading(&mut self.page, element, loading, &label)
    }

    /// Ask the user to confirm a deletion.
    pub fn confirm_delete(&mut self, message: Option<&str>) -> bool {
        let text = match message {
            Some(text) if !text.is_empty() => text.to_owned(),
            _ => self.config.messages.confirm_delete.clone(),
        };
        self.page.confirm(&text)
    }
}
