//! Host abstractions for the page, dialogs, timers and clock
//!
//! The behaviors in [`crate::behaviors`] only talk to these traits. The
//! browser build implements them over `web-sys`; tests implement them over
//! an in-memory page and a virtual clock.

use std::time::Duration;

/// Outcome of a submit guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitDecision {
    /// Let the browser submit the form
    Proceed,
    /// Cancel the submission
    Block,
}

/// Handler invoked when a form is submitted
pub type SubmitHandler = Box<dyn FnMut() -> SubmitDecision>;

/// Whether a `document.readyState` value means the parser is still running,
/// so load-time behaviors have to wait for `DOMContentLoaded`
pub fn is_still_parsing(ready_state: &str) -> bool {
    ready_state == "loading"
}

/// A handle to a live DOM element
pub trait DomElement: Clone + 'static {
    fn id(&self) -> String;

    /// Current value of a form control, `None` for anything else
    fn value(&self) -> Option<String>;

    fn set_text(&self, text: &str);

    fn add_class(&self, class: &str) -> crate::Result<()>;

    fn remove_class(&self, class: &str) -> crate::Result<()>;

    /// Smooth-scroll the element into the viewport
    fn scroll_into_view(&self);

    /// First descendant matching `selector`
    fn query_selector(&self, selector: &str) -> crate::Result<Option<Self>>;

    /// Close the element through the UI framework's alert component
    fn dismiss_alert(&self) -> crate::Result<()>;

    /// Attach the UI framework's tooltip. Binding twice reuses the instance.
    fn bind_tooltip(&self) -> crate::Result<()>;

    /// Install a submit listener; `Block` cancels the default action
    fn on_submit(&self, handler: SubmitHandler) -> crate::Result<()>;
}

/// The current document and its location
pub trait Page: Clone + 'static {
    type Element: DomElement;

    fn query_all(&self, selector: &str) -> crate::Result<Vec<Self::Element>>;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Path component of the current location, e.g. `/dashboard`
    fn pathname(&self) -> crate::Result<String>;

    /// Decoded value of a query-string parameter
    fn query_param(&self, name: &str) -> crate::Result<Option<String>>;

    /// Full page reload
    fn reload(&self) -> crate::Result<()>;
}

/// Blocking native dialogs
#[cfg_attr(test, mockall::automock)]
pub trait Dialogs {
    fn alert(&self, message: &str);

    fn confirm(&self, message: &str) -> bool;
}

/// Event-loop timers. Neither kind is ever cancelled; page unload drops them.
pub trait Scheduler {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>);

    fn set_interval(&self, period: Duration, callback: Box<dyn FnMut()>);
}

/// Source of the displayed time of day
pub trait Clock {
    fn time_of_day(&self) -> String;
}

/// Wall clock in the browser's local time zone
#[derive(Debug, Clone)]
pub struct LocalClock {
    format: String,
}

impl LocalClock {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }
}

impl Clock for LocalClock {
    fn time_of_day(&self) -> String {
        chrono::Local::now().format(&self.format).to_string()
    }
}
