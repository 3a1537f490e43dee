use crate::lifecycle::{Element, ElementLifecycle};
use wayfinder_core::presentable::Presentable;
use wayfinder_core::signal::{Once, Visibility};

/// An individual screen.
///
/// Shown and hidden any number of times, dismissed at most once.
#[derive(Debug)]
pub struct Screen {
    title: String,
    lifecycle: ElementLifecycle,
}

impl Screen {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lifecycle: ElementLifecycle::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Tear the screen down. Later appear calls are ignored.
    pub fn dismiss(&self) {
        tracing::debug!(screen = %self.title, "dismissed");
        self.lifecycle.dismissed();
    }
}

impl Element for Screen {
    fn did_appear(&self) {
        if self.lifecycle.is_dismissed() {
            tracing::warn!(screen = %self.title, "appear after dismissal ignored");
            return;
        }
        self.lifecycle.appeared();
    }

    fn did_disappear(&self) {
        self.lifecycle.disappeared();
    }
}

impl Presentable for Screen {
    fn visible(&self) -> Visibility {
        self.lifecycle.visibility()
    }

    fn first_time_visible(&self) -> Once<()> {
        self.lifecycle.first_appearance()
    }

    fn dismissed(&self) -> Once<()> {
        self.lifecycle.dismissal()
    }
}
