use crate::lifecycle::{Element, ElementLifecycle};
use wayfinder_core::presentable::Presentable;
use wayfinder_core::signal::{Once, Visibility};

/// A top-level container.
///
/// The platform never dismisses a window, so its `dismissed` signal never
/// completes.
#[derive(Debug)]
pub struct Window {
    name: String,
    lifecycle: ElementLifecycle,
}

impl Window {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lifecycle: ElementLifecycle::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bring the window on screen.
    pub fn make_visible(&self) {
        tracing::debug!(window = %self.name, "made visible");
        self.did_appear();
    }
}

impl Element for Window {
    fn did_appear(&self) {
        self.lifecycle.appeared();
    }

    fn did_disappear(&self) {
        self.lifecycle.disappeared();
    }
}

impl Presentable for Window {
    fn visible(&self) -> Visibility {
        self.lifecycle.visibility()
    }

    fn first_time_visible(&self) -> Once<()> {
        self.lifecycle.first_appearance()
    }

    fn dismissed(&self) -> Once<()> {
        Once::never()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn window_is_never_dismissed() {
        let window = Window::new("main");
        window.make_visible();
        window.did_disappear();

        let waited = tokio::time::timeout(Duration::from_secs(3600), window.dismissed().wait()).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn window_reports_first_visibility() {
        let window = Window::new("main");
        let first = window.first_time_visible();
        window.make_visible();
        first.await;
        assert!(window.visible().is_visible());
    }
}
