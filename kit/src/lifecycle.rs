//! Native lifecycle events of a kit element, turned into signals.

use wayfinder_core::signal::{Latch, Once, Visibility, VisibilitySwitch};

/// Records the appear/disappear/dismiss callbacks a toolkit delivers for one
/// element and exposes them as Presentable signals.
#[derive(Debug, Default)]
pub struct ElementLifecycle {
    visibility: VisibilitySwitch,
    first_appearance: Latch<()>,
    dismissal: Latch<()>,
}

impl ElementLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The toolkit finished showing the element.
    pub fn appeared(&self) {
        self.visibility.show();
        if self.first_appearance.fire(()) {
            tracing::trace!("element visible for the first time");
        }
    }

    /// The toolkit finished hiding the element.
    pub fn disappeared(&self) {
        self.visibility.hide();
    }

    /// The element was torn down for good. Hides it if it was still shown.
    pub fn dismissed(&self) {
        self.visibility.hide();
        self.dismissal.fire(());
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissal.has_fired()
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility.watch()
    }

    pub fn first_appearance(&self) -> Once<()> {
        self.first_appearance.signal()
    }

    pub fn dismissal(&self) -> Once<()> {
        self.dismissal.signal()
    }
}

/// Drive an element the way a toolkit would. Test helpers and demos use this
/// to simulate presentation.
pub trait Element: Send + Sync + 'static {
    fn did_appear(&self);
    fn did_disappear(&self);
}
