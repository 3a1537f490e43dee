//! # Presentable: Uniform Lifecycle Contract
//!
//! Every navigable unit (a single screen, a top-level container, a whole
//! [`Flow`](crate::flow::Flow)) exposes the same three signals. Element kinds
//! supply them from their native lifecycle; composites delegate to their root.

use crate::error::FlowError;
use crate::signal::{Once, Visibility};
use std::any::{Any, type_name};
use std::sync::Arc;

/// Runtime type access for presentables held as trait objects.
///
/// Implemented for every sized `Any + Send + Sync` type; never implement it by hand.
pub trait AsAny: Any + Send + Sync {
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// Concrete type name of the implementor.
    fn presentable_type(&self) -> &'static str;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn presentable_type(&self) -> &'static str {
        type_name::<T>()
    }
}

/// The three-signal lifecycle contract.
///
/// None of the signals may fail. An element with no native dismissal must
/// return [`Once::never`] from [`dismissed`](Presentable::dismissed), never an
/// already completed signal.
pub trait Presentable: AsAny {
    /// Appear/disappear transitions of the element.
    fn visible(&self) -> Visibility;

    /// Completes the first time the element is shown, and only then.
    fn first_time_visible(&self) -> Once<()>;

    /// Completes once the element is permanently torn down.
    fn dismissed(&self) -> Once<()>;
}

/// Re-type a presentable as the concrete `R` it was declared to be.
///
/// `owner` names the flow holding the presentable, for the error report.
pub fn downcast_presentable<R: Presentable>(
    owner: &str,
    presentable: &Arc<dyn Presentable>,
) -> Result<Arc<R>, FlowError> {
    // Deref to the trait object so the blanket impl on `Arc` is not picked.
    let actual = (**presentable).presentable_type();
    presentable
        .clone()
        .into_any()
        .downcast::<R>()
        .map_err(|_| FlowError::RootTypeMismatch {
            flow: owner.to_string(),
            expected: type_name::<R>(),
            actual,
        })
}
