//! # Flow: Navigation Unit
//!
//! A `Flow` owns one root presentable and a decision function mapping steps to
//! [`NextFlowItems`]. It is itself [`Presentable`]: a flow is visible exactly
//! when its root is.
//!
//! ## Readiness
//!
//! Each flow carries a private, fire-once "ready" notifier that completes when
//! the root is shown for the first time. The notifier is created lazily on
//! first access and cached in the flow, so every observer shares the same
//! event. Late observers receive the historical value instead of waiting.

use crate::error::FlowError;
use crate::next_items::NextFlowItems;
use crate::presentable::{Presentable, downcast_presentable};
use crate::signal::{Once, Visibility};
use crate::step::Step;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use std::fmt;
use std::future::IntoFuture;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlowId(Uuid);

impl FlowId {
    fn new() -> Self {
        FlowId(Uuid::new_v4())
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The navigation decision function of a flow.
///
/// Must be total over the steps the flow can receive (return
/// [`NextFlowItems::None`] for ignored ones) and must not block on UI readiness.
///
/// Closures `Fn(S) -> NextFlowItems<S>` implement it directly.
pub trait Navigate<S: Step>: Send + Sync + 'static {
    fn navigate(&self, step: S) -> NextFlowItems<S>;
}

impl<S, F> Navigate<S> for F
where
    S: Step,
    F: Fn(S) -> NextFlowItems<S> + Send + Sync + 'static,
{
    fn navigate(&self, step: S) -> NextFlowItems<S> {
        self(step)
    }
}

/// A flow's fire-once readiness notifier.
///
/// Clones share one underlying event; await any of them, any number of times.
#[derive(Clone)]
pub struct FlowReady {
    shared: Shared<BoxFuture<'static, ()>>,
}

impl FlowReady {
    /// Wire the notifier to the root's first-visibility signal.
    fn wire(root: &Arc<dyn Presentable>) -> Self {
        Self {
            shared: root.first_time_visible().into_future().shared(),
        }
    }

    /// Whether two handles observe the same notifier.
    pub fn ptr_eq(&self, other: &FlowReady) -> bool {
        self.shared.ptr_eq(&other.shared)
    }

    /// The recorded value, once an observer has seen the notifier fire.
    pub fn peek(&self) -> Option<()> {
        self.shared.peek().copied()
    }
}

impl IntoFuture for FlowReady {
    type Output = ();
    type IntoFuture = Shared<BoxFuture<'static, ()>>;

    fn into_future(self) -> Self::IntoFuture {
        self.shared
    }
}

impl fmt::Debug for FlowReady {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowReady")
            .field("fired", &self.peek().is_some())
            .finish()
    }
}

pub struct Flow<S> {
    id: FlowId,
    label: String,
    root: Arc<dyn Presentable>,
    navigator: Box<dyn Navigate<S>>,
    readiness: Mutex<Option<FlowReady>>,
}

impl<S: Step> Flow<S> {
    pub fn new(
        label: impl Into<String>,
        root: Arc<dyn Presentable>,
        navigator: impl Navigate<S>,
    ) -> Self {
        Self {
            id: FlowId::new(),
            label: label.into(),
            root,
            navigator: Box::new(navigator),
            readiness: Mutex::new(None),
        }
    }

    pub fn id(&self) -> FlowId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The root presentable. Always the same instance for a given flow.
    pub fn root(&self) -> Arc<dyn Presentable> {
        self.root.clone()
    }

    /// The root, re-typed as the concrete `R` it is expected to be.
    pub fn root_as<R: Presentable>(&self) -> Result<Arc<R>, FlowError> {
        downcast_presentable::<R>(&self.label, &self.root)
    }

    pub fn navigate(&self, step: S) -> NextFlowItems<S> {
        tracing::trace!(flow = %self.label, ?step, "navigate");
        self.navigator.navigate(step)
    }

    /// The readiness notifier, created on first access.
    ///
    /// The lock only covers check-then-create; it is released before anyone
    /// waits on the returned notifier.
    pub fn readiness(&self) -> FlowReady {
        let mut slot = self.readiness.lock();
        slot.get_or_insert_with(|| {
            tracing::debug!(flow = %self.label, id = %self.id, "wiring readiness notifier");
            FlowReady::wire(&self.root)
        })
        .clone()
    }

    /// Completes once the root has been shown for the first time.
    pub fn flow_ready(&self) -> FlowReady {
        self.readiness()
    }

    /// Whether the root has already been shown.
    pub fn is_ready(&self) -> bool {
        self.root.first_time_visible().peek().is_some()
    }
}

impl<S: Step> Presentable for Flow<S> {
    fn visible(&self) -> Visibility {
        self.root.visible()
    }

    fn first_time_visible(&self) -> Once<()> {
        self.root.first_time_visible()
    }

    fn dismissed(&self) -> Once<()> {
        self.root.dismissed()
    }
}

impl<S> fmt::Debug for Flow<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flow")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
