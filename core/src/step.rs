//! Steps and the steppers that produce them.
//!
//! A step is whatever the application says happened; a stepper is a source of
//! steps that a coordinator subscribes to on behalf of a flow.

use futures_util::stream::{self, BoxStream, StreamExt};
use std::fmt::Debug;
use tokio::sync::mpsc;

/// Marker for application-defined navigation steps.
///
/// `Debug` is required so every dispatched step can be logged.
pub trait Step: Send + Debug + 'static {}

impl<T: Send + Debug + 'static> Step for T {}

/// A source of steps.
pub trait Stepper<S: Step>: Send + 'static {
    /// Emitted first, as soon as the stepper is subscribed.
    fn initial_step(&self) -> Option<S> {
        None
    }

    /// Called once by the coordinator right before it subscribes.
    fn ready_to_emit_steps(&mut self) {}

    /// Steps after the initial one.
    fn into_steps(self: Box<Self>) -> BoxStream<'static, S>;
}

/// Emits nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoneStepper;

impl<S: Step> Stepper<S> for NoneStepper {
    fn into_steps(self: Box<Self>) -> BoxStream<'static, S> {
        stream::empty().boxed()
    }
}

/// Emits a single initial step and nothing afterwards.
#[derive(Debug)]
pub struct OneStepper<S> {
    step: parking_lot::Mutex<Option<S>>,
}

impl<S: Step> OneStepper<S> {
    pub fn new(step: S) -> Self {
        Self {
            step: parking_lot::Mutex::new(Some(step)),
        }
    }
}

impl<S: Step> Stepper<S> for OneStepper<S> {
    fn initial_step(&self) -> Option<S> {
        self.step.lock().take()
    }

    fn into_steps(self: Box<Self>) -> BoxStream<'static, S> {
        stream::empty().boxed()
    }
}

/// Application-driven stepper: steps are pushed through a [`StepSender`].
pub struct StepChannel<S> {
    initial: parking_lot::Mutex<Option<S>>,
    rx: mpsc::UnboundedReceiver<S>,
}

/// Push side of a [`StepChannel`]. Cheap to clone; the channel ends when
/// every sender is dropped.
#[derive(Debug)]
pub struct StepSender<S> {
    tx: mpsc::UnboundedSender<S>,
}

impl<S> Clone for StepSender<S> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<S: Step> StepSender<S> {
    /// Emit a step. Returns `false` if nobody listens anymore.
    pub fn emit(&self, step: S) -> bool {
        self.tx.send(step).is_ok()
    }
}

impl<S: Step> StepChannel<S> {
    pub fn new() -> (StepSender<S>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        let channel = Self {
            initial: parking_lot::Mutex::new(None),
            rx,
        };
        (StepSender { tx }, channel)
    }

    pub fn with_initial_step(self, step: S) -> Self {
        *self.initial.lock() = Some(step);
        self
    }
}

impl<S: Step> Stepper<S> for StepChannel<S> {
    fn initial_step(&self) -> Option<S> {
        self.initial.lock().take()
    }

    fn into_steps(self: Box<Self>) -> BoxStream<'static, S> {
        stream::unfold(self.rx, |mut rx| async move {
            let step = rx.recv().await?;
            Some((step, rx))
        })
        .boxed()
    }
}

/// Combines several steppers: every child's initial step first, in order,
/// then the children's steps merged as they arrive.
pub struct CompositeStepper<S> {
    children: Vec<Box<dyn Stepper<S>>>,
}

impl<S: Step> CompositeStepper<S> {
    pub fn new(children: Vec<Box<dyn Stepper<S>>>) -> Self {
        Self { children }
    }
}

impl<S: Step> Stepper<S> for CompositeStepper<S> {
    fn ready_to_emit_steps(&mut self) {
        for child in &mut self.children {
            child.ready_to_emit_steps();
        }
    }

    fn into_steps(self: Box<Self>) -> BoxStream<'static, S> {
        let initials: Vec<S> = self
            .children
            .iter()
            .filter_map(|child| child.initial_step())
            .collect();
        let merged = stream::select_all(self.children.into_iter().map(|child| child.into_steps()));
        stream::iter(initials).chain(merged).boxed()
    }
}
