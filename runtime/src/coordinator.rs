//! # Coordinator: Step Dispatch
//!
//! Drives flows: steps from a flow's steppers go into `Flow::navigate`, and
//! the returned [`NextFlowItems`] decide which steppers are listened to next.
//!
//! * A contributed presentable that is itself a `Flow<S>` is coordinated as a
//!   child flow; its `End` step is handed back to the parent.
//! * Steps from a contributed stepper are accepted only while its presentable
//!   is visible and until it is dismissed, unless the contributor lifts those
//!   restrictions. The stepper's initial step always goes through.
//! * A child flow stops being driven once it is dismissed, unless its
//!   contributor allows steps after dismissal.
//! * Every dispatched step publishes a [`NavigationEvent`] before and after
//!   `navigate`.
//!
//! Presenting is not the coordinator's business: `navigate` (or the
//! application around it) does that.

use crate::config::RuntimeConfig;
use crate::scope::Scope;
use chrono::{DateTime, Utc};
use futures_util::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use wayfinder_core::error::FlowResult;
use wayfinder_core::flow::{Flow, FlowId};
use wayfinder_core::next_items::{FlowContributor, NextFlowItems};
use wayfinder_core::presentable::Presentable;
use wayfinder_core::signal::Visibility;
use wayfinder_core::step::{NoneStepper, Step, Stepper};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationPhase {
    WillNavigate,
    DidNavigate,
}

#[derive(Debug, Clone)]
pub struct NavigationEvent {
    pub flow: FlowId,
    pub flow_label: String,
    /// `Debug` rendering of the step.
    pub step: String,
    pub phase: NavigationPhase,
    pub at: DateTime<Utc>,
}

pub struct Coordinator {
    scope: Scope,
    events: broadcast::Sender<NavigationEvent>,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::with_config(&RuntimeConfig::from_env())
    }

    pub fn with_config(config: &RuntimeConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            scope: Scope::new("coordinator"),
            events,
        }
    }

    /// Navigation events from every flow this coordinator drives.
    pub fn events(&self) -> broadcast::Receiver<NavigationEvent> {
        self.events.subscribe()
    }

    /// Start driving `flow` with the steps of `stepper`.
    ///
    /// Steps of the root stepper are never gated on visibility. Dropping the
    /// coordinator stops every flow it drives.
    pub fn coordinate<S: Step>(&self, flow: Arc<Flow<S>>, stepper: impl Stepper<S>) -> FlowResult<()> {
        let (inbox, rx) = mpsc::unbounded_channel();
        let driver = FlowDriver {
            listeners: Scope::new(flow.label()),
            flow,
            inbox,
            parent: None,
            events: self.events.clone(),
        };
        self.scope
            .spawn("flow dispatch", driver.run(rx, Box::new(stepper), None))
    }

    /// Number of root flows still being driven.
    pub fn active_flows(&self) -> usize {
        self.scope.active()
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Restrictions on steps coming from a contributed stepper.
struct Gate {
    presentable: Arc<dyn Presentable>,
    allow_when_not_presented: bool,
    allow_when_dismissed: bool,
}

struct FlowDriver<S> {
    flow: Arc<Flow<S>>,
    inbox: mpsc::UnboundedSender<S>,
    parent: Option<mpsc::UnboundedSender<S>>,
    events: broadcast::Sender<NavigationEvent>,
    /// Stepper listeners and child flows; dropped with the driver.
    listeners: Scope,
}

impl<S: Step> FlowDriver<S> {
    async fn run(
        self,
        rx: mpsc::UnboundedReceiver<S>,
        stepper: Box<dyn Stepper<S>>,
        gate: Option<Gate>,
    ) {
        tracing::info!(flow = %self.flow.label(), id = %self.flow.id(), "flow coordinated");
        let dismissal = gate
            .as_ref()
            .filter(|gate| !gate.allow_when_dismissed)
            .map(|gate| gate.presentable.dismissed().into_future());
        self.listen(stepper, gate);

        let inbox = stream::unfold(rx, |mut rx| async move {
            let step = rx.recv().await?;
            Some((step, rx))
        });
        // A dismissed child flow stops dispatching and releases its listeners.
        let mut steps = match dismissal {
            Some(dismissal) => inbox.take_until(dismissal).boxed(),
            None => inbox.boxed(),
        };

        while let Some(step) = steps.next().await {
            let rendered = format!("{step:?}");
            self.publish(&rendered, NavigationPhase::WillNavigate);
            let items = self.flow.navigate(step);
            tracing::debug!(flow = %self.flow.label(), step = %rendered, ?items, "navigated");
            let ended = self.handle(items);
            self.publish(&rendered, NavigationPhase::DidNavigate);
            if ended {
                break;
            }
        }

        tracing::info!(flow = %self.flow.label(), "flow ended");
    }

    /// Returns `true` when the flow ended.
    fn handle(&self, items: NextFlowItems<S>) -> bool {
        match items {
            NextFlowItems::None => false,
            NextFlowItems::End(forward) => {
                if let Some(step) = forward {
                    self.forward_to_parent(step);
                }
                true
            }
            NextFlowItems::One(contributor) => {
                self.contribute(contributor);
                false
            }
            NextFlowItems::Multiple(contributors) => {
                for contributor in contributors {
                    self.contribute(contributor);
                }
                false
            }
        }
    }

    fn contribute(&self, contributor: FlowContributor<S>) {
        match contributor {
            FlowContributor::ForwardToCurrentFlow(step) => {
                let _ = self.inbox.send(step);
            }
            FlowContributor::ForwardToParentFlow(step) => self.forward_to_parent(step),
            FlowContributor::Contribute {
                presentable,
                stepper,
                allow_step_when_not_presented,
                allow_step_when_dismissed,
            } => {
                let gate = Gate {
                    presentable: presentable.clone(),
                    allow_when_not_presented: allow_step_when_not_presented,
                    allow_when_dismissed: allow_step_when_dismissed,
                };
                match presentable.into_any().downcast::<Flow<S>>() {
                    Ok(child) => {
                        let stepper = stepper.unwrap_or_else(|| Box::new(NoneStepper));
                        self.start_child(child, stepper, gate);
                    }
                    Err(_) => {
                        if let Some(stepper) = stepper {
                            self.listen(stepper, Some(gate));
                        }
                    }
                }
            }
        }
    }

    fn start_child(&self, child: Arc<Flow<S>>, stepper: Box<dyn Stepper<S>>, gate: Gate) {
        let (inbox, rx) = mpsc::unbounded_channel();
        let driver = FlowDriver {
            listeners: Scope::new(child.label()),
            flow: child,
            inbox,
            parent: Some(self.inbox.clone()),
            events: self.events.clone(),
        };
        if let Err(err) = self
            .listeners
            .spawn("child flow dispatch", driver.run(rx, stepper, Some(gate)))
        {
            tracing::error!(flow = %self.flow.label(), error = %err, "failed to start child flow");
        }
    }

    fn listen(&self, mut stepper: Box<dyn Stepper<S>>, gate: Option<Gate>) {
        stepper.ready_to_emit_steps();
        let initial = stepper.initial_step();
        let steps = stepper.into_steps();
        let pump = pump(self.flow.label().to_string(), initial, steps, gate, self.inbox.clone());
        if let Err(err) = self.listeners.spawn("stepper listener", pump) {
            tracing::error!(flow = %self.flow.label(), error = %err, "failed to listen to stepper");
        }
    }

    fn forward_to_parent(&self, step: S) {
        match &self.parent {
            Some(parent) => {
                let _ = parent.send(step);
            }
            None => {
                tracing::warn!(flow = %self.flow.label(), ?step, "no parent flow to forward step to");
            }
        }
    }

    fn publish(&self, step: &str, phase: NavigationPhase) {
        // No subscribers is fine.
        let _ = self.events.send(NavigationEvent {
            flow: self.flow.id(),
            flow_label: self.flow.label().to_string(),
            step: step.to_string(),
            phase,
            at: Utc::now(),
        });
    }
}

async fn pump<S: Step>(
    flow: String,
    initial: Option<S>,
    steps: BoxStream<'static, S>,
    gate: Option<Gate>,
    target: mpsc::UnboundedSender<S>,
) {
    if let Some(step) = initial {
        if target.send(step).is_err() {
            return;
        }
    }

    let (visibility, mut steps): (Option<Visibility>, BoxStream<'static, S>) = match gate {
        None => (None, steps),
        Some(gate) => {
            let steps = if gate.allow_when_dismissed {
                steps
            } else {
                steps
                    .take_until(gate.presentable.dismissed().into_future())
                    .boxed()
            };
            let visibility = (!gate.allow_when_not_presented).then(|| gate.presentable.visible());
            (visibility, steps)
        }
    };

    while let Some(step) = steps.next().await {
        if let Some(visibility) = &visibility {
            if !visibility.is_visible() {
                tracing::debug!(flow = %flow, ?step, "step dropped, presentable not visible");
                continue;
            }
        }
        if target.send(step).is_err() {
            break;
        }
    }
}
