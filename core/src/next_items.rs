//! # NextFlowItems: Navigation Decisions as Data
//!
//! `Flow::navigate` never presents anything itself. It returns what should be
//! shown next and which steppers to listen to afterwards; the coordinator
//! acts on it.

use crate::presentable::Presentable;
use crate::step::{Step, Stepper};
use std::fmt;
use std::sync::Arc;

/// The result of one navigation decision.
pub enum NextFlowItems<S> {
    /// Several things to show and listen to.
    Multiple(Vec<FlowContributor<S>>),
    /// A single thing to show and listen to.
    One(FlowContributor<S>),
    /// This flow is finished. The optional step is handed to the parent flow.
    End(Option<S>),
    /// The step is deliberately ignored.
    None,
}

impl<S: Step> NextFlowItems<S> {
    pub fn end() -> Self {
        NextFlowItems::End(None)
    }

    pub fn end_with(step: S) -> Self {
        NextFlowItems::End(Some(step))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, NextFlowItems::None)
    }

    pub fn is_end(&self) -> bool {
        matches!(self, NextFlowItems::End(_))
    }

    /// Flatten into contributors; `End` and `None` carry none.
    pub fn into_contributors(self) -> Vec<FlowContributor<S>> {
        match self {
            NextFlowItems::Multiple(contributors) => contributors,
            NextFlowItems::One(contributor) => vec![contributor],
            NextFlowItems::End(_) | NextFlowItems::None => Vec::new(),
        }
    }
}

impl<S: Step> fmt::Debug for NextFlowItems<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextFlowItems::Multiple(contributors) => {
                f.debug_tuple("Multiple").field(contributors).finish()
            }
            NextFlowItems::One(contributor) => f.debug_tuple("One").field(contributor).finish(),
            NextFlowItems::End(step) => f.debug_tuple("End").field(step).finish(),
            NextFlowItems::None => f.write_str("None"),
        }
    }
}

/// One unit of a navigation decision.
pub enum FlowContributor<S> {
    /// Something was presented; `stepper` (if any) produces the next steps.
    ///
    /// By default steps are only accepted while `presentable` is visible and
    /// until it is dismissed; the two flags lift those restrictions.
    Contribute {
        presentable: Arc<dyn Presentable>,
        stepper: Option<Box<dyn Stepper<S>>>,
        allow_step_when_not_presented: bool,
        allow_step_when_dismissed: bool,
    },
    /// Feed a step straight back into the current flow.
    ForwardToCurrentFlow(S),
    /// Hand a step to the parent flow.
    ForwardToParentFlow(S),
}

impl<S: Step> FlowContributor<S> {
    pub fn contribute(presentable: Arc<dyn Presentable>, stepper: impl Stepper<S>) -> Self {
        FlowContributor::Contribute {
            presentable,
            stepper: Some(Box::new(stepper)),
            allow_step_when_not_presented: false,
            allow_step_when_dismissed: false,
        }
    }

    /// Present without listening to any stepper.
    pub fn present(presentable: Arc<dyn Presentable>) -> Self {
        FlowContributor::Contribute {
            presentable,
            stepper: None,
            allow_step_when_not_presented: false,
            allow_step_when_dismissed: false,
        }
    }

    pub fn allowing_steps_when_not_presented(mut self) -> Self {
        if let FlowContributor::Contribute {
            allow_step_when_not_presented,
            ..
        } = &mut self
        {
            *allow_step_when_not_presented = true;
        }
        self
    }

    pub fn allowing_steps_when_dismissed(mut self) -> Self {
        if let FlowContributor::Contribute {
            allow_step_when_dismissed,
            ..
        } = &mut self
        {
            *allow_step_when_dismissed = true;
        }
        self
    }
}

impl<S: Step> fmt::Debug for FlowContributor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowContributor::Contribute {
                presentable,
                stepper,
                allow_step_when_not_presented,
                allow_step_when_dismissed,
            } => f
                .debug_struct("Contribute")
                .field("presentable", &(**presentable).presentable_type())
                .field("has_stepper", &stepper.is_some())
                .field("allow_step_when_not_presented", allow_step_when_not_presented)
                .field("allow_step_when_dismissed", allow_step_when_dismissed)
                .finish(),
            FlowContributor::ForwardToCurrentFlow(step) => {
                f.debug_tuple("ForwardToCurrentFlow").field(step).finish()
            }
            FlowContributor::ForwardToParentFlow(step) => {
                f.debug_tuple("ForwardToParentFlow").field(step).finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{Once, Visibility};
    use crate::step::OneStepper;

    struct Blank;

    impl Presentable for Blank {
        fn visible(&self) -> Visibility {
            Visibility::hidden()
        }

        fn first_time_visible(&self) -> Once<()> {
            Once::never()
        }

        fn dismissed(&self) -> Once<()> {
            Once::never()
        }
    }

    #[derive(Debug)]
    enum AppStep {
        Done,
        Next,
    }

    #[test]
    fn builders_set_gate_flags() {
        let contributor = FlowContributor::contribute(Arc::new(Blank), OneStepper::new(AppStep::Next))
            .allowing_steps_when_dismissed();

        match contributor {
            FlowContributor::Contribute {
                stepper,
                allow_step_when_not_presented,
                allow_step_when_dismissed,
                ..
            } => {
                assert!(stepper.is_some());
                assert!(!allow_step_when_not_presented);
                assert!(allow_step_when_dismissed);
            }
            other => panic!("unexpected contributor: {other:?}"),
        }
    }

    #[test]
    fn end_and_none_carry_no_contributors() {
        assert!(NextFlowItems::end_with(AppStep::Done).is_end());
        assert!(NextFlowItems::<AppStep>::None.into_contributors().is_empty());

        let one = NextFlowItems::One(FlowContributor::<AppStep>::present(Arc::new(Blank)));
        assert_eq!(one.into_contributors().len(), 1);
    }

    #[test]
    fn debug_names_the_presentable_type() {
        let items = NextFlowItems::One(FlowContributor::<AppStep>::present(Arc::new(Blank)));
        let rendered = format!("{items:?}");
        assert!(rendered.contains("Blank"));
        assert!(rendered.contains("has_stepper: false"));
    }
}
