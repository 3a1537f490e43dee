//! Wayfinder core: what to show next, decoupled from how it is shown.
//!
//! * [`Presentable`]: the lifecycle contract every navigable element fulfils
//! * [`Flow`]: a root presentable plus a step-to-[`NextFlowItems`] decision
//! * [`signal`]: the one-shot and continuous signals behind both
//!
//! Scheduling (readiness joins, step dispatch) lives in `wayfinder-runtime`.

pub mod error;
pub mod flow;
pub mod next_items;
pub mod presentable;
pub mod signal;
pub mod step;

pub use error::{FlowError, FlowResult};
pub use flow::{Flow, FlowId, FlowReady, Navigate};
pub use next_items::{FlowContributor, NextFlowItems};
pub use presentable::{AsAny, Presentable, downcast_presentable};
pub use signal::{Latch, Once, Visibility, VisibilitySwitch};
pub use step::{CompositeStepper, NoneStepper, OneStepper, Step, StepChannel, StepSender, Stepper};

pub mod prelude {
    pub use crate::error::{FlowError, FlowResult};
    pub use crate::flow::{Flow, FlowId, Navigate};
    pub use crate::next_items::{FlowContributor, NextFlowItems};
    pub use crate::presentable::Presentable;
    pub use crate::signal::{Once, Visibility};
    pub use crate::step::{CompositeStepper, NoneStepper, OneStepper, Step, StepChannel, StepSender, Stepper};
}
