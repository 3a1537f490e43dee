//! Wayfinder: say what to show next, and know when it is shown.
//!
//! A [`Flow`](core::flow::Flow) pairs a root presentable with a navigation
//! function. [`Flows::when_ready`](runtime::ready::Flows::when_ready) holds
//! a callback until a set of flows have all been displayed, and the
//! [`Coordinator`](runtime::coordinator::Coordinator) feeds steps through
//! flows and follows what they contribute.

pub use wayfinder_core as core;
pub use wayfinder_runtime as runtime;

#[cfg(feature = "kit")]
pub use wayfinder_kit as kit;

pub use wayfinder_core::{
    Flow, FlowContributor, FlowError, FlowResult, NextFlowItems, Presentable, Step, Stepper,
};
pub use wayfinder_runtime::{Coordinator, Expect, Flows, Scope};

pub mod prelude {
    pub use wayfinder_core::prelude::*;
    pub use wayfinder_runtime::prelude::*;

    #[cfg(feature = "kit")]
    pub use wayfinder_kit::{Element, Screen, Window};
}
