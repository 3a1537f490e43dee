//! Wayfinder runtime: everything that needs an executor.
//!
//! * [`ready`]: wait until a set of flows are shown, then hand back their roots
//! * [`coordinator`]: dispatch steps through flows and follow their contributions
//! * [`scope`]: ownership of the background subscriptions both of them create

pub mod config;
pub mod coordinator;
pub mod ready;
pub mod scope;

pub mod prelude {
    pub use crate::config::{MismatchPolicy, RuntimeConfig};
    pub use crate::coordinator::{Coordinator, NavigationEvent, NavigationPhase};
    pub use crate::ready::{Expect, Flows, ReadinessSynchronizer, ReadySet};
    pub use crate::scope::Scope;
}

pub use config::{ConfigError, MismatchPolicy, RuntimeConfig};
pub use coordinator::{Coordinator, NavigationEvent, NavigationPhase};
pub use ready::{Expect, Flows, ReadinessSynchronizer, ReadySet};
pub use scope::Scope;
