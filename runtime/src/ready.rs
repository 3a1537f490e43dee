//! # Readiness Synchronizer
//!
//! Holds a callback back until a set of flows have all been shown for the
//! first time, then hands it every flow's root, typed, in declaration order.
//!
//! ## Building a set
//!
//! * [`Expect<R>`]: one flow whose root must be an `R`. This is the primitive.
//! * tuples of sets (2 to 12): heterogeneous roots, delivered as a tuple
//! * `Vec` of sets: any number of slots, delivered as a `Vec`. An empty
//!   `Vec` is rejected with `FlowError::EmptyReadySet`.
//!
//! Every slot goes through the same routine: check the root's concrete type,
//! wait for the flow's readiness notifier, yield the typed root. Slots are
//! joined so the result appears after the last flow becomes ready, whatever
//! order they became ready in.
//!
//! ## Example
//!
//! ```rust,ignore
//! Flows::when_ready(
//!     (Expect::<Screen>::root_of(&login), Expect::<Window>::root_of(&shell)),
//!     |(login, shell)| present(login, shell),
//! )?;
//! ```

use crate::config::{MismatchPolicy, RuntimeConfig};
use crate::scope::Scope;
use futures_util::future::{self, BoxFuture};
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};
use wayfinder_core::error::{FlowError, FlowResult};
use wayfinder_core::flow::{Flow, FlowReady};
use wayfinder_core::presentable::{Presentable, downcast_presentable};
use wayfinder_core::step::Step;

/// One readiness slot: a flow whose root is expected to be an `R`.
pub struct Expect<R> {
    flow: String,
    ready: FlowReady,
    root: Arc<dyn Presentable>,
    _root: PhantomData<fn() -> R>,
}

impl<R: Presentable> Expect<R> {
    pub fn root_of<S: Step>(flow: &Flow<S>) -> Self {
        Self {
            flow: flow.label().to_string(),
            ready: flow.flow_ready(),
            root: flow.root(),
            _root: PhantomData,
        }
    }
}

/// A set of readiness slots the synchronizer can wait on.
pub trait ReadySet: Send + 'static {
    /// Typed roots, shaped like the set.
    type Roots: Send + 'static;

    /// Validate every slot, then build the join over all of them.
    ///
    /// Fails on the first slot whose root is not of the expected type, or
    /// on an empty `Vec`.
    fn resolve(self) -> FlowResult<BoxFuture<'static, Self::Roots>>;

    /// Number of flows in the set.
    fn slots(&self) -> usize;
}

impl<R: Presentable> ReadySet for Expect<R> {
    type Roots = Arc<R>;

    fn resolve(self) -> FlowResult<BoxFuture<'static, Self::Roots>> {
        let root = downcast_presentable::<R>(&self.flow, &self.root)?;
        let ready = self.ready;
        Ok(Box::pin(async move {
            ready.await;
            root
        }))
    }

    fn slots(&self) -> usize {
        1
    }
}

impl<T: ReadySet> ReadySet for Vec<T> {
    type Roots = Vec<T::Roots>;

    fn resolve(self) -> FlowResult<BoxFuture<'static, Self::Roots>> {
        if self.is_empty() {
            return Err(FlowError::EmptyReadySet);
        }
        let pending = self
            .into_iter()
            .map(ReadySet::resolve)
            .collect::<FlowResult<Vec<_>>>()?;
        Ok(Box::pin(future::join_all(pending)))
    }

    fn slots(&self) -> usize {
        self.iter().map(ReadySet::slots).sum()
    }
}

macro_rules! ready_set_tuple {
    ($($slot:ident),+) => {
        impl<$($slot: ReadySet),+> ReadySet for ($($slot,)+) {
            type Roots = ($($slot::Roots,)+);

            #[allow(non_snake_case)]
            fn resolve(self) -> FlowResult<BoxFuture<'static, Self::Roots>> {
                let ($($slot,)+) = self;
                $(let $slot = $slot.resolve()?;)+
                Ok(Box::pin(async move { futures_util::join!($($slot),+) }))
            }

            #[allow(non_snake_case)]
            fn slots(&self) -> usize {
                let ($($slot,)+) = self;
                0 $(+ $slot.slots())+
            }
        }
    };
}

ready_set_tuple!(A, B);
ready_set_tuple!(A, B, C);
ready_set_tuple!(A, B, C, D);
ready_set_tuple!(A, B, C, D, E);
ready_set_tuple!(A, B, C, D, E, F);
ready_set_tuple!(A, B, C, D, E, F, G);
ready_set_tuple!(A, B, C, D, E, F, G, H);
ready_set_tuple!(A, B, C, D, E, F, G, H, I);
ready_set_tuple!(A, B, C, D, E, F, G, H, I, J);
ready_set_tuple!(A, B, C, D, E, F, G, H, I, J, K);
ready_set_tuple!(A, B, C, D, E, F, G, H, I, J, K, L);

/// Joins readiness sets and runs callbacks once they resolve.
#[derive(Debug, Clone, Default)]
pub struct ReadinessSynchronizer {
    policy: MismatchPolicy,
}

impl ReadinessSynchronizer {
    pub fn new(policy: MismatchPolicy) -> Self {
        Self { policy }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(config.on_type_mismatch)
    }

    pub fn policy(&self) -> MismatchPolicy {
        self.policy
    }

    fn prepare<T: ReadySet>(&self, set: T) -> FlowResult<BoxFuture<'static, T::Roots>> {
        let slots = set.slots();
        match set.resolve() {
            Ok(joined) => {
                tracing::debug!(slots, "readiness registered");
                Ok(joined)
            }
            Err(err) => {
                tracing::error!(error = %err, slots, "readiness registration rejected");
                let mismatch = matches!(err, FlowError::RootTypeMismatch { .. });
                if mismatch && self.policy == MismatchPolicy::Panic {
                    panic!("{err}");
                }
                Err(err)
            }
        }
    }

    /// Wait for every flow in `set`, then return their typed roots.
    pub async fn ready<T: ReadySet>(&self, set: T) -> FlowResult<T::Roots> {
        let joined = self.prepare(set)?;
        Ok(joined.await)
    }

    /// Run `block` once, after every flow in `set` is ready.
    ///
    /// The pending subscription belongs to `scope`; releasing the scope first
    /// means `block` never runs.
    pub fn when_ready_in<T, F>(&self, scope: &Scope, set: T, block: F) -> FlowResult<()>
    where
        T: ReadySet,
        F: FnOnce(T::Roots) + Send + 'static,
    {
        let joined = self.prepare(set)?;
        scope.spawn("readiness callback", async move {
            let roots = joined.await;
            tracing::debug!("flows ready, running callback");
            block(roots);
        })
    }
}

static SYNCHRONIZER: OnceLock<ReadinessSynchronizer> = OnceLock::new();

/// Process-wide entry point to the readiness synchronizer.
///
/// Configured from the environment on first use (see [`RuntimeConfig::from_env`]).
pub struct Flows;

impl Flows {
    pub fn synchronizer() -> &'static ReadinessSynchronizer {
        SYNCHRONIZER.get_or_init(|| ReadinessSynchronizer::from_config(&RuntimeConfig::from_env()))
    }

    /// Run `block` once every flow in `set` is ready. The subscription lives
    /// in [`Scope::global`].
    pub fn when_ready<T, F>(set: T, block: F) -> FlowResult<()>
    where
        T: ReadySet,
        F: FnOnce(T::Roots) + Send + 'static,
    {
        Self::synchronizer().when_ready_in(Scope::global(), set, block)
    }

    pub fn when_ready_in<T, F>(scope: &Scope, set: T, block: F) -> FlowResult<()>
    where
        T: ReadySet,
        F: FnOnce(T::Roots) + Send + 'static,
    {
        Self::synchronizer().when_ready_in(scope, set, block)
    }

    pub async fn ready<T: ReadySet>(set: T) -> FlowResult<T::Roots> {
        Self::synchronizer().ready(set).await
    }
}
