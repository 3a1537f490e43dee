//! # Signals: Lifecycle Events of Presentable Elements
//!
//! Two shapes of signal cover every lifecycle event a navigable element reports:
//!
//! * **One-shot** (`Latch` / `Once`): fires at most once and replays the stored
//!   value to every subscriber, including the ones that arrive late.
//! * **Continuous** (`VisibilitySwitch` / `Visibility`): the current visibility
//!   plus a stream of appear/disappear transitions.
//!
//! Neither shape can fail. A one-shot signal whose source goes away without
//! firing simply stays pending forever.

use futures_util::future::BoxFuture;
use futures_util::stream::{self, BoxStream, StreamExt};
use std::future::IntoFuture;
use tokio::sync::watch;

/// Write side of a one-shot signal.
#[derive(Debug)]
pub struct Latch<T> {
    tx: watch::Sender<Option<T>>,
}

impl<T> Latch<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Fire the latch with `value`.
    ///
    /// Only the first call stores a value; returns `false` when the latch had
    /// already fired.
    pub fn fire(&self, value: T) -> bool {
        self.tx.send_if_modified(move |slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(value);
            true
        })
    }

    pub fn has_fired(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Subscribe to the latch. Subscribing after it fired yields the stored value.
    pub fn signal(&self) -> Once<T> {
        Once {
            rx: Some(self.tx.subscribe()),
        }
    }
}

impl<T> Default for Latch<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Read side of a one-shot signal.
///
/// Await it (it implements [`IntoFuture`]) to receive the single value.
#[derive(Debug, Clone)]
pub struct Once<T> {
    rx: Option<watch::Receiver<Option<T>>>,
}

impl<T> Once<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// A signal that never completes.
    ///
    /// Used by elements with no native notion of the event (e.g. a top-level
    /// container is never dismissed).
    pub fn never() -> Self {
        Self { rx: None }
    }

    /// A signal that has already fired with `value`.
    pub fn resolved(value: T) -> Self {
        let (_tx, rx) = watch::channel(Some(value));
        Self { rx: Some(rx) }
    }

    /// The value, if the signal already fired.
    pub fn peek(&self) -> Option<T> {
        self.rx.as_ref().and_then(|rx| rx.borrow().clone())
    }

    /// Wait for the value.
    ///
    /// If the source is dropped without firing this never returns.
    pub async fn wait(self) -> T {
        let Some(mut rx) = self.rx else {
            return std::future::pending().await;
        };
        let fired = rx
            .wait_for(Option::is_some)
            .await
            .ok()
            .and_then(|value| value.clone());
        match fired {
            Some(value) => value,
            None => std::future::pending().await,
        }
    }
}

impl<T> IntoFuture for Once<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Output = T;
    type IntoFuture = BoxFuture<'static, T>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.wait())
    }
}

/// Write side of the continuous visibility signal.
///
/// Only actual transitions are published: showing an already visible element
/// is a no-op for observers.
#[derive(Debug)]
pub struct VisibilitySwitch {
    tx: watch::Sender<bool>,
}

impl VisibilitySwitch {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Set visibility; returns `true` if this was a transition.
    pub fn set(&self, visible: bool) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == visible {
                return false;
            }
            *current = visible;
            true
        })
    }

    pub fn show(&self) -> bool {
        self.set(true)
    }

    pub fn hide(&self) -> bool {
        self.set(false)
    }

    pub fn is_visible(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn watch(&self) -> Visibility {
        Visibility {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for VisibilitySwitch {
    fn default() -> Self {
        Self::new()
    }
}

/// Read side of the continuous visibility signal.
#[derive(Debug, Clone)]
pub struct Visibility {
    rx: watch::Receiver<bool>,
}

impl Visibility {
    /// Visibility of an element that is never shown.
    pub fn hidden() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_visible(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for the next appear/disappear transition.
    ///
    /// Returns `None` once the element behind this signal is gone.
    pub async fn changed(&mut self) -> Option<bool> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }

    /// Wait until the element is in the given state.
    ///
    /// Returns `false` if the element went away first.
    pub async fn wait_until(&mut self, visible: bool) -> bool {
        self.rx.wait_for(|current| *current == visible).await.is_ok()
    }

    /// Transitions observed from now on, as a stream.
    pub fn transitions(self) -> BoxStream<'static, bool> {
        stream::unfold(self, |mut visibility| async move {
            let next = visibility.changed().await?;
            Some((next, visibility))
        })
        .boxed()
    }
}
