//! Test helpers for Wayfinder.
//!
//! Meant to run under `#[tokio::test(start_paused = true)]`: lifecycles are
//! scripted on the virtual clock and recorders timestamp against it.

use parking_lot::Mutex;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use wayfinder_kit::Element;

/// Panics if `fut` completes within `window`.
pub async fn assert_pending<F>(fut: F, window: Duration)
where
    F: Future,
    F::Output: Debug,
{
    if let Ok(output) = tokio::time::timeout(window, fut).await {
        panic!("expected future to stay pending for {window:?}, it produced {output:?}");
    }
}

/// Show `element` after `delay`.
pub fn appear_after<E: Element>(element: Arc<E>, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        element.did_appear();
    })
}

/// Hide `element` after `delay`.
pub fn disappear_after<E: Element>(element: Arc<E>, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        element.did_disappear();
    })
}

/// Let spawned tasks run until they are all parked.
///
/// Relies on paused time: the clock only auto-advances once every other task
/// is idle, so this returns one millisecond later with the runtime quiet.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

/// Collects values with the (virtual) time they arrived at.
#[derive(Debug)]
pub struct Recorder<T> {
    started: Instant,
    entries: Arc<Mutex<Vec<(Duration, T)>>>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            started: self.started,
            entries: self.entries.clone(),
        }
    }
}

impl<T: Clone> Recorder<T> {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn record(&self, value: T) {
        let at = self.started.elapsed();
        self.entries.lock().push((at, value));
    }

    pub fn values(&self) -> Vec<T> {
        self.entries.lock().iter().map(|(_, v)| v.clone()).collect()
    }

    pub fn entries(&self) -> Vec<(Duration, T)> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl<T: Clone> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}
