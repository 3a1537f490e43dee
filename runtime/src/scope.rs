//! Scope - Owner of Background Subscriptions
//!
//! Every subscription the runtime schedules (a readiness join, a stepper
//! listener, a dispatch loop) is a tokio task registered in a `Scope`.
//! Releasing or dropping the scope aborts whatever is still pending.

use parking_lot::Mutex;
use std::future::Future;
use std::sync::OnceLock;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use wayfinder_core::error::{FlowError, FlowResult};

static GLOBAL: OnceLock<Scope> = OnceLock::new();

#[derive(Debug)]
pub struct Scope {
    name: String,
    tasks: Mutex<Vec<AbortHandle>>,
}

impl Scope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// The process-wide scope. Lives as long as the process.
    pub fn global() -> &'static Scope {
        GLOBAL.get_or_init(|| Scope::new("global"))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Spawn `task` on the current tokio runtime, owned by this scope.
    pub fn spawn<F>(&self, what: &'static str, task: F) -> FlowResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = Handle::try_current().map_err(|_| FlowError::NoRuntime(what))?;
        let join = handle.spawn(task);

        let mut tasks = self.tasks.lock();
        tasks.retain(|task| !task.is_finished());
        tasks.push(join.abort_handle());
        Ok(())
    }

    /// Number of subscriptions still running.
    pub fn active(&self) -> usize {
        self.tasks
            .lock()
            .iter()
            .filter(|task| !task.is_finished())
            .count()
    }

    /// Abort every subscription owned by this scope.
    pub fn release(&self) {
        let tasks = std::mem::take(&mut *self.tasks.lock());
        if !tasks.is_empty() {
            tracing::debug!(scope = %self.name, count = tasks.len(), "releasing subscriptions");
        }
        for task in tasks {
            task.abort();
        }
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn spawn_without_runtime_is_an_error() {
        let scope = Scope::new("orphan");
        let result = scope.spawn("orphan task", async {});
        assert_eq!(result, Err(FlowError::NoRuntime("orphan task")));
    }

    #[tokio::test(start_paused = true)]
    async fn release_aborts_pending_tasks() {
        let scope = Scope::new("screen");
        let (tx, mut rx) = tokio::sync::oneshot::channel::<()>();
        scope
            .spawn("sleeper", async move {
                tokio::time::sleep(Duration::from_secs(60)).await;
                let _ = tx.send(());
            })
            .unwrap();
        assert_eq!(scope.active(), 1);

        scope.release();
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(scope.active(), 0);
    }

    #[tokio::test]
    async fn finished_tasks_are_not_counted() {
        let scope = Scope::new("short");
        scope.spawn("noop", async {}).unwrap();
        for _ in 0..16 {
            if scope.active() == 0 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(scope.active(), 0);
    }
}
