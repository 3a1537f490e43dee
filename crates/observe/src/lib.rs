use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};
use wayfinder_core::error::FlowResult;
use wayfinder_runtime::{Coordinator, NavigationEvent, NavigationPhase, Scope};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,wayfinder_runtime=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize a simple stdout tracing subscriber for development
pub fn init_stdout_tracing() {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();
}

/// Initialize newline-delimited JSON logs on stdout.
///
/// Fails if a global subscriber is already installed.
pub fn init_json_tracing() -> Result<(), anyhow::Error> {
    Registry::default()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()?;
    Ok(())
}

/// Log every navigation of `coordinator` until it is dropped.
///
/// The listener belongs to `scope`.
pub fn log_navigation(coordinator: &Coordinator, scope: &Scope) -> FlowResult<()> {
    let mut events = coordinator.events();
    scope.spawn("navigation log", async move {
        loop {
            match events.recv().await {
                Ok(event) => log_event(&event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "navigation log fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

fn log_event(event: &NavigationEvent) {
    match event.phase {
        NavigationPhase::WillNavigate => tracing::info!(
            target: "wayfinder::navigation",
            flow = %event.flow_label,
            id = %event.flow,
            step = %event.step,
            "navigating"
        ),
        NavigationPhase::DidNavigate => tracing::debug!(
            target: "wayfinder::navigation",
            flow = %event.flow_label,
            step = %event.step,
            at = %event.at.to_rfc3339(),
            "navigated"
        ),
    }
}
