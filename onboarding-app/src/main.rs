//! onboarding-app
//!
//! A shell window plus a two-screen onboarding flow. The toolkit and the user
//! are simulated; everything else goes through Wayfinder.
//!
//! Usage: `onboarding-app [config.toml]`

mod toolkit;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use wayfinder::kit::{Screen, Window};
use wayfinder::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppStep {
    Launch,
    ShowWelcome,
    Continue,
    Granted,
    OnboardingDone,
}

struct Ui {
    shell: Arc<Window>,
    welcome: Arc<Screen>,
    permissions: Arc<Screen>,
}

#[tokio::main]
async fn main() -> Result<()> {
    wayfinder_observe::init_stdout_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => RuntimeConfig::load(&path)
            .with_context(|| format!("loading {path}"))?
            .with_env_overrides(),
        None => RuntimeConfig::from_env(),
    };
    tracing::info!(?config, "starting onboarding-app");

    let ui = Arc::new(Ui {
        shell: Arc::new(Window::new("shell")),
        welcome: Arc::new(Screen::new("welcome")),
        permissions: Arc::new(Screen::new("permissions")),
    });

    let (welcome_taps, welcome_steps) = StepChannel::new();
    let (permission_taps, permission_steps) = StepChannel::new();
    let onboarding = Arc::new(onboarding_flow(&ui, welcome_steps, permission_steps));

    let (done_tx, done_rx) = oneshot::channel();
    let app = Arc::new(app_flow(&ui, onboarding.clone(), done_tx));

    ReadinessSynchronizer::from_config(&config).when_ready_in(
        Scope::global(),
        (
            Expect::<Window>::root_of(&app),
            Expect::<Screen>::root_of(&onboarding),
        ),
        |(shell, welcome)| {
            tracing::info!(
                window = shell.name(),
                screen = welcome.title(),
                "shell and onboarding are both on screen"
            );
        },
    )?;

    let coordinator = Coordinator::with_config(&config);
    wayfinder_observe::log_navigation(&coordinator, Scope::global())?;
    coordinator.coordinate(app, OneStepper::new(AppStep::Launch))?;
    ui.shell.make_visible();

    simulate_user(&ui, welcome_taps, permission_taps).await;

    tokio::time::timeout(Duration::from_secs(5), done_rx)
        .await
        .context("onboarding did not finish")?
        .context("app flow dropped before finishing")?;
    tracing::info!("onboarding complete");
    Ok(())
}

fn app_flow(
    ui: &Arc<Ui>,
    onboarding: Arc<Flow<AppStep>>,
    done: oneshot::Sender<()>,
) -> Flow<AppStep> {
    let done = Mutex::new(Some(done));
    Flow::new("app", ui.shell.clone(), move |step: AppStep| match step {
        AppStep::Launch => NextFlowItems::One(FlowContributor::contribute(
            onboarding.clone(),
            OneStepper::new(AppStep::ShowWelcome),
        )),
        AppStep::OnboardingDone => {
            if let Some(done) = done.lock().take() {
                let _ = done.send(());
            }
            NextFlowItems::end()
        }
        _ => NextFlowItems::None,
    })
}

fn onboarding_flow(
    ui: &Arc<Ui>,
    welcome_steps: StepChannel<AppStep>,
    permission_steps: StepChannel<AppStep>,
) -> Flow<AppStep> {
    let ui_for_nav = ui.clone();
    let welcome_steps = Mutex::new(Some(welcome_steps));
    let permission_steps = Mutex::new(Some(permission_steps));

    Flow::new("onboarding", ui.welcome.clone(), move |step: AppStep| {
        let ui = &ui_for_nav;
        match step {
            AppStep::ShowWelcome => {
                toolkit::present(ui.welcome.clone());
                match welcome_steps.lock().take() {
                    Some(steps) => {
                        NextFlowItems::One(FlowContributor::contribute(ui.welcome.clone(), steps))
                    }
                    None => NextFlowItems::None,
                }
            }
            AppStep::Continue => {
                toolkit::hide(ui.welcome.clone());
                toolkit::present(ui.permissions.clone());
                match permission_steps.lock().take() {
                    Some(steps) => NextFlowItems::One(FlowContributor::contribute(
                        ui.permissions.clone(),
                        steps,
                    )),
                    None => NextFlowItems::None,
                }
            }
            AppStep::Granted => {
                ui.permissions.dismiss();
                ui.welcome.dismiss();
                NextFlowItems::end_with(AppStep::OnboardingDone)
            }
            _ => NextFlowItems::None,
        }
    })
}

/// Tap through the onboarding once each screen is up.
async fn simulate_user(
    ui: &Ui,
    welcome_taps: StepSender<AppStep>,
    permission_taps: StepSender<AppStep>,
) {
    ui.welcome.first_time_visible().await;
    tokio::time::sleep(Duration::from_millis(400)).await;
    welcome_taps.emit(AppStep::Continue);

    ui.permissions.first_time_visible().await;
    tokio::time::sleep(Duration::from_millis(400)).await;
    permission_taps.emit(AppStep::Granted);
}
