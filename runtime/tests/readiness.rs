use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use wayfinder_core::prelude::*;
use wayfinder_kit::{Element, Screen, Window};
use wayfinder_runtime::prelude::*;
use wayfinder_test::{Recorder, appear_after, assert_pending, disappear_after, settle};

#[derive(Debug, Clone, PartialEq)]
enum AppStep {
    Start,
}

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

fn no_navigation(_: AppStep) -> NextFlowItems<AppStep> {
    NextFlowItems::None
}

fn screen_flow(title: &str) -> (Arc<Screen>, Flow<AppStep>) {
    let root = Arc::new(Screen::new(title));
    let flow = Flow::new(title, root.clone(), no_navigation);
    (root, flow)
}

fn window_flow(name: &str) -> (Arc<Window>, Flow<AppStep>) {
    let root = Arc::new(Window::new(name));
    let flow = Flow::new(name, root.clone(), no_navigation);
    (root, flow)
}

#[tokio::test(start_paused = true)]
async fn single_flow_fires_on_first_appearance() {
    let (root, flow) = screen_flow("login");
    let recorder = Recorder::new();
    let scope = Scope::new("test");

    let rec = recorder.clone();
    ReadinessSynchronizer::default()
        .when_ready_in(&scope, Expect::<Screen>::root_of(&flow), move |login| {
            rec.record(login.title().to_string());
        })
        .unwrap();

    appear_after(root, secs(3));
    tokio::time::sleep(secs(10)).await;
    assert_eq!(recorder.entries(), vec![(secs(3), "login".to_string())]);
}

#[tokio::test(start_paused = true)]
async fn pair_fires_after_the_later_flow_with_roots_in_declaration_order() {
    let (a_root, a) = screen_flow("a");
    let (b_root, b) = screen_flow("b");
    let recorder = Recorder::new();
    let scope = Scope::new("test");

    appear_after(a_root, secs(5));
    appear_after(b_root, secs(2));

    let rec = recorder.clone();
    ReadinessSynchronizer::default()
        .when_ready_in(
            &scope,
            (Expect::<Screen>::root_of(&a), Expect::<Screen>::root_of(&b)),
            move |(a, b)| rec.record(vec![a.title().to_string(), b.title().to_string()]),
        )
        .unwrap();

    tokio::time::sleep(secs(10)).await;
    assert_eq!(
        recorder.entries(),
        vec![(secs(5), vec!["a".to_string(), "b".to_string()])]
    );
}

#[tokio::test(start_paused = true)]
async fn heterogeneous_triple_is_typed_per_slot() {
    let (login_root, login) = screen_flow("login");
    let (shell_root, shell) = window_flow("shell");
    let (help_root, help) = screen_flow("help");
    let recorder = Recorder::new();
    let scope = Scope::new("test");

    appear_after(help_root, secs(1));
    appear_after(login_root, secs(4));
    appear_after(shell_root, secs(7));

    let rec = recorder.clone();
    ReadinessSynchronizer::default()
        .when_ready_in(
            &scope,
            (
                Expect::<Screen>::root_of(&login),
                Expect::<Window>::root_of(&shell),
                Expect::<Screen>::root_of(&help),
            ),
            move |(login, shell, help)| {
                rec.record(format!("{}|{}|{}", login.title(), shell.name(), help.title()));
            },
        )
        .unwrap();

    tokio::time::sleep(secs(10)).await;
    assert_eq!(recorder.entries(), vec![(secs(7), "login|shell|help".to_string())]);
}

#[tokio::test(start_paused = true)]
async fn five_flows_in_any_order_deliver_in_declaration_order() {
    let delays = [4, 1, 5, 2, 3];
    let mut flows = Vec::new();
    for (i, delay) in delays.iter().enumerate() {
        let (root, flow) = screen_flow(&format!("f{i}"));
        appear_after(root, secs(*delay));
        flows.push(flow);
    }
    let recorder = Recorder::new();
    let scope = Scope::new("test");

    let rec = recorder.clone();
    let set: Vec<Expect<Screen>> = flows.iter().map(Expect::root_of).collect();
    ReadinessSynchronizer::default()
        .when_ready_in(&scope, set, move |roots| {
            rec.record(roots.iter().map(|r| r.title().to_string()).collect::<Vec<_>>());
        })
        .unwrap();

    tokio::time::sleep(secs(10)).await;
    assert_eq!(
        recorder.entries(),
        vec![(secs(5), vec!["f0", "f1", "f2", "f3", "f4"].into_iter().map(String::from).collect())]
    );
}

#[tokio::test(start_paused = true)]
async fn five_tuple_matches_the_vec_form() {
    let started = tokio::time::Instant::now();
    let (r0, f0) = screen_flow("f0");
    let (r1, f1) = window_flow("f1");
    let (r2, f2) = screen_flow("f2");
    let (r3, f3) = window_flow("f3");
    let (r4, f4) = screen_flow("f4");
    appear_after(r3, secs(1));
    appear_after(r0, secs(2));
    appear_after(r4, secs(3));
    appear_after(r1, secs(4));
    appear_after(r2, secs(6));

    let (s0, w1, s2, w3, s4) = ReadinessSynchronizer::default()
        .ready((
            Expect::<Screen>::root_of(&f0),
            Expect::<Window>::root_of(&f1),
            Expect::<Screen>::root_of(&f2),
            Expect::<Window>::root_of(&f3),
            Expect::<Screen>::root_of(&f4),
        ))
        .await
        .unwrap();

    assert_eq!(started.elapsed(), secs(6));
    assert_eq!(
        [s0.title(), w1.name(), s2.title(), w3.name(), s4.title()],
        ["f0", "f1", "f2", "f3", "f4"]
    );
    assert!(f2.is_ready());
}

#[tokio::test(start_paused = true)]
async fn flow_that_never_appears_keeps_the_callback_pending() {
    let (a_root, a) = screen_flow("a");
    let (_b_root, b) = screen_flow("b");
    a_root.did_appear();

    let set = (Expect::<Screen>::root_of(&a), Expect::<Screen>::root_of(&b));
    assert_pending(ReadinessSynchronizer::default().ready(set), secs(3600)).await;
}

#[tokio::test(start_paused = true)]
async fn dismissal_without_appearance_is_not_readiness() {
    let (root, flow) = screen_flow("abandoned");
    root.dismiss();

    assert_pending(
        ReadinessSynchronizer::default().ready(Expect::<Screen>::root_of(&flow)),
        secs(60),
    )
    .await;
}

#[tokio::test(start_paused = true)]
async fn later_registrations_resolve_immediately() {
    let (root, flow) = screen_flow("home");
    let first = flow.flow_ready();
    appear_after(root.clone(), secs(2));
    first.clone().await;
    assert!(flow.is_ready());

    // Reappearing changes nothing for readiness.
    disappear_after(root.clone(), secs(1));
    appear_after(root, secs(2));
    tokio::time::sleep(secs(3)).await;

    let late = flow.flow_ready();
    assert!(late.ptr_eq(&first));
    let before = tokio::time::Instant::now();
    let home = ReadinessSynchronizer::default()
        .ready(Expect::<Screen>::root_of(&flow))
        .await
        .unwrap();
    assert_eq!(before.elapsed(), Duration::ZERO);
    assert_eq!(home.title(), "home");
}

#[tokio::test(start_paused = true)]
async fn callback_runs_once_despite_repeated_appearances() {
    let (root, flow) = screen_flow("feed");
    let runs = Arc::new(AtomicUsize::new(0));
    let scope = Scope::new("test");

    let counter = runs.clone();
    ReadinessSynchronizer::default()
        .when_ready_in(&scope, Expect::<Screen>::root_of(&flow), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    for i in 0..3 {
        appear_after(root.clone(), secs(2 * i + 1));
        disappear_after(root.clone(), secs(2 * i + 2));
    }
    tokio::time::sleep(secs(10)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn mismatched_root_is_reported_without_affecting_other_registrations() {
    let (screen_root, screen) = screen_flow("login");
    let (window_root, window) = window_flow("shell");
    let sync = ReadinessSynchronizer::new(MismatchPolicy::Report);
    let scope = Scope::new("test");
    let recorder = Recorder::new();

    let rec = recorder.clone();
    let err = sync
        .when_ready_in(
            &scope,
            (Expect::<Screen>::root_of(&screen), Expect::<Screen>::root_of(&window)),
            move |_| rec.record("mismatched"),
        )
        .unwrap_err();
    match err {
        FlowError::RootTypeMismatch { flow, expected, actual } => {
            assert_eq!(flow, "shell");
            assert!(expected.ends_with("Screen"));
            assert!(actual.ends_with("Window"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let rec = recorder.clone();
    sync.when_ready_in(
        &scope,
        (Expect::<Screen>::root_of(&screen), Expect::<Window>::root_of(&window)),
        move |_| rec.record("matched"),
    )
    .unwrap();

    screen_root.did_appear();
    window_root.make_visible();
    settle().await;
    assert_eq!(recorder.values(), vec!["matched"]);
}

#[test]
#[should_panic(expected = "expected `wayfinder_kit::window::Window`")]
fn mismatch_is_fatal_under_the_panic_policy() {
    let (_root, flow) = screen_flow("login");
    let scope = Scope::new("test");
    let _ = ReadinessSynchronizer::new(MismatchPolicy::Panic).when_ready_in(
        &scope,
        Expect::<Window>::root_of(&flow),
        |_| {},
    );
}

#[tokio::test(start_paused = true)]
async fn releasing_the_scope_cancels_a_pending_callback() {
    let (root, flow) = screen_flow("settings");
    let scope = Scope::new("settings screen");
    let recorder = Recorder::new();

    let rec = recorder.clone();
    ReadinessSynchronizer::default()
        .when_ready_in(&scope, Expect::<Screen>::root_of(&flow), move |_| rec.record("ran"))
        .unwrap();
    assert_eq!(scope.active(), 1);

    scope.release();
    root.did_appear();
    tokio::time::sleep(secs(1)).await;
    assert!(recorder.is_empty());
    assert!(flow.is_ready());
}

#[tokio::test(start_paused = true)]
async fn empty_set_is_rejected_and_never_fires() {
    let scope = Scope::new("test");
    let recorder = Recorder::new();

    let rec = recorder.clone();
    let result = ReadinessSynchronizer::new(MismatchPolicy::Panic).when_ready_in(
        &scope,
        Vec::<Expect<Screen>>::new(),
        move |_| rec.record("ran"),
    );
    assert_eq!(result, Err(FlowError::EmptyReadySet));

    let awaited = ReadinessSynchronizer::default()
        .ready(Vec::<Expect<Window>>::new())
        .await;
    assert!(matches!(awaited, Err(FlowError::EmptyReadySet)));

    settle().await;
    assert!(recorder.is_empty());
    assert_eq!(scope.active(), 0);
}

#[test]
fn registering_outside_a_runtime_is_an_error() {
    let (_root, flow) = screen_flow("orphan");
    let scope = Scope::new("test");
    let result = ReadinessSynchronizer::default().when_ready_in(
        &scope,
        Expect::<Screen>::root_of(&flow),
        |_| {},
    );
    assert_eq!(result, Err(FlowError::NoRuntime("readiness callback")));
}

#[tokio::test(start_paused = true)]
async fn nested_flow_root_is_ready_with_its_own_root() {
    let (inner_root, inner) = screen_flow("inner");
    let inner = Arc::new(inner);
    let outer: Flow<AppStep> = Flow::new("outer", inner.clone(), no_navigation);

    appear_after(inner_root, secs(2));
    let root = Flows::ready(Expect::<Flow<AppStep>>::root_of(&outer))
        .await
        .unwrap();

    assert!(Arc::ptr_eq(&root, &inner));
    assert!(root.navigate(AppStep::Start).is_none());
    assert!(outer.is_ready());
}

#[tokio::test(start_paused = true)]
async fn global_facade_schedules_on_the_global_scope() {
    let (root, flow) = screen_flow("welcome");
    let recorder = Recorder::new();

    let rec = recorder.clone();
    Flows::when_ready(Expect::<Screen>::root_of(&flow), move |welcome| {
        rec.record(welcome.title().to_string());
    })
    .unwrap();

    appear_after(root, secs(1));
    tokio::time::sleep(secs(2)).await;
    assert_eq!(recorder.values(), vec!["welcome".to_string()]);
}
