//! End-to-end routing behaviour over a navigation port.

use std::sync::Arc;

use nexinterface_router::{
    LoadFuture, MemoryHistory, NavigationKind, NavigationPort, ParamsSlot, RouteCandidate,
    RouteSelection, RouteSource, Router, global_port, install_global,
};
use nexinterface_state::{RemovalSignal, SubscribeOptions};
use nexinterface_test_support::{Counter, Recorder, init_test_logging};
use serial_test::serial;

type View = &'static str;

fn source(view: View) -> RouteSource<View> {
    Arc::new(move || -> LoadFuture<View> { Box::pin(async move { view }) })
}

fn candidate(path: &str, loose: bool, component: View) -> RouteCandidate<View> {
    RouteCandidate::new(path, loose, component, source(component)).expect("valid pattern")
}

fn mounted_router(start: &str) -> (Arc<Router<View>>, RemovalSignal) {
    init_test_logging();
    let port = Arc::new(NavigationPort::new(MemoryHistory::new(start)));
    let router = Router::new(port, ParamsSlot::new());
    router.set_routes(vec![
        candidate("/", false, "home-view"),
        candidate("/users/:id?", false, "users-view"),
        candidate("/files/*", false, "files-view"),
        candidate("/admin", true, "admin-view"),
    ]);
    let signal = RemovalSignal::new();
    let _listening = router.mount(&signal);
    (router, signal)
}

fn component_of(selection: &Option<RouteSelection<View>>) -> Option<String> {
    selection.as_ref().map(|selection| selection.component.clone())
}

#[test]
fn push_navigation_recomputes_exactly_once_synchronously() {
    let (router, _signal) = mounted_router("/");
    let recorder = Recorder::new();
    let _sub = router.subscribe(SubscribeOptions::default(), recorder.observer(component_of));

    router.port().push_state("/users/42");

    assert_eq!(recorder.events(), vec![Some("users-view".to_string())]);
    assert_eq!(router.params().value("id").as_deref(), Some("42"));
}

#[test]
fn replace_and_pop_navigation_recompute() {
    let (router, _signal) = mounted_router("/");
    let port = Arc::clone(router.port());

    port.push_state("/files/a/b/c.txt");
    assert_eq!(router.params().value("wild").as_deref(), Some("a/b/c.txt"));

    port.replace_state("/users");
    let params = router.location_params();
    assert!(params.contains_key("id"));
    assert_eq!(params.get("id"), None);

    assert!(port.back());
    assert_eq!(router.current().map(|s| s.component), Some("home-view".to_string()));
}

#[test]
fn loose_candidate_matches_nested_path() {
    let (router, _signal) = mounted_router("/admin/settings");
    assert_eq!(router.current().map(|s| s.component), Some("admin-view".to_string()));
    assert!(router.location_params().is_empty());
}

#[test]
fn unmatched_navigation_keeps_selection_and_params() {
    let (router, _signal) = mounted_router("/users/7");
    router.port().push_state("/nothing/here");

    assert_eq!(router.current().map(|s| s.component), Some("users-view".to_string()));
    assert_eq!(router.params().value("id").as_deref(), Some("7"));
}

#[test]
fn teardown_stops_recomputation() {
    let (router, signal) = mounted_router("/");
    let counter = Counter::new();
    let hits = counter.clone();
    let _sub = router.subscribe(SubscribeOptions::default(), move |_selection| hits.hit());

    signal.fire();
    router.port().push_state("/users/1");

    assert_eq!(counter.get(), 0);
    assert_eq!(router.port().listener_count(), 0);
}

#[test]
fn other_collaborators_observe_programmatic_navigation() {
    let (router, _signal) = mounted_router("/");
    let recorder = Recorder::new();
    let _listener = router
        .port()
        .listen(None, recorder.observer(|event: &nexinterface_router::NavigationEvent| event.kind));

    router.port().push_state("/a");
    router.port().replace_state("/b");

    assert_eq!(
        recorder.events(),
        vec![NavigationKind::Push, NavigationKind::Replace]
    );
}

#[test]
#[serial]
fn global_port_installs_once() {
    let first = install_global(NavigationPort::new(MemoryHistory::new("/first")));
    let second = install_global(NavigationPort::new(MemoryHistory::new("/second")));

    assert!(Arc::ptr_eq(&first, &second));
    let global = global_port().expect("installed");
    assert!(Arc::ptr_eq(&first, &global));

    let counter = Counter::new();
    let hits = counter.clone();
    let _listener = global.listen(None, move |_event| hits.hit());
    global.push_state("/once");
    assert_eq!(counter.get(), 1);
}
