//! Lazy route outlet behaviour.

use std::sync::Arc;
use std::time::Duration;

use nexinterface_router::{
    LoadFuture, MemoryHistory, NavigationPort, ParamsSlot, RouteCandidate, RouteSource, Router,
};
use nexinterface_state::{RemovalSignal, SubscribeOptions};
use nexinterface_test_support::{Counter, Recorder, init_test_logging};
use nexinterface_widgets::{OutletState, RouteOutlet};

type Module = &'static str;

fn delayed(module: Module, delay_ms: u64, loads: &Counter) -> RouteSource<Module> {
    let loads = loads.clone();
    Arc::new(move || -> LoadFuture<Module> {
        loads.hit();
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            module
        })
    })
}

struct Fixture {
    router: Arc<Router<Module>>,
    signal: RemovalSignal,
    fast_loads: Counter,
    slow_loads: Counter,
}

fn fixture(start: &str) -> Fixture {
    init_test_logging();
    let fast_loads = Counter::new();
    let slow_loads = Counter::new();
    let router = Router::new(
        Arc::new(NavigationPort::new(MemoryHistory::new(start))),
        ParamsSlot::new(),
    );
    router.set_routes(vec![
        RouteCandidate::new("/fast", false, "fast-view", delayed("fast-module", 10, &fast_loads))
            .expect("valid pattern"),
        RouteCandidate::new("/slow", false, "slow-view", delayed("slow-module", 500, &slow_loads))
            .expect("valid pattern"),
    ]);
    let signal = RemovalSignal::new();
    let _listening = router.mount(&signal);
    Fixture {
        router,
        signal,
        fast_loads,
        slow_loads,
    }
}

fn ready_component(state: &OutletState<Module>) -> Option<String> {
    state
        .module()
        .and(state.component())
        .map(str::to_string)
}

#[tokio::test(start_paused = true)]
async fn selected_route_loads_module() {
    let fx = fixture("/fast");
    let outlet = RouteOutlet::mount(&fx.router, &fx.signal).expect("runtime");
    assert!(matches!(outlet.state(), OutletState::Loading { .. }));

    tokio::time::sleep(Duration::from_millis(20)).await;
    let state = outlet.state();
    assert_eq!(state.component(), Some("fast-view"));
    assert_eq!(state.module().map(|module| **module), Some("fast-module"));
}

#[tokio::test(start_paused = true)]
async fn newer_selection_discards_slow_load() {
    let fx = fixture("/slow");
    let outlet = RouteOutlet::mount(&fx.router, &fx.signal).expect("runtime");
    let ready = Recorder::new();
    let _sub = outlet.subscribe(SubscribeOptions::default(), ready.observer(ready_component));

    fx.router.port().push_state("/fast");
    tokio::time::sleep(Duration::from_millis(1_000)).await;

    assert_eq!(fx.slow_loads.get(), 1);
    assert_eq!(
        ready.events().into_iter().flatten().collect::<Vec<_>>(),
        vec!["fast-view".to_string()]
    );
    assert_eq!(outlet.state().component(), Some("fast-view"));
}

#[tokio::test(start_paused = true)]
async fn same_target_does_not_reload() {
    let fx = fixture("/fast");
    let outlet = RouteOutlet::mount(&fx.router, &fx.signal).expect("runtime");
    tokio::time::sleep(Duration::from_millis(20)).await;

    fx.router.port().push_state("/fast");
    fx.router.port().replace_state("/fast");
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(fx.fast_loads.get(), 1);
    assert!(outlet.state().module().is_some());
}

#[tokio::test(start_paused = true)]
async fn teardown_abandons_pending_load() {
    let fx = fixture("/slow");
    let outlet = RouteOutlet::mount(&fx.router, &fx.signal).expect("runtime");

    fx.signal.fire();
    fx.router.port().push_state("/fast");
    tokio::time::sleep(Duration::from_millis(1_000)).await;

    assert_eq!(fx.fast_loads.get(), 0);
    assert!(matches!(
        outlet.state(),
        OutletState::Loading { ref component } if component == "slow-view"
    ));
}
