//! Scripted navigation session exercising the shell end to end.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use nexinterface_state::SubscribeOptions;
use nexinterface_widgets::{
    ActionButton, DialogRequest, PresentationConfig, PresenterPhase, PresenterView, Presentable,
    SnackbarRequest,
};
use tracing::info;

use crate::shell::Shell;

/// Outcome of [`run_scripted_session`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
    /// `(pathname, component)` after every navigation step.
    pub visited: Vec<(String, Option<String>)>,
    /// Dialog summaries in the order they were shown.
    pub dialogs: Vec<String>,
    /// Snackbar summaries in the order they were shown.
    pub snackbars: Vec<String>,
    /// Number of confirmed dialog actions.
    pub confirmed: usize,
    /// Component rendered by the outlet when the session ended.
    pub outlet_component: Option<String>,
    /// Drawer state when the session ended.
    pub drawer_open: bool,
    /// Menu state when the session ended.
    pub menu_open: bool,
}

/// Drive a fixed sequence of navigations, dialogs and snackbars.
///
/// Waits are derived from `config`, so the session finishes just after the
/// last snackbar auto-dismisses.
pub async fn run_scripted_session(shell: &Shell, config: &PresentationConfig) -> SessionReport {
    let settle = config.exit_delay() + config.enter_duration();
    let dialogs = Arc::new(Mutex::new(Vec::new()));
    let snackbars = Arc::new(Mutex::new(Vec::new()));
    let dialog_sub = shell
        .dialog_host
        .subscribe(SubscribeOptions::default(), record_adopted(&dialogs));
    let snackbar_sub = shell
        .snackbar_host
        .subscribe(SubscribeOptions::default(), record_adopted(&snackbars));
    let confirmed = Arc::new(AtomicUsize::new(0));
    let mut visited = Vec::new();

    visit(shell, &mut visited);

    shell.drawer.open();
    shell.drawer.select_item(&shell.port, "/users/42");
    visit(shell, &mut visited);

    let confirm = {
        let confirmed = Arc::clone(&confirmed);
        ActionButton::new("Delete", move || {
            confirmed.fetch_add(1, Ordering::SeqCst);
        })
    };
    shell.dialogs.push(
        DialogRequest::new("Delete user?", "The account and its files are removed.")
            .with_button(confirm),
    );
    tokio::time::sleep(settle).await;
    if !shell.dialog_host.press_action() {
        info!("dialog was not showing when confirmed");
    }

    shell.snackbars.push(SnackbarRequest::new("User deleted"));
    shell
        .menu
        .show(vec!["Download".to_string(), "Share".to_string()]);
    shell.port.push_state("/files/reports/q3.csv");
    visit(shell, &mut visited);

    let auto_dismiss = config
        .snackbar_options()
        .auto_dismiss
        .unwrap_or(Duration::ZERO);
    tokio::time::sleep(auto_dismiss + settle * 2).await;

    shell.port.back();
    visit(shell, &mut visited);
    tokio::time::sleep(settle).await;

    dialog_sub.cancel();
    snackbar_sub.cancel();

    SessionReport {
        visited,
        dialogs: take(&dialogs),
        snackbars: take(&snackbars),
        confirmed: confirmed.load(Ordering::SeqCst),
        outlet_component: shell.outlet.state().component().map(str::to_string),
        drawer_open: shell.drawer.is_open(),
        menu_open: shell.menu.is_active(),
    }
}

fn visit(shell: &Shell, visited: &mut Vec<(String, Option<String>)>) {
    let pathname = shell.port.pathname();
    let component = shell.router.current().map(|selection| selection.component);
    info!(
        %pathname,
        component = component.as_deref().unwrap_or("-"),
        params = %shell.router.location_params(),
        "navigated"
    );
    visited.push((pathname, component));
}

fn record_adopted<P>(sink: &Arc<Mutex<Vec<String>>>) -> impl Fn(&PresenterView<P>) + Send + Sync + use<P>
where
    P: Presentable,
{
    let sink = Arc::clone(sink);
    move |view| {
        if view.phase == PresenterPhase::FadingIn
            && let Some(entry) = &view.current
        {
            info!(summary = entry.payload.summary(), "presented");
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(entry.payload.summary().to_string());
        }
    }
}

fn take(sink: &Mutex<Vec<String>>) -> Vec<String> {
    std::mem::take(&mut *sink.lock().unwrap_or_else(PoisonError::into_inner))
}
