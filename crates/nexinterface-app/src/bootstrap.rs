use std::sync::Arc;

use nexinterface_router::{MemoryHistory, NavigationPort, install_global};
use nexinterface_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig};
use nexinterface_widgets::PresentationConfig;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::session::{SessionReport, run_scripted_session};
use crate::shell::{DEFAULT_ROUTES, Shell};

const LOG_LEVEL_VAR: &str = "NEXINTERFACE_LOG_LEVEL";
const LOG_FORMAT_VAR: &str = "NEXINTERFACE_LOG_FORMAT";
const START_PATH_VAR: &str = "NEXINTERFACE_START_PATH";

/// Dependencies required to bootstrap the host.
#[derive(Debug, Clone)]
pub(crate) struct BootstrapDependencies {
    log_level: String,
    log_format: LogFormat,
    start_path: String,
    presentation: PresentationConfig,
}

impl BootstrapDependencies {
    /// Construct production dependencies from the environment for the binary entrypoint.
    pub(crate) fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let presentation = PresentationConfig::from_lookup(&lookup)
            .map_err(|err| AppError::config("presentation.from_env", err))?;
        let log_format = lookup(LOG_FORMAT_VAR)
            .map(|value| value.parse())
            .transpose()
            .map_err(|err| AppError::telemetry("log_format.parse", err))?
            .unwrap_or_else(LogFormat::infer);

        Ok(Self {
            log_level: lookup(LOG_LEVEL_VAR).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_format,
            start_path: lookup(START_PATH_VAR).unwrap_or_else(|| "/".to_string()),
            presentation,
        })
    }
}

/// Entry point for the host boot sequence.
///
/// # Errors
///
/// Returns an error if configuration loading, logging installation or
/// controller mounting fails.
pub async fn run_app() -> AppResult<()> {
    let dependencies = BootstrapDependencies::from_env()?;
    nexinterface_telemetry::init_logging(&LoggingConfig {
        level: &dependencies.log_level,
        format: dependencies.log_format,
        build_sha: option_env!("NEXINTERFACE_BUILD_SHA").unwrap_or("dev"),
    })
    .map_err(|err| AppError::telemetry("telemetry.init", err))?;

    let port = install_global(NavigationPort::new(MemoryHistory::new(
        &dependencies.start_path,
    )));
    run_app_with(&dependencies, port).await?;
    Ok(())
}

/// Boot sequence that relies entirely on injected dependencies to simplify testing.
pub(crate) async fn run_app_with(
    dependencies: &BootstrapDependencies,
    port: Arc<NavigationPort>,
) -> AppResult<SessionReport> {
    info!(
        build_sha = nexinterface_telemetry::build_sha(),
        transition_ms = dependencies.presentation.transition_ms,
        "Nexinterface host bootstrap starting"
    );

    let shell = Shell::mount(&dependencies.presentation, port, DEFAULT_ROUTES)?;
    info!(routes = shell.router.routes().len(), "shell mounted");

    let report = run_scripted_session(&shell, &dependencies.presentation).await;
    info!(
        visited = report.visited.len(),
        dialogs = report.dialogs.len(),
        snackbars = report.snackbars.len(),
        confirmed = report.confirmed,
        "scripted session complete"
    );

    shell.teardown();
    info!("Nexinterface host shutdown complete");
    Ok(report)
}
