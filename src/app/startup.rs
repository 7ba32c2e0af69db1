use crate::config::{CliArgs, UploaderConfig};
use crate::core::dispatcher::UploadDispatcher;
use crate::utils::error::Result;
use crate::utils::logger::{init_logger, parse_level};
use crate::utils::telemetry::{init_sentry, SentryTracker};
use crate::web::{self, AppState};
use axum::Router;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;

/// Process-wide state set up once at startup. Dropping it flushes the log
/// file and any pending error reports.
pub struct Runtime {
    pub config: UploaderConfig,
    _log_guard: WorkerGuard,
    _sentry_guard: Option<sentry::ClientInitGuard>,
}

/// Loads configuration, starts error tracking, then installs logging.
pub fn start(args: &CliArgs) -> Result<Runtime> {
    let config = UploaderConfig::load(args)?;

    let sentry_guard = init_sentry(&config.telemetry)?;
    let event_level = match &sentry_guard {
        Some(_) => Some(parse_level(
            "telemetry.event_level",
            &config.telemetry.event_level,
        )?),
        None => None,
    };
    let log_guard = init_logger(&config.logging, args.verbose, event_level)?;

    if sentry_guard.is_some() {
        tracing::debug!("Error tracking enabled, release {}", config.telemetry.release);
    } else {
        tracing::debug!("Error tracking disabled: no DSN configured");
    }

    Ok(Runtime {
        config,
        _log_guard: log_guard,
        _sentry_guard: sentry_guard,
    })
}

impl Runtime {
    /// Builds the web app around a dispatcher that reports to sentry.
    pub fn app(&self) -> Result<Router> {
        let dispatcher = UploadDispatcher::new(self.config.clone(), SentryTracker)?;
        Ok(web::router(
            AppState::new(Arc::new(dispatcher)),
            self.config.max_upload_bytes()?,
        ))
    }
}
