use crate::config::{TelemetryConfig, SENTRY_DSN_ENV};
use crate::domain::ports::ErrorTracker;
use crate::utils::error::{Result, UploaderError};
use sentry::integrations::tracing::{EventFilter, SentryLayer};
use tracing::{Level, Subscriber};
use tracing_subscriber::registry::LookupSpan;

/// Starts the sentry client when a DSN is configured. The returned guard
/// flushes pending events when dropped.
pub fn init_sentry(config: &TelemetryConfig) -> Result<Option<sentry::ClientInitGuard>> {
    let Some(dsn) = &config.dsn else {
        return Ok(None);
    };
    let dsn = dsn
        .parse::<sentry::types::Dsn>()
        .map_err(|e| UploaderError::InvalidConfigValueError {
            field: SENTRY_DSN_ENV.to_string(),
            value: dsn.clone(),
            reason: e.to_string(),
        })?;

    let guard = sentry::init(sentry::ClientOptions {
        dsn: Some(dsn),
        release: Some(config.release.clone().into()),
        traces_sample_rate: config.traces_sample_rate,
        ..Default::default()
    });
    Ok(Some(guard))
}

/// Forwards log records to sentry: `event_level` and above as events, the
/// remaining info-and-above records as breadcrumbs.
pub fn sentry_layer<S>(event_level: Level) -> SentryLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    sentry::integrations::tracing::layer().event_filter(move |metadata| {
        let level = *metadata.level();
        if level <= event_level {
            EventFilter::Event
        } else if level <= Level::INFO {
            EventFilter::Breadcrumb
        } else {
            EventFilter::Ignore
        }
    })
}

/// Reports errors to the process-wide sentry hub. Without an initialised
/// client captures are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentryTracker;

impl ErrorTracker for SentryTracker {
    fn capture_error(&self, error: &UploaderError) {
        let event_id = sentry::capture_error(error);
        tracing::debug!("Reported error to sentry: {}", event_id);
    }
}
