use crate::config::LoggingConfig;
use crate::utils::error::{Result, UploaderError};
use crate::utils::rotation::{RotatingFile, RotationPolicy};
use crate::utils::telemetry::sentry_layer;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub fn parse_level(field_name: &str, value: &str) -> Result<Level> {
    value
        .parse::<Level>()
        .map_err(|_| UploaderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Expected one of trace, debug, info, warn, error".to_string(),
        })
}

fn console_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("saathi_uploader=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("saathi_uploader=info"))
    }
}

/// Installs the global subscriber: compact console output, the rotating log
/// file, and the sentry layer when `sentry_event_level` is given.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes and stops the file writer.
pub fn init_logger(
    logging: &LoggingConfig,
    verbose: bool,
    sentry_event_level: Option<Level>,
) -> Result<WorkerGuard> {
    let file_level = parse_level("logging.level", &logging.level)?;
    let file = RotatingFile::open(
        &logging.file,
        RotationPolicy {
            max_bytes: logging.rotation_bytes()?,
            retention: logging.retention()?,
        },
    )?;
    let (file_writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact()
                .with_filter(console_filter(verbose)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer)
                .with_filter(LevelFilter::from_level(file_level)),
        )
        .with(sentry_event_level.map(sentry_layer))
        .try_init()
        .map_err(|e| UploaderError::ConfigError {
            message: format!("Failed to install logger: {}", e),
        })?;

    Ok(guard)
}
