pub mod cli;
pub mod toml_config;

pub use cli::CliArgs;
pub use toml_config::{LoggingConfig, ServerConfig, TelemetryConfig, UploadConfig, UploaderConfig};

/// Environment variable holding the upload endpoint.
pub const UPLOAD_API_URL_ENV: &str = "UPLOAD_API_URL";
/// Environment variable holding the error-tracking DSN.
pub const SENTRY_DSN_ENV: &str = "UPLOADER_SENTRY_DSN";
