use crate::config::{CliArgs, SENTRY_DSN_ENV, UPLOAD_API_URL_ENV};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, UploaderError};
use crate::utils::logger::parse_level;
use crate::utils::validation::{
    validate_positive_number, validate_range, validate_required_field, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

const MB: u64 = 1024 * 1024;
const DAY_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UploaderConfig {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub logging: LoggingConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub max_upload_mb: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, 8501)),
            max_upload_mb: 200,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub api_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: PathBuf,
    pub rotation_mb: u64,
    pub retention_days: u64,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("app.log"),
            rotation_mb: 10,
            retention_days: 7,
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn rotation_bytes(&self) -> Result<u64> {
        scaled("logging.rotation_mb", self.rotation_mb, MB)
    }

    pub fn retention(&self) -> Result<Duration> {
        scaled("logging.retention_days", self.retention_days, DAY_SECS).map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub dsn: Option<String>,
    pub release: String,
    pub traces_sample_rate: f32,
    /// Log records at this level and above are sent as events.
    pub event_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            release: "saathi-file-uploader@1.0".to_string(),
            traces_sample_rate: 1.0,
            event_level: "info".to_string(),
        }
    }
}

impl TelemetryConfig {
    pub fn is_enabled(&self) -> bool {
        self.dsn.is_some()
    }
}

impl UploaderConfig {
    /// Builds the runtime configuration: settings file (if any), then the
    /// process environment, then command line overrides.
    pub fn load(args: &CliArgs) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        if let Some(bind) = args.bind {
            config.server.bind = bind;
        }
        config.validate()?;
        Ok(config)
    }

    /// Loads settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(UploaderError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, |name| std::env::var(name).ok())
    }

    /// Parses TOML after replacing `${VAR}` with values from `lookup`.
    /// Unknown variables are left as written.
    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed_content = substitute_env_vars(content, lookup)?;

        toml::from_str(&processed_content).map_err(|e| UploaderError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// `UPLOAD_API_URL` and `UPLOADER_SENTRY_DSN` win over the file. An empty
    /// DSN turns error tracking off.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(UPLOAD_API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.upload.api_url = Some(url);
        }
        if let Some(dsn) = lookup(SENTRY_DSN_ENV) {
            self.telemetry.dsn = Some(dsn);
        }
        if self
            .telemetry
            .dsn
            .as_deref()
            .is_some_and(|dsn| dsn.trim().is_empty())
        {
            self.telemetry.dsn = None;
        }
    }

    pub fn max_upload_bytes(&self) -> Result<usize> {
        let field = "server.max_upload_mb";
        let bytes = scaled(field, self.server.max_upload_mb, MB)?;
        usize::try_from(bytes).map_err(|_| too_large(field, self.server.max_upload_mb))
    }

    pub fn validate_config(&self) -> Result<()> {
        let api_url = validate_required_field(UPLOAD_API_URL_ENV, &self.upload.api_url)?;
        validate_url(UPLOAD_API_URL_ENV, api_url)?;

        if let Some(timeout) = self.upload.timeout_seconds {
            validate_positive_number("upload.timeout_seconds", timeout, 1)?;
        }
        validate_positive_number("server.max_upload_mb", self.server.max_upload_mb, 1)?;
        validate_positive_number("logging.rotation_mb", self.logging.rotation_mb, 1)?;
        validate_positive_number("logging.retention_days", self.logging.retention_days, 1)?;
        validate_level("logging.level", &self.logging.level)?;
        self.max_upload_bytes()?;
        self.logging.rotation_bytes()?;
        self.logging.retention()?;

        validate_range(
            "telemetry.traces_sample_rate",
            self.telemetry.traces_sample_rate,
            0.0,
            1.0,
        )?;
        validate_level("telemetry.event_level", &self.telemetry.event_level)?;
        if let Some(dsn) = &self.telemetry.dsn {
            dsn.parse::<sentry::types::Dsn>()
                .map_err(|e| UploaderError::InvalidConfigValueError {
                    field: SENTRY_DSN_ENV.to_string(),
                    value: dsn.clone(),
                    reason: e.to_string(),
                })?;
        }

        Ok(())
    }
}

/// `value * unit`, rejecting settings whose product does not fit in a u64.
fn scaled(field_name: &str, value: u64, unit: u64) -> Result<u64> {
    value
        .checked_mul(unit)
        .ok_or_else(|| too_large(field_name, value))
}

fn too_large(field_name: &str, value: u64) -> UploaderError {
    UploaderError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: "Value is too large".to_string(),
    }
}

fn validate_level(field_name: &str, level: &str) -> Result<()> {
    parse_level(field_name, level).map(|_| ())
}

/// Replaces `${VAR}` references (e.g. `${API_KEY}`) using `lookup`.
fn substitute_env_vars<F>(content: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| UploaderError::ConfigError {
        message: e.to_string(),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}

impl ConfigProvider for UploaderConfig {
    fn upload_api_url(&self) -> &str {
        self.upload.api_url.as_deref().unwrap_or_default()
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.upload.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for UploaderConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
