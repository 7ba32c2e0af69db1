use thiserror::Error;

/// Text shown to the user whenever the upload itself fails.
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed. Please try again later.";

#[derive(Error, Debug)]
pub enum UploaderError {
    #[error("Upload request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Upload endpoint returned HTTP {status}: {body}")]
    StatusError { status: u16, body: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Could not read the submitted form: {message}")]
    MultipartError { message: String },

    #[error("Invalid value '{value}' for {field}")]
    InvalidChoiceError { field: String, value: String },

    #[error("Unsupported file type '{filename}'. Allowed: {allowed}")]
    FileTypeError { filename: String, allowed: String },
}

impl UploaderError {
    /// Whether the error happened while talking to the upload endpoint.
    pub fn is_upload_failure(&self) -> bool {
        matches!(
            self,
            UploaderError::TransportError(_) | UploaderError::StatusError { .. }
        )
    }

    /// Message safe to show on the page or the terminal. Upload failures
    /// collapse to one generic sentence.
    pub fn user_friendly_message(&self) -> String {
        match self {
            UploaderError::TransportError(_) | UploaderError::StatusError { .. } => {
                UPLOAD_FAILED_MESSAGE.to_string()
            }
            UploaderError::IoError(_) | UploaderError::SerializationError(_) => {
                "An internal error occurred. Please try again later.".to_string()
            }
            UploaderError::ConfigError { message } => {
                format!("Configuration problem: {}", message)
            }
            UploaderError::MissingConfigError { field } => {
                format!("{} must be set before starting the uploader", field)
            }
            UploaderError::InvalidConfigValueError { field, reason, .. } => {
                format!("{} is invalid: {}", field, reason)
            }
            UploaderError::MultipartError { .. } => {
                "The form could not be read. Please submit it again.".to_string()
            }
            UploaderError::InvalidChoiceError { field, .. } => {
                format!("Please pick one of the listed options for {}", field)
            }
            UploaderError::FileTypeError { allowed, .. } => {
                format!("This file type is not allowed. Please choose a {} file.", allowed)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, UploaderError>;
