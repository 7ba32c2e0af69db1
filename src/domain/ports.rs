use crate::domain::model::{FormInput, UploadOutcome};
use crate::utils::error::UploaderError;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn upload_api_url(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;
}

/// Destination for explicit error captures.
pub trait ErrorTracker: Send + Sync {
    fn capture_error(&self, error: &UploaderError);
}

#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, input: FormInput) -> UploadOutcome;
}
