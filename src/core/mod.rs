pub mod dispatcher;

pub use crate::domain::model::{
    FormInput, Submission, UploadData, UploadOutcome, UploadParams, UploadSummary,
};
pub use crate::domain::ports::{ConfigProvider, ErrorTracker, Uploader};
pub use crate::utils::error::Result;
