use crate::core::{
    ConfigProvider, ErrorTracker, FormInput, Submission, UploadData, UploadOutcome, UploadParams,
    UploadSummary, Uploader,
};
use crate::domain::model::Choice;
use crate::utils::error::{Result, UploaderError, UPLOAD_FAILED_MESSAGE};
use reqwest::multipart::{Form, Part};
use reqwest::Client;

/// Longest slice of an error response body kept for the log.
const MAX_ERROR_BODY: usize = 512;

/// Sends one submission to the upload endpoint per call and reports the result.
pub struct UploadDispatcher<C: ConfigProvider, T: ErrorTracker> {
    config: C,
    tracker: T,
    client: Client,
}

impl<C: ConfigProvider, T: ErrorTracker> UploadDispatcher<C, T> {
    pub fn new(config: C, tracker: T) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            config,
            tracker,
            client: builder.build()?,
        })
    }

    /// Posts the submission. Returns the summary of exactly what was sent.
    pub async fn send(&self, submission: Submission) -> Result<UploadSummary> {
        let params = UploadParams::from(&submission.details);
        let data = UploadData::from(&submission.details);
        let filename = submission.file.filename.clone();

        let mut form = Form::new();
        form = append_repeated(form, &data.scheme_type);
        form = append_repeated(form, &data.scheme_category);

        let mut file_part = Part::bytes(submission.file.bytes).file_name(filename.clone());
        if let Some(content_type) = &submission.file.content_type {
            file_part = file_part.mime_str(content_type)?;
        }
        form = form.part("file", file_part);

        tracing::debug!("Posting {} to {}", filename, self.config.upload_api_url());
        let response = self
            .client
            .post(self.config.upload_api_url())
            .query(&params)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Upload endpoint responded with {}", status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploaderError::StatusError {
                status: status.as_u16(),
                body: truncate(body, MAX_ERROR_BODY),
            });
        }

        Ok(UploadSummary {
            filename,
            data,
            params,
        })
    }

    pub async fn dispatch(&self, input: FormInput) -> UploadOutcome {
        let Some(submission) = input.into_submission() else {
            tracing::debug!("Upload requested without a file; nothing sent");
            return UploadOutcome::Skipped;
        };

        match self.send(submission).await {
            Ok(summary) => {
                tracing::info!(
                    "File uploaded successfully: {} with fields {}{}",
                    summary.filename,
                    to_json(&summary.data),
                    to_json(&summary.params)
                );
                UploadOutcome::Uploaded(summary)
            }
            Err(e) => {
                tracing::error!("Upload failed: {}", e);
                self.tracker.capture_error(&e);
                UploadOutcome::Failed {
                    message: UPLOAD_FAILED_MESSAGE.to_string(),
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl<C: ConfigProvider, T: ErrorTracker> Uploader for UploadDispatcher<C, T> {
    async fn upload(&self, input: FormInput) -> UploadOutcome {
        self.dispatch(input).await
    }
}

/// One text part per selected value. An empty selection still sends the
/// field, with an empty value.
fn append_repeated<V: Choice>(mut form: Form, values: &[V]) -> Form {
    if values.is_empty() {
        return form.text(V::FIELD, "");
    }
    for value in values {
        form = form.text(V::FIELD, value.as_str());
    }
    form
}

fn to_json<S: serde::Serialize>(value: &S) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<unserializable: {}>", e))
}

fn truncate(mut body: String, max: usize) -> String {
    if body.len() > max {
        let mut end = max;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    body
}
