pub mod form;
pub mod page;

use crate::domain::model::{SchemeDetails, UploadOutcome};
use crate::domain::ports::Uploader;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use page::Notice;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    uploader: Arc<dyn Uploader>,
}

impl AppState {
    pub fn new(uploader: Arc<dyn Uploader>) -> Self {
        Self { uploader }
    }
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(show_form))
        .route("/upload", get(show_form).post(upload))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

async fn show_form() -> Html<String> {
    Html(page::render(&SchemeDetails::default(), None))
}

async fn upload(State(state): State<AppState>, multipart: Multipart) -> Response {
    let parsed = match form::read_form(multipart).await {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Rejected upload form: {}", e);
            let notice = Notice::Error(e.user_friendly_message());
            let body = page::render(&SchemeDetails::default(), Some(&notice));
            return (StatusCode::BAD_REQUEST, Html(body)).into_response();
        }
    };

    let details = parsed.input.details.clone();
    if let Some(e) = parsed.file_error {
        tracing::warn!("Rejected upload file: {}", e);
        let notice = Notice::Error(e.user_friendly_message());
        let body = page::render(&details, Some(&notice));
        return (StatusCode::UNSUPPORTED_MEDIA_TYPE, Html(body)).into_response();
    }

    if parsed.input.file.is_none() {
        tracing::debug!("Upload clicked without a file; nothing to send");
        return Html(page::render(&details, None)).into_response();
    }

    let notice = match state.uploader.upload(parsed.input).await {
        UploadOutcome::Skipped => None,
        UploadOutcome::Uploaded(summary) => Some(Notice::Uploaded(summary)),
        UploadOutcome::Failed { message } => Some(Notice::Error(message)),
    };
    Html(page::render(&details, notice.as_ref())).into_response()
}
