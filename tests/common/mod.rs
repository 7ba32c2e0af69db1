#![allow(dead_code)]

use async_trait::async_trait;
use saathi_uploader::domain::model::{FormInput, UploadOutcome};
use saathi_uploader::domain::ports::{ConfigProvider, ErrorTracker, Uploader};
use saathi_uploader::web::{router, AppState};
use saathi_uploader::UploaderError;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::fmt::MakeWriter;

pub struct TestConfig {
    pub upload_api_url: String,
}

impl TestConfig {
    pub fn new(upload_api_url: impl Into<String>) -> Self {
        Self {
            upload_api_url: upload_api_url.into(),
        }
    }
}

impl ConfigProvider for TestConfig {
    fn upload_api_url(&self) -> &str {
        &self.upload_api_url
    }

    fn request_timeout(&self) -> Option<Duration> {
        Some(Duration::from_secs(5))
    }
}

/// Error tracker that remembers every capture.
#[derive(Clone, Default)]
pub struct RecordingTracker {
    captured: Arc<Mutex<Vec<String>>>,
}

impl RecordingTracker {
    pub fn captured(&self) -> Vec<String> {
        self.captured.lock().unwrap().clone()
    }
}

impl ErrorTracker for RecordingTracker {
    fn capture_error(&self, error: &UploaderError) {
        self.captured.lock().unwrap().push(error.to_string());
    }
}

/// Uploader stand-in for the web host: records what it was given and
/// answers with a fixed outcome.
pub struct RecordingUploader {
    calls: Mutex<Vec<FormInput>>,
    outcome: UploadOutcome,
}

impl RecordingUploader {
    pub fn new(outcome: UploadOutcome) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            outcome,
        })
    }

    pub fn calls(&self) -> Vec<FormInput> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Uploader for RecordingUploader {
    async fn upload(&self, input: FormInput) -> UploadOutcome {
        self.calls.lock().unwrap().push(input);
        self.outcome.clone()
    }
}

/// In-memory log sink for asserting on what the dispatcher wrote.
#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish()
    }

    /// Lines written by this crate at `level` (e.g. "INFO", "ERROR").
    pub fn lines_at(&self, level: &str) -> Vec<String> {
        let buf = self.buf.lock().unwrap();
        String::from_utf8_lossy(&buf)
            .lines()
            .filter(|line| line.contains(level) && line.contains("saathi_uploader"))
            .map(str::to_owned)
            .collect()
    }
}

impl Write for LogCapture {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Serves the form on an ephemeral port and returns its base URL.
pub async fn spawn_app(uploader: Arc<dyn Uploader>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(AppState::new(uploader), 10 * 1024 * 1024);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A local URL nothing is listening on.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/upload", addr)
}
