use std::time::Duration;

use extractor_logging::{extractor_debug, extractor_info, extractor_warn};
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::{
    EngineEvent, FailureKind, HealthReport, RequestId, Stage, UploadError, UploadOutput,
    UploadProgress, UploadRequest,
};

pub const EXTRACT_PATH: &str = "/api/extract";
pub const HEALTH_PATH: &str = "/api/health";

const FILE_FIELD: &str = "file";
const MAX_DETAIL_CHARS: usize = 500;

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            // OCR plus model inference on the service side is slow.
            request_timeout: Duration::from_secs(120),
            max_response_bytes: 5 * 1024 * 1024,
        }
    }
}

impl UploadSettings {
    pub fn endpoint(&self, path: &str) -> Result<reqwest::Url, UploadError> {
        let base = self.base_url.trim().trim_end_matches('/');
        reqwest::Url::parse(&format!("{base}{path}"))
            .map_err(|err| UploadError::new(FailureKind::InvalidEndpoint, err.to_string()))
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(
        &self,
        request_id: RequestId,
        request: &UploadRequest,
        sink: &dyn ProgressSink,
    ) -> Result<UploadOutput, UploadError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestUploader {
    settings: UploadSettings,
}

impl ReqwestUploader {
    pub fn new(settings: UploadSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, UploadError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| UploadError::new(FailureKind::Network, err.to_string()))
    }

    /// Queries the service health endpoint.
    pub async fn health(&self) -> Result<HealthReport, UploadError> {
        let url = self.settings.endpoint(HEALTH_PATH)?;
        let client = self.build_client()?;
        let response = client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        let body = self.read_body(response, 0, &NullSink).await?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        serde_json::from_slice(&body)
            .map_err(|err| UploadError::new(FailureKind::InvalidResponse, err.to_string()))
    }

    async fn read_body(
        &self,
        response: reqwest::Response,
        request_id: RequestId,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<u8>, UploadError> {
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(UploadError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(UploadError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
            sink.emit(EngineEvent::Progress(UploadProgress {
                request_id,
                stage: Stage::Receiving,
                bytes: Some(bytes.len() as u64),
            }));
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl Uploader for ReqwestUploader {
    async fn upload(
        &self,
        request_id: RequestId,
        request: &UploadRequest,
        sink: &dyn ProgressSink,
    ) -> Result<UploadOutput, UploadError> {
        let url = self.settings.endpoint(EXTRACT_PATH)?;
        let client = self.build_client()?;

        let part = Part::bytes(request.content.as_ref().clone())
            .file_name(request.file_name.clone())
            .mime_str(&request.content_type)
            .map_err(|err| UploadError::new(FailureKind::InvalidRequest, err.to_string()))?;
        let form = Form::new().part(FILE_FIELD, part);

        extractor_info!(
            "Uploading request_id={} file={} bytes={} to {}",
            request_id,
            request.file_name,
            request.content.len(),
            url
        );
        sink.emit(EngineEvent::Progress(UploadProgress {
            request_id,
            stage: Stage::Uploading,
            bytes: Some(request.content.len() as u64),
        }));

        let response = client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let body = self.read_body(response, request_id, sink).await?;

        if !status.is_success() {
            let err = status_error(status, &body);
            extractor_warn!("Upload request_id={} failed: {}", request_id, err);
            return Err(err);
        }

        extractor_debug!(
            "Upload request_id={} completed status={} body_len={}",
            request_id,
            status.as_u16(),
            body.len()
        );
        Ok(UploadOutput {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: EngineEvent) {}
}

fn status_error(status: reqwest::StatusCode, body: &[u8]) -> UploadError {
    let message = match error_detail(body) {
        Some(detail) => format!("service returned {status}: {detail}"),
        None => format!("service returned {status}"),
    };
    UploadError::new(FailureKind::HttpStatus(status.as_u16()), message)
}

/// Human-readable detail from an error body: the `detail` field of a JSON
/// error document when there is one, otherwise the trimmed body text.
fn error_detail(body: &[u8]) -> Option<String> {
    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) {
        match map.get("detail") {
            Some(Value::String(detail)) if !detail.trim().is_empty() => {
                return Some(truncate(detail.trim()));
            }
            Some(Value::Array(items)) => {
                let messages: Vec<String> = items
                    .iter()
                    .map(|item| match item.get("msg") {
                        Some(Value::String(msg)) => msg.clone(),
                        _ => item.to_string(),
                    })
                    .collect();
                if !messages.is_empty() {
                    return Some(truncate(&messages.join("; ")));
                }
            }
            _ => {}
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(truncate(text))
    }
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_DETAIL_CHARS) {
        Some((end, _)) => format!("{}…", &text[..end]),
        None => text.to_string(),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> UploadError {
    if err.is_timeout() {
        return UploadError::new(FailureKind::Timeout, err.to_string());
    }
    UploadError::new(FailureKind::Network, err.to_string())
}
