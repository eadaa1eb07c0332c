//! HTTP client for the layout service.
//!
//! Three calls make up an export round trip: upload the drawing to get its
//! entities, submit the captured view, then download the generated artifact
//! from the URL the service returns.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use mapa_core::EntityStore;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::payload::ExportPayload;
use crate::retry::RetryPolicy;

/// Identity sent when no user is signed in.
pub const DEFAULT_USER_EMAIL: &str = "anon@anon.com";
/// Header carrying the acting user's identity.
pub const USER_EMAIL_HEADER: &str = "x-user-email";

const UPLOAD_PATH: &str = "dxf/upload";
const LAYOUT_PATH: &str = "dxf/gerar-layout";

/// Connection settings for [`LayoutClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the layout service.
    pub base_url: String,
    /// Identity of the acting user.
    pub user_email: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry policy for idempotent calls.
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            user_email: DEFAULT_USER_EMAIL.to_string(),
            timeout: Duration::from_secs(120),
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LayoutResponse {
    #[serde(default)]
    pdf_url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the layout-generation service.
#[derive(Clone)]
pub struct LayoutClient {
    inner: Arc<InnerClient>,
}

struct InnerClient {
    http: Client,
    base: Url,
    user_email: String,
    retry: RetryPolicy,
}

impl LayoutClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the base URL is malformed.
    /// Returns [`ClientError::Http`] if the HTTP client fails to build.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let mut base =
            Url::parse(&config.base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(config.base_url));
        }
        // Relative joins replace the last segment unless the path ends in '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = Client::builder()
            .user_agent(concat!("mapa/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(InnerClient {
                http,
                base,
                user_email: config.user_email,
                retry: config.retry,
            }),
        })
    }

    /// Base URL all endpoints are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base
    }

    /// Upload a drawing file and parse the entities the service returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the service rejects the file,
    /// or the response is not a drawing document.
    #[tracing::instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_drawing(&self, file_name: &str, bytes: Vec<u8>) -> ClientResult<EntityStore> {
        let url = self.inner.base.join(UPLOAD_PATH)?;
        let response = self
            .send_with_retry("upload", || {
                let part = Part::bytes(bytes.clone()).file_name(file_name.to_string());
                self.inner
                    .http
                    .post(url.clone())
                    .multipart(Form::new().part("file", part))
            })
            .await?;
        let body = checked_body(response).await?;
        let store = EntityStore::from_json(&body)?;
        info!("Uploaded {file_name}: {} entities", store.len());
        Ok(store)
    }

    /// Read `path` and upload it with [`upload_drawing`](Self::upload_drawing).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Io`] if the file cannot be read, else as
    /// [`upload_drawing`](Self::upload_drawing).
    pub async fn upload_drawing_file(&self, path: &Path) -> ClientResult<EntityStore> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("drawing.dxf");
        self.upload_drawing(file_name, bytes).await
    }

    /// Submit a layout request, returning the artifact URL.
    ///
    /// Submission is attempted once: layout generation is not idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Service`] with the service's message when it
    /// rejects the request.
    #[tracing::instrument(skip(self, payload), fields(drawing = %payload.drawing_name))]
    pub async fn submit_layout(&self, payload: ExportPayload) -> ClientResult<Url> {
        let url = self.inner.base.join(LAYOUT_PATH)?;
        let form = payload.into_multipart()?;
        let response = self
            .inner
            .http
            .post(url)
            .header(USER_EMAIL_HEADER, &self.inner.user_email)
            .multipart(form)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = checked_body(response).await?;
        let parsed: LayoutResponse = serde_json::from_str(&body).map_err(|_| {
            ClientError::UnexpectedResponse(format!("layout response is not JSON: {body}"))
        })?;
        match (parsed.pdf_url, parsed.error) {
            (Some(pdf_url), _) => {
                let artifact = self.inner.base.join(&pdf_url)?;
                info!("Layout generated at {artifact}");
                Ok(artifact)
            }
            (None, Some(message)) => Err(ClientError::Service { status, message }),
            (None, None) => Err(ClientError::UnexpectedResponse(
                "layout response carried neither pdf_url nor error".to_string(),
            )),
        }
    }

    /// Download `url` into `dir`, named after the URL's last path segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the download fails, the URL has no file name, or
    /// the file cannot be written.
    #[tracing::instrument(skip(self, url, dir), fields(url = %url))]
    pub async fn download_artifact(&self, url: &Url, dir: &Path) -> ClientResult<PathBuf> {
        let file_name = artifact_file_name(url)?;
        let response = self
            .send_with_retry("download", || self.inner.http.get(url.clone()))
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Service {
                status: status.as_u16(),
                message: service_message(&body),
            });
        }
        let bytes = response.bytes().await?;

        tokio::fs::create_dir_all(dir).await?;
        let target = dir.join(file_name);
        tokio::fs::write(&target, &bytes).await?;
        info!("Saved {} bytes to {}", bytes.len(), target.display());
        Ok(target)
    }

    /// Submit `payload` and save the generated artifact into `dir`.
    ///
    /// # Errors
    ///
    /// Returns the first error of either step.
    pub async fn export(&self, payload: ExportPayload, dir: &Path) -> ClientResult<PathBuf> {
        let url = self.submit_layout(payload).await?;
        self.download_artifact(&url, dir).await
    }

    async fn send_with_retry<F>(&self, operation: &str, build: F) -> ClientResult<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let policy = &self.inner.retry;
        let attempts = policy.attempts.max(1);
        let mut delays = policy.delays();
        let mut attempt = 1;
        loop {
            let failure = match build().send().await {
                Ok(response) if response.status().is_server_error() => ClientError::Service {
                    status: response.status().as_u16(),
                    message: service_message(&response.text().await.unwrap_or_default()),
                },
                Ok(response) => return Ok(response),
                Err(e) => ClientError::Http(e),
            };
            let Some(delay) = delays.next().filter(|_| failure.is_retryable()) else {
                return Err(failure);
            };
            warn!(
                "Layout service {} failed (attempt {}/{}), retrying in {}ms: {}",
                operation,
                attempt,
                attempts,
                delay.as_millis(),
                failure
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

/// Body of a successful response, or the service error it carries.
async fn checked_body(response: Response) -> ClientResult<String> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(ClientError::Service {
            status: status.as_u16(),
            message: service_message(&body),
        })
    }
}

/// The user-facing message of an error body: the `error` or `detail`
/// member of a JSON object, else the raw body.
#[must_use]
pub fn service_message(body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["error", "detail"] {
            match map.get(key) {
                Some(Value::String(message)) => return message.clone(),
                Some(Value::Null) | None => {}
                Some(other) => return other.to_string(),
            }
        }
    }
    let raw = body.trim();
    if raw.is_empty() {
        "unknown error".to_string()
    } else {
        raw.to_string()
    }
}

/// Local file name for an artifact URL.
///
/// # Errors
///
/// Returns [`ClientError::UnexpectedResponse`] when the path has no final
/// segment.
pub fn artifact_file_name(url: &Url) -> ClientResult<String> {
    url.path_segments()
        .and_then(Iterator::last)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ClientError::UnexpectedResponse(format!("no file name in {url}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_message_prefers_json_members() {
        assert_eq!(service_message(r#"{"error": "DXF inválido"}"#), "DXF inválido");
        assert_eq!(service_message(r#"{"detail": "Not Found"}"#), "Not Found");
        assert_eq!(
            service_message(r#"{"detail": [{"msg": "field required"}]}"#),
            r#"[{"msg":"field required"}]"#
        );
    }

    #[test]
    fn test_service_message_falls_back_to_body() {
        assert_eq!(service_message("Internal Server Error\n"), "Internal Server Error");
        assert_eq!(service_message(r#"{"ok": false}"#), r#"{"ok": false}"#);
        assert_eq!(service_message("  "), "unknown error");
    }

    #[test]
    fn test_artifact_file_name() {
        let url = Url::parse("https://cdn.example.com/storage/pdfs/fazenda_V0.1.pdf?token=1")
            .expect("url");
        assert_eq!(artifact_file_name(&url).expect("name"), "fazenda_V0.1.pdf");

        let bare = Url::parse("https://cdn.example.com/").expect("url");
        assert!(matches!(
            artifact_file_name(&bare),
            Err(ClientError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = LayoutClient::new(ClientConfig {
            base_url: "http://localhost:8000/api".into(),
            ..ClientConfig::default()
        })
        .expect("client");
        assert_eq!(client.base_url().as_str(), "http://localhost:8000/api/");
        assert_eq!(
            client.base_url().join(LAYOUT_PATH).expect("join").as_str(),
            "http://localhost:8000/api/dxf/gerar-layout"
        );
    }

    #[test]
    fn test_invalid_url_error() {
        let result = LayoutClient::new(ClientConfig {
            base_url: "not a url".into(),
            ..ClientConfig::default()
        });
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }
}
