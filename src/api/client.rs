//! HTTP client for the document-QA backend
//!
//! Thin wrapper translating typed requests into HTTP calls, attaching a
//! bearer token when login is enabled, and normalizing error responses
//! into [`DocqaError`] values.

use crate::api::models::{BackendInfo, ChatRequest, ChatResponse, ErrorEnvelope, RubricFileList};
use crate::api::ChatMessage;
use crate::config::{AuthConfig, BackendConfig};
use crate::error::{DocqaError, Result};

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

/// Client for the document-QA service
///
/// Every method is a single network call; none are idempotent from the
/// client's perspective — retried calls may duplicate backend-side work.
///
/// # Examples
///
/// ```no_run
/// use docqa::api::{ApiClient, ChatRequest};
/// use docqa::config::{AuthConfig, BackendConfig};
///
/// # async fn example() -> docqa::error::Result<()> {
/// let backend = BackendConfig {
///     base_url: "http://localhost:50505".to_string(),
///     timeout_seconds: 30,
/// };
/// let client = ApiClient::new(&backend, AuthConfig::default())?;
/// let response = client.ask(&ChatRequest::question("What is the cap?"), None).await?;
/// println!("{}", response.answer_text());
/// # Ok(())
/// # }
/// ```
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: AuthConfig,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Arguments
    ///
    /// * `backend` - Backend connection settings (base URL, timeout)
    /// * `auth` - Authentication behavior
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or HTTP client
    /// initialization fails
    pub fn new(backend: &BackendConfig, auth: AuthConfig) -> Result<Self> {
        url::Url::parse(&backend.base_url)
            .map_err(|e| DocqaError::Config(format!("Invalid backend base URL: {}", e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(backend.timeout_seconds))
            .user_agent("docqa/0.2.0")
            .build()
            .map_err(|e| DocqaError::Api(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!("Initialized API client: base_url={}", backend.base_url);

        Ok(Self {
            client,
            base_url: backend.base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the header set for a JSON request
    ///
    /// When login is enabled and no app-service token source is active,
    /// an `Authorization: Bearer <token>` header is attached if a token is
    /// supplied; otherwise the request proceeds unauthenticated.
    pub fn auth_headers(&self, token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if self.auth.use_login && !self.auth.app_services {
            if let Some(token) = token {
                if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                    headers.insert(AUTHORIZATION, value);
                } else {
                    tracing::warn!("Bearer token contains invalid header characters, skipping");
                }
            }
        }

        headers
    }

    /// Bearer header value for non-JSON requests (multipart, plain GET)
    fn bearer_value(&self, token: Option<&str>) -> Option<HeaderValue> {
        if !self.auth.use_login || self.auth.app_services {
            return None;
        }
        token.and_then(|t| HeaderValue::from_str(&format!("Bearer {}", t)).ok())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        token: Option<&str>,
    ) -> Result<reqwest::Response> {
        let url = self.endpoint(path);
        tracing::debug!("POST {}", url);

        self.client
            .post(&url)
            .headers(self.auth_headers(token))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Request to {} failed: {}", url, e);
                DocqaError::Api(format!("Request to {} failed: {}", path, e)).into()
            })
    }

    /// Ask a one-shot question via `/ask`
    ///
    /// # Errors
    ///
    /// Fails with the server-supplied error message on a status above 299,
    /// falling back to "Unknown error" when the body carries none.
    pub async fn ask(&self, request: &ChatRequest, token: Option<&str>) -> Result<ChatResponse> {
        let response = self.post_json("/ask", request, token).await?;
        let status = response.status();
        let body = response.text().await.map_err(DocqaError::Http)?;

        if status.as_u16() > 299 {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|e| e.error)
                .unwrap_or_else(|| "Unknown error".to_string());
            tracing::error!("/ask returned {}: {}", status, message);
            return Err(DocqaError::Api(message).into());
        }

        serde_json::from_str(&body)
            .map_err(|e| DocqaError::Api(format!("Failed to parse /ask response: {}", e)).into())
    }

    /// Send a chat turn via `/chat`, returning the raw HTTP response
    ///
    /// Status interpretation and body parsing are the caller's
    /// responsibility; only transport failures are errors here.
    pub async fn chat_raw(
        &self,
        request: &ChatRequest,
        token: Option<&str>,
    ) -> Result<reqwest::Response> {
        self.post_json("/chat", request, token).await
    }

    /// Fetch the backend configuration document via `/config`
    pub async fn fetch_config(&self, token: Option<&str>) -> Result<BackendInfo> {
        let url = self.endpoint("/config");
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers(token))
            .send()
            .await
            .map_err(|e| DocqaError::Api(format!("Request to /config failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocqaError::Api(status_text(status)).into());
        }

        response
            .json()
            .await
            .map_err(|e| DocqaError::Api(format!("Failed to parse /config response: {}", e)).into())
    }

    /// Upload a rubric CSV via `/upload_rubric`
    ///
    /// The response body is the backend-issued access URL for the stored
    /// file.
    pub async fn upload_rubric(&self, form: Form, token: Option<&str>) -> Result<String> {
        let response = self.post_multipart("/upload_rubric", form, token).await?;
        response
            .text()
            .await
            .map_err(|e| DocqaError::Upload(format!("Failed to read access URL: {}", e)).into())
    }

    /// Upload a PDF via `/upload_pdf`
    ///
    /// PDFs are not re-fetchable client-side, so no access URL is returned.
    pub async fn upload_pdf(&self, form: Form, token: Option<&str>) -> Result<()> {
        self.post_multipart("/upload_pdf", form, token).await?;
        Ok(())
    }

    async fn post_multipart(
        &self,
        path: &str,
        form: Form,
        token: Option<&str>,
    ) -> Result<reqwest::Response> {
        let url = self.endpoint(path);
        tracing::debug!("POST {} (multipart)", url);

        let mut request = self.client.post(&url).multipart(form);
        if let Some(value) = self.bearer_value(token) {
            request = request.header(AUTHORIZATION, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DocqaError::Upload(format!("Upload to {} failed: {}", path, e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("{} returned {}", path, status);
            return Err(DocqaError::Upload(status_text(status)).into());
        }

        Ok(response)
    }

    /// List stored rubric files via `/get_rubric_files`
    pub async fn list_rubric_files(&self, token: Option<&str>) -> Result<Vec<String>> {
        let list: RubricFileList = self
            .get_checked(self.endpoint("/get_rubric_files"), token)
            .await?
            .json()
            .await
            .map_err(|e| DocqaError::Api(format!("Failed to parse rubric file list: {}", e)))?;
        Ok(list.rubric_files)
    }

    /// Resolve the access URL for a stored rubric CSV
    ///
    /// The file name is url-encoded into the query string.
    pub async fn csv_access_url(&self, file: &str, token: Option<&str>) -> Result<String> {
        let url = self.endpoint("/get_csv_sas_url");
        let request = self
            .client
            .get(&url)
            .query(&[("file", file)])
            .headers(self.auth_headers(token));

        let response = request
            .send()
            .await
            .map_err(|e| DocqaError::Api(format!("Request to /get_csv_sas_url failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocqaError::Api(status_text(status)).into());
        }

        response
            .text()
            .await
            .map_err(|e| DocqaError::Api(format!("Failed to read access URL: {}", e)).into())
    }

    /// Resolve the access URL for the default rubric CSV
    pub async fn default_csv_access_url(&self, token: Option<&str>) -> Result<String> {
        let response = self
            .get_checked(self.endpoint("/get_default_csv_sas_url"), token)
            .await?;
        response
            .text()
            .await
            .map_err(|e| DocqaError::Api(format!("Failed to read access URL: {}", e)).into())
    }

    /// Submit a server-side rubric evaluation via `/api/rubric-evaluation`
    pub async fn evaluate_rubric(
        &self,
        criteria: &[String],
        messages: &[ChatMessage],
    ) -> Result<serde_json::Value> {
        #[derive(Serialize)]
        struct EvaluationRequest<'a> {
            rubric_criteria: &'a [String],
            messages: &'a [ChatMessage],
        }

        let response = self
            .post_json(
                "/api/rubric-evaluation",
                &EvaluationRequest {
                    rubric_criteria: criteria,
                    messages,
                },
                None,
            )
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocqaError::Api(status_text(status)).into());
        }

        response
            .json()
            .await
            .map_err(|e| DocqaError::Api(format!("Failed to parse evaluation response: {}", e)).into())
    }

    /// Path to a citation document served by the backend
    ///
    /// Pure string construction, no network call. The citation id is passed
    /// through unencoded, so ids containing `?` or `#` will not round-trip.
    pub fn citation_path(&self, citation: &str) -> String {
        format!("{}/content/{}", self.base_url, citation)
    }

    /// Fetch the text body behind an opaque access URL
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DocqaError::Api(format!("Fetch of access URL failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocqaError::Api(status_text(status)).into());
        }

        response
            .text()
            .await
            .map_err(|e| DocqaError::Api(format!("Failed to read file body: {}", e)).into())
    }

    async fn get_checked(&self, url: String, token: Option<&str>) -> Result<reqwest::Response> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers(token))
            .send()
            .await
            .map_err(|e| DocqaError::Api(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("{} returned {}", url, status);
            return Err(DocqaError::Api(status_text(status)).into());
        }

        Ok(response)
    }
}

/// Human-readable status text, matching what a browser reports
fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(|r| r.to_string())
        .unwrap_or_else(|| status.to_string())
}
