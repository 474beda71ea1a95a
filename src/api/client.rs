use super::messages::{HealthResponse, NextRequest, NextResponse, StartResponse};
use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::session::SessionForm;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

/// The two interview endpoints plus the health probe
///
/// Implementations:
/// - `HttpInterviewApi`: the real backend over HTTP
/// - test doubles in `tests/` that script responses
#[async_trait::async_trait]
pub trait InterviewApi: Send + Sync {
    /// Create a session from the setup form
    async fn start(&self, form: &SessionForm) -> Result<StartResponse, ApiError>;

    /// Send the candidate's answer and fetch the interviewer's next move
    async fn next(&self, request: &NextRequest) -> Result<NextResponse, ApiError>;

    /// Check whether the backend is up
    async fn health(&self) -> Result<HealthResponse, ApiError>;
}

/// reqwest-backed client for the interview backend
#[derive(Clone)]
pub struct HttpInterviewApi {
    client: Client,
    base_url: String,
}

impl HttpInterviewApi {
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn start_form(form: &SessionForm) -> Result<Form, ApiError> {
        let mut multipart = Form::new()
            .text("role", form.role.as_str())
            .text("persona", form.persona.as_str())
            .text("name", form.full_name.clone())
            .text("email", form.email.clone());

        if let Some(resume) = &form.resume {
            let part = Part::text(resume.raw_text.clone())
                .file_name(resume.filename.clone())
                .mime_str("text/plain")?;
            multipart = multipart.part("resume", part);
        }

        Ok(multipart)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait::async_trait]
impl InterviewApi for HttpInterviewApi {
    async fn start(&self, form: &SessionForm) -> Result<StartResponse, ApiError> {
        info!(
            "Starting {} interview ({} persona) for {}",
            form.role.as_str(),
            form.persona.as_str(),
            form.email
        );

        let response = self
            .client
            .post(self.url("/api/start"))
            .multipart(Self::start_form(form)?)
            .send()
            .await?;

        let started: StartResponse = Self::decode(response).await?;
        info!("Session {} created", started.session_id);
        Ok(started)
    }

    async fn next(&self, request: &NextRequest) -> Result<NextResponse, ApiError> {
        debug!(
            "POST /api/next session={} chars={}",
            request.session_id,
            request.user_text.len()
        );

        let response = self
            .client
            .post(self.url("/api/next"))
            .json(request)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        let response = self.client.get(self.url("/api/health")).send().await?;
        Self::decode(response).await
    }
}
