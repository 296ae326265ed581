use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

use crate::error::{GenError, GenResult};
use crate::models::{GenerateRequest, GenerateResponse};

/// Default endpoint for the Gemini API
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Seam between the client and a concrete model API
#[async_trait]
pub trait Provider: Send + Sync {
    fn id(&self) -> &'static str;
    async fn generate(&self, req: &GenerateRequest) -> GenResult<GenerateResponse>;
}

/// Google Gemini generateContent provider
pub struct GeminiProvider {
    pub api_key: String,
    pub api_base: String,
    pub client: Client,
    pub timeout: Duration,
}

#[async_trait]
impl Provider for GeminiProvider {
    fn id(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, req: &GenerateRequest) -> GenResult<GenerateResponse> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            req.model
        );
        debug!(model = %req.model, %url, "sending generateContent request");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(req)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenError::Timeout(self.timeout)
                } else {
                    GenError::from(e)
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(classify_status(status, body, req.model.as_str()));
        }

        let generate_resp: GenerateResponse = resp.json().await?;
        Ok(generate_resp)
    }
}

fn classify_status(status: StatusCode, body: String, model: &str) -> GenError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenError::Authentication(body),
        StatusCode::NOT_FOUND => GenError::ModelNotFound(model.to_string()),
        StatusCode::TOO_MANY_REQUESTS => GenError::RateLimit(body),
        _ => GenError::UnexpectedStatus(status, body),
    }
}
