use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::types::ModelId;

/// Nucleus sampling cutoff sent with every request
pub const TOP_P: f32 = 0.8;

/// Candidate-token pool size sent with every request
pub const TOP_K: u32 = 40;

/// A piece of message content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// Sampling parameters for the generateContent call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub response_mime_type: String,
}

/// Request body for the generateContent endpoint.
///
/// The model identifier is a URL path segment, not a body field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(skip)]
    pub model: ModelId,
    pub contents: Vec<Content>,
    pub generation_config: SamplingParams,
}

impl GenerateRequest {
    /// Build the request for a compiled prompt, taking the model-call
    /// parameters (temperature, max_tokens) from the config.
    pub fn from_config(config: &GenerationConfig, prompt: impl Into<String>) -> Self {
        Self {
            model: config.model.clone(),
            contents: vec![Content::user(prompt)],
            generation_config: SamplingParams {
                temperature: config.temperature,
                top_p: TOP_P,
                top_k: TOP_K,
                max_output_tokens: config.max_tokens,
                response_mime_type: "text/plain".to_string(),
            },
        }
    }
}

/// One generated candidate
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub index: Option<u32>,
}

/// Token accounting reported by the API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

/// Response body from the generateContent endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    pub model_version: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, if any
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()
            .map(|part| part.text.as_str())
    }
}
