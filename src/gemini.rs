use crate::error::QaError;
use crate::model::{LanguageModel, ModelError};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Configuration for Gemini API
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub generate_url: String,
}

impl GeminiConfig {
    /// Create a new configuration from environment variables
    pub fn from_env() -> Result<Self, QaError> {
        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| QaError::Configuration("GEMINI_API_KEY not set".to_string()))?;
        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        // Default URL if not specified
        let generate_url = env::var("GEMINI_GENERATE_URL")
            .unwrap_or_else(|_| format!("{}/{}:generateContent", API_BASE_URL, model));

        Ok(GeminiConfig {
            api_key,
            model,
            generate_url,
        })
    }
}

/// Client for interacting with Gemini API
#[derive(Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(config: GeminiConfig) -> Self {
        let client = reqwest::Client::new();
        GeminiClient { config, client }
    }

    /// Generate text using the configured Gemini model
    pub async fn generate_text(
        &self,
        prompt: &str,
        temperature: f32,
        top_p: f32,
        top_k: i32,
        max_output_tokens: i32,
    ) -> Result<String, ModelError> {
        let request = GenerateRequest {
            model: format!("models/{}", self.config.model),
            contents: vec![Content::new_with_role(prompt, "user")],
            generation_config: GenerationConfig {
                temperature,
                top_p,
                top_k,
                max_output_tokens,
            },
        };

        // Key stays out of the URL: reqwest errors print the request URL
        let response = self
            .client
            .post(&self.config.generate_url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::Http(e.without_url()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ModelError::Api { status, body });
        }

        let response_data: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Http(e.without_url()))?;
        debug!(
            "Gemini returned {} candidate(s)",
            response_data.candidates.len()
        );

        extract_text(response_data)
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        self.generate_text(prompt, 0.2, 0.8, 40, 1024).await
    }
}

/// Concatenate the text parts of the first candidate
fn extract_text(response: GenerateResponse) -> Result<String, ModelError> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(ModelError::EmptyResponse);
    }
    Ok(text)
}

// Request/response structures for the generateContent API

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: String,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
    role: &'static str,
}

impl<'a> Content<'a> {
    fn new_with_role(text: &'a str, role: &'static str) -> Self {
        Content {
            parts: vec![Part { text }],
            role,
        }
    }
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: i32,
    max_output_tokens: i32,
}

#[derive(Deserialize, Debug)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    // Absent when the candidate was blocked by safety filters
    content: Option<ResponseContent>,
}

#[derive(Deserialize, Debug)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
}
