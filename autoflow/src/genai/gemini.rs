//! Gemini `generateContent` client

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use crate::errors::FlowError;
use crate::genai::{prompts, parse_step_batch, CandidateStep, Generator, ReplyRequest, StepSuggestion};
use crate::models::step::StepType;
use crate::storage::settings::GeneratorSettings;

/// HTTP client for the hosted model
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
    architect_model: String,
    suggestion_model: String,
    simulation_model: String,
}

impl GeminiClient {
    /// Create a client; fails when no API key is configured
    pub fn new(settings: &GeneratorSettings) -> Result<Self, FlowError> {
        let api_key = settings
            .resolve_api_key()
            .ok_or_else(|| FlowError::ConfigError("no Gemini API key configured".to_string()))?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key,
            architect_model: settings.architect_model.clone(),
            suggestion_model: settings.suggestion_model.clone(),
            simulation_model: settings.simulation_model.clone(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run one `generateContent` call and return the concatenated text parts
    async fn generate_content(
        &self,
        model: &str,
        prompt: String,
        response_schema: Option<Value>,
    ) -> Result<String, FlowError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        debug!("POST {}", url);

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: response_schema.map(|schema| GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema,
            }),
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Gemini request failed: {} - {}", status, body);
            return Err(FlowError::Capability(format!("{}: {}", status, body)));
        }

        let body: GenerateContentResponse = response.json().await?;
        Ok(body.text())
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate_steps(&self, intent: &str) -> Result<Vec<CandidateStep>, FlowError> {
        let text = self
            .generate_content(
                &self.architect_model,
                prompts::step_batch_prompt(intent),
                Some(prompts::step_batch_schema()),
            )
            .await?;
        parse_step_batch(&text)
    }

    async fn suggest_step(
        &self,
        step_type: StepType,
        context: &str,
    ) -> Result<Option<StepSuggestion>, FlowError> {
        let text = self
            .generate_content(
                &self.suggestion_model,
                prompts::suggestion_prompt(step_type, context),
                Some(prompts::suggestion_schema()),
            )
            .await?;

        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(text)?))
    }

    async fn simulate_reply(&self, request: &ReplyRequest) -> Result<String, FlowError> {
        self.generate_content(&self.simulation_model, prompts::reply_prompt(request), None)
            .await
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, empty when there is none
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}
