//! External generation capability
//!
//! The hosted language model is injected through [`Generator`]. Callers in the
//! core never let a capability failure escape: batch generation degrades to an
//! empty batch, suggestions to a placeholder and simulated replies to a local
//! fallback line.

pub mod gemini;
pub mod offline;
pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::FlowError;
use crate::models::step::{Position, Step, StepType};
use crate::sim::session::Message;

/// Title returned when a suggestion cannot be produced
pub const SUGGESTION_ERROR_TITLE: &str = "Erro na Sugestão";
/// Description returned when a suggestion cannot be produced
pub const SUGGESTION_ERROR_DESCRIPTION: &str = "Configuração manual necessária.";
/// Title returned when the capability answers with nothing
pub const SUGGESTION_EMPTY_TITLE: &str = "Novo Passo";
/// Description returned when the capability answers with nothing
pub const SUGGESTION_EMPTY_DESCRIPTION: &str = "Configurado automaticamente";

/// Step-like record produced by batch generation, not yet validated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateStep {
    pub id: String,

    /// Raw type tag, validated against [`StepType`] on conversion
    #[serde(rename = "type")]
    pub step_type: String,

    pub title: String,

    pub description: String,

    pub x: f64,

    pub y: f64,

    #[serde(default)]
    pub config: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_step_id: Option<String>,
}

impl TryFrom<CandidateStep> for Step {
    type Error = FlowError;

    fn try_from(candidate: CandidateStep) -> Result<Self, Self::Error> {
        let step_type: StepType = candidate.step_type.parse()?;
        Ok(Step {
            id: candidate.id,
            step_type,
            title: candidate.title,
            description: candidate.description,
            position: Position::new(candidate.x, candidate.y),
            config: candidate.config,
            next_step_id: candidate.next_step_id.filter(|id| !id.is_empty()),
            branches: Vec::new(),
        })
    }
}

/// Title and description proposed for a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSuggestion {
    pub title: String,
    pub description: String,
}

impl StepSuggestion {
    pub fn failed() -> Self {
        Self {
            title: SUGGESTION_ERROR_TITLE.to_string(),
            description: SUGGESTION_ERROR_DESCRIPTION.to_string(),
        }
    }

    pub fn empty() -> Self {
        Self {
            title: SUGGESTION_EMPTY_TITLE.to_string(),
            description: SUGGESTION_EMPTY_DESCRIPTION.to_string(),
        }
    }
}

/// Everything the capability needs to voice one step of a simulation
#[derive(Debug, Clone)]
pub struct ReplyRequest {
    pub automation_name: String,
    pub step_type: StepType,
    pub step_title: String,
    pub step_description: String,
    /// Configured settings of the step, when any are worth mentioning
    pub step_details: Option<String>,
    /// Conversation so far, excluding `user_input`
    pub transcript: Vec<Message>,
    pub user_input: String,
}

/// Generation capability (a hosted language model, or a stand-in)
#[async_trait]
pub trait Generator: Send + Sync {
    /// Draft a batch of steps from a natural-language intent
    async fn generate_steps(&self, intent: &str) -> Result<Vec<CandidateStep>, FlowError>;

    /// Propose a title and description; `Ok(None)` when the answer was empty
    async fn suggest_step(
        &self,
        step_type: StepType,
        context: &str,
    ) -> Result<Option<StepSuggestion>, FlowError>;

    /// Produce the bot's reply for the step being executed
    async fn simulate_reply(&self, request: &ReplyRequest) -> Result<String, FlowError>;

    /// Short name for logs
    fn name(&self) -> &str;
}

/// Ask for a title/description pair, never failing
pub async fn suggest_step_content(
    generator: &dyn Generator,
    step_type: StepType,
    context: &str,
) -> StepSuggestion {
    match generator.suggest_step(step_type, context).await {
        Ok(Some(suggestion)) => suggestion,
        Ok(None) => {
            debug!("{} returned an empty suggestion for {}", generator.name(), step_type);
            StepSuggestion::empty()
        }
        Err(e) => {
            warn!("Suggestion for {} failed on {}: {}", step_type, generator.name(), e);
            StepSuggestion::failed()
        }
    }
}

/// Parse a model answer into candidate steps.
///
/// Anything but a JSON array is an error; array members that do not have the
/// candidate shape are skipped.
pub fn parse_step_batch(text: &str) -> Result<Vec<CandidateStep>, FlowError> {
    let text = strip_code_fence(text);
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(text)?;
    let Value::Array(items) = value else {
        return Err(FlowError::Capability("step batch is not a JSON array".to_string()));
    };

    let mut candidates = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<CandidateStep>(item) {
            Ok(candidate) => candidates.push(candidate),
            Err(e) => warn!("Skipping malformed generated step: {}", e),
        }
    }
    Ok(candidates)
}

/// Models sometimes wrap JSON in a markdown fence despite the mime type
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
