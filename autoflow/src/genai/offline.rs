//! Generator used when no model is configured

use async_trait::async_trait;

use crate::errors::FlowError;
use crate::genai::{CandidateStep, Generator, ReplyRequest, StepSuggestion};
use crate::models::step::StepType;

/// Always fails, so every caller takes its deterministic fallback
#[derive(Debug, Clone, Default)]
pub struct OfflineGenerator;

#[async_trait]
impl Generator for OfflineGenerator {
    async fn generate_steps(&self, _intent: &str) -> Result<Vec<CandidateStep>, FlowError> {
        Err(FlowError::Capability("offline".to_string()))
    }

    async fn suggest_step(
        &self,
        _step_type: StepType,
        _context: &str,
    ) -> Result<Option<StepSuggestion>, FlowError> {
        Err(FlowError::Capability("offline".to_string()))
    }

    async fn simulate_reply(&self, _request: &ReplyRequest) -> Result<String, FlowError> {
        Err(FlowError::Capability("offline".to_string()))
    }

    fn name(&self) -> &str {
        "offline"
    }
}
