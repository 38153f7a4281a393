//! Shared test helpers

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use autoflow::errors::FlowError;
use autoflow::genai::{CandidateStep, Generator, ReplyRequest, StepSuggestion};
use autoflow::models::automation::Automation;
use autoflow::models::step::{Position, Step, StepType};

/// Generator with canned answers; `None` means "fail"
#[derive(Default)]
pub struct ScriptedGenerator {
    pub batch: Option<Vec<CandidateStep>>,
    pub suggestion: Option<Option<StepSuggestion>>,
    /// Replies are `<prefix> <step title>`
    pub reply_prefix: Option<String>,
    /// Never answer a reply request
    pub hang: bool,
    pub calls: AtomicUsize,
    pub requests: Mutex<Vec<ReplyRequest>>,
}

impl ScriptedGenerator {
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn replying(prefix: &str) -> Self {
        Self {
            reply_prefix: Some(prefix.to_string()),
            ..Default::default()
        }
    }

    pub fn with_batch(batch: Vec<CandidateStep>) -> Self {
        Self {
            batch: Some(batch),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ReplyRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate_steps(&self, _intent: &str) -> Result<Vec<CandidateStep>, FlowError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batch
            .clone()
            .ok_or_else(|| FlowError::Capability("scripted failure".to_string()))
    }

    async fn suggest_step(
        &self,
        _step_type: StepType,
        _context: &str,
    ) -> Result<Option<StepSuggestion>, FlowError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.suggestion
            .clone()
            .ok_or_else(|| FlowError::Capability("scripted failure".to_string()))
    }

    async fn simulate_reply(&self, request: &ReplyRequest) -> Result<String, FlowError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if self.hang {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        match &self.reply_prefix {
            Some(prefix) => Ok(format!("{} {}", prefix, request.step_title).trim().to_string()),
            None => Err(FlowError::Capability("scripted failure".to_string())),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Automation whose steps are given as (id, type, next)
pub fn automation(links: &[(&str, StepType, Option<&str>)]) -> Automation {
    let mut automation = Automation::new("Support Bot");
    for (i, (id, step_type, next)) in links.iter().enumerate() {
        let mut step = Step::with_id(*id, *step_type, Position::new(100.0 * i as f64, 0.0));
        step.title = format!("Title {}", id);
        step.description = format!("Description {}", id);
        step.next_step_id = next.map(str::to_string);
        automation.steps.push(step);
    }
    automation
}

pub fn candidate(id: &str, step_type: &str) -> CandidateStep {
    CandidateStep {
        id: id.to_string(),
        step_type: step_type.to_string(),
        title: format!("Generated {}", id),
        description: "generated".to_string(),
        x: 0.0,
        y: 0.0,
        config: Default::default(),
        next_step_id: None,
    }
}
