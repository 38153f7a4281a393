//! Typed per-type view over a step's open config map
//!
//! The persisted form stays an untyped map (any step may carry any key).
//! `StepParams` reads only the keys that matter for the step's own type, with
//! defaults for anything missing or of the wrong shape.

use serde_json::{Map, Value};

use crate::models::step::{Step, StepType, Tier, MODEL_TIER_KEY};

/// Configuration relevant to one step type
#[derive(Debug, Clone, PartialEq)]
pub enum StepParams {
    Trigger,
    TextReply {
        tier: Tier,
        message: Option<String>,
    },
    InteractiveButtons {
        tier: Tier,
        buttons: Vec<String>,
    },
    TagManage {
        tags: Vec<String>,
    },
    HumanHandoff {
        team: Option<String>,
    },
    Condition {
        tier: Tier,
        expression: Option<String>,
    },
    ApiCall {
        url: Option<String>,
        method: String,
    },
    ExternalTool {
        command: Option<String>,
        endpoint: Option<String>,
    },
    AiAgent {
        tier: Tier,
        prompt: Option<String>,
    },
    Delay {
        seconds: u64,
    },
    End,
}

impl StepParams {
    pub fn from_step(step: &Step) -> Self {
        let config = &step.config;
        let tier = tier_of(config).unwrap_or_else(|| step.step_type.default_tier());

        match step.step_type {
            StepType::Trigger => StepParams::Trigger,
            StepType::TextReply => StepParams::TextReply {
                tier,
                message: string_of(config, "message"),
            },
            StepType::InteractiveButtons => StepParams::InteractiveButtons {
                tier,
                buttons: strings_of(config, "buttons"),
            },
            StepType::TagManage => StepParams::TagManage {
                tags: strings_of(config, "tags"),
            },
            StepType::HumanHandoff => StepParams::HumanHandoff {
                team: string_of(config, "team"),
            },
            StepType::Condition => StepParams::Condition {
                tier,
                expression: string_of(config, "expression"),
            },
            StepType::ApiCall => StepParams::ApiCall {
                url: string_of(config, "url"),
                method: string_of(config, "method").unwrap_or_else(|| "GET".to_string()),
            },
            StepType::ExternalTool => StepParams::ExternalTool {
                command: string_of(config, "mcpCommand"),
                endpoint: string_of(config, "mcpEndpoint"),
            },
            StepType::AiAgent => StepParams::AiAgent {
                tier,
                prompt: string_of(config, "prompt"),
            },
            StepType::Delay => StepParams::Delay {
                seconds: config.get("seconds").and_then(|v| v.as_u64()).unwrap_or(0),
            },
            StepType::End => StepParams::End,
        }
    }

    /// One-line summary of the configured settings, if there are any worth
    /// surfacing to the generation capability
    pub fn summary(&self) -> Option<String> {
        match self {
            StepParams::TextReply {
                message: Some(message),
                ..
            } => Some(format!("message: {}", message)),
            StepParams::InteractiveButtons { buttons, .. } if !buttons.is_empty() => {
                Some(format!("buttons: {}", buttons.join(", ")))
            }
            StepParams::TagManage { tags } if !tags.is_empty() => {
                Some(format!("tags: {}", tags.join(", ")))
            }
            StepParams::HumanHandoff { team: Some(team) } => Some(format!("team: {}", team)),
            StepParams::Condition {
                expression: Some(expression),
                ..
            } => Some(format!("condition: {}", expression)),
            StepParams::ApiCall {
                url: Some(url),
                method,
            } => Some(format!("{} {}", method, url)),
            StepParams::ExternalTool { command, endpoint } => {
                match (command.as_deref(), endpoint.as_deref()) {
                    (Some(c), Some(e)) => Some(format!("tool command: {} at {}", c, e)),
                    (Some(c), None) => Some(format!("tool command: {}", c)),
                    (None, Some(e)) => Some(format!("tool endpoint: {}", e)),
                    (None, None) => None,
                }
            }
            StepParams::AiAgent {
                prompt: Some(prompt),
                ..
            } => Some(format!("agent instructions: {}", prompt)),
            StepParams::Delay { seconds } if *seconds > 0 => {
                Some(format!("wait {} seconds", seconds))
            }
            _ => None,
        }
    }
}

fn tier_of(config: &Map<String, Value>) -> Option<Tier> {
    config
        .get(MODEL_TIER_KEY)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

fn string_of(config: &Map<String, Value>, key: &str) -> Option<String> {
    config
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn strings_of(config: &Map<String, Value>, key: &str) -> Vec<String> {
    match config.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
