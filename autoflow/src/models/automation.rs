//! Automation models

use serde::{Deserialize, Serialize};

use crate::models::step::Step;
use crate::utils::{generate_id, now_rfc3339};

/// A named set of steps forming one or more chains.
///
/// `steps` order is display order; execution order follows `next_step_id`
/// links from the trigger step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Automation {
    /// Unique automation ID
    pub id: String,

    /// Automation name
    pub name: String,

    /// Automation description
    #[serde(default)]
    pub description: String,

    /// Steps in display order
    #[serde(default)]
    pub steps: Vec<Step>,

    /// Whether the automation is enabled
    #[serde(default)]
    pub is_active: bool,

    /// Last modification (RFC 3339)
    pub updated_at: String,
}

impl Automation {
    /// Create an empty, active automation
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id("a"),
            name: name.into(),
            description: "New automation.".to_string(),
            steps: Vec::new(),
            is_active: true,
            updated_at: now_rfc3339(),
        }
    }

    pub fn step(&self, step_id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    pub fn contains(&self, step_id: &str) -> bool {
        self.step(step_id).is_some()
    }

    /// Entry point of the chain: the first trigger step in display order
    pub fn trigger(&self) -> Option<&Step> {
        self.steps.iter().find(|s| s.is_trigger())
    }

    /// Steps reachable from the trigger by following links, stopping at the
    /// first repeated step
    pub fn chain(&self) -> Vec<&Step> {
        let mut chain: Vec<&Step> = Vec::new();
        let mut cursor = self.trigger();
        while let Some(step) = cursor {
            if chain.iter().any(|s| s.id == step.id) {
                break;
            }
            chain.push(step);
            cursor = step.next_step_id.as_deref().and_then(|id| self.step(id));
        }
        chain
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = now_rfc3339();
    }
}
