//! Step models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::FlowError;
use crate::models::params::StepParams;
use crate::utils::generate_id;

/// Config key holding the intelligence tier of a step
pub const MODEL_TIER_KEY: &str = "modelTier";

/// Placeholder description given to freshly created steps
pub const DEFAULT_DESCRIPTION: &str = "Configure the details of this step.";

/// Canvas position used when the caller has no drop point
pub const DEFAULT_POSITION: Position = Position { x: 400.0, y: 300.0 };

/// Step type (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepType {
    #[serde(alias = "CHATGURU_TRIGGER")]
    Trigger,
    #[serde(alias = "CHATGURU_REPLY")]
    TextReply,
    #[serde(alias = "CHATGURU_BUTTONS")]
    InteractiveButtons,
    #[serde(alias = "CHATGURU_TAG")]
    TagManage,
    #[serde(alias = "CHATGURU_TRANSFER")]
    HumanHandoff,
    Condition,
    ApiCall,
    #[serde(alias = "MCP_TOOL")]
    ExternalTool,
    AiAgent,
    Delay,
    End,
}

impl StepType {
    pub const ALL: [StepType; 11] = [
        StepType::Trigger,
        StepType::TextReply,
        StepType::InteractiveButtons,
        StepType::TagManage,
        StepType::HumanHandoff,
        StepType::Condition,
        StepType::ApiCall,
        StepType::ExternalTool,
        StepType::AiAgent,
        StepType::Delay,
        StepType::End,
    ];

    /// Canonical tag as persisted
    pub fn as_str(&self) -> &'static str {
        match self {
            StepType::Trigger => "TRIGGER",
            StepType::TextReply => "TEXT_REPLY",
            StepType::InteractiveButtons => "INTERACTIVE_BUTTONS",
            StepType::TagManage => "TAG_MANAGE",
            StepType::HumanHandoff => "HUMAN_HANDOFF",
            StepType::Condition => "CONDITION",
            StepType::ApiCall => "API_CALL",
            StepType::ExternalTool => "EXTERNAL_TOOL",
            StepType::AiAgent => "AI_AGENT",
            StepType::Delay => "DELAY",
            StepType::End => "END",
        }
    }

    /// Display label, used as the title of new steps
    pub fn label(&self) -> &'static str {
        match self {
            StepType::Trigger => "WhatsApp Trigger",
            StepType::TextReply => "Text Reply",
            StepType::InteractiveButtons => "Interactive Buttons",
            StepType::TagManage => "Manage Tags",
            StepType::HumanHandoff => "Human Handoff",
            StepType::Condition => "Logic / Filter",
            StepType::ApiCall => "API Integration",
            StepType::ExternalTool => "External Tool",
            StepType::AiAgent => "Cognitive Agent",
            StepType::Delay => "Wait",
            StepType::End => "End Flow",
        }
    }

    /// Default intelligence tier
    pub fn default_tier(&self) -> Tier {
        match self {
            StepType::TextReply | StepType::InteractiveButtons => Tier::Lite,
            StepType::Condition => Tier::Flash,
            StepType::AiAgent => Tier::Pro,
            StepType::ExternalTool => Tier::External,
            StepType::Trigger
            | StepType::TagManage
            | StepType::HumanHandoff
            | StepType::ApiCall
            | StepType::Delay
            | StepType::End => Tier::System,
        }
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepType {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Reuse the serde names so aliases stay in one place
        serde_json::from_value(Value::String(s.trim().to_string()))
            .map_err(|_| FlowError::InvalidType(s.to_string()))
    }
}

/// Intelligence tier attached to a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "System")]
    System,
    #[serde(rename = "LITE")]
    Lite,
    #[serde(rename = "FLASH")]
    Flash,
    #[serde(rename = "PRO")]
    Pro,
    #[serde(rename = "External")]
    External,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::System => "System",
            Tier::Lite => "LITE",
            Tier::Flash => "FLASH",
            Tier::Pro => "PRO",
            Tier::External => "External",
        }
    }
}

/// Canvas position (layout only, no execution meaning)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Conditioned outgoing edge. Carried through persistence, never walked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub condition: String,
    pub next_step_id: String,
}

/// One node of an automation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Unique step ID
    pub id: String,

    /// Step type
    #[serde(rename = "type")]
    pub step_type: StepType,

    /// Display title
    pub title: String,

    /// Display description
    pub description: String,

    /// Canvas position, persisted as top-level `x` / `y`
    #[serde(flatten)]
    pub position: Position,

    /// Type-specific settings
    #[serde(default)]
    pub config: Map<String, Value>,

    /// Outgoing link, absent for terminal steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_step_id: Option<String>,

    /// Conditioned edges (extension point)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<Branch>,
}

impl Step {
    /// Create a step with type-derived defaults and a fresh id
    pub fn new(step_type: StepType, position: Position) -> Self {
        Self::with_id(generate_id("s"), step_type, position)
    }

    /// Create a step with type-derived defaults and the given id
    pub fn with_id(id: impl Into<String>, step_type: StepType, position: Position) -> Self {
        let mut config = Map::new();
        config.insert(
            MODEL_TIER_KEY.to_string(),
            Value::String(step_type.default_tier().as_str().to_string()),
        );

        Self {
            id: id.into(),
            step_type,
            title: step_type.label().to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            position,
            config,
            next_step_id: None,
            branches: Vec::new(),
        }
    }

    pub fn is_trigger(&self) -> bool {
        self.step_type == StepType::Trigger
    }

    /// Typed view over `config` for this step's type
    pub fn params(&self) -> StepParams {
        StepParams::from_step(self)
    }
}

/// Partial update applied by `update_step`.
///
/// Identity and type are not part of the patch; unknown fields such as `id`
/// or `type` in a deserialized patch are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepPatch {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Canvas coordinates, flat like the persisted step; each may be set alone
    #[serde(default)]
    pub x: Option<f64>,

    #[serde(default)]
    pub y: Option<f64>,

    /// Keys merged into `config`; a `null` value removes the key
    #[serde(default)]
    pub config: Option<Map<String, Value>>,

    /// `Some(None)` clears the link, `Some(Some(id))` rewires it
    #[serde(default, with = "double_option")]
    pub next_step_id: Option<Option<String>>,
}

impl StepPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.x = Some(position.x);
        self.y = Some(position.y);
        self
    }

    pub fn config_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.config
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
        self
    }

    pub fn next_step(mut self, next: Option<String>) -> Self {
        self.next_step_id = Some(next);
        self
    }
}

/// Distinguishes a missing field from an explicit `null`
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer).map(Some)
    }
}
