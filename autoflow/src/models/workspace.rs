//! Workspace models: clients, their automations and tool-server descriptors

use serde::{Deserialize, Serialize};

use crate::errors::FlowError;
use crate::models::automation::Automation;
use crate::models::step::{Position, Step, StepType};
use crate::utils::{generate_id, now_rfc3339};

/// Connectivity status of a tool server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolServerStatus {
    Connected,
    Error,
}

/// Passive descriptor of an external tool server. Never executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolServer {
    pub id: String,
    pub name: String,
    pub url: String,
    pub status: ToolServerStatus,
}

/// A named owner of automations and tool servers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Unique client ID
    pub id: String,

    /// Client / company name
    pub name: String,

    /// Contact email
    #[serde(default)]
    pub email: String,

    /// Automations owned by the client
    #[serde(default)]
    pub automations: Vec<Automation>,

    /// Tool servers registered for the client
    #[serde(default, rename = "mcpServers")]
    pub tool_servers: Vec<ToolServer>,
}

impl Client {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id("c"),
            name: name.into(),
            email: String::new(),
            automations: Vec::new(),
            tool_servers: Vec::new(),
        }
    }

    pub fn automation(&self, automation_id: &str) -> Option<&Automation> {
        self.automations.iter().find(|a| a.id == automation_id)
    }
}

/// The persisted document: `{ clients: [...] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub clients: Vec<Client>,
}

impl Workspace {
    /// Built-in demo workspace: one client, one automation, one trigger
    pub fn demo() -> Self {
        let mut trigger = Step::with_id("s1", StepType::Trigger, Position::new(100.0, 250.0));
        trigger.title = "Hello!".to_string();
        trigger.description = "Start of the conversation".to_string();
        trigger.config.clear();

        Self {
            clients: vec![Client {
                id: "c1".to_string(),
                name: "Demo Workspace".to_string(),
                email: "demo@autoflow.dev".to_string(),
                automations: vec![Automation {
                    id: "a1".to_string(),
                    name: "Welcome Flow".to_string(),
                    description: "Starter automation".to_string(),
                    steps: vec![trigger],
                    is_active: true,
                    updated_at: now_rfc3339(),
                }],
                tool_servers: vec![ToolServer {
                    id: "mcp1".to_string(),
                    name: "Local Inventory".to_string(),
                    url: "http://localhost:3001".to_string(),
                    status: ToolServerStatus::Connected,
                }],
            }],
        }
    }

    pub fn client(&self, client_id: &str) -> Result<&Client, FlowError> {
        self.clients
            .iter()
            .find(|c| c.id == client_id)
            .ok_or_else(|| FlowError::ClientNotFound(client_id.to_string()))
    }

    fn client_mut(&mut self, client_id: &str) -> Result<&mut Client, FlowError> {
        self.clients
            .iter_mut()
            .find(|c| c.id == client_id)
            .ok_or_else(|| FlowError::ClientNotFound(client_id.to_string()))
    }

    pub fn automation(&self, client_id: &str, automation_id: &str) -> Result<&Automation, FlowError> {
        self.client(client_id)?
            .automation(automation_id)
            .ok_or_else(|| FlowError::AutomationNotFound(automation_id.to_string()))
    }

    /// Add a client and return its id
    pub fn add_client(&mut self, name: &str) -> Result<String, FlowError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FlowError::ValidationError("client name is empty".to_string()));
        }
        let client = Client::new(name);
        let id = client.id.clone();
        self.clients.push(client);
        Ok(id)
    }

    /// Add an empty automation to a client and return its id
    pub fn add_automation(&mut self, client_id: &str, name: &str) -> Result<String, FlowError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FlowError::ValidationError("automation name is empty".to_string()));
        }
        let client = self.client_mut(client_id)?;
        let automation = Automation::new(name);
        let id = automation.id.clone();
        client.automations.push(automation);
        Ok(id)
    }

    /// Register a tool-server descriptor; the URL must be absolute
    pub fn add_tool_server(&mut self, client_id: &str, name: &str, url: &str) -> Result<String, FlowError> {
        let parsed = url::Url::parse(url)
            .map_err(|e| FlowError::ValidationError(format!("invalid tool server url {}: {}", url, e)))?;
        let client = self.client_mut(client_id)?;
        let server = ToolServer {
            id: generate_id("mcp"),
            name: name.trim().to_string(),
            url: parsed.to_string(),
            status: ToolServerStatus::Connected,
        };
        let id = server.id.clone();
        client.tool_servers.push(server);
        Ok(id)
    }

    /// Swap in a new snapshot of an existing automation
    pub fn replace_automation(&mut self, client_id: &str, automation: Automation) -> Result<(), FlowError> {
        let client = self.client_mut(client_id)?;
        let slot = client
            .automations
            .iter_mut()
            .find(|a| a.id == automation.id)
            .ok_or_else(|| FlowError::AutomationNotFound(automation.id.clone()))?;
        *slot = automation;
        Ok(())
    }
}
