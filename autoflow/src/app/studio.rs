//! Studio: the interactive surface over one workspace
//!
//! Every edit is applied to a fresh automation snapshot by the graph mutator,
//! swapped into the workspace, and the whole workspace is persisted.

use std::sync::Arc;

use tracing::{error, info};

use crate::errors::FlowError;
use crate::genai::{suggest_step_content, Generator, StepSuggestion};
use crate::graph;
use crate::models::automation::Automation;
use crate::models::step::{Position, StepPatch, StepType, DEFAULT_POSITION};
use crate::models::workspace::Workspace;
use crate::sim::session::{SimulationOptions, SimulationSession};
use crate::storage::store::WorkspaceStore;

/// Workspace editor with persistence and an injected generator
pub struct Studio {
    store: WorkspaceStore,
    workspace: Workspace,
    generator: Arc<dyn Generator>,
    simulation: SimulationOptions,
}

impl Studio {
    /// Load the workspace from `store` (demo workspace when unusable)
    pub async fn open(store: WorkspaceStore, generator: Arc<dyn Generator>, simulation: SimulationOptions) -> Self {
        let workspace = store.load().await;
        info!(
            "Opened workspace with {} clients using the {} generator",
            workspace.clients.len(),
            generator.name()
        );
        Self {
            store,
            workspace,
            generator,
            simulation,
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn automation(&self, client_id: &str, automation_id: &str) -> Result<&Automation, FlowError> {
        self.workspace.automation(client_id, automation_id)
    }

    pub async fn add_client(&mut self, name: &str) -> Result<String, FlowError> {
        let id = self.workspace.add_client(name)?;
        info!("Added client {} ({})", name.trim(), id);
        self.persist().await;
        Ok(id)
    }

    pub async fn add_automation(&mut self, client_id: &str, name: &str) -> Result<String, FlowError> {
        let id = self.workspace.add_automation(client_id, name)?;
        info!("Added automation {} ({}) to {}", name.trim(), id, client_id);
        self.persist().await;
        Ok(id)
    }

    pub async fn add_tool_server(&mut self, client_id: &str, name: &str, url: &str) -> Result<String, FlowError> {
        let id = self.workspace.add_tool_server(client_id, name, url)?;
        self.persist().await;
        Ok(id)
    }

    /// Add a step and return its id
    pub async fn add_step(
        &mut self,
        client_id: &str,
        automation_id: &str,
        step_type: &str,
        position: Option<Position>,
    ) -> Result<String, FlowError> {
        let position = position.unwrap_or(DEFAULT_POSITION);
        let next = self.apply(client_id, automation_id, |a| graph::add_step(a, step_type, position)).await?;
        next.steps
            .last()
            .map(|s| s.id.clone())
            .ok_or_else(|| FlowError::Internal("added step missing".to_string()))
    }

    pub async fn update_step(
        &mut self,
        client_id: &str,
        automation_id: &str,
        step_id: &str,
        patch: &StepPatch,
    ) -> Result<(), FlowError> {
        self.apply(client_id, automation_id, |a| graph::update_step(a, step_id, patch))
            .await
            .map(|_| ())
    }

    pub async fn move_step(
        &mut self,
        client_id: &str,
        automation_id: &str,
        step_id: &str,
        position: Position,
    ) -> Result<(), FlowError> {
        self.apply(client_id, automation_id, |a| graph::move_step(a, step_id, position))
            .await
            .map(|_| ())
    }

    pub async fn delete_step(&mut self, client_id: &str, automation_id: &str, step_id: &str) -> Result<(), FlowError> {
        self.apply(client_id, automation_id, |a| Ok(graph::delete_step(a, step_id)))
            .await
            .map(|_| ())
    }

    pub async fn set_next_step(
        &mut self,
        client_id: &str,
        automation_id: &str,
        from_id: &str,
        to_id: Option<&str>,
    ) -> Result<(), FlowError> {
        self.apply(client_id, automation_id, |a| graph::set_next_step(a, from_id, to_id))
            .await
            .map(|_| ())
    }

    /// Generate steps from a prompt and append them; returns how many were added
    pub async fn generate_steps(&mut self, client_id: &str, automation_id: &str, prompt: &str) -> Result<usize, FlowError> {
        // Fail fast on a bad target before spending a capability call
        self.workspace.automation(client_id, automation_id)?;

        let steps = graph::generate_from_prompt(self.generator.as_ref(), prompt).await;
        let count = steps.len();
        if count == 0 {
            return Ok(0);
        }
        self.apply(client_id, automation_id, |a| Ok(graph::append_steps(a, steps)))
            .await?;
        Ok(count)
    }

    /// Title/description suggestion for a step type
    pub async fn suggest_step_content(&self, step_type: StepType, context: &str) -> StepSuggestion {
        suggest_step_content(self.generator.as_ref(), step_type, context).await
    }

    /// Start a simulation over the current snapshot of an automation
    pub fn open_simulation(&self, client_id: &str, automation_id: &str) -> Result<SimulationSession, FlowError> {
        let automation = self.workspace.automation(client_id, automation_id)?.clone();
        Ok(SimulationSession::new(
            automation,
            self.generator.clone(),
            self.simulation.clone(),
        ))
    }

    async fn apply<F>(&mut self, client_id: &str, automation_id: &str, mutate: F) -> Result<Automation, FlowError>
    where
        F: FnOnce(&Automation) -> Result<Automation, FlowError>,
    {
        let current = self.workspace.automation(client_id, automation_id)?;
        let next = mutate(current)?;
        if &next == current {
            return Ok(next);
        }
        self.workspace.replace_automation(client_id, next.clone())?;
        self.persist().await;
        Ok(next)
    }

    /// Storage failures are logged and the in-memory workspace kept
    async fn persist(&self) {
        if let Err(e) = self.store.save(&self.workspace).await {
            error!("Failed to persist workspace: {}", e);
        }
    }
}
