//! Workspace persistence over a blob store

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::errors::FlowError;
use crate::graph::integrity::{duplicate_ids, repair_links};
use crate::models::workspace::Workspace;
use crate::storage::blob::BlobStore;

/// Key of the single persisted workspace blob
pub const WORKSPACE_KEY: &str = "autoflow_workspace_v2";

/// Loads and saves the whole workspace document
#[derive(Clone)]
pub struct WorkspaceStore {
    blobs: Arc<dyn BlobStore>,
    key: String,
}

impl WorkspaceStore {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self::with_key(blobs, WORKSPACE_KEY)
    }

    pub fn with_key(blobs: Arc<dyn BlobStore>, key: impl Into<String>) -> Self {
        Self {
            blobs,
            key: key.into(),
        }
    }

    /// Load the workspace, substituting the demo workspace when the blob is
    /// missing, unreadable or structurally invalid
    pub async fn load(&self) -> Workspace {
        match self.try_load().await {
            Ok(workspace) => workspace,
            Err(e) => {
                warn!("Workspace state reset to demo: {}", e);
                Workspace::demo()
            }
        }
    }

    /// Load without the demo fallback
    pub async fn try_load(&self) -> Result<Workspace, FlowError> {
        let blob = self
            .blobs
            .get(&self.key)
            .await?
            .ok_or_else(|| FlowError::PersistedStateCorrupt(format!("no blob under {}", self.key)))?;

        let mut workspace = decode(&blob)?;
        repair(&mut workspace);
        debug!("Loaded workspace with {} clients", workspace.clients.len());
        Ok(workspace)
    }

    /// Persist the whole workspace snapshot
    pub async fn save(&self, workspace: &Workspace) -> Result<(), FlowError> {
        let blob = serde_json::to_string(workspace)?;
        self.blobs.put(&self.key, &blob).await?;
        debug!("Saved workspace ({} bytes)", blob.len());
        Ok(())
    }
}

fn decode(blob: &str) -> Result<Workspace, FlowError> {
    serde_json::from_str(blob).map_err(|e| FlowError::PersistedStateCorrupt(e.to_string()))
}

/// Clear links that do not resolve
fn repair(workspace: &mut Workspace) {
    for client in workspace.clients.iter_mut() {
        for automation in client.automations.iter_mut() {
            let duplicates = duplicate_ids(automation);
            if !duplicates.is_empty() {
                warn!("Automation {} has duplicate step ids: {:?}", automation.id, duplicates);
            }
            for link in repair_links(automation) {
                info!(
                    "Cleared dangling link {} -> {} in automation {}",
                    link.from, link.to, automation.id
                );
            }
        }
    }
}
