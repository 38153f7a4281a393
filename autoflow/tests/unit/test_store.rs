//! Workspace persistence tests

mod common;

use std::sync::Arc;

use autoflow::graph::set_next_step;
use autoflow::models::step::StepType;
use autoflow::models::workspace::Workspace;
use autoflow::storage::blob::{BlobStore, FileBlobStore, MemoryBlobStore};
use autoflow::storage::store::{WorkspaceStore, WORKSPACE_KEY};
use common::automation;

fn rich_workspace() -> Workspace {
    let mut workspace = Workspace::demo();
    let client_id = workspace.add_client("Acme").unwrap();
    workspace
        .add_tool_server(&client_id, "Orders", "https://orders.acme.test/mcp")
        .unwrap();

    let mut flow = automation(&[
        ("a", StepType::Trigger, Some("b")),
        ("b", StepType::ExternalTool, None),
        ("c", StepType::End, None),
    ]);
    flow.steps[1]
        .config
        .insert("mcpCommand".into(), serde_json::json!("lookup_order"));
    let flow = set_next_step(&flow, "b", Some("c")).unwrap();
    workspace.clients[1].automations.push(flow);
    workspace
}

#[tokio::test]
async fn test_roundtrip_is_identical() {
    let store = WorkspaceStore::new(Arc::new(MemoryBlobStore::new()));
    let workspace = rich_workspace();

    store.save(&workspace).await.unwrap();
    let loaded = store.load().await;

    assert_eq!(loaded, workspace);
}

#[tokio::test]
async fn test_roundtrip_on_disk() {
    let dir = std::env::temp_dir().join(format!("autoflow-store-{}", uuid::Uuid::new_v4()));
    let store = WorkspaceStore::new(Arc::new(FileBlobStore::new(&dir)));
    let workspace = rich_workspace();

    store.save(&workspace).await.unwrap();
    assert_eq!(store.try_load().await.unwrap(), workspace);

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_corrupt_blob_falls_back_to_demo() {
    for blob in ["not json", "{\"clients\": 3}", "[]", ""] {
        let store = WorkspaceStore::new(Arc::new(MemoryBlobStore::with_blob(WORKSPACE_KEY, blob)));
        let workspace = store.load().await;
        assert_eq!(workspace.clients.len(), 1, "blob {:?}", blob);
        assert_eq!(workspace.clients[0].automations[0].id, "a1");
    }
}

#[tokio::test]
async fn test_legacy_blob_loads() {
    let blob = r#"{"clients":[{"id":"c1","name":"Legacy","email":"","mcpServers":[],
        "automations":[{"id":"a1","name":"Old","description":"","isActive":true,
        "updatedAt":"2024-05-01T10:00:00.000Z","steps":[
            {"id":"s1","type":"CHATGURU_TRIGGER","title":"Hi","description":"d","x":100,"y":250,"config":{},"nextStepId":"s2"},
            {"id":"s2","type":"MCP_TOOL","title":"Stock","description":"d","x":400,"y":250,"config":{"mcpCommand":"stock"}}
        ]}]}]}"#;
    let store = WorkspaceStore::new(Arc::new(MemoryBlobStore::with_blob(WORKSPACE_KEY, blob)));

    let workspace = store.try_load().await.unwrap();
    let automation = workspace.automation("c1", "a1").unwrap();
    assert_eq!(automation.steps[0].step_type, StepType::Trigger);
    assert_eq!(automation.steps[1].step_type, StepType::ExternalTool);
    assert_eq!(automation.chain().len(), 2);
}

#[tokio::test]
async fn test_dangling_links_repaired_on_load() {
    let blob = r#"{"clients":[{"id":"c1","name":"X","automations":[{"id":"a1","name":"F",
        "updatedAt":"2024-05-01T10:00:00.000Z","steps":[
            {"id":"s1","type":"TRIGGER","title":"t","description":"d","x":0,"y":0,"nextStepId":"gone"}
        ]}]}]}"#;
    let blobs = Arc::new(MemoryBlobStore::with_blob(WORKSPACE_KEY, blob));
    let store = WorkspaceStore::new(blobs.clone());

    let workspace = store.try_load().await.unwrap();
    let step = &workspace.automation("c1", "a1").unwrap().steps[0];
    assert!(step.next_step_id.is_none());
    // The stored blob is only rewritten on the next save
    assert!(blobs.get(WORKSPACE_KEY).await.unwrap().unwrap().contains("gone"));
}
