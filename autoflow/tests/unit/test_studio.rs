//! Studio tests: edits go through the mutator and are persisted

mod common;

use std::sync::Arc;

use autoflow::app::studio::Studio;
use autoflow::errors::FlowError;
use autoflow::graph::integrity::is_consistent;
use autoflow::models::step::{Position, StepPatch, StepType};
use autoflow::sim::session::SimulationOptions;
use autoflow::storage::blob::MemoryBlobStore;
use autoflow::storage::store::WorkspaceStore;
use common::{candidate, ScriptedGenerator};

async fn studio(generator: ScriptedGenerator) -> (Studio, WorkspaceStore) {
    let store = WorkspaceStore::new(Arc::new(MemoryBlobStore::new()));
    let studio = Studio::open(store.clone(), Arc::new(generator), SimulationOptions::default()).await;
    (studio, store)
}

#[tokio::test]
async fn test_edits_are_persisted() {
    let (mut studio, store) = studio(ScriptedGenerator::failing()).await;

    let client = studio.add_client("Acme").await.unwrap();
    let flow = studio.add_automation(&client, "Orders").await.unwrap();
    let trigger = studio.add_step(&client, &flow, "TRIGGER", None).await.unwrap();
    let reply = studio
        .add_step(&client, &flow, "TEXT_REPLY", Some(Position::new(700.0, 300.0)))
        .await
        .unwrap();
    studio
        .set_next_step(&client, &flow, &trigger, Some(&reply))
        .await
        .unwrap();
    studio
        .update_step(&client, &flow, &reply, &StepPatch::default().title("Thanks"))
        .await
        .unwrap();

    let saved = store.try_load().await.unwrap();
    assert_eq!(&saved, studio.workspace());

    let automation = saved.automation(&client, &flow).unwrap();
    let titles: Vec<&str> = automation.chain().iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["WhatsApp Trigger", "Thanks"]);
}

#[tokio::test]
async fn test_delete_through_studio_repairs_links() {
    let (mut studio, _store) = studio(ScriptedGenerator::failing()).await;
    let reply = studio.add_step("c1", "a1", "TEXT_REPLY", None).await.unwrap();
    studio.set_next_step("c1", "a1", "s1", Some(&reply)).await.unwrap();

    studio.delete_step("c1", "a1", &reply).await.unwrap();

    let automation = studio.automation("c1", "a1").unwrap();
    assert!(automation.step("s1").unwrap().next_step_id.is_none());
    assert!(is_consistent(automation));
}

#[tokio::test]
async fn test_rejected_edit_changes_nothing() {
    let (mut studio, store) = studio(ScriptedGenerator::failing()).await;
    let before = studio.workspace().clone();

    let err = studio.add_step("c1", "a1", "NOPE", None).await.unwrap_err();
    assert!(matches!(err, FlowError::InvalidType(_)));
    let err = studio.set_next_step("c1", "a1", "s1", Some("ghost")).await.unwrap_err();
    assert!(matches!(err, FlowError::DanglingReference(_)));
    let err = studio.add_step("c1", "zz", "END", None).await.unwrap_err();
    assert!(matches!(err, FlowError::AutomationNotFound(_)));

    assert_eq!(studio.workspace(), &before);
    assert!(store.try_load().await.is_err());
}

#[tokio::test]
async fn test_generate_steps_appends_valid_batch() {
    let mut linked = candidate("s1", "AI_AGENT");
    linked.next_step_id = Some("s2".to_string());
    let generator = ScriptedGenerator::with_batch(vec![
        linked,
        candidate("s2", "END"),
        candidate("s3", "BOGUS"),
    ]);
    let (mut studio, _store) = studio(generator).await;

    let added = studio.generate_steps("c1", "a1", "answer questions").await.unwrap();

    assert_eq!(added, 2);
    let automation = studio.automation("c1", "a1").unwrap();
    assert_eq!(automation.steps.len(), 3);
    // "s1" collided with the demo trigger and was renamed
    let agent = &automation.steps[1];
    assert_ne!(agent.id, "s1");
    assert_eq!(agent.step_type, StepType::AiAgent);
    assert_eq!(agent.next_step_id.as_deref(), Some("s2"));
    assert!(automation.step("s1").unwrap().next_step_id.is_none());
    assert!(is_consistent(automation));
}

#[tokio::test]
async fn test_failed_generation_adds_nothing() {
    let (mut studio, _store) = studio(ScriptedGenerator::failing()).await;
    assert_eq!(studio.generate_steps("c1", "a1", "anything").await.unwrap(), 0);
    assert_eq!(studio.automation("c1", "a1").unwrap().steps.len(), 1);
}

#[tokio::test]
async fn test_simulation_uses_snapshot() {
    let (mut studio, _store) = studio(ScriptedGenerator::failing()).await;
    let mut session = studio.open_simulation("c1", "a1").unwrap();

    // Later edits do not leak into an open session
    studio.delete_step("c1", "a1", "s1").await.unwrap();

    assert_eq!(
        session.send("hi").await.unwrap(),
        "[Executing Hello!]: Start of the conversation"
    );
}

#[tokio::test]
async fn test_noop_delete_does_not_persist() {
    let (mut studio, store) = studio(ScriptedGenerator::failing()).await;
    let before = studio.workspace().clone();

    studio.delete_step("c1", "a1", "ghost").await.unwrap();

    assert_eq!(studio.workspace(), &before);
    assert!(store.try_load().await.is_err());
}
