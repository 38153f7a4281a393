//! Batch generation and suggestion tests

mod common;

use autoflow::genai::offline::OfflineGenerator;
use autoflow::genai::{suggest_step_content, StepSuggestion};
use autoflow::graph::generate_from_prompt;
use autoflow::models::step::{Position, StepType};
use common::{candidate, ScriptedGenerator};

#[tokio::test]
async fn test_generation_drops_unknown_types() {
    let generator = ScriptedGenerator::with_batch(vec![
        candidate("s1", "BOGUS"),
        candidate("s2", "AI_AGENT"),
    ]);

    let steps = generate_from_prompt(&generator, "answer product questions").await;

    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].id, "s2");
    assert_eq!(steps[0].step_type, StepType::AiAgent);
    assert_eq!(steps[0].title, "Generated s2");
}

#[tokio::test]
async fn test_generation_keeps_capability_fields() {
    let mut first = candidate("t", "CHATGURU_TRIGGER");
    first.next_step_id = Some("r".to_string());
    first.x = 120.0;
    first.y = 80.0;
    first.config.insert("prompt".into(), serde_json::json!("be nice"));
    let generator = ScriptedGenerator::with_batch(vec![first, candidate("r", "TEXT_REPLY")]);

    let steps = generate_from_prompt(&generator, "greet").await;

    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].step_type, StepType::Trigger);
    assert_eq!(steps[0].position, Position::new(120.0, 80.0));
    assert_eq!(steps[0].next_step_id.as_deref(), Some("r"));
    assert_eq!(steps[0].config.get("prompt"), Some(&serde_json::json!("be nice")));
    assert!(steps[1].next_step_id.is_none());
}

#[tokio::test]
async fn test_generation_failure_is_empty() {
    let generator = ScriptedGenerator::failing();
    assert!(generate_from_prompt(&generator, "anything").await.is_empty());
    assert_eq!(generator.calls(), 1);

    assert!(generate_from_prompt(&OfflineGenerator, "anything").await.is_empty());
}

#[tokio::test]
async fn test_blank_prompt_skips_capability() {
    let generator = ScriptedGenerator::with_batch(vec![candidate("s1", "END")]);
    assert!(generate_from_prompt(&generator, "  ").await.is_empty());
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_suggestion_fallbacks() {
    let failing = ScriptedGenerator::failing();
    assert_eq!(
        suggest_step_content(&failing, StepType::TextReply, "greeting").await,
        StepSuggestion {
            title: "Erro na Sugestão".to_string(),
            description: "Configuração manual necessária.".to_string(),
        }
    );

    let empty = ScriptedGenerator {
        suggestion: Some(None),
        ..Default::default()
    };
    assert_eq!(
        suggest_step_content(&empty, StepType::TextReply, "greeting").await,
        StepSuggestion::empty()
    );

    let answered = ScriptedGenerator {
        suggestion: Some(Some(StepSuggestion {
            title: "Welcome".to_string(),
            description: "Greets the customer".to_string(),
        })),
        ..Default::default()
    };
    assert_eq!(
        suggest_step_content(&answered, StepType::TextReply, "greeting")
            .await
            .title,
        "Welcome"
    );
}
