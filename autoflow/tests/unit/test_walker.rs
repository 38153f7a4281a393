//! Simulation session tests

mod common;

use std::sync::Arc;
use std::time::Duration;

use autoflow::errors::FlowError;
use autoflow::models::step::StepType;
use autoflow::sim::session::{Sender, SimulationOptions, SimulationSession};
use autoflow::sim::walker::{WalkerState, FLOW_ENDED_MESSAGE, NO_ENTRY_POINT_MESSAGE};
use common::{automation, ScriptedGenerator};

fn session(generator: Arc<ScriptedGenerator>, links: &[(&str, StepType, Option<&str>)]) -> SimulationSession {
    SimulationSession::new(automation(links), generator, SimulationOptions::default())
}

const CHAIN: &[(&str, StepType, Option<&str>)] = &[
    ("a", StepType::Trigger, Some("b")),
    ("b", StepType::ExternalTool, Some("c")),
    ("c", StepType::Condition, None),
];

#[tokio::test]
async fn test_failing_capability_gives_deterministic_replies() {
    let generator = Arc::new(ScriptedGenerator::failing());
    let mut session = session(generator.clone(), CHAIN);

    assert_eq!(
        session.send("hello").await.unwrap(),
        "[Executing Title a]: Description a"
    );

    let mut replies = Vec::new();
    for input in ["one", "two", "three"] {
        replies.push(session.send(input).await.unwrap());
    }

    assert_eq!(
        replies,
        vec![
            "[Executing Title b]: Description b".to_string(),
            "[Executing Title c]: Description c".to_string(),
            FLOW_ENDED_MESSAGE.to_string(),
        ]
    );
    assert_eq!(generator.calls(), 3);
    assert_eq!(session.state(), &WalkerState::Terminated);
}

#[tokio::test]
async fn test_terminated_is_absorbing() {
    let generator = Arc::new(ScriptedGenerator::replying("ok"));
    let mut session = session(generator.clone(), &[("a", StepType::Trigger, None)]);

    session.send("hi").await.unwrap();
    for _ in 0..3 {
        assert_eq!(session.send("more").await.unwrap(), FLOW_ENDED_MESSAGE);
    }
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_no_trigger_terminates_without_capability_call() {
    let generator = Arc::new(ScriptedGenerator::replying("never"));
    let mut session = session(
        generator.clone(),
        &[("a", StepType::TextReply, Some("b")), ("b", StepType::End, None)],
    );

    assert_eq!(session.send("hi").await.unwrap(), NO_ENTRY_POINT_MESSAGE);
    assert_eq!(session.state(), &WalkerState::Terminated);
    assert_eq!(session.send("again").await.unwrap(), FLOW_ENDED_MESSAGE);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_capability_receives_step_and_transcript() {
    let generator = Arc::new(ScriptedGenerator::replying("bot says"));
    let mut session = session(generator.clone(), CHAIN);

    assert_eq!(session.send("hello").await.unwrap(), "bot says Title a");
    assert_eq!(session.send("need stock").await.unwrap(), "bot says Title b");

    let requests = generator.requests();
    assert_eq!(requests.len(), 2);

    let second = &requests[1];
    assert_eq!(second.automation_name, "Support Bot");
    assert_eq!(second.step_type, StepType::ExternalTool);
    assert_eq!(second.step_title, "Title b");
    assert_eq!(second.step_description, "Description b");
    assert_eq!(second.user_input, "need stock");
    // greeting, first user input, first reply; not the latest input
    let texts: Vec<&str> = second.transcript.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts.len(), 3);
    assert_eq!(texts[1], "hello");
    assert_eq!(texts[2], "bot says Title a");
}

#[tokio::test]
async fn test_transcript_order() {
    let generator = Arc::new(ScriptedGenerator::failing());
    let mut session = session(generator, CHAIN);

    session.send("first").await.unwrap();
    session.send("second").await.unwrap();

    let senders: Vec<Sender> = session.transcript().iter().map(|m| m.sender).collect();
    assert_eq!(
        senders,
        vec![Sender::Bot, Sender::User, Sender::Bot, Sender::User, Sender::Bot]
    );
    assert_eq!(session.transcript()[3].text, "second");
}

#[tokio::test]
async fn test_empty_reply_falls_back() {
    // An empty prefix and an empty title make the scripted reply blank
    let mut automation = automation(&[("a", StepType::Trigger, None)]);
    automation.steps[0].title = String::new();
    let mut session = SimulationSession::new(
        automation,
        Arc::new(ScriptedGenerator::replying("")),
        SimulationOptions::default(),
    );

    assert_eq!(session.send("hi").await.unwrap(), "[Executing ]: Description a");
}

#[tokio::test]
async fn test_timeout_falls_back() {
    let generator = Arc::new(ScriptedGenerator {
        hang: true,
        reply_prefix: Some("late".to_string()),
        ..Default::default()
    });
    let mut session = SimulationSession::new(
        automation(&[("a", StepType::Trigger, None)]),
        generator,
        SimulationOptions {
            reply_timeout: Duration::from_millis(50),
        },
    );

    assert_eq!(
        session.send("hi").await.unwrap(),
        "[Executing Title a]: Description a"
    );
}

#[tokio::test]
async fn test_blank_input_is_rejected_without_state_change() {
    let generator = Arc::new(ScriptedGenerator::failing());
    let mut session = session(generator.clone(), CHAIN);

    assert!(matches!(
        session.send("   ").await,
        Err(FlowError::ValidationError(_))
    ));
    assert_eq!(session.state(), &WalkerState::NotStarted);
    assert_eq!(session.transcript().len(), 1);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_reset_restarts_from_trigger() {
    let generator = Arc::new(ScriptedGenerator::failing());
    let mut session = session(generator, CHAIN);

    session.send("1").await.unwrap();
    session.send("2").await.unwrap();
    session.reset();

    assert_eq!(session.state(), &WalkerState::NotStarted);
    assert_eq!(session.transcript().len(), 1);
    assert_eq!(
        session.send("again").await.unwrap(),
        "[Executing Title a]: Description a"
    );
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let generator = Arc::new(ScriptedGenerator::failing());
    let mut first = session(generator.clone(), CHAIN);
    let mut second = session(generator, CHAIN);

    let (a, b) = tokio::join!(first.send("x"), second.send("y"));
    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(first.state(), &WalkerState::AtStep("a".to_string()));
    assert_eq!(second.state(), &WalkerState::AtStep("a".to_string()));
}
