//! Simulated conversation against one automation

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::FlowError;
use crate::genai::{Generator, ReplyRequest};
use crate::models::automation::Automation;
use crate::models::step::Step;
use crate::sim::walker::{Advance, ChainWalker, WalkerState};

/// Who sent a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One transcript line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone)]
pub struct SimulationOptions {
    /// Upper bound on one capability call before falling back
    pub reply_timeout: Duration,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            reply_timeout: Duration::from_secs(20),
        }
    }
}

/// Local reply used whenever the capability cannot answer
pub fn fallback_reply(step: &Step) -> String {
    format!("[Executing {}]: {}", step.title, step.description)
}

/// Interactive simulation session.
///
/// `send` takes `&mut self`, so one session never has two replies in flight.
/// Sessions own their automation snapshot and share nothing mutable.
pub struct SimulationSession {
    automation: Automation,
    walker: ChainWalker,
    transcript: Vec<Message>,
    generator: Arc<dyn Generator>,
    options: SimulationOptions,
}

impl SimulationSession {
    pub fn new(automation: Automation, generator: Arc<dyn Generator>, options: SimulationOptions) -> Self {
        info!("Opening simulation of {} ({})", automation.name, automation.id);
        let transcript = vec![greeting(&automation)];
        Self {
            automation,
            walker: ChainWalker::new(),
            transcript,
            generator,
            options,
        }
    }

    pub fn automation(&self) -> &Automation {
        &self.automation
    }

    pub fn state(&self) -> &WalkerState {
        self.walker.state()
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Submit one user input and return the bot reply.
    ///
    /// Only blank input is rejected; capability failures become the local
    /// fallback reply.
    pub async fn send(&mut self, input: &str) -> Result<String, FlowError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(FlowError::ValidationError("empty message".to_string()));
        }

        let outcome = self.walker.advance(&self.automation);
        let reply = match outcome {
            Advance::Arrived(step) => {
                let request = ReplyRequest {
                    automation_name: self.automation.name.clone(),
                    step_type: step.step_type,
                    step_title: step.title.clone(),
                    step_description: step.description.clone(),
                    step_details: step.params().summary(),
                    transcript: self.transcript.clone(),
                    user_input: input.to_string(),
                };
                voice_step(self.generator.as_ref(), &request, step, self.options.reply_timeout).await
            }
            other => other
                .fixed_reply()
                .unwrap_or(crate::sim::walker::FLOW_ENDED_MESSAGE)
                .to_string(),
        };

        self.transcript.push(Message::user(input));
        self.transcript.push(Message::bot(reply.clone()));
        Ok(reply)
    }

    /// Restart from the beginning with a fresh transcript
    pub fn reset(&mut self) {
        debug!("Resetting simulation of {}", self.automation.id);
        self.walker.reset();
        self.transcript = vec![greeting(&self.automation)];
    }
}

fn greeting(automation: &Automation) -> Message {
    Message::bot(format!("Simulator active: {}. How can I help?", automation.name))
}

async fn voice_step(generator: &dyn Generator, request: &ReplyRequest, step: &Step, timeout: Duration) -> String {
    match tokio::time::timeout(timeout, generator.simulate_reply(request)).await {
        Ok(Ok(text)) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(Ok(_)) => {
            warn!("{} returned an empty reply for step {}", generator.name(), step.id);
            fallback_reply(step)
        }
        Ok(Err(e)) => {
            warn!("Simulated reply for step {} failed on {}: {}", step.id, generator.name(), e);
            fallback_reply(step)
        }
        Err(_) => {
            warn!("Simulated reply for step {} timed out after {:?}", step.id, timeout);
            fallback_reply(step)
        }
    }
}
