//! Prompt and response-schema builders for the generation capability

use serde_json::{json, Value};

use crate::genai::ReplyRequest;
use crate::models::step::StepType;
use crate::sim::session::Sender;

/// Prompt for drafting a whole flow from an intent
pub fn step_batch_prompt(intent: &str) -> String {
    let types: Vec<&str> = StepType::ALL.iter().map(|t| t.as_str()).collect();
    format!(
        "You are the lead automation architect for a WhatsApp chatbot platform with \
external tool servers.\n\
The user wants: \"{intent}\".\n\
\n\
Guidelines:\n\
1. Use EXTERNAL_TOOL when the flow needs outside data.\n\
2. Use AI_AGENT when the flow needs open-ended reasoning.\n\
3. Use TEXT_REPLY for plain scripted messages.\n\
4. Start the flow with exactly one TRIGGER and chain steps with nextStepId.\n\
\n\
Available step types: {types}.\n\
\n\
Return a JSON array of steps.",
        intent = intent.trim(),
        types = types.join(", "),
    )
}

/// Response schema for [`step_batch_prompt`]
pub fn step_batch_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "STRING" },
                "type": { "type": "STRING" },
                "title": { "type": "STRING" },
                "description": { "type": "STRING" },
                "x": { "type": "NUMBER" },
                "y": { "type": "NUMBER" },
                "config": {
                    "type": "OBJECT",
                    "properties": {
                        "prompt": { "type": "STRING" },
                        "modelTier": { "type": "STRING", "enum": ["PRO", "FLASH", "LITE"] }
                    }
                },
                "nextStepId": { "type": "STRING" }
            },
            "required": ["id", "type", "title", "description", "x", "y", "config"]
        }
    })
}

/// Prompt for a short title/description suggestion
pub fn suggestion_prompt(step_type: StepType, context: &str) -> String {
    format!(
        "Suggest a title and a short description for a \"{}\" step in this context: {}.",
        step_type,
        context.trim()
    )
}

/// Response schema for [`suggestion_prompt`]
pub fn suggestion_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "description": { "type": "STRING" }
        },
        "required": ["title", "description"]
    })
}

/// Prompt asking the model to speak as the bot configured at one step
pub fn reply_prompt(request: &ReplyRequest) -> String {
    let history = request
        .transcript
        .iter()
        .map(|m| {
            let who = match m.sender {
                Sender::User => "user",
                Sender::Bot => "bot",
            };
            format!("{}: {}", who, m.text)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let details = request
        .step_details
        .as_deref()
        .map(|d| format!("Step settings: {}\n", d))
        .unwrap_or_default();

    format!(
        "You are a chatbot simulating a conversational automation flow.\n\
Automation name: \"{name}\".\n\
Current step type: \"{step_type}\".\n\
Step title: \"{title}\"\n\
Step description: \"{description}\"\n\
{details}\
\n\
Conversation so far:\n\
{history}\n\
The user just sent: \"{input}\"\n\
\n\
Reply to the user as the bot configured at this step. Be brief and natural and \
never mention technical details such as step names or ids. {hint}",
        name = request.automation_name,
        step_type = request.step_type,
        title = request.step_title,
        description = request.step_description,
        details = details,
        history = history,
        input = request.user_input,
        hint = step_hint(request.step_type),
    )
}

fn step_hint(step_type: StepType) -> &'static str {
    match step_type {
        StepType::AiAgent => "Use your own reasoning to answer the user's intent.",
        StepType::TextReply => "Follow the tone of the step description.",
        StepType::ExternalTool | StepType::ApiCall => {
            "Pretend the lookup succeeded and answer with plausible data."
        }
        StepType::HumanHandoff => "Tell the user a human agent will take over.",
        _ => "",
    }
}
