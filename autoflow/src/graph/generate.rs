//! Bulk step generation from a natural-language prompt

use tracing::{info, warn};

use crate::genai::Generator;
use crate::models::step::Step;

/// Ask the capability for a batch of steps and keep the valid ones.
///
/// Records with an unknown type are dropped. A capability failure yields an
/// empty batch. Links are kept exactly as the capability produced them;
/// `append_steps` resolves them against the target graph.
pub async fn generate_from_prompt(generator: &dyn Generator, prompt: &str) -> Vec<Step> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Vec::new();
    }

    let candidates = match generator.generate_steps(prompt).await {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!("Step generation failed on {}: {}", generator.name(), e);
            return Vec::new();
        }
    };

    let total = candidates.len();
    let steps: Vec<Step> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let id = candidate.id.clone();
            Step::try_from(candidate)
                .map_err(|e| warn!("Dropping generated step {}: {}", id, e))
                .ok()
        })
        .collect();

    info!("Generated {} of {} proposed steps", steps.len(), total);
    steps
}
