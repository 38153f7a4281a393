//! Graph mutator: create, update, rewire and delete steps

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::FlowError;
use crate::graph::integrity::repair_links;
use crate::models::automation::Automation;
use crate::models::step::{Position, Step, StepPatch, StepType};
use crate::utils::generate_id;

/// Append a new step of the given type tag at `position`
pub fn add_step(graph: &Automation, step_type: &str, position: Position) -> Result<Automation, FlowError> {
    let step_type: StepType = step_type.parse()?;
    let step = Step::new(step_type, position);
    debug!("Adding {} step {} to {}", step_type, step.id, graph.id);

    let mut next = graph.clone();
    next.steps.push(step);
    next.touch();
    Ok(next)
}

/// Merge `patch` into the step with `step_id`. Id and type never change.
pub fn update_step(graph: &Automation, step_id: &str, patch: &StepPatch) -> Result<Automation, FlowError> {
    if !graph.contains(step_id) {
        return Err(FlowError::StepNotFound(step_id.to_string()));
    }
    if let Some(Some(target)) = &patch.next_step_id {
        if !graph.contains(target) {
            return Err(FlowError::DanglingReference(target.clone()));
        }
    }

    let mut next = graph.clone();
    let step = next
        .steps
        .iter_mut()
        .find(|s| s.id == step_id)
        .ok_or_else(|| FlowError::StepNotFound(step_id.to_string()))?;

    if let Some(title) = &patch.title {
        step.title = title.clone();
    }
    if let Some(description) = &patch.description {
        step.description = description.clone();
    }
    if let Some(x) = patch.x {
        step.position.x = x;
    }
    if let Some(y) = patch.y {
        step.position.y = y;
    }
    if let Some(config) = &patch.config {
        for (key, value) in config {
            if value.is_null() {
                step.config.remove(key);
            } else {
                step.config.insert(key.clone(), value.clone());
            }
        }
    }
    if let Some(link) = &patch.next_step_id {
        step.next_step_id = link.clone();
    }

    debug!("Updated step {} in {}", step_id, graph.id);
    next.touch();
    Ok(next)
}

/// Reposition a step on the canvas
pub fn move_step(graph: &Automation, step_id: &str, position: Position) -> Result<Automation, FlowError> {
    update_step(graph, step_id, &StepPatch::default().position(position))
}

/// Remove a step and clear every link that pointed at it.
///
/// Deleting an unknown id returns an identical graph.
pub fn delete_step(graph: &Automation, step_id: &str) -> Automation {
    if !graph.contains(step_id) {
        debug!("Delete of unknown step {} in {} ignored", step_id, graph.id);
        return graph.clone();
    }

    let mut next = graph.clone();
    next.steps.retain(|s| s.id != step_id);
    for step in next.steps.iter_mut() {
        if step.next_step_id.as_deref() == Some(step_id) {
            step.next_step_id = None;
        }
    }
    next.touch();
    debug!("Deleted step {} from {}", step_id, graph.id);
    next
}

/// Set or clear the outgoing link of `from_id`
pub fn set_next_step(graph: &Automation, from_id: &str, to_id: Option<&str>) -> Result<Automation, FlowError> {
    if !graph.contains(from_id) {
        return Err(FlowError::StepNotFound(from_id.to_string()));
    }
    if let Some(to) = to_id {
        if !graph.contains(to) {
            return Err(FlowError::DanglingReference(to.to_string()));
        }
    }

    let mut next = graph.clone();
    for step in next.steps.iter_mut().filter(|s| s.id == from_id) {
        step.next_step_id = to_id.map(str::to_string);
    }
    next.touch();
    Ok(next)
}

/// Append an already validated batch of steps (e.g. a generated one).
///
/// Ids that collide with the graph or with earlier batch members get fresh
/// ids. Links inside the batch follow a rename away from a graph id; links to
/// an id repeated in the batch resolve to its first occurrence. Links that still do
/// not resolve afterwards are cleared. No links are added.
pub fn append_steps(graph: &Automation, steps: Vec<Step>) -> Automation {
    if steps.is_empty() {
        return graph.clone();
    }

    let mut taken: HashSet<String> = graph.steps.iter().map(|s| s.id.clone()).collect();
    let mut renamed: HashMap<String, String> = HashMap::new();
    let mut batch = Vec::with_capacity(steps.len());

    for mut step in steps {
        if taken.contains(&step.id) {
            let fresh = generate_id("s");
            // Batch links name batch members. A repeat of an id already in the
            // batch keeps links on the first occurrence, so it is not recorded.
            if graph.contains(&step.id) {
                renamed.entry(step.id.clone()).or_insert_with(|| fresh.clone());
            }
            step.id = fresh;
        }
        taken.insert(step.id.clone());
        batch.push(step);
    }

    for step in batch.iter_mut() {
        if let Some(target) = step.next_step_id.as_ref().and_then(|t| renamed.get(t)) {
            step.next_step_id = Some(target.clone());
        }
    }

    let mut next = graph.clone();
    next.steps.extend(batch);
    for link in repair_links(&mut next) {
        warn!("Dropped dangling link {} -> {} from appended batch", link.from, link.to);
    }
    next.touch();
    next
}

/// Copy of `graph` with `key` set on one step's config
pub fn set_config_value(graph: &Automation, step_id: &str, key: &str, value: Value) -> Result<Automation, FlowError> {
    update_step(graph, step_id, &StepPatch::default().config_value(key, value))
}
