//! Referential integrity of `next_step_id` links

use std::collections::HashSet;

use crate::models::automation::Automation;

/// A link pointing at a step that is not in the automation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingLink {
    pub from: String,
    pub to: String,
}

/// All links that do not resolve within the automation
pub fn dangling_links(automation: &Automation) -> Vec<DanglingLink> {
    let ids: HashSet<&str> = automation.steps.iter().map(|s| s.id.as_str()).collect();
    automation
        .steps
        .iter()
        .filter_map(|s| match s.next_step_id.as_deref() {
            Some(to) if !ids.contains(to) => Some(DanglingLink {
                from: s.id.clone(),
                to: to.to_string(),
            }),
            _ => None,
        })
        .collect()
}

pub fn is_consistent(automation: &Automation) -> bool {
    dangling_links(automation).is_empty()
}

/// Clear every dangling link in place, returning what was cleared
pub fn repair_links(automation: &mut Automation) -> Vec<DanglingLink> {
    let dangling = dangling_links(automation);
    for link in &dangling {
        if let Some(step) = automation.steps.iter_mut().find(|s| s.id == link.from) {
            step.next_step_id = None;
        }
    }
    dangling
}

/// Step ids that occur more than once
pub fn duplicate_ids(automation: &Automation) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for step in &automation.steps {
        if !seen.insert(step.id.as_str()) && !duplicates.contains(&step.id) {
            duplicates.push(step.id.clone());
        }
    }
    duplicates
}
