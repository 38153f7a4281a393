//! Data model: steps, automations and the workspace that owns them

pub mod automation;
pub mod params;
pub mod step;
pub mod workspace;
