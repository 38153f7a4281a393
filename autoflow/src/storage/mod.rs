//! Storage: settings, layout and workspace persistence

pub mod blob;
pub mod layout;
pub mod settings;
pub mod store;
