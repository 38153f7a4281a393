//! Application wiring: options, the studio and the interactive loops

pub mod options;
pub mod run;
pub mod studio;
