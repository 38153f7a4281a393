//! Conversation simulation over an automation's step chain

pub mod session;
pub mod walker;

pub use session::{fallback_reply, Message, Sender, SimulationOptions, SimulationSession};
pub use walker::{Advance, ChainWalker, LinearRouter, StepRouter, WalkerState};
