//! Automation graph mutations
//!
//! Every operation takes the current automation by reference and returns a
//! new snapshot, or an error with the input left untouched.

pub mod generate;
pub mod integrity;
pub mod mutator;

pub use generate::generate_from_prompt;
pub use mutator::{add_step, append_steps, delete_step, move_step, set_next_step, update_step};
