//! AutoFlow Library
//!
//! Core of the conversational-automation builder: the step graph, its
//! integrity-preserving mutations, the chain walker that drives simulated
//! conversations, and workspace persistence.

pub mod app;
pub mod errors;
pub mod filesys;
pub mod genai;
pub mod graph;
pub mod logs;
pub mod models;
pub mod sim;
pub mod storage;
pub mod utils;
