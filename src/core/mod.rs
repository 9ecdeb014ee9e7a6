//! Core library modules for wikipath
//!
//! The search engine (frontiers, coordinator, workers, orchestrator) plus the
//! collaborators it talks to: neighbor oracles, observers and article parsing.

pub mod coordinator;
pub mod error;
pub mod frontier;
pub mod observer;
pub mod options;
pub mod oracle;
pub mod path;
pub mod search;
pub mod source;
pub mod wikipedia;
mod worker;

