//! Error types for the apartment core.
//!
//! Nothing here ever crosses the console/engine boundary: lookups and
//! unrouted commands are reported as transcript lines, and lifecycle misuse
//! is a guarded no-op. These errors cover resource acquisition and
//! configuration only.

use thiserror::Error;

/// Errors acquiring the resources an engine instance runs on.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to build engine runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("failed to spawn engine thread: {0}")]
    Thread(#[source] std::io::Error),
}

/// Errors loading a roster file.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("roster is empty")]
    Empty,

    #[error("duplicate resident id {0}")]
    DuplicateId(u32),
}

/// Errors reading configuration overrides from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Errors starting or driving a [`Console`](crate::console::Console).
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
