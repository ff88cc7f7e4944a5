use thiserror::Error;

/// Errors surfaced by the engine's public operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A symbol or command token outside the closed grammar.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Internal consistency defect between the session's logs.
    #[error("Invariant violation: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
