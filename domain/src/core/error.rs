//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unknown agent role: {0}")]
    UnknownRole(String),

    #[error("Unknown deliberation mode: {0}")]
    UnknownMode(String),

    #[error("Unknown phase: {0}")]
    UnknownPhase(String),

    #[error("Invalid conference request: {0}")]
    InvalidRequest(String),
}
