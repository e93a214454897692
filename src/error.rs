//! Error types for the swarm coordination core.

use crate::types::AgentId;
use thiserror::Error;

/// Failure to decode an externally supplied payload
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    #[error("invalid position payload {payload:?}: expected 3 values, found {found}")]
    WrongArity { payload: String, found: usize },

    #[error("invalid number {value:?} in position payload {payload:?}")]
    InvalidNumber { payload: String, value: String },

    #[error("unknown performative: {0}")]
    UnknownPerformative(String),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("invalid bid payload: {0}")]
    InvalidBid(String),

    #[error("invalid agent reference: {0:?}")]
    BadAgentRef(String),
}

/// Errors surfaced by the swarm library API
#[derive(Debug, Error)]
pub enum SwarmError {
    #[error("Agent not found: {0}")]
    AgentNotFound(AgentId),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Scenario error: {0}")]
    ScenarioError(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
