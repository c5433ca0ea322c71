//! Error handling for the router

use thiserror::Error;

/// Result type for routing operations
pub type Result<T> = core::result::Result<T, RouterError>;

/// Error types raised while building inputs or routing a circuit
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouterError {
    /// Topology or circuit description could not be parsed
    #[error("Parse error: {message} at position {position}")]
    ParseError { message: String, position: usize },

    /// Invalid circuit structure
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// Disconnected or malformed device graph
    #[error("Topology error: {0}")]
    TopologyError(String),

    /// The logical/physical mapping lost its bijection
    #[error("Mapping error: {0}")]
    MappingError(String),

    /// An operation cannot be placed on the device
    #[error("Scheduling error: {0}")]
    SchedulingError(String),

    /// Not enough physical qubits for the circuit
    #[error("Resource allocation failed: {0}")]
    AllocationError(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal errors that shouldn't happen
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl RouterError {
    /// Create a parse error
    pub fn parse_error(message: impl Into<String>, position: usize) -> Self {
        Self::ParseError {
            message: message.into(),
            position,
        }
    }

    /// Create an invalid circuit error
    pub fn invalid_circuit(message: impl Into<String>) -> Self {
        Self::InvalidCircuit(message.into())
    }

    /// Create a topology error
    pub fn topology_error(message: impl Into<String>) -> Self {
        Self::TopologyError(message.into())
    }

    /// Create a mapping consistency error
    pub fn mapping_error(message: impl Into<String>) -> Self {
        Self::MappingError(message.into())
    }

    /// Create a scheduling error
    pub fn scheduling_error(message: impl Into<String>) -> Self {
        Self::SchedulingError(message.into())
    }

    /// Create an allocation error
    pub fn allocation_error(message: impl Into<String>) -> Self {
        Self::AllocationError(message.into())
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<serde_json::Error> for RouterError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError {
            message: err.to_string(),
            position: err.column(),
        }
    }
}
