//! Error types.

use thiserror::Error;

use crate::enums::AiState;

/// Invalid configuration. Always a programmer or content error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0:?} is not a valid initial state (expected Navigating or Ragdolled)")]
    InvalidInitialState(AiState),

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} range is inverted: min {min} > max {max}")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Hard failure while running an agent.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The collider reported no usable size, usually because it was disabled.
    #[error("degenerate collider bounds {size:?} while computing {purpose}")]
    DegenerateBounds {
        size: [f32; 3],
        purpose: &'static str,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
