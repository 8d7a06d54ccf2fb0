//! Error types for the board model and configuration

use thiserror::Error;

/// Failures reported by board and movement operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// A settle targeted an occupied or out-of-range cell.
    /// Only reachable if a collision check was skipped.
    #[error("invalid placement at line {line}, segment {segment}")]
    InvalidPlacement { line: i32, segment: i32 },

    /// The spawn position is occupied; the run is over
    #[error("spawn blocked at line {line}, segment {segment}")]
    SpawnBlocked { line: i32, segment: i32 },

    /// Recognized command without behavior yet
    #[error("{0} not implemented")]
    NotImplemented(&'static str),

    /// Move requested after the run ended
    #[error("game over; reset required")]
    GameOver,
}

/// Failures loading or validating a [`crate::BoardConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
