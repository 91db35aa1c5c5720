//! Animation error types

use thiserror::Error;

/// Errors reported by the animation engine
#[derive(Error, Debug)]
pub enum AnimationError {
    /// The target selector did not resolve to an element
    #[error("Unknown animation target: {0}")]
    UnknownTarget(String),

    /// The request has neither a property bag nor a draw callback
    #[error("Animation has nothing to draw: expected a property bag or a draw callback")]
    MissingDraw,

    /// The easing name is not registered
    #[error("Unknown easing: {0}")]
    UnknownEasing(String),

    /// A live animation already uses this name
    #[error("An animation named `{0}` is already running")]
    DuplicateName(String),

    /// The animator was dropped before the run completed
    #[error("Animation was cancelled before it completed")]
    Cancelled,

    /// Configuration could not be parsed
    #[error("Invalid animation config: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration file could not be read
    #[error("Failed to read animation config: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
