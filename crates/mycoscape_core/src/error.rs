//! Error types for mycoscape_core.

use thiserror::Error;

/// Failure to build an engine from a landscape.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Landscape is empty ({width}x{height})")]
    EmptyLandscape { width: u16, height: u16 },

    #[error("Landscape has {actual} cells, expected {expected} for its dimensions")]
    CellCountMismatch { expected: usize, actual: usize },
}

/// Failure to read or parse a parameter file as a whole.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A single rejected parameter entry. The key keeps its default.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigIssue {
    #[error("Unknown parameter `{0}` ignored")]
    UnknownKey(String),

    #[error("Parameter `{key}` is not numeric, using default")]
    NotNumeric { key: String },

    #[error("Parameter `{key}` = {value} outside {bound}, using default")]
    OutOfRange {
        key: String,
        value: f64,
        bound: &'static str,
    },
}

/// Result type alias for engine construction.
pub type Result<T> = std::result::Result<T, EngineError>;
