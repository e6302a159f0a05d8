//! Error types for the midi-objects library

use std::io;

/// Library error type for midi-objects operations.
///
/// Structural irregularities in the event stream (unmatched note-offs,
/// never-closed note-ons, exceeded chord tolerance) are not errors: they
/// are routed through the builder pipeline and emitted as raw events.
#[derive(Debug, thiserror::Error)]
pub enum ObjectsError {
    /// Settings (de)serialization error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<io::Error> for ObjectsError {
    fn from(error: io::Error) -> Self {
        Self::IoError(error.to_string())
    }
}
