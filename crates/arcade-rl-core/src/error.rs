//! Error types for arcade-rl

use std::path::PathBuf;
use thiserror::Error;

/// Result type for arcade-rl operations
pub type Result<T> = std::result::Result<T, ArcadeError>;

/// arcade-rl error types
///
/// Only recoverable conditions live here. Caller contract violations such as
/// an out-of-range action index panic instead.
#[derive(Debug, Error)]
pub enum ArcadeError {
    /// ROM could not be loaded by the emulator
    #[error("Failed to load ROM {path:?}: {reason}")]
    RomLoad { path: PathBuf, reason: String },

    /// No configuration document at the given location
    #[error("No configuration found at: {0:?}")]
    ConfigNotFound(PathBuf),

    /// Configuration parsed but holds unusable values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ArcadeError {
    fn from(err: serde_json::Error) -> Self {
        ArcadeError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rom_load_message() {
        let err = ArcadeError::RomLoad {
            path: PathBuf::from("roms/breakout.bin"),
            reason: "file not found".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("breakout.bin"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_from_serde_json() {
        let err: ArcadeError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, ArcadeError::Serialization(_)));
    }
}
