//! # Error Types
//!
//! Custom error types for FlyByWire using `thiserror`.

use thiserror::Error;

use crate::controller::ControllerIdentity;

/// Main error type for FlyByWire
#[derive(Debug, Error)]
pub enum FlyByWireError {
    /// Configuration or registry file could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Registry could not be written as TOML
    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Two configurations claim the same controller identity
    #[error("Duplicate controller identity in registry: {0}")]
    DuplicateIdentity(ControllerIdentity),

    /// Persisted calibration does not match the adapter's axis count
    #[error("Axis count mismatch for {identity}: {array} has {found} entries, adapter has {expected} axes")]
    AxisCountMismatch {
        identity: ControllerIdentity,
        array: &'static str,
        expected: usize,
        found: usize,
    },

    /// A configuration has no live adapter where one is required
    #[error("No adapter bound to {0}")]
    AdapterMissing(ControllerIdentity),
}

/// Result type alias for FlyByWire
pub type Result<T> = std::result::Result<T, FlyByWireError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::InputWrapper;

    #[test]
    fn test_axis_count_mismatch_message() {
        let err = FlyByWireError::AxisCountMismatch {
            identity: ControllerIdentity::new(InputWrapper::Sdl, 2),
            array: "axis_left",
            expected: 6,
            found: 4,
        };

        let msg = err.to_string();
        assert!(msg.contains("SDL #2"));
        assert!(msg.contains("axis_left"));
        assert!(msg.contains("4 entries"));
        assert!(msg.contains("6 axes"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: FlyByWireError = io.into();
        assert!(matches!(err, FlyByWireError::Io(_)));
    }
}
