//! Error types for the txqr-core library.

use thiserror::Error;

/// Result type alias for configuration and I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown to the user when the camera cannot be opened.
pub const CAMERA_UNAVAILABLE_MESSAGE: &str = "Camera access denied or not available";

/// Errors from configuration and other I/O.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Categorized scan session failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// The decoder could not be constructed for the display target.
    #[error("Failed to initialize scanner for '{element_id}': {reason}")]
    Initialization { element_id: String, reason: String },

    /// `start` was called without a decoder.
    #[error("Scanner not initialized")]
    DecoderUnavailable,

    /// Camera access was denied or no camera is available.
    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    /// The engine failed to halt capture.
    #[error("Failed to stop scanner: {0}")]
    Stop(String),
}

impl ScanError {
    /// Whether this failure must be surfaced to the user with a blocking alert.
    pub fn needs_user_alert(&self) -> bool {
        matches!(
            self,
            ScanError::DecoderUnavailable | ScanError::CameraUnavailable(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_alert_categories() {
        assert!(ScanError::DecoderUnavailable.needs_user_alert());
        assert!(ScanError::CameraUnavailable("denied".into()).needs_user_alert());
        assert!(!ScanError::Stop("busy".into()).needs_user_alert());
        assert!(!ScanError::Initialization {
            element_id: "reader".into(),
            reason: "missing".into(),
        }
        .needs_user_alert());
    }

    #[test]
    fn test_display() {
        let err = ScanError::Initialization {
            element_id: "reader".into(),
            reason: "element not found".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to initialize scanner for 'reader': element not found"
        );
    }
}
