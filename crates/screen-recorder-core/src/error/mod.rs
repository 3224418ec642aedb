use error_location::ErrorLocation;
use thiserror::Error;

/// Recording lifecycle errors with source location tracking.
///
/// None of these are fatal. Acquisition failures and missing artifacts are
/// reported to the user through a [`crate::NotificationSink`]; invalid
/// transitions never reach this type because the session absorbs them.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// The capture device was denied, missing, or could not be opened.
    #[error("Failed to acquire capture device: {reason} {location}")]
    AcquisitionFailed {
        /// Description of the acquisition failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No audio input device found.
    #[error("No microphone found {location}")]
    NoMicrophoneFound {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No video input device found.
    #[error("No camera found: {device} {location}")]
    NoCameraFound {
        /// Device the backend looked for.
        device: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The recorder could not be created or started for an acquired stream.
    #[error("Recorder error: {reason} {location}")]
    RecorderFailed {
        /// Description of the recorder error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Download requested with no live artifact reference.
    #[error("No recorded video available {location}")]
    NoArtifact {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// IO error while spawning or talking to the encoder process.
    #[error("IO error: {source} {location}")]
    Io {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl From<std::io::Error> for RecorderError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        RecorderError::Io {
            source,
            location: ErrorLocation::from(std::panic::Location::caller()),
        }
    }
}

/// Result type alias using [`RecorderError`].
pub type Result<T> = std::result::Result<T, RecorderError>;
