use std::fmt;

/// Observable lifecycle state of a [`crate::CaptureSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nothing acquired. `start()` is accepted.
    #[default]
    Idle,
    /// Waiting for the platform to grant the capture device.
    Acquiring,
    /// Device and recorder held; chunks are accumulating.
    Recording,
    /// `stop()` is tearing the recording down.
    Stopping,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Acquiring => "acquiring",
            SessionState::Recording => "recording",
            SessionState::Stopping => "stopping",
        };
        f.write_str(name)
    }
}
