use screen_recorder_core::SessionState;

/// Tray icon states corresponding to the recording lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIconState {
    /// Ready to start recording.
    Idle,
    /// Waiting for device access, or finishing a stop.
    Acquiring,
    /// Currently recording.
    Recording,
}

impl From<SessionState> for TrayIconState {
    fn from(state: SessionState) -> Self {
        match state {
            SessionState::Idle => TrayIconState::Idle,
            SessionState::Acquiring | SessionState::Stopping => TrayIconState::Acquiring,
            SessionState::Recording => TrayIconState::Recording,
        }
    }
}

impl TrayIconState {
    /// Hover text for the tray icon.
    pub fn tooltip(self) -> &'static str {
        match self {
            TrayIconState::Idle => "Screen Recorder - Ready",
            TrayIconState::Acquiring => "Screen Recorder - Requesting camera...",
            TrayIconState::Recording => "Screen Recorder - Recording...",
        }
    }

    /// Text of the start/stop menu item.
    pub fn record_label(self) -> &'static str {
        match self {
            TrayIconState::Recording => "Stop Recording",
            TrayIconState::Idle | TrayIconState::Acquiring => "Start Recording",
        }
    }

    /// The start/stop item is disabled while devices are being requested.
    pub fn record_enabled(self) -> bool {
        self != TrayIconState::Acquiring
    }
}
