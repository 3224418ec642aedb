use crate::{Artifact, media::RecordingId, session::SessionState};

use std::sync::Arc;

/// User intents delivered to the controller's event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderCommand {
    /// Begin a recording.
    Start,
    /// End the active recording.
    Stop,
    /// Start when idle, stop when recording.
    ToggleRecording,
    /// Download the latest artifact.
    Download,
    /// Stop any recording and leave the loop.
    Shutdown,
}

/// Snapshot of what the UI shell needs to render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecorderStatus {
    /// Session lifecycle state.
    pub session: SessionState,
    /// Live artifact reference, if any.
    pub artifact_url: Option<String>,
    /// A download is waiting for a recording to finalize.
    pub download_pending: bool,
}

impl RecorderStatus {
    /// Whether a download would succeed or is already queued.
    pub fn can_download(&self) -> bool {
        self.artifact_url.is_some() || self.download_pending
    }
}

/// Result of a download request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The artifact was handed to the download surface.
    Started(Arc<Artifact>),
    /// Waiting for the given recording to finalize.
    Deferred(RecordingId),
    /// Nothing to download.
    NoArtifact,
}
