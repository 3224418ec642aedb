//! Platform seams for capture devices and recorders.
//!
//! A [`MediaBackend`] acquires a [`MediaStream`] (exclusive access to the
//! microphone and camera) and binds a [`MediaRecorder`] to it. Recorders never
//! call back into the session directly: they push [`RecorderEvent`]s through a
//! [`RecorderEventSender`] into the session's single event queue.

use crate::CoreResult;

use std::{fmt, future::Future, sync::Arc};

use uuid::Uuid;

/// Identifies one recording attempt, from `start()` to its finalize event.
pub type RecordingId = Uuid;

/// Which inputs to request when acquiring a capture device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConstraints {
    /// Capture the microphone.
    pub audio: bool,
    /// Capture the camera.
    pub video: bool,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            audio: true,
            video: true,
        }
    }
}

/// Kind of a single captured track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    /// Microphone input.
    Audio,
    /// Camera input.
    Video,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackKind::Audio => write!(f, "audio"),
            TrackKind::Video => write!(f, "video"),
        }
    }
}

/// One input of an acquired stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTrack {
    kind: TrackKind,
    label: String,
    live: bool,
}

impl MediaTrack {
    /// Creates a live track.
    pub fn new(kind: TrackKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            live: true,
        }
    }

    /// Track kind.
    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    /// Platform label of the underlying device.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the track still holds its device.
    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Ends the track. Idempotent.
    pub fn stop(&mut self) {
        self.live = false;
    }
}

/// Events a recorder emits while bound to a recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderEvent {
    /// A chunk of encoded data. May be empty.
    DataAvailable {
        /// Recording the chunk belongs to.
        recording_id: RecordingId,
        /// Encoded bytes.
        chunk: Vec<u8>,
    },
    /// The recorder hit an error. A `Stopped` event follows.
    Failed {
        /// Recording the error belongs to.
        recording_id: RecordingId,
        /// Human-readable cause.
        reason: String,
    },
    /// The recorder finished; no further data follows for this recording.
    Stopped {
        /// Recording that finished.
        recording_id: RecordingId,
    },
}

impl RecorderEvent {
    /// Recording this event belongs to.
    pub fn recording_id(&self) -> RecordingId {
        match self {
            RecorderEvent::DataAvailable { recording_id, .. }
            | RecorderEvent::Failed { recording_id, .. }
            | RecorderEvent::Stopped { recording_id } => *recording_id,
        }
    }
}

/// Handle a recorder uses to emit events for exactly one recording.
///
/// Every event is stamped with the recording id this sender was created for.
/// Events sent after the session's queue is gone are dropped.
#[derive(Clone)]
pub struct RecorderEventSender {
    recording_id: RecordingId,
    deliver: Arc<dyn Fn(RecorderEvent) + Send + Sync>,
}

impl RecorderEventSender {
    /// Wraps a delivery function for `recording_id`.
    pub fn new<F>(recording_id: RecordingId, deliver: F) -> Self
    where
        F: Fn(RecorderEvent) + Send + Sync + 'static,
    {
        Self {
            recording_id,
            deliver: Arc::new(deliver),
        }
    }

    /// Recording this sender is bound to.
    pub fn recording_id(&self) -> RecordingId {
        self.recording_id
    }

    /// Emits a data chunk.
    pub fn data_available(&self, chunk: Vec<u8>) {
        (self.deliver)(RecorderEvent::DataAvailable {
            recording_id: self.recording_id,
            chunk,
        });
    }

    /// Emits an error. The recorder must still emit [`Self::stopped`].
    pub fn failed(&self, reason: impl Into<String>) {
        (self.deliver)(RecorderEvent::Failed {
            recording_id: self.recording_id,
            reason: reason.into(),
        });
    }

    /// Emits the finalize event.
    pub fn stopped(&self) {
        (self.deliver)(RecorderEvent::Stopped {
            recording_id: self.recording_id,
        });
    }
}

impl fmt::Debug for RecorderEventSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecorderEventSender")
            .field("recording_id", &self.recording_id)
            .finish_non_exhaustive()
    }
}

/// Exclusive access to the capture inputs.
pub trait MediaStream: Send + 'static {
    /// Tracks held by this stream.
    fn tracks(&self) -> &[MediaTrack];

    /// Releases every track. Must be idempotent.
    fn stop_tracks(&mut self);
}

/// Stateful encoder bound to a [`MediaStream`].
pub trait MediaRecorder: Send + 'static {
    /// Container type of the emitted data, e.g. `video/webm`.
    fn mime_type(&self) -> &str;

    /// Begins encoding.
    fn start(&mut self) -> CoreResult<()>;

    /// Requests finalization.
    ///
    /// Returns immediately. Remaining data arrives as `DataAvailable`
    /// events, followed by exactly one `Stopped` event.
    fn stop(&mut self);
}

/// Device capture API and recorder factory.
pub trait MediaBackend: Send + Sync + 'static {
    /// Stream produced by a successful acquisition.
    type Stream: MediaStream;
    /// Recorder bound to a stream.
    type Recorder: MediaRecorder;

    /// Acquires the inputs named by `constraints`.
    ///
    /// There is no timeout: a platform prompt that never resolves keeps the
    /// returned future pending.
    fn acquire(
        &self,
        constraints: CaptureConstraints,
    ) -> impl Future<Output = CoreResult<Self::Stream>> + Send;

    /// Creates a recorder for `stream` that reports through `events`.
    fn create_recorder(
        &self,
        stream: &Self::Stream,
        events: RecorderEventSender,
    ) -> CoreResult<Self::Recorder>;
}
