//! Lifecycle of a single recording attempt.
//!
//! `Idle -> Acquiring -> Recording -> Idle`, with `Acquiring -> Idle` when the
//! device is refused. The stream, the recorder and the chunk buffer live
//! together inside the `Recording` phase, so a device handle without a
//! recorder (or the reverse) cannot be represented.
//!
//! `stop()` returns the session to `Idle` synchronously. The recording's
//! buffer moves to a finalizing slot until the recorder's `Stopped` event
//! arrives; that event is the only place an [`Artifact`] is produced.

use crate::{
    Artifact, CoreResult, Notification, NotificationSink,
    media::{
        CaptureConstraints, MediaBackend, MediaRecorder, MediaStream, RecorderEvent,
        RecorderEventSender, RecordingId,
    },
    session::{ChunkBuffer, SessionEvent, SessionState},
};

use std::{sync::Arc, time::Instant};

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

enum Phase<B: MediaBackend> {
    Idle,
    Acquiring { recording_id: RecordingId },
    Recording(ActiveRecording<B>),
    Stopping { recording_id: RecordingId },
}

struct ActiveRecording<B: MediaBackend> {
    recording_id: RecordingId,
    started_at: Instant,
    stream: B::Stream,
    recorder: B::Recorder,
    chunks: ChunkBuffer,
}

/// A stopped recording waiting for its recorder's `Stopped` event.
#[derive(Debug)]
struct Finalizing {
    recording_id: RecordingId,
    media_type: String,
    chunks: ChunkBuffer,
}

/// Owns the capture device and recorder for one recording at a time.
///
/// Must be driven from a Tokio runtime: `start()` spawns the acquisition and
/// every result comes back through the receiver returned by [`Self::new`].
pub struct CaptureSession<B: MediaBackend> {
    backend: Arc<B>,
    constraints: CaptureConstraints,
    sink: Arc<dyn NotificationSink>,
    events_tx: mpsc::UnboundedSender<SessionEvent<B::Stream>>,
    phase: Phase<B>,
    finalizing: Vec<Finalizing>,
}

impl<B: MediaBackend> CaptureSession<B> {
    /// Creates an idle session and the event queue that drives it.
    pub fn new(
        backend: Arc<B>,
        constraints: CaptureConstraints,
        sink: Arc<dyn NotificationSink>,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent<B::Stream>>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let session = Self {
            backend,
            constraints,
            sink,
            events_tx,
            phase: Phase::Idle,
            finalizing: Vec::new(),
        };

        (session, events_rx)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        match self.phase {
            Phase::Idle => SessionState::Idle,
            Phase::Acquiring { .. } => SessionState::Acquiring,
            Phase::Recording(_) => SessionState::Recording,
            Phase::Stopping { .. } => SessionState::Stopping,
        }
    }

    /// Recording currently acquiring or capturing.
    pub fn recording_id(&self) -> Option<RecordingId> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Acquiring { recording_id } | Phase::Stopping { recording_id } => {
                Some(*recording_id)
            }
            Phase::Recording(active) => Some(active.recording_id),
        }
    }

    /// Whether the session holds a device and recorder.
    pub fn is_recording(&self) -> bool {
        matches!(self.phase, Phase::Recording(_))
    }

    /// Most recently stopped recording whose artifact has not arrived yet.
    pub fn pending_finalize(&self) -> Option<RecordingId> {
        self.finalizing.last().map(|f| f.recording_id)
    }

    /// Bytes buffered by the active recording so far.
    pub fn buffered_bytes(&self) -> usize {
        match &self.phase {
            Phase::Recording(active) => active.chunks.byte_len(),
            _ => 0,
        }
    }

    /// Requests the capture device.
    ///
    /// Only valid from `Idle`; any other state is a silent no-op and no
    /// second device is requested. The request runs to completion with no
    /// timeout, and its result arrives later as [`SessionEvent::Acquired`].
    #[instrument(skip(self))]
    pub fn start(&mut self) -> Option<RecordingId> {
        if !matches!(self.phase, Phase::Idle) {
            debug!(state = %self.state(), "Start ignored, session busy");
            return None;
        }

        let recording_id = Uuid::new_v4();
        self.phase = Phase::Acquiring { recording_id };

        let backend = Arc::clone(&self.backend);
        let constraints = self.constraints;
        let events_tx = self.events_tx.clone();

        tokio::spawn(async move {
            let result = backend.acquire(constraints).await;
            // The session may already be gone; the stream is dropped with it.
            let _ = events_tx.send(SessionEvent::Acquired {
                recording_id,
                result,
            });
        });

        info!(recording_id = %recording_id, ?constraints, "Capture device requested");

        Some(recording_id)
    }

    /// Stops the active recording.
    ///
    /// Only valid from `Recording`; anything else is a silent no-op that
    /// returns `false`. The recorder is asked to finalize, every track is
    /// released, and the session is `Idle` again when this returns. The
    /// artifact follows later, from the recorder's `Stopped` event.
    #[instrument(skip(self))]
    pub fn stop(&mut self) -> bool {
        let active = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Recording(active) => active,
            other => {
                self.phase = other;
                debug!(state = %self.state(), "Stop ignored, not recording");
                return false;
            }
        };

        let ActiveRecording {
            recording_id,
            started_at,
            mut stream,
            mut recorder,
            chunks,
        } = active;
        self.phase = Phase::Stopping { recording_id };

        recorder.stop();
        stream.stop_tracks();

        self.finalizing.push(Finalizing {
            recording_id,
            media_type: recorder.mime_type().to_string(),
            chunks,
        });

        drop(recorder);
        drop(stream);
        self.phase = Phase::Idle;

        info!(
            recording_id = %recording_id,
            duration_ms = started_at.elapsed().as_millis(),
            "Recording stopped"
        );
        self.sink.notify(Notification::RecordingStopped);

        true
    }

    /// Applies one queued event.
    ///
    /// Returns the finished [`Artifact`] when the event finalized a recording.
    #[instrument(skip(self))]
    pub fn handle_event(&mut self, event: SessionEvent<B::Stream>) -> Option<Artifact> {
        match event {
            SessionEvent::Acquired {
                recording_id,
                result,
            } => {
                self.on_acquired(recording_id, result);
                None
            }
            SessionEvent::Recorder(RecorderEvent::DataAvailable {
                recording_id,
                chunk,
            }) => {
                self.on_data(recording_id, chunk);
                None
            }
            SessionEvent::Recorder(RecorderEvent::Failed {
                recording_id,
                reason,
            }) => {
                warn!(recording_id = %recording_id, reason = %reason, "Recorder reported an error");
                None
            }
            SessionEvent::Recorder(RecorderEvent::Stopped { recording_id }) => {
                self.on_stopped(recording_id)
            }
        }
    }

    fn on_acquired(&mut self, recording_id: RecordingId, result: CoreResult<B::Stream>) {
        let expected = matches!(
            self.phase,
            Phase::Acquiring { recording_id: pending } if pending == recording_id
        );

        if !expected {
            warn!(recording_id = %recording_id, "Stale acquisition result discarded");
            if let Ok(mut stream) = result {
                stream.stop_tracks();
            }
            return;
        }

        match result {
            Ok(stream) => self.begin_recording(recording_id, stream),
            Err(e) => {
                self.phase = Phase::Idle;
                warn!(recording_id = %recording_id, error = %e, "Error accessing capture device");
                self.sink.notify(Notification::AccessFailed {
                    cause: e.to_string(),
                });
            }
        }
    }

    fn begin_recording(&mut self, recording_id: RecordingId, mut stream: B::Stream) {
        let events_tx = self.events_tx.clone();
        let sender = RecorderEventSender::new(recording_id, move |event| {
            let _ = events_tx.send(SessionEvent::Recorder(event));
        });

        let recorder = self
            .backend
            .create_recorder(&stream, sender)
            .and_then(|mut recorder| recorder.start().map(|()| recorder));

        let recorder = match recorder {
            Ok(recorder) => recorder,
            Err(e) => {
                stream.stop_tracks();
                self.phase = Phase::Idle;
                warn!(recording_id = %recording_id, error = %e, "Failed to start recorder");
                self.sink.notify(Notification::AccessFailed {
                    cause: e.to_string(),
                });
                return;
            }
        };

        info!(
            recording_id = %recording_id,
            tracks = stream.tracks().len(),
            mime_type = recorder.mime_type(),
            "Recording started"
        );

        self.phase = Phase::Recording(ActiveRecording {
            recording_id,
            started_at: Instant::now(),
            stream,
            recorder,
            chunks: ChunkBuffer::new(),
        });
        self.sink.notify(Notification::RecordingStarted);
    }

    fn on_data(&mut self, recording_id: RecordingId, chunk: Vec<u8>) {
        let size = chunk.len();

        let buffer = match &mut self.phase {
            Phase::Recording(active) if active.recording_id == recording_id => {
                Some(&mut active.chunks)
            }
            _ => self
                .finalizing
                .iter_mut()
                .find(|f| f.recording_id == recording_id)
                .map(|f| &mut f.chunks),
        };

        match buffer {
            Some(buffer) => {
                if !buffer.push(chunk) {
                    debug!(recording_id = %recording_id, "Empty chunk dropped");
                }
            }
            None => warn!(recording_id = %recording_id, size, "Chunk for unknown recording dropped"),
        }
    }

    fn on_stopped(&mut self, recording_id: RecordingId) -> Option<Artifact> {
        if let Some(index) = self
            .finalizing
            .iter()
            .position(|f| f.recording_id == recording_id)
        {
            let finalizing = self.finalizing.remove(index);
            return Some(Self::finalize(finalizing));
        }

        let unsolicited = matches!(
            &self.phase,
            Phase::Recording(active) if active.recording_id == recording_id
        );
        if !unsolicited {
            warn!(recording_id = %recording_id, "Stop event for unknown recording ignored");
            return None;
        }

        // The recorder ended on its own (device unplugged, encoder exit).
        let Phase::Recording(active) = std::mem::replace(&mut self.phase, Phase::Idle) else {
            return None;
        };
        let ActiveRecording {
            mut stream,
            recorder,
            chunks,
            ..
        } = active;
        stream.stop_tracks();

        warn!(recording_id = %recording_id, "Recorder stopped unexpectedly");
        self.sink.notify(Notification::RecordingStopped);

        Some(Self::finalize(Finalizing {
            recording_id,
            media_type: recorder.mime_type().to_string(),
            chunks,
        }))
    }

    fn finalize(finalizing: Finalizing) -> Artifact {
        let Finalizing {
            recording_id,
            media_type,
            chunks,
        } = finalizing;

        debug!(
            recording_id = %recording_id,
            chunk_count = chunks.chunk_count(),
            size = chunks.byte_len(),
            "Recording finalized"
        );

        Artifact::new(recording_id, media_type, chunks.into_bytes())
    }
}

impl<B: MediaBackend> Drop for CaptureSession<B> {
    fn drop(&mut self) {
        if let Phase::Recording(active) = &mut self.phase {
            active.recorder.stop();
            active.stream.stop_tracks();
            debug!(recording_id = %active.recording_id, "Session dropped while recording");
        }
    }
}
