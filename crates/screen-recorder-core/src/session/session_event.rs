use crate::{
    CoreResult,
    media::{RecorderEvent, RecordingId},
};

use std::fmt;

/// Everything a [`crate::CaptureSession`] reacts to besides direct calls.
///
/// Acquisition results and recorder events share one queue so they are
/// handled one at a time, in arrival order.
pub enum SessionEvent<S> {
    /// The platform answered a device request.
    Acquired {
        /// Recording the request was made for.
        recording_id: RecordingId,
        /// Acquired stream or the reason it was refused.
        result: CoreResult<S>,
    },
    /// The bound recorder emitted an event.
    Recorder(RecorderEvent),
}

impl<S> fmt::Debug for SessionEvent<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::Acquired {
                recording_id,
                result,
            } => f
                .debug_struct("Acquired")
                .field("recording_id", recording_id)
                .field("granted", &result.is_ok())
                .finish(),
            SessionEvent::Recorder(RecorderEvent::DataAvailable {
                recording_id,
                chunk,
            }) => f
                .debug_struct("DataAvailable")
                .field("recording_id", recording_id)
                .field("size", &chunk.len())
                .finish(),
            SessionEvent::Recorder(event) => fmt::Debug::fmt(event, f),
        }
    }
}
