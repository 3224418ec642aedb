mod backend;
pub(crate) mod ffmpeg;

pub use backend::{
    CaptureConstraints, MediaBackend, MediaRecorder, MediaStream, MediaTrack, RecorderEvent,
    RecorderEventSender, RecordingId, TrackKind,
};
pub use ffmpeg::{FfmpegBackend, FfmpegRecorder, FfmpegSettings, FfmpegStream, WEBM_MIME_TYPE};
