//! Screen Recorder Core Library
//!
//! Recording lifecycle for camera + microphone capture: acquires the devices,
//! drives a recorder through start/stop, accumulates encoded chunks and
//! publishes the finished recording behind a revocable reference that can be
//! downloaded once.
//!
//! # Example
//!
//! ```no_run
//! use screen_recorder_core::{
//!     CaptureConstraints, FfmpegBackend, FileDownloadSurface, RecorderCommand,
//!     RecorderController, TracingSink,
//! };
//!
//! use std::sync::Arc;
//!
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let controller = RecorderController::new(
//!         Arc::new(FfmpegBackend::default()),
//!         CaptureConstraints::default(),
//!         Arc::new(TracingSink),
//!         Arc::new(FileDownloadSurface::new("downloads")),
//!     );
//!
//!     let (command_tx, command_rx) = mpsc::channel(32);
//!     let handle = tokio::spawn(controller.run(command_rx));
//!
//!     let _ = command_tx.send(RecorderCommand::Start).await;
//!     tokio::time::sleep(std::time::Duration::from_secs(3)).await;
//!     let _ = command_tx.send(RecorderCommand::Download).await;
//!     tokio::time::sleep(std::time::Duration::from_secs(1)).await;
//!     let _ = command_tx.send(RecorderCommand::Shutdown).await;
//!     let _ = handle.await;
//! }
//! ```

mod artifact;
mod controller;
mod error;
pub mod media;
mod notify;
mod session;
mod timer;

pub use {
    artifact::{
        Artifact, ArtifactReference, ArtifactStore, DOWNLOAD_FILE_NAME, DownloadSurface,
        FileDownloadSurface, candidate_paths, write_download,
    },
    controller::{DownloadOutcome, RecorderCommand, RecorderController, RecorderStatus},
    error::{RecorderError, Result as CoreResult},
    media::{CaptureConstraints, FfmpegBackend, FfmpegSettings, RecordingId},
    notify::{
        Notification, NotificationSink, SESSION_TOAST_DURATION, Severity, TIMER_TOAST_DURATION,
        TracingSink,
    },
    session::{CaptureSession, ChunkBuffer, SessionEvent, SessionState},
    timer::{DEFAULT_WORK_DURATION, TICK_INTERVAL, TimerTick, WorkTimer, format_clock},
};

#[cfg(test)]
mod tests;
