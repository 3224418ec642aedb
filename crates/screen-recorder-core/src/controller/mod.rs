//! Single-task event loop joining the capture session and the artifact store.
//!
//! All state changes happen on one task, one event at a time: user commands
//! and session events (acquisition results, recorder chunks, finalize) are
//! multiplexed with `tokio::select!` and never run in parallel.

mod command;

pub use command::{DownloadOutcome, RecorderCommand, RecorderStatus};

use crate::{
    ArtifactStore, CaptureSession, DownloadSurface, Notification, NotificationSink,
    media::{CaptureConstraints, MediaBackend, RecordingId},
    session::{SessionEvent, SessionState},
};

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument};

/// Owns the recording core and enforces the rules that span session and store.
pub struct RecorderController<B: MediaBackend> {
    session: CaptureSession<B>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent<B::Stream>>,
    store: ArtifactStore,
    sink: Arc<dyn NotificationSink>,
    downloads: Arc<dyn DownloadSurface>,
    pending_download: Option<RecordingId>,
    status_tx: watch::Sender<RecorderStatus>,
}

impl<B: MediaBackend> RecorderController<B> {
    /// Creates an idle controller.
    pub fn new(
        backend: Arc<B>,
        constraints: CaptureConstraints,
        sink: Arc<dyn NotificationSink>,
        downloads: Arc<dyn DownloadSurface>,
    ) -> Self {
        let (session, events_rx) = CaptureSession::new(backend, constraints, Arc::clone(&sink));
        let (status_tx, _) = watch::channel(RecorderStatus::default());

        Self {
            session,
            events_rx,
            store: ArtifactStore::new(),
            sink,
            downloads,
            pending_download: None,
            status_tx,
        }
    }

    /// Watches status snapshots published after every transition.
    pub fn subscribe(&self) -> watch::Receiver<RecorderStatus> {
        self.status_tx.subscribe()
    }

    /// Current status snapshot.
    pub fn status(&self) -> RecorderStatus {
        RecorderStatus {
            session: self.session.state(),
            artifact_url: self
                .store
                .current_reference()
                .map(|reference| reference.url().to_string()),
            download_pending: self.pending_download.is_some(),
        }
    }

    /// The capture session.
    pub fn session(&self) -> &CaptureSession<B> {
        &self.session
    }

    /// The artifact store.
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Starts a recording. No-op unless idle.
    pub fn start(&mut self) -> Option<RecordingId> {
        let recording_id = self.session.start();
        self.publish_status();
        recording_id
    }

    /// Stops the active recording. No-op unless recording.
    pub fn stop(&mut self) -> bool {
        let stopped = self.session.stop();
        self.publish_status();
        stopped
    }

    /// Starts when idle, stops when recording, ignores everything else.
    pub fn toggle(&mut self) {
        match self.session.state() {
            SessionState::Idle => {
                self.start();
            }
            SessionState::Recording => {
                self.stop();
            }
            state => debug!(state = %state, "Toggle ignored"),
        }
    }

    /// Downloads the latest artifact.
    ///
    /// A running recording is stopped first. If a stopped recording has not
    /// finalized yet, the download waits for that recording's artifact
    /// instead of serving an older one.
    #[instrument(skip(self))]
    pub fn download(&mut self) -> DownloadOutcome {
        if self.session.is_recording() {
            info!("Download requested while recording, stopping first");
            self.session.stop();
        }

        if let Some(recording_id) = self.session.pending_finalize() {
            self.pending_download = Some(recording_id);
            info!(recording_id = %recording_id, "Download deferred until recording finalizes");
            self.publish_status();
            return DownloadOutcome::Deferred(recording_id);
        }

        let outcome = self.consume_now();
        self.publish_status();
        outcome
    }

    /// Applies one user command. `Shutdown` stops any active recording.
    #[instrument(skip(self))]
    pub fn handle_command(&mut self, command: RecorderCommand) {
        match command {
            RecorderCommand::Start => {
                self.start();
            }
            RecorderCommand::Stop | RecorderCommand::Shutdown => {
                self.stop();
            }
            RecorderCommand::ToggleRecording => self.toggle(),
            RecorderCommand::Download => {
                self.download();
            }
        }
    }

    /// Applies one session event, publishing and delivering artifacts.
    pub fn handle_event(&mut self, event: SessionEvent<B::Stream>) {
        if let Some(artifact) = self.session.handle_event(event) {
            let recording_id = artifact.recording_id();
            self.store.publish(artifact);

            if self.pending_download == Some(recording_id) {
                self.pending_download = None;
                self.consume_now();
            }
        }

        self.publish_status();
    }

    /// Waits for the next session event and applies it.
    ///
    /// Returns `false` if the event queue is closed.
    pub async fn pump(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    /// Applies every session event already queued. Returns how many ran.
    pub fn drain(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Runs until `Shutdown` arrives or every command sender is dropped.
    #[instrument(skip_all)]
    pub async fn run(mut self, mut command_rx: mpsc::Receiver<RecorderCommand>) {
        info!("Recorder controller running");
        self.publish_status();

        loop {
            tokio::select! {
                Some(event) = self.events_rx.recv() => self.handle_event(event),
                command = command_rx.recv() => match command {
                    Some(RecorderCommand::Shutdown) | None => {
                        self.handle_command(RecorderCommand::Shutdown);
                        break;
                    }
                    Some(command) => self.handle_command(command),
                },
            }
        }

        info!("Recorder controller stopped");
    }

    fn consume_now(&mut self) -> DownloadOutcome {
        match self.store.consume_for_download(self.downloads.as_ref()) {
            Ok(artifact) => {
                self.sink.notify(Notification::DownloadStarted);
                DownloadOutcome::Started(artifact)
            }
            Err(e) => {
                debug!(error = %e, "Nothing to download");
                self.sink.notify(Notification::NoArtifactAvailable);
                DownloadOutcome::NoArtifact
            }
        }
    }

    fn publish_status(&self) {
        let status = self.status();
        self.status_tx.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });
    }
}
