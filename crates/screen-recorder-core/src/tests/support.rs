//! In-memory stand-ins for the platform seams.

#![allow(clippy::unwrap_used)]

use crate::{
    ArtifactReference, CoreResult, DownloadSurface, Notification, NotificationSink,
    RecorderError,
    media::{
        CaptureConstraints, MediaBackend, MediaRecorder, MediaStream, MediaTrack,
        RecorderEventSender, TrackKind,
    },
};

use std::{
    panic::Location,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use error_location::ErrorLocation;

/// How the fake platform answers a device request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Grant {
    Allow,
    Deny,
    Hang,
    BrokenRecorder,
}

/// Counters shared between a fake backend and the test.
#[derive(Default)]
pub(crate) struct Probe {
    acquisitions: AtomicUsize,
    track_releases: AtomicUsize,
    recorder_stops: AtomicUsize,
    senders: Mutex<Vec<RecorderEventSender>>,
}

impl Probe {
    pub(crate) fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }

    pub(crate) fn track_releases(&self) -> usize {
        self.track_releases.load(Ordering::SeqCst)
    }

    pub(crate) fn recorder_stops(&self) -> usize {
        self.recorder_stops.load(Ordering::SeqCst)
    }

    /// Event sender handed to the most recently created recorder.
    pub(crate) fn recorder(&self) -> RecorderEventSender {
        self.senders.lock().unwrap().last().cloned().unwrap()
    }
}

pub(crate) struct FakeBackend {
    grant: Grant,
    probe: Arc<Probe>,
}

impl FakeBackend {
    pub(crate) fn new(grant: Grant) -> (Arc<Self>, Arc<Probe>) {
        let probe = Arc::new(Probe::default());
        let backend = Arc::new(Self {
            grant,
            probe: Arc::clone(&probe),
        });
        (backend, probe)
    }
}

pub(crate) struct FakeStream {
    tracks: Vec<MediaTrack>,
    probe: Arc<Probe>,
}

impl MediaStream for FakeStream {
    fn tracks(&self) -> &[MediaTrack] {
        &self.tracks
    }

    fn stop_tracks(&mut self) {
        for track in self.tracks.iter_mut().filter(|t| t.is_live()) {
            track.stop();
            self.probe.track_releases.fetch_add(1, Ordering::SeqCst);
        }
    }
}

pub(crate) struct FakeRecorder {
    events: RecorderEventSender,
    probe: Arc<Probe>,
    started: bool,
}

impl MediaRecorder for FakeRecorder {
    fn mime_type(&self) -> &str {
        "video/webm"
    }

    fn start(&mut self) -> CoreResult<()> {
        self.started = true;
        Ok(())
    }

    fn stop(&mut self) {
        if self.started {
            self.started = false;
            self.probe.recorder_stops.fetch_add(1, Ordering::SeqCst);
            self.events.stopped();
        }
    }
}

impl MediaBackend for FakeBackend {
    type Stream = FakeStream;
    type Recorder = FakeRecorder;

    async fn acquire(&self, constraints: CaptureConstraints) -> CoreResult<FakeStream> {
        self.probe.acquisitions.fetch_add(1, Ordering::SeqCst);

        match self.grant {
            Grant::Allow | Grant::BrokenRecorder => {
                let mut tracks = Vec::new();
                if constraints.audio {
                    tracks.push(MediaTrack::new(TrackKind::Audio, "fake-mic"));
                }
                if constraints.video {
                    tracks.push(MediaTrack::new(TrackKind::Video, "fake-cam"));
                }
                Ok(FakeStream {
                    tracks,
                    probe: Arc::clone(&self.probe),
                })
            }
            Grant::Deny => Err(RecorderError::AcquisitionFailed {
                reason: "Permission denied".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
            Grant::Hang => std::future::pending().await,
        }
    }

    fn create_recorder(
        &self,
        _stream: &FakeStream,
        events: RecorderEventSender,
    ) -> CoreResult<FakeRecorder> {
        if self.grant == Grant::BrokenRecorder {
            return Err(RecorderError::RecorderFailed {
                reason: "encoder unavailable".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.probe.senders.lock().unwrap().push(events.clone());

        Ok(FakeRecorder {
            events,
            probe: Arc::clone(&self.probe),
            started: false,
        })
    }
}

/// Sink that remembers every notification.
#[derive(Default)]
pub(crate) struct RecordingSink {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub(crate) fn seen(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

/// Download surface that keeps saved files in memory.
#[derive(Default)]
pub(crate) struct MemoryDownloads {
    saved: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemoryDownloads {
    pub(crate) fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.lock().unwrap().clone()
    }
}

impl DownloadSurface for MemoryDownloads {
    fn save(&self, reference: &ArtifactReference, suggested_name: &str) {
        if let Some(artifact) = reference.open() {
            self.saved
                .lock()
                .unwrap()
                .push((suggested_name.to_string(), artifact.bytes().to_vec()));
        }
    }
}
