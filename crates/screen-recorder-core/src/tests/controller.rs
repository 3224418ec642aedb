use crate::{
    DOWNLOAD_FILE_NAME, DownloadOutcome, DownloadSurface, Notification, NotificationSink,
    RecorderCommand, RecorderController, SessionState,
    media::CaptureConstraints,
    tests::support::{FakeBackend, Grant, MemoryDownloads, Probe, RecordingSink},
};

use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc;

struct Harness {
    controller: RecorderController<FakeBackend>,
    probe: Arc<Probe>,
    sink: Arc<RecordingSink>,
    downloads: Arc<MemoryDownloads>,
}

fn harness(grant: Grant) -> Harness {
    let (backend, probe) = FakeBackend::new(grant);
    let sink = Arc::new(RecordingSink::default());
    let downloads = Arc::new(MemoryDownloads::default());
    let controller = RecorderController::new(
        backend,
        CaptureConstraints::default(),
        Arc::clone(&sink) as Arc<dyn NotificationSink>,
        Arc::clone(&downloads) as Arc<dyn DownloadSurface>,
    );
    Harness {
        controller,
        probe,
        sink,
        downloads,
    }
}

async fn record(harness: &mut Harness, chunks: &[&[u8]]) {
    assert!(harness.controller.start().is_some());
    assert!(harness.controller.pump().await);
    assert_eq!(harness.controller.session().state(), SessionState::Recording);

    let recorder = harness.probe.recorder();
    for chunk in chunks {
        recorder.data_available(chunk.to_vec());
    }
}

/// WHAT: Download with nothing recorded reports NoArtifact
/// WHY: No download may be triggered without a published artifact
#[tokio::test]
async fn given_no_recording_when_downloading_then_no_artifact_reported() {
    // Given: A fresh controller
    let mut h = harness(Grant::Allow);

    // When: Downloading
    let outcome = h.controller.download();

    // Then: Rejected and reported, nothing saved, still idle
    assert_eq!(outcome, DownloadOutcome::NoArtifact);
    assert!(h.downloads.saved().is_empty());
    assert_eq!(h.sink.seen(), vec![Notification::NoArtifactAvailable]);
    assert_eq!(h.controller.session().state(), SessionState::Idle);
}

/// WHAT: Finished recording is published and downloaded under the fixed name
/// WHY: Normal start, stop, download path
#[tokio::test]
async fn given_finished_recording_when_downloading_then_saved_once() {
    // Given: A recording that was stopped and finalized
    let mut h = harness(Grant::Allow);
    record(&mut h, &[&[1, 2], &[3]]).await;
    assert!(h.controller.stop());
    h.controller.drain();
    assert!(h.controller.status().artifact_url.is_some());

    // When: Downloading twice
    let first = h.controller.download();
    let second = h.controller.download();

    // Then: First saved, second rejected
    assert!(matches!(first, DownloadOutcome::Started(ref a) if a.bytes() == [1, 2, 3]));
    assert_eq!(second, DownloadOutcome::NoArtifact);
    assert_eq!(
        h.downloads.saved(),
        vec![(DOWNLOAD_FILE_NAME.to_string(), vec![1, 2, 3])]
    );
    assert_eq!(
        h.sink.seen(),
        vec![
            Notification::RecordingStarted,
            Notification::RecordingStopped,
            Notification::DownloadStarted,
            Notification::NoArtifactAvailable,
        ]
    );
    assert!(h.controller.status().artifact_url.is_none());
}

/// WHAT: Download during a recording stops it and serves the new bytes
/// WHY: A file must never be downloaded while still being written, nor
///      may an older artifact be served in its place
#[tokio::test]
async fn given_recording_with_older_artifact_when_downloading_then_waits_for_new_one() {
    // Given: An older finalized artifact and a second recording in progress
    let mut h = harness(Grant::Allow);
    record(&mut h, &[&[7; 5]]).await;
    h.controller.stop();
    h.controller.drain();
    record(&mut h, &[&[9; 8], &[], &[9; 2]]).await;

    // When: Downloading while recording
    let outcome = h.controller.download();

    // Then: Recording stopped, download deferred, nothing saved yet
    let second_id = h.probe.recorder().recording_id();
    assert_eq!(outcome, DownloadOutcome::Deferred(second_id));
    assert_eq!(h.controller.session().state(), SessionState::Idle);
    assert!(h.controller.status().download_pending);
    assert!(h.downloads.saved().is_empty());

    // When: The recorder finalizes
    h.controller.drain();

    // Then: The new recording's bytes were downloaded, not the older ones
    assert_eq!(
        h.downloads.saved(),
        vec![(DOWNLOAD_FILE_NAME.to_string(), vec![9; 10])]
    );
    assert!(!h.controller.status().download_pending);
    assert!(h.controller.store().current_reference().is_none());
    assert_eq!(h.sink.seen().last(), Some(&Notification::DownloadStarted));
}

/// WHAT: Toggle starts when idle and stops when recording
/// WHY: The hotkey maps to a single toggle command
#[tokio::test]
async fn given_idle_controller_when_toggling_twice_then_recording_cycle_completes() {
    // Given: An idle controller
    let mut h = harness(Grant::Allow);

    // When: Toggling on, applying acquisition, toggling off
    h.controller.toggle();
    assert_eq!(h.controller.session().state(), SessionState::Acquiring);
    h.controller.toggle();
    assert_eq!(h.controller.session().state(), SessionState::Acquiring);
    assert!(h.controller.pump().await);
    h.controller.toggle();

    // Then: Back to idle with one acquisition and one recorder stop
    assert_eq!(h.controller.session().state(), SessionState::Idle);
    assert_eq!(h.probe.acquisitions(), 1);
    assert_eq!(h.probe.recorder_stops(), 1);
}

/// WHAT: Status watchers see every transition
/// WHY: The UI shell renders from status snapshots only
#[tokio::test]
async fn given_subscriber_when_recording_cycle_runs_then_status_follows() {
    // Given: A subscriber
    let mut h = harness(Grant::Allow);
    let status = h.controller.subscribe();

    // When / Then: Each step is reflected
    h.controller.start();
    assert_eq!(status.borrow().session, SessionState::Acquiring);

    h.controller.pump().await;
    assert_eq!(status.borrow().session, SessionState::Recording);
    assert!(!status.borrow().can_download());

    h.controller.stop();
    assert_eq!(status.borrow().session, SessionState::Idle);

    h.controller.drain();
    assert!(status.borrow().can_download());
}

/// WHAT: The run loop processes commands and events until Shutdown
/// WHY: Commands and session events share one cooperative task
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_running_loop_when_commands_sent_then_download_saved_and_loop_exits() {
    // Given: A controller running on its own task
    let h = harness(Grant::Allow);
    let mut status = h.controller.subscribe();
    let (command_tx, command_rx) = mpsc::channel(8);
    let handle = tokio::spawn(h.controller.run(command_rx));

    // When: Starting, emitting a chunk, downloading
    command_tx.send(RecorderCommand::Start).await.unwrap();
    tokio::time::timeout(
        Duration::from_secs(1),
        status.wait_for(|s| s.session == SessionState::Recording),
    )
    .await
    .unwrap()
    .unwrap();

    h.probe.recorder().data_available(vec![4; 16]);
    command_tx.send(RecorderCommand::Download).await.unwrap();

    tokio::time::timeout(
        Duration::from_secs(1),
        status.wait_for(|s| s.session == SessionState::Idle && !s.can_download()),
    )
    .await
    .unwrap()
    .unwrap();

    command_tx.send(RecorderCommand::Shutdown).await.unwrap();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .unwrap()
        .unwrap();

    // Then: The chunk was downloaded and the loop exited
    assert_eq!(
        h.downloads.saved(),
        vec![(DOWNLOAD_FILE_NAME.to_string(), vec![4; 16])]
    );
}
