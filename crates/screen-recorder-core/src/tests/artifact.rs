use crate::{
    Artifact, ArtifactStore, DOWNLOAD_FILE_NAME, DownloadSurface, FileDownloadSurface,
    RecorderError, candidate_paths, tests::support::MemoryDownloads, write_download,
};

use std::{fs, path::PathBuf};

use uuid::Uuid;

fn artifact(bytes: &[u8]) -> Artifact {
    Artifact::new(Uuid::new_v4(), "video/webm", bytes.to_vec())
}

fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("screen-recorder-test-{}", Uuid::new_v4()))
}

/// WHAT: No reference exists before the first publish
/// WHY: The download control must start disabled
#[test]
fn given_empty_store_when_asking_for_reference_then_none() {
    // Given: A fresh store
    let store = ArtifactStore::new();

    // When / Then: No reference
    assert!(store.current_reference().is_none());
}

/// WHAT: Second publish revokes the first reference
/// WHY: At most one reference may be live at a time
#[test]
fn given_two_publishes_when_checking_first_reference_then_revoked() {
    // Given: A store with one published artifact
    let mut store = ArtifactStore::new();
    let first = store.publish(artifact(&[1, 2, 3]));
    assert!(first.is_live());

    // When: Publishing a second artifact
    let second = store.publish(artifact(&[4, 5]));

    // Then: Only the second reference resolves
    assert!(!first.is_live());
    assert!(first.open().is_none());
    assert!(store.resolve(first.url()).is_none());
    assert!(second.is_live());
    assert_ne!(first, second);
    assert_eq!(store.current_reference(), Some(second.clone()));
    assert_eq!(second.open().map(|a| a.bytes().to_vec()), Some(vec![4, 5]));
}

/// WHAT: Holding opened bytes does not keep a reference alive
/// WHY: The store alone decides when a reference is released
#[test]
fn given_opened_artifact_when_replaced_then_reference_still_revoked() {
    // Given: A consumer holding bytes opened through the reference
    let mut store = ArtifactStore::new();
    let reference = store.publish(artifact(&[9; 4]));
    let held = reference.open();
    assert!(held.is_some());

    // When: The store publishes a replacement
    store.publish(artifact(&[8]));

    // Then: The old reference is dead even though the bytes are still held
    assert!(!reference.is_live());
    assert!(reference.open().is_none());
    assert_eq!(held.map(|a| a.len()), Some(4));
}

/// WHAT: Consuming with nothing published reports NoArtifact
/// WHY: Download must be rejected without touching the download surface
#[test]
fn given_nothing_published_when_consuming_then_no_artifact_and_no_download() {
    // Given: An empty store and a download surface
    let mut store = ArtifactStore::new();
    let downloads = MemoryDownloads::default();

    // When: Consuming
    let result = store.consume_for_download(&downloads);

    // Then: NoArtifact and nothing saved
    assert!(matches!(result, Err(RecorderError::NoArtifact { .. })));
    assert!(downloads.saved().is_empty());
}

/// WHAT: An artifact can be downloaded exactly once per publish
/// WHY: The reference is revoked after the download is triggered
#[test]
fn given_published_artifact_when_consuming_twice_then_second_rejected() {
    // Given: A published artifact
    let mut store = ArtifactStore::new();
    let reference = store.publish(artifact(&[7; 12]));
    let downloads = MemoryDownloads::default();

    // When: Consuming twice
    let first = store.consume_for_download(&downloads);
    let second = store.consume_for_download(&downloads);

    // Then: One save under the fixed name, reference revoked, second rejected
    assert!(first.is_ok());
    assert!(matches!(second, Err(RecorderError::NoArtifact { .. })));
    assert_eq!(
        downloads.saved(),
        vec![(DOWNLOAD_FILE_NAME.to_string(), vec![7; 12])]
    );
    assert!(!reference.is_live());
    assert!(store.current_reference().is_none());
}

/// WHAT: Candidate names follow the browser numbering convention
/// WHY: Duplicate downloads are named `name (N).ext`
#[test]
fn given_file_name_when_listing_candidates_then_numbered_after_first() {
    // Given: A directory and the default name
    let dir = PathBuf::from("downloads");

    // When: Taking the first three candidates
    let candidates: Vec<PathBuf> = candidate_paths(&dir, DOWNLOAD_FILE_NAME).take(3).collect();

    // Then: Plain name first, then numbered copies
    assert_eq!(
        candidates,
        vec![
            dir.join(DOWNLOAD_FILE_NAME),
            dir.join("recorded_video (1).webm"),
            dir.join("recorded_video (2).webm"),
        ]
    );
}

/// WHAT: Existing downloads are not overwritten
/// WHY: Mirrors the browser convention of numbering duplicate names
#[test]
#[allow(clippy::unwrap_used)]
fn given_existing_files_when_writing_download_then_next_free_number_used() {
    // Given: A directory already holding the default name and its first copy
    let dir = scratch_dir();
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(DOWNLOAD_FILE_NAME), b"old").unwrap();
    fs::write(dir.join("recorded_video (1).webm"), b"old").unwrap();

    // When: Writing a download
    let path = write_download(&dir, DOWNLOAD_FILE_NAME, &[5, 6]).unwrap();

    // Then: The next free number is used and the old files are untouched
    assert_eq!(path, dir.join("recorded_video (2).webm"));
    assert_eq!(fs::read(&path).unwrap(), vec![5, 6]);
    assert_eq!(fs::read(dir.join(DOWNLOAD_FILE_NAME)).unwrap(), b"old");

    fs::remove_dir_all(&dir).unwrap();
}

/// WHAT: Two large downloads written concurrently both survive
/// WHY: Back-to-back consumes run on separate blocking tasks and must not
///      share a temp file or a final name
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[allow(clippy::unwrap_used)]
async fn given_two_concurrent_downloads_when_writing_then_both_files_kept() {
    // Given: Two large, distinct payloads and an empty directory
    let dir = scratch_dir();
    let first = vec![1u8; 16 * 1024 * 1024];
    let second = vec![2u8; 16 * 1024 * 1024];

    // When: Writing both at once, as two consumes would
    let first_dir = dir.clone();
    let first_write =
        tokio::task::spawn_blocking(move || write_download(&first_dir, DOWNLOAD_FILE_NAME, &first));
    let second_dir = dir.clone();
    let second_write = tokio::task::spawn_blocking(move || {
        write_download(&second_dir, DOWNLOAD_FILE_NAME, &second)
    });
    let first_path = first_write.await.unwrap().unwrap();
    let second_path = second_write.await.unwrap().unwrap();

    // Then: Two distinct files, each holding its own bytes, no temp files left
    assert_ne!(first_path, second_path);
    let first_bytes = fs::read(&first_path).unwrap();
    let second_bytes = fs::read(&second_path).unwrap();
    assert_eq!(first_bytes.len(), 16 * 1024 * 1024);
    assert!(first_bytes.iter().all(|b| *b == 1));
    assert_eq!(second_bytes.len(), 16 * 1024 * 1024);
    assert!(second_bytes.iter().all(|b| *b == 2));

    let mut names: Vec<String> = fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "recorded_video (1).webm".to_string(),
            DOWNLOAD_FILE_NAME.to_string(),
        ]
    );

    fs::remove_dir_all(&dir).unwrap();
}

/// WHAT: write_download creates the directory and writes the bytes
/// WHY: The download surface must leave a complete file under its final name
#[test]
#[allow(clippy::unwrap_used)]
fn given_missing_directory_when_writing_download_then_file_created() {
    // Given: A directory that does not exist yet
    let dir = scratch_dir();

    // When: Writing a download
    let path = write_download(&dir, DOWNLOAD_FILE_NAME, &[1, 2, 3]).unwrap();

    // Then: File exists with the exact bytes and no temp file remains
    assert_eq!(path, dir.join(DOWNLOAD_FILE_NAME));
    assert_eq!(fs::read(&path).unwrap(), vec![1, 2, 3]);
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);

    fs::remove_dir_all(&dir).unwrap();
}

/// WHAT: FileDownloadSurface writes inline when no runtime is present
/// WHY: The surface must be usable from plain threads as well as async code
#[test]
#[allow(clippy::unwrap_used)]
fn given_file_surface_without_runtime_when_saving_then_written_immediately() {
    // Given: A published artifact and a file surface
    let dir = scratch_dir();
    let surface = FileDownloadSurface::new(&dir);
    let mut store = ArtifactStore::new();
    store.publish(artifact(&[3; 8]));

    // When: Consuming through the surface
    let consumed = store.consume_for_download(&surface);

    // Then: The file holds the artifact bytes
    assert!(consumed.is_ok());
    assert_eq!(fs::read(dir.join(DOWNLOAD_FILE_NAME)).unwrap(), vec![3; 8]);

    fs::remove_dir_all(&dir).unwrap();
}

/// WHAT: Saving a revoked reference writes nothing
/// WHY: A stale reference must never resurrect old bytes
#[test]
fn given_revoked_reference_when_saving_then_nothing_written() {
    // Given: A reference revoked by a newer publish
    let dir = scratch_dir();
    let surface = FileDownloadSurface::new(&dir);
    let mut store = ArtifactStore::new();
    let stale = store.publish(artifact(&[1]));
    store.publish(artifact(&[2]));

    // When: Saving the stale reference directly
    surface.save(&stale, DOWNLOAD_FILE_NAME);

    // Then: No file and no directory were created
    assert!(!dir.exists());
}
