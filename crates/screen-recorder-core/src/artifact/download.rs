//! Download surface: where consumed artifacts are written.

use crate::artifact::ArtifactReference;

use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Fixed file name suggested for every download.
pub const DOWNLOAD_FILE_NAME: &str = "recorded_video.webm";

/// Browser-style "save as" flow.
///
/// Fire and forget: failures are the surface's concern and are never
/// reported back to the store.
pub trait DownloadSurface: Send + Sync {
    /// Saves the bytes behind `reference` under `suggested_name`.
    ///
    /// The reference is only guaranteed to resolve for the duration of this
    /// call.
    fn save(&self, reference: &ArtifactReference, suggested_name: &str);
}

/// Saves downloads into a directory on disk.
#[derive(Debug, Clone)]
pub struct FileDownloadSurface {
    directory: PathBuf,
}

impl FileDownloadSurface {
    /// Creates a surface writing into `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl DownloadSurface for FileDownloadSurface {
    #[instrument(skip(self))]
    fn save(&self, reference: &ArtifactReference, suggested_name: &str) {
        let Some(artifact) = reference.open() else {
            warn!(url = %reference, "Download requested for a revoked reference");
            return;
        };

        let directory = self.directory.clone();
        let name = suggested_name.to_string();
        let write = move || match write_download(&directory, &name, artifact.bytes()) {
            Ok(path) => info!(path = ?path, size = artifact.len(), "Download saved"),
            Err(e) => error!(error = %e, directory = ?directory, "Download failed"),
        };

        // The bytes are already detached from the reference, so the write can
        // outlive the store's revocation.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => drop(handle.spawn_blocking(write)),
            Err(_) => write(),
        }
    }
}

/// Writes `bytes` into `directory` under `name`, or `name (N).ext` when taken.
///
/// The bytes land in a temp file unique to this write, then the final name is
/// claimed with `create_new` and the temp file renamed over the claim. Two
/// concurrent writes never share a temp file or a final name.
pub fn write_download(directory: &Path, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    fs::create_dir_all(directory)?;

    let temp = directory.join(format!(".{}.{}.part", name, Uuid::new_v4()));
    if let Err(e) = write_temp(&temp, bytes) {
        let _ = fs::remove_file(&temp);
        return Err(e);
    }

    let target = match claim_name(directory, name) {
        Ok(target) => target,
        Err(e) => {
            let _ = fs::remove_file(&temp);
            return Err(e);
        }
    };

    if let Err(e) = fs::rename(&temp, &target) {
        let _ = fs::remove_file(&temp);
        let _ = fs::remove_file(&target);
        return Err(e);
    }

    Ok(target)
}

fn write_temp(temp: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(temp)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Atomically reserves the first free candidate by creating it empty.
fn claim_name(directory: &Path, name: &str) -> io::Result<PathBuf> {
    for candidate in candidate_paths(directory, name) {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(_) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!(path = ?candidate, "Download name taken");
            }
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free name for {}", name),
    ))
}

/// Paths tried for `name` in `directory`: the name itself, then browser-style
/// `name (1).ext`, `name (2).ext` and so on.
pub fn candidate_paths(directory: &Path, name: &str) -> impl Iterator<Item = PathBuf> {
    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    let extension = path.extension().map(|e| e.to_string_lossy().into_owned());
    let directory = directory.to_path_buf();

    std::iter::once(directory.join(name)).chain((1u32..).map(move |n| match &extension {
        Some(ext) => directory.join(format!("{} ({}).{}", stem, n, ext)),
        None => directory.join(format!("{} ({})", stem, n)),
    }))
}
