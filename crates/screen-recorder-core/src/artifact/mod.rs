#[allow(clippy::module_inception)]
mod artifact;
mod download;
mod reference;
mod store;

pub(crate) use reference::ObjectUrl;

pub use {
    artifact::Artifact,
    download::{
        DOWNLOAD_FILE_NAME, DownloadSurface, FileDownloadSurface, candidate_paths, write_download,
    },
    reference::ArtifactReference,
    store::ArtifactStore,
};
