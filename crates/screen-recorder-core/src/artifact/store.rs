use crate::{
    CoreResult, RecorderError,
    artifact::{Artifact, ArtifactReference, DOWNLOAD_FILE_NAME, DownloadSurface, ObjectUrl},
};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tracing::{info, instrument};

/// Holds the most recently finalized recording and its single live reference.
#[derive(Debug, Default)]
pub struct ArtifactStore {
    live: Option<ObjectUrl>,
}

impl ArtifactStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored artifact.
    ///
    /// The previous reference is revoked before the new one is minted, so at
    /// most one reference is live at any time.
    #[instrument(skip(self, artifact), fields(recording_id = %artifact.recording_id()))]
    pub fn publish(&mut self, artifact: Artifact) -> ArtifactReference {
        drop(self.live.take());

        let size = artifact.len();
        let object = ObjectUrl::mint(Arc::new(artifact));
        let reference = object.reference();
        self.live = Some(object);

        info!(url = %reference, size, "Artifact published");

        reference
    }

    /// The live reference, if an artifact is published and not yet consumed.
    pub fn current_reference(&self) -> Option<ArtifactReference> {
        self.live.as_ref().map(ObjectUrl::reference)
    }

    /// Dereferences `url` if it is the live reference.
    pub fn resolve(&self, url: &str) -> Option<Arc<Artifact>> {
        self.live
            .as_ref()
            .filter(|object| object.url() == url)
            .map(ObjectUrl::artifact)
    }

    /// Hands the live artifact to `surface` under [`DOWNLOAD_FILE_NAME`], then
    /// revokes its reference.
    ///
    /// Each publish can be consumed once.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::NoArtifact`] when nothing is published.
    #[track_caller]
    #[instrument(skip(self, surface))]
    pub fn consume_for_download(
        &mut self,
        surface: &dyn DownloadSurface,
    ) -> CoreResult<Arc<Artifact>> {
        let object = self.live.take().ok_or_else(|| RecorderError::NoArtifact {
            location: ErrorLocation::from(Location::caller()),
        })?;

        let reference = object.reference();
        surface.save(&reference, DOWNLOAD_FILE_NAME);

        let artifact = object.artifact();
        drop(object);

        info!(
            recording_id = %artifact.recording_id(),
            size = artifact.len(),
            "Artifact consumed for download"
        );

        Ok(artifact)
    }
}
