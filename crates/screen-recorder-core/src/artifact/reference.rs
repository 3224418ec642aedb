//! Scoped object URLs for published artifacts.
//!
//! The store owns one [`ObjectUrl`] per published artifact. Every
//! [`ArtifactReference`] handed out is a weak view of it: once the store drops
//! the guard, all clones of the reference stop resolving, even if a consumer
//! still holds bytes it opened earlier.

use crate::artifact::Artifact;

use std::{
    fmt,
    sync::{Arc, Weak},
};

use tracing::debug;
use uuid::Uuid;

const URL_SCHEME: &str = "blob:screen-recorder/";

#[derive(Debug)]
struct Slot {
    artifact: Arc<Artifact>,
}

/// Owning side of an artifact reference. Dropping it revokes the URL.
pub(crate) struct ObjectUrl {
    url: String,
    slot: Arc<Slot>,
}

impl ObjectUrl {
    pub(crate) fn mint(artifact: Arc<Artifact>) -> Self {
        let url = format!("{}{}", URL_SCHEME, Uuid::new_v4());
        debug!(
            url = %url,
            recording_id = %artifact.recording_id(),
            size = artifact.len(),
            "Object URL minted"
        );
        Self {
            url,
            slot: Arc::new(Slot { artifact }),
        }
    }

    pub(crate) fn url(&self) -> &str {
        &self.url
    }

    pub(crate) fn reference(&self) -> ArtifactReference {
        ArtifactReference {
            url: self.url.clone(),
            slot: Arc::downgrade(&self.slot),
        }
    }

    pub(crate) fn artifact(&self) -> Arc<Artifact> {
        Arc::clone(&self.slot.artifact)
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        debug!(url = %self.url, "Object URL revoked");
    }
}

impl fmt::Debug for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectUrl").field("url", &self.url).finish()
    }
}

/// Borrowed, URL-like handle to a published artifact.
///
/// Cheap to clone. Never keeps the artifact alive on its own.
#[derive(Clone)]
pub struct ArtifactReference {
    url: String,
    slot: Weak<Slot>,
}

impl ArtifactReference {
    /// The URL string, e.g. `blob:screen-recorder/<uuid>`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the owning store still publishes this reference.
    pub fn is_live(&self) -> bool {
        self.slot.strong_count() > 0
    }

    /// Dereferences the URL. `None` once revoked.
    pub fn open(&self) -> Option<Arc<Artifact>> {
        self.slot.upgrade().map(|slot| Arc::clone(&slot.artifact))
    }
}

impl PartialEq for ArtifactReference {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for ArtifactReference {}

impl fmt::Debug for ArtifactReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactReference")
            .field("url", &self.url)
            .field("live", &self.is_live())
            .finish()
    }
}

impl fmt::Display for ArtifactReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
