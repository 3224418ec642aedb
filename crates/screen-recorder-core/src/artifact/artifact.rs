use crate::media::RecordingId;

/// Finalized, immutable recording payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    recording_id: RecordingId,
    media_type: String,
    bytes: Vec<u8>,
}

impl Artifact {
    /// Wraps finalized bytes produced by `recording_id`.
    pub fn new(recording_id: RecordingId, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            recording_id,
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Recording that produced this artifact.
    pub fn recording_id(&self) -> RecordingId {
        self.recording_id
    }

    /// Container type, e.g. `video/webm`.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Encoded payload.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the recorder produced no data at all.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
