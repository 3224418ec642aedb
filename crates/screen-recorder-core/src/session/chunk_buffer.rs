/// Ordered, append-only sequence of encoded chunks for one recording.
///
/// Empty chunks are discarded on arrival; everything else is kept in arrival
/// order without deduplication.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChunkBuffer {
    chunks: Vec<Vec<u8>>,
    byte_len: usize,
}

impl ChunkBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `chunk`. Returns `false` if it was empty and therefore dropped.
    pub fn push(&mut self, chunk: Vec<u8>) -> bool {
        if chunk.is_empty() {
            return false;
        }
        self.byte_len += chunk.len();
        self.chunks.push(chunk);
        true
    }

    /// Number of retained chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Total retained bytes.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Whether no data was retained.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Concatenates the chunks in arrival order.
    pub fn into_bytes(self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.byte_len);
        for chunk in self.chunks {
            bytes.extend_from_slice(&chunk);
        }
        bytes
    }
}
