//! Store configuration

use vellum_core::Timestamp;

/// Configuration for [`MemoryRevisionStore`](crate::MemoryRevisionStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Revisions handed out per `RevisionStream::next_batch` call.
    /// Values below 1 are treated as 1.
    pub stream_batch_size: usize,
    /// Earliest time the store accepts and serves.
    pub epoch: Timestamp,
    /// Carry document bodies on streamed revisions instead of requiring a
    /// separate `documents` fetch.
    pub inline_documents: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            stream_batch_size: 64,
            epoch: Timestamp::EPOCH,
            inline_documents: false,
        }
    }
}

impl StoreConfig {
    pub fn with_stream_batch_size(mut self, size: usize) -> Self {
        self.stream_batch_size = size;
        self
    }

    pub fn with_epoch(mut self, epoch: Timestamp) -> Self {
        self.epoch = epoch;
        self
    }

    pub fn with_inline_documents(mut self, inline: bool) -> Self {
        self.inline_documents = inline;
        self
    }
}
