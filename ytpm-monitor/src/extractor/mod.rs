//! Playlist extractor capability
//!
//! The monitor never talks to the video platform directly. An extractor
//! returns a flat listing of the leading playlist entries, or a structured
//! [`Error::Extraction`](ytpm_common::Error::Extraction) when the listing as a
//! whole cannot be retrieved. Individual entries carry no access information;
//! tier is inferred from titles by the classifier.

pub mod ytdlp;

pub use ytdlp::YtDlpExtractor;

use async_trait::async_trait;
use ytpm_common::Result;

/// One raw playlist slot as reported by the extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub id: String,
    /// Empty when the platform reported no title
    pub title: String,
}

/// Flat listing of a playlist prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistListing {
    pub playlist_id: String,
    pub playlist_title: String,
    /// Size of the whole remote playlist
    pub total_entry_count: u64,
    /// Leading slots in remote order; `None` marks an unavailable entry
    pub entries: Vec<Option<RawEntry>>,
}

/// Source of playlist listings
///
/// Implementations enforce their own timeouts and never return a partial
/// listing on failure.
#[async_trait]
pub trait PlaylistExtractor: Send + Sync {
    /// Extractor name for logging
    fn name(&self) -> &'static str;

    /// Fetch at most `n` leading entries of `playlist`
    async fn fetch_prefix(&self, playlist: &str, n: usize) -> Result<PlaylistListing>;
}
