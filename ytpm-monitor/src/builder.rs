//! Snapshot builder
//!
//! Fetches the monitored prefix through a [`PlaylistExtractor`], classifies
//! each available entry and assembles a timestamped [`Snapshot`].

use crate::extractor::{PlaylistExtractor, PlaylistListing};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};
use ytpm_common::models::watch_url;
use ytpm_common::{time, Entry, EntryClassifier, Result, Snapshot};

/// Builds the current snapshot of a playlist prefix
pub struct SnapshotBuilder {
    extractor: Arc<dyn PlaylistExtractor>,
    classifier: EntryClassifier,
    playlist_url: String,
    prefix_size: usize,
}

impl SnapshotBuilder {
    pub fn new(
        extractor: Arc<dyn PlaylistExtractor>,
        classifier: EntryClassifier,
        playlist_url: impl Into<String>,
        prefix_size: usize,
    ) -> Self {
        Self {
            extractor,
            classifier,
            playlist_url: playlist_url.into(),
            prefix_size,
        }
    }

    pub fn playlist_url(&self) -> &str {
        &self.playlist_url
    }

    /// Fetch and classify the monitored prefix.
    ///
    /// Fails only when the extractor fails; unavailable entries are skipped.
    pub async fn build(&self) -> Result<Snapshot> {
        let listing = self
            .extractor
            .fetch_prefix(&self.playlist_url, self.prefix_size)
            .await?;
        Ok(self.assemble(listing, time::now()))
    }

    /// Turn a listing into a snapshot observed at `taken_at`.
    ///
    /// Positions are assigned contiguously over the kept entries, so an
    /// unavailable slot does not leave a gap.
    pub fn assemble(&self, listing: PlaylistListing, taken_at: DateTime<Utc>) -> Snapshot {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(self.prefix_size.min(listing.entries.len()));

        for (slot, raw) in listing.entries.into_iter().take(self.prefix_size).enumerate() {
            let Some(raw) = raw else {
                debug!("Skipping unavailable entry in slot {}", slot + 1);
                continue;
            };
            if !seen.insert(raw.id.clone()) {
                warn!(entry_id = %raw.id, "Entry listed twice in monitored prefix, keeping first");
                continue;
            }

            let tier = self.classifier.classify(&raw.title);
            debug!(entry_id = %raw.id, %tier, "Classified \"{}\"", raw.title);

            entries.push(Entry {
                position: entries.len() as u32 + 1,
                url: watch_url(&raw.id),
                id: raw.id,
                title: raw.title,
                tier,
                observed_at: taken_at,
            });
        }

        Snapshot {
            playlist_id: listing.playlist_id,
            playlist_title: listing.playlist_title,
            total_entry_count: listing.total_entry_count,
            taken_at,
            entries,
        }
    }
}
