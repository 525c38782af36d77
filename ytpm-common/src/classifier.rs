//! Entry classifier
//!
//! Maps an entry title to a [`Tier`] by substring match against a configured
//! marker token (by default `限免`, "limited-time free").
//!
//! This is a heuristic proxy: the flat playlist listing carries no
//! authoritative access field, so the title is the only signal consulted.
//! Anything without the marker is treated as restricted.

use crate::models::Tier;
use crate::{Error, Result};

/// Default "limited-time free" marker
pub const DEFAULT_TITLE_MARKER: &str = "限免";

/// Title-substring tier classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryClassifier {
    marker: String,
}

impl EntryClassifier {
    /// Create a classifier for the given marker.
    ///
    /// A blank marker would classify every title as open, so it is rejected.
    pub fn new(marker: impl Into<String>) -> Result<Self> {
        let marker = marker.into();
        if marker.trim().is_empty() {
            return Err(Error::InvalidInput(
                "title marker must not be blank".to_string(),
            ));
        }
        Ok(Self { marker })
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Classify a title. Total and deterministic; no I/O.
    pub fn classify(&self, title: &str) -> Tier {
        if title.contains(self.marker.as_str()) {
            Tier::Open
        } else {
            Tier::Restricted
        }
    }
}

impl Default for EntryClassifier {
    fn default() -> Self {
        Self {
            marker: DEFAULT_TITLE_MARKER.to_string(),
        }
    }
}
