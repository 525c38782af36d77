//! Playlist observation data model
//!
//! A [`Snapshot`] is one observation of the monitored prefix of a playlist.
//! Snapshots are the only state that crosses cycle boundaries; a
//! [`Transition`] is derived from two of them and never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Watch page prefix used to derive entry URLs
const WATCH_URL_BASE: &str = "https://www.youtube.com/watch?v=";

/// Derive the watch URL for a video id
pub fn watch_url(id: &str) -> String {
    format!("{}{}", WATCH_URL_BASE, id)
}

/// Access classification of a playlist entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    /// Watchable without a membership
    Open,
    /// Members-only (or not proven otherwise)
    Restricted,
}

impl Tier {
    pub fn is_open(self) -> bool {
        self == Tier::Open
    }

    /// Lower-case label used in notifications
    pub fn label(self) -> &'static str {
        match self {
            Tier::Open => "open",
            Tier::Restricted => "restricted",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tier::Open => "OPEN",
            Tier::Restricted => "RESTRICTED",
        })
    }
}

/// One playlist item at observation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// 1-based rank within the monitored prefix
    pub position: u32,
    /// Stable video identifier, unique within a playlist
    pub id: String,
    pub title: String,
    /// Watch URL derived from `id`
    pub url: String,
    pub tier: Tier,
    pub observed_at: DateTime<Utc>,
}

/// One full observation of the monitored entry prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub playlist_id: String,
    pub playlist_title: String,
    /// Size of the whole remote playlist, may exceed `entries.len()`
    pub total_entry_count: u64,
    pub taken_at: DateTime<Utc>,
    /// Entries in remote order, positions 1..=n
    pub entries: Vec<Entry>,
}

impl Snapshot {
    /// Check the structural invariants: unique ids and contiguous positions from 1.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        for (index, entry) in self.entries.iter().enumerate() {
            let expected = index as u32 + 1;
            if entry.position != expected {
                return Err(format!(
                    "entry '{}' has position {}, expected {}",
                    entry.id, entry.position, expected
                ));
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(format!("duplicate entry id '{}'", entry.id));
            }
        }
        Ok(())
    }

    /// Look up an entry by id
    pub fn entry(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries currently classified as open
    pub fn open_count(&self) -> usize {
        self.entries.iter().filter(|e| e.tier.is_open()).count()
    }
}

/// Kind of tier change worth notifying about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionKind {
    /// Entry was not in the previous snapshot and appears already open
    NewlyOpen,
    /// Entry was restricted in the previous snapshot and is now open
    BecameOpen,
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransitionKind::NewlyOpen => "NEWLY_OPEN",
            TransitionKind::BecameOpen => "BECAME_OPEN",
        })
    }
}

/// A detected tier change for one entry, computed each cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub kind: TransitionKind,
    pub entry_id: String,
    pub title: String,
    pub url: String,
    /// Absent for `NewlyOpen`
    pub previous_tier: Option<Tier>,
    pub current_tier: Tier,
    pub detected_at: DateTime<Utc>,
}
