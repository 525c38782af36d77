//! Snapshot diff engine
//!
//! Computes the transitions worth notifying about between the previously
//! persisted snapshot and the current one:
//!
//! | previous            | current      | result        |
//! |---------------------|--------------|---------------|
//! | no snapshot at all  | anything     | nothing       |
//! | entry absent        | `OPEN`       | `NEWLY_OPEN`  |
//! | entry absent        | `RESTRICTED` | nothing       |
//! | `RESTRICTED`        | `OPEN`       | `BECAME_OPEN` |
//! | `OPEN`              | `RESTRICTED` | nothing       |
//! | unchanged           | unchanged    | nothing       |
//!
//! Entries that disappear from the current snapshot produce nothing.
//! Output follows the current snapshot's position order.

use crate::models::{Entry, Snapshot, Tier, Transition, TransitionKind};
use std::collections::HashMap;

/// Diff two snapshots. Pure; `detected_at` is the current snapshot's `taken_at`.
pub fn diff(previous: Option<&Snapshot>, current: &Snapshot) -> Vec<Transition> {
    // Cold start only establishes the baseline
    let Some(previous) = previous else {
        return Vec::new();
    };

    let previous_tiers: HashMap<&str, Tier> = previous
        .entries
        .iter()
        .map(|e| (e.id.as_str(), e.tier))
        .collect();

    let mut ordered: Vec<&Entry> = current.entries.iter().collect();
    ordered.sort_by_key(|e| e.position);

    ordered
        .into_iter()
        .filter_map(|entry| {
            let kind = match (previous_tiers.get(entry.id.as_str()), entry.tier) {
                (None, Tier::Open) => TransitionKind::NewlyOpen,
                (Some(Tier::Restricted), Tier::Open) => TransitionKind::BecameOpen,
                _ => return None,
            };
            Some(Transition {
                kind,
                entry_id: entry.id.clone(),
                title: entry.title.clone(),
                url: entry.url.clone(),
                previous_tier: previous_tiers.get(entry.id.as_str()).copied(),
                current_tier: entry.tier,
                detected_at: current.taken_at,
            })
        })
        .collect()
}
