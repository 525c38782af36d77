//! Cycle observation hooks
//!
//! A [`MonitorCycle`](crate::cycle::MonitorCycle) reports its progress to a
//! [`CycleObserver`]. The default [`TracingObserver`] turns every event into
//! a structured log line.

use std::time::Duration;
use tracing::{debug, error, info, warn};
use ytpm_common::{Error, Snapshot, Transition};

/// Receives cycle lifecycle events
///
/// All methods default to no-ops so tests can override only what they
/// record.
pub trait CycleObserver: Send + Sync {
    fn cycle_started(&self, _playlist_url: &str) {}

    fn snapshot_built(&self, _snapshot: &Snapshot) {}

    /// No previous snapshot; this cycle establishes the baseline
    fn baseline_missing(&self) {}

    fn transition_found(&self, _transition: &Transition) {}

    /// The new snapshot could not be persisted; transitions are still reported
    fn persist_failed(&self, _error: &Error) {}

    /// The cycle aborted before persisting anything
    fn cycle_failed(&self, _error: &Error) {}

    fn cycle_completed(&self, _transitions: usize, _elapsed: Duration) {}
}

/// Observer that logs through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CycleObserver for TracingObserver {
    fn cycle_started(&self, playlist_url: &str) {
        info!("Checking playlist: {}", playlist_url);
    }

    fn snapshot_built(&self, snapshot: &Snapshot) {
        info!(
            playlist_id = %snapshot.playlist_id,
            total = snapshot.total_entry_count,
            open = snapshot.open_count(),
            "Observed {} of {} entries in \"{}\"",
            snapshot.len(),
            snapshot.total_entry_count,
            snapshot.playlist_title
        );
        for entry in &snapshot.entries {
            debug!(
                position = entry.position,
                entry_id = %entry.id,
                tier = %entry.tier,
                "{}",
                entry.title
            );
        }
    }

    fn baseline_missing(&self) {
        info!("No previous state found, recording baseline without notifications");
    }

    fn transition_found(&self, transition: &Transition) {
        info!(
            kind = %transition.kind,
            entry_id = %transition.entry_id,
            "Entry became open: {}",
            transition.title
        );
    }

    fn persist_failed(&self, error: &Error) {
        error!("Failed to save state: {}", error);
    }

    fn cycle_failed(&self, error: &Error) {
        match error {
            Error::CorruptState { .. } => {
                error!("Stored state is unusable, leaving it untouched: {}", error)
            }
            _ => warn!("Check failed: {}", error),
        }
    }

    fn cycle_completed(&self, transitions: usize, elapsed: Duration) {
        if transitions == 0 {
            info!("No changes detected ({} ms)", elapsed.as_millis());
        } else {
            info!(
                "Detected {} newly open entries ({} ms)",
                transitions,
                elapsed.as_millis()
            );
        }
    }
}
