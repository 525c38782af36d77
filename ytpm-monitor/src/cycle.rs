//! One monitoring cycle: build, load, diff, save
//!
//! Ordering is fixed. The previous snapshot is read only after the current
//! one was built, and the current snapshot is written only after the diff
//! was computed. Any failure before the save leaves the store untouched.

use crate::builder::SnapshotBuilder;
use crate::observer::CycleObserver;
use std::sync::Arc;
use std::time::Instant;
use ytpm_common::{diff, Error, Result, Snapshot, SnapshotStore, Transition};

/// Result of a completed cycle
#[derive(Debug)]
pub struct CycleOutcome {
    /// Snapshot observed in this cycle
    pub snapshot: Snapshot,
    /// Entries that became open since the previous snapshot
    pub transitions: Vec<Transition>,
    /// Set when the snapshot could not be saved
    pub persist_error: Option<Error>,
    /// True when no previous snapshot existed
    pub cold_start: bool,
}

impl CycleOutcome {
    pub fn persisted(&self) -> bool {
        self.persist_error.is_none()
    }
}

/// Runs cycles against one playlist and one store
pub struct MonitorCycle {
    builder: SnapshotBuilder,
    store: SnapshotStore,
    observer: Arc<dyn CycleObserver>,
}

impl MonitorCycle {
    pub fn new(
        builder: SnapshotBuilder,
        store: SnapshotStore,
        observer: Arc<dyn CycleObserver>,
    ) -> Self {
        Self {
            builder,
            store,
            observer,
        }
    }

    pub fn builder(&self) -> &SnapshotBuilder {
        &self.builder
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Run one cycle.
    ///
    /// Returns `Err` when extraction fails or the stored snapshot cannot be
    /// read; nothing is written in that case. A failed save is reported in
    /// [`CycleOutcome::persist_error`] and the transitions are still returned.
    pub async fn run(&self) -> Result<CycleOutcome> {
        let started = Instant::now();
        self.observer.cycle_started(self.builder.playlist_url());

        let result = self.run_inner().await;
        match &result {
            Ok(outcome) => self
                .observer
                .cycle_completed(outcome.transitions.len(), started.elapsed()),
            Err(e) => self.observer.cycle_failed(e),
        }
        result
    }

    async fn run_inner(&self) -> Result<CycleOutcome> {
        let current = self.builder.build().await?;
        self.observer.snapshot_built(&current);

        let previous = self.store.load()?;
        if previous.is_none() {
            self.observer.baseline_missing();
        }

        let transitions = diff(previous.as_ref(), &current);
        for transition in &transitions {
            self.observer.transition_found(transition);
        }

        let persist_error = match self.store.save(&current) {
            Ok(()) => None,
            Err(e) => {
                self.observer.persist_failed(&e);
                Some(e)
            }
        };

        Ok(CycleOutcome {
            snapshot: current,
            transitions,
            persist_error,
            cold_start: previous.is_none(),
        })
    }
}
