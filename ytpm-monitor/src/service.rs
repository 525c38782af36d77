//! Monitor service
//!
//! Wires one [`MonitorCycle`] to a [`Notifier`] and drives it either once or
//! on a fixed interval. Cycles never overlap: the scheduled loop awaits each
//! check before waiting for the next tick.

use crate::builder::SnapshotBuilder;
use crate::cycle::MonitorCycle;
use crate::extractor::YtDlpExtractor;
use crate::notifier::{self, Notifier, ResendNotifier};
use crate::observer::TracingObserver;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;
use ytpm_common::config::MonitorConfig;
use ytpm_common::{time, EntryClassifier, Result, Snapshot, SnapshotStore};

/// Summary of one completed check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckReport {
    pub transitions: usize,
    /// True when a notification was delivered
    pub notified: bool,
    pub persisted: bool,
    pub cold_start: bool,
}

pub struct Monitor {
    cycle: MonitorCycle,
    notifier: Arc<dyn Notifier>,
    interval: Duration,
}

impl Monitor {
    pub fn new(cycle: MonitorCycle, notifier: Arc<dyn Notifier>, interval: Duration) -> Self {
        Self {
            cycle,
            notifier,
            interval,
        }
    }

    /// Build the production wiring: yt-dlp extractor, JSON state file,
    /// tracing observer and Resend notifier.
    pub fn from_config(config: &MonitorConfig) -> Result<Self> {
        let extractor = Arc::new(YtDlpExtractor::new(
            config.extractor.command.clone(),
            config.extractor.timeout,
        ));
        let classifier = EntryClassifier::new(config.title_marker.clone())?;
        let builder = SnapshotBuilder::new(
            extractor,
            classifier,
            config.playlist_url.clone(),
            config.prefix_size,
        );
        let store = SnapshotStore::new(config.state_file.clone());
        let cycle = MonitorCycle::new(builder, store, Arc::new(TracingObserver));
        let notifier = Arc::new(ResendNotifier::new(&config.notifier)?);

        Ok(Self::new(cycle, notifier, config.interval()))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one cycle and notify about any transitions.
    ///
    /// Fails only when the cycle aborted. Save and notification failures are
    /// logged and reflected in the report.
    pub async fn check(&self) -> Result<CheckReport> {
        let cycle_id = Uuid::new_v4();
        let span = tracing::info_span!("cycle", id = %cycle_id);
        self.check_inner().instrument(span).await
    }

    async fn check_inner(&self) -> Result<CheckReport> {
        let outcome = self.cycle.run().await?;

        let mut report = CheckReport {
            transitions: outcome.transitions.len(),
            notified: false,
            persisted: outcome.persisted(),
            cold_start: outcome.cold_start,
        };

        if outcome.transitions.is_empty() {
            return Ok(report);
        }

        match self.notifier.notify(&outcome.transitions).await {
            Ok(()) => report.notified = true,
            Err(e) => error!(notifier = self.notifier.name(), "Notification failed: {}", e),
        }

        Ok(report)
    }

    /// Single check; a failed cycle is returned to the caller
    pub async fn run_once(&self) -> Result<CheckReport> {
        info!("Running single check");
        let report = self.check().await?;
        info!(
            transitions = report.transitions,
            notified = report.notified,
            persisted = report.persisted,
            "Single check complete"
        );
        Ok(report)
    }

    /// Check immediately, then once per interval until `shutdown` resolves.
    ///
    /// Cycle failures are logged and the loop continues. Returns the number
    /// of checks started.
    pub async fn run_scheduled<F>(&self, shutdown: F) -> usize
    where
        F: Future<Output = ()>,
    {
        info!(
            "Starting scheduled monitoring (interval: {} s)",
            self.interval.as_secs()
        );

        tokio::pin!(shutdown);

        let now = Instant::now();
        let Some(first_tick) = now.checked_add(self.interval) else {
            warn!("Interval too large to schedule, running the initial check only");
            Self::log_scheduled(self.check().await);
            shutdown.await;
            return 1;
        };
        let mut timer = interval_at(first_tick, self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut checks = 0usize;

        // Initial check runs to completion regardless of shutdown
        checks += 1;
        Self::log_scheduled(self.check().await);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Monitoring stopped after {} checks", checks);
                    return checks;
                }
                _ = timer.tick() => {
                    checks += 1;
                    Self::log_scheduled(self.check().await);
                }
            }
        }
    }

    fn log_scheduled(result: Result<CheckReport>) {
        match result {
            Ok(report) if report.transitions > 0 => {
                info!(
                    transitions = report.transitions,
                    notified = report.notified,
                    "Check complete"
                )
            }
            Ok(_) => {}
            Err(e) if e.is_retryable() => warn!("Check skipped, retrying next interval: {}", e),
            Err(e) => error!("Check failed, retrying next interval: {}", e),
        }
    }

    /// Send one synthetic transition through the notifier
    pub async fn send_test_notification(&self) -> Result<()> {
        info!(notifier = self.notifier.name(), "Sending test notification");
        let transition = notifier::test_transition(time::now());
        self.notifier.notify(std::slice::from_ref(&transition)).await?;
        info!("Test notification sent");
        Ok(())
    }

    /// Build a snapshot without diffing or persisting it
    pub async fn inspect(&self) -> Result<Snapshot> {
        self.cycle.builder().build().await
    }
}
