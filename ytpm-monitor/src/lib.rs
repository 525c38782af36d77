//! # ytpm-monitor
//!
//! Watches the leading entries of a YouTube playlist and sends an e-mail
//! when a member-only entry becomes free to watch.
//!
//! Each cycle builds a [`Snapshot`](ytpm_common::Snapshot) of the monitored
//! prefix, compares it with the previously stored one and persists the new
//! observation. Transitions to the open tier are handed to a
//! [`Notifier`](notifier::Notifier).

pub mod builder;
pub mod cli;
pub mod cycle;
pub mod extractor;
pub mod logging;
pub mod notifier;
pub mod observer;
pub mod service;

pub use builder::SnapshotBuilder;
pub use cycle::{CycleOutcome, MonitorCycle};
pub use extractor::{PlaylistExtractor, PlaylistListing, RawEntry};
pub use observer::{CycleObserver, TracingObserver};
pub use service::{CheckReport, Monitor};
