//! # YTPM Common Library
//!
//! Shared code for the YouTube playlist monitor:
//! - Error taxonomy and Result alias
//! - Configuration loading and validation
//! - Playlist data model (Tier, Entry, Snapshot, Transition)
//! - Title-based entry classification
//! - Snapshot diffing
//! - Durable snapshot storage

pub mod classifier;
pub mod config;
pub mod diff;
pub mod error;
pub mod models;
pub mod store;
pub mod time;

pub use classifier::EntryClassifier;
pub use diff::diff;
pub use error::{Error, Result};
pub use models::{Entry, Snapshot, Tier, Transition, TransitionKind};
pub use store::SnapshotStore;
