//! Fakes shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use ytpm_common::{Error, Result, Transition};
use ytpm_monitor::notifier::Notifier;
use ytpm_monitor::{CycleObserver, PlaylistExtractor, PlaylistListing, RawEntry};

pub const PLAYLIST_URL: &str = "https://www.youtube.com/playlist?list=PLtest";

pub fn raw(id: &str, title: &str) -> Option<RawEntry> {
    Some(RawEntry {
        id: id.to_string(),
        title: title.to_string(),
    })
}

pub fn listing(entries: Vec<Option<RawEntry>>) -> PlaylistListing {
    PlaylistListing {
        playlist_id: "PLtest".to_string(),
        playlist_title: "会员专享".to_string(),
        total_entry_count: 42,
        entries,
    }
}

/// Extractor returning scripted responses; repeats the last one when exhausted
pub struct ScriptedExtractor {
    responses: Mutex<VecDeque<std::result::Result<PlaylistListing, String>>>,
    last: Mutex<Option<std::result::Result<PlaylistListing, String>>>,
    calls: Mutex<usize>,
}

impl ScriptedExtractor {
    pub fn new(responses: Vec<std::result::Result<PlaylistListing, String>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            last: Mutex::new(None),
            calls: Mutex::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl PlaylistExtractor for ScriptedExtractor {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn fetch_prefix(&self, _playlist: &str, n: usize) -> Result<PlaylistListing> {
        *self.calls.lock().unwrap() += 1;

        let next = self.responses.lock().unwrap().pop_front();
        let response = match next {
            Some(r) => {
                *self.last.lock().unwrap() = Some(r.clone());
                r
            }
            None => self
                .last
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| Err("no scripted response".to_string())),
        };

        match response {
            Ok(mut listing) => {
                listing.entries.truncate(n);
                Ok(listing)
            }
            Err(reason) => Err(Error::Extraction(reason)),
        }
    }
}

/// Observer recording event names
#[derive(Default)]
pub struct RecordingObserver {
    pub events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }
}

impl CycleObserver for RecordingObserver {
    fn cycle_started(&self, _playlist_url: &str) {
        self.record("started");
    }

    fn snapshot_built(&self, _snapshot: &ytpm_common::Snapshot) {
        self.record("built");
    }

    fn baseline_missing(&self) {
        self.record("baseline");
    }

    fn transition_found(&self, transition: &Transition) {
        self.record(format!("transition:{}", transition.entry_id));
    }

    fn persist_failed(&self, _error: &Error) {
        self.record("persist_failed");
    }

    fn cycle_failed(&self, _error: &Error) {
        self.record("failed");
    }

    fn cycle_completed(&self, transitions: usize, _elapsed: std::time::Duration) {
        self.record(format!("completed:{}", transitions));
    }
}

/// Notifier recording every batch it receives
#[derive(Default)]
pub struct RecordingNotifier {
    pub batches: Mutex<Vec<Vec<Transition>>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn batches(&self) -> Vec<Vec<Transition>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn notify(&self, transitions: &[Transition]) -> Result<()> {
        self.batches.lock().unwrap().push(transitions.to_vec());
        if self.fail {
            Err(Error::Notifier("mailbox full".to_string()))
        } else {
            Ok(())
        }
    }
}
