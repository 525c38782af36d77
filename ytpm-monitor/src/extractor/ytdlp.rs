//! yt-dlp playlist extractor
//!
//! Runs `yt-dlp --flat-playlist --dump-single-json` and decodes the flat
//! listing. Flat extraction lists titles and ids only; no per-video pages
//! are fetched.
//!
//! Failures are reported as a [`YtDlpError`] and converted into
//! `Error::Extraction`. The process stderr is carried along for operators
//! but never interpreted.

use super::{PlaylistExtractor, PlaylistListing, RawEntry};
use async_trait::async_trait;
use serde::Deserialize;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

/// Longest stderr excerpt kept in an error message
const STDERR_EXCERPT_CHARS: usize = 500;

/// yt-dlp invocation errors
#[derive(Debug, Error)]
pub enum YtDlpError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} did not finish within {}s", timeout.as_secs())]
    Timeout { command: String, timeout: Duration },

    #[error("{command} exited with status {status}: {stderr}")]
    Exit {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("unparsable yt-dlp output: {0}")]
    Parse(String),

    #[error("URL did not resolve to a playlist")]
    NotAPlaylist,
}

impl From<YtDlpError> for ytpm_common::Error {
    fn from(err: YtDlpError) -> Self {
        ytpm_common::Error::Extraction(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct FlatPlaylist {
    id: Option<String>,
    title: Option<String>,
    playlist_count: Option<u64>,
    entries: Option<Vec<Option<FlatEntry>>>,
}

#[derive(Debug, Deserialize)]
struct FlatEntry {
    id: Option<String>,
    title: Option<String>,
}

/// Extractor backed by the yt-dlp command-line tool
#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    command: String,
    timeout: Duration,
}

impl YtDlpExtractor {
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            timeout,
        }
    }

    async fn run(&self, playlist: &str) -> Result<Vec<u8>, YtDlpError> {
        debug!(command = %self.command, playlist, "Running flat playlist extraction");

        let child = Command::new(&self.command)
            .arg("--flat-playlist")
            .arg("--dump-single-json")
            .arg("--no-warnings")
            .arg(playlist)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| YtDlpError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| YtDlpError::Timeout {
                command: self.command.clone(),
                timeout: self.timeout,
            })?
            .map_err(|source| YtDlpError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr: String = String::from_utf8_lossy(&output.stderr)
                .trim()
                .chars()
                .take(STDERR_EXCERPT_CHARS)
                .collect();
            return Err(YtDlpError::Exit {
                command: self.command.clone(),
                status: output.status.to_string(),
                stderr,
            });
        }

        Ok(output.stdout)
    }
}

/// Decode a `--dump-single-json` flat listing, keeping the first `n` slots.
pub fn parse_listing(json: &[u8], n: usize) -> Result<PlaylistListing, YtDlpError> {
    let playlist: FlatPlaylist =
        serde_json::from_slice(json).map_err(|e| YtDlpError::Parse(e.to_string()))?;

    let entries = playlist.entries.ok_or(YtDlpError::NotAPlaylist)?;
    let total_entry_count = playlist
        .playlist_count
        .unwrap_or(entries.len() as u64);

    let entries = entries
        .into_iter()
        .take(n)
        .map(|slot| {
            slot.and_then(|entry| {
                // An entry without an id cannot be tracked
                let id = entry.id.filter(|id| !id.is_empty())?;
                Some(RawEntry {
                    id,
                    title: entry.title.unwrap_or_default(),
                })
            })
        })
        .collect();

    Ok(PlaylistListing {
        playlist_id: playlist.id.unwrap_or_default(),
        playlist_title: playlist.title.unwrap_or_default(),
        total_entry_count,
        entries,
    })
}

#[async_trait]
impl PlaylistExtractor for YtDlpExtractor {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn fetch_prefix(&self, playlist: &str, n: usize) -> ytpm_common::Result<PlaylistListing> {
        info!("Fetching playlist: {}", playlist);
        let stdout = self.run(playlist).await?;
        let listing = parse_listing(&stdout, n)?;
        info!(
            playlist_id = %listing.playlist_id,
            total = listing.total_entry_count,
            "Fetched {} leading playlist slots",
            listing.entries.len()
        );
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "_type": "playlist",
        "id": "PLO_DkCSmTKMNMgr-JKMDV2Sw2HW59LMvc",
        "title": "會員專區",
        "playlist_count": 57,
        "entries": [
            {"_type": "url", "id": "vid1", "title": "【限免】第58集", "url": "https://www.youtube.com/watch?v=vid1"},
            null,
            {"_type": "url", "id": "vid3", "title": null},
            {"_type": "url", "id": "vid4", "title": "第55集"}
        ]
    }"#;

    #[test]
    fn test_parse_listing_keeps_prefix_slots() {
        let listing = parse_listing(SAMPLE.as_bytes(), 3).unwrap();
        assert_eq!(listing.playlist_id, "PLO_DkCSmTKMNMgr-JKMDV2Sw2HW59LMvc");
        assert_eq!(listing.playlist_title, "會員專區");
        assert_eq!(listing.total_entry_count, 57);
        assert_eq!(listing.entries.len(), 3);
        assert_eq!(
            listing.entries[0],
            Some(RawEntry {
                id: "vid1".to_string(),
                title: "【限免】第58集".to_string()
            })
        );
        assert_eq!(listing.entries[1], None);
        // Missing title is reported as empty
        assert_eq!(listing.entries[2].as_ref().map(|e| e.title.as_str()), Some(""));
    }

    #[test]
    fn test_total_falls_back_to_listed_entries() {
        let listing = parse_listing(br#"{"id": "PL1", "title": "t", "entries": [{"id": "a"}, {"id": "b"}]}"#, 1)
            .unwrap();
        assert_eq!(listing.total_entry_count, 2);
        assert_eq!(listing.entries.len(), 1);
    }

    #[test]
    fn test_entry_without_id_is_unavailable() {
        let listing = parse_listing(br#"{"id": "PL1", "entries": [{"title": "no id"}, {"id": "", "title": "blank"}]}"#, 3)
            .unwrap();
        assert_eq!(listing.entries, vec![None, None]);
    }

    #[test]
    fn test_single_video_is_not_a_playlist() {
        let result = parse_listing(br#"{"id": "vid1", "title": "just a video"}"#, 3);
        assert!(matches!(result, Err(YtDlpError::NotAPlaylist)));
    }

    #[test]
    fn test_garbage_output_is_parse_error() {
        assert!(matches!(
            parse_listing(b"ERROR: something", 3),
            Err(YtDlpError::Parse(_))
        ));
    }

    #[test]
    fn test_errors_convert_to_extraction() {
        let err: ytpm_common::Error = YtDlpError::NotAPlaylist.into();
        assert!(matches!(err, ytpm_common::Error::Extraction(_)));
    }

    #[tokio::test]
    async fn test_missing_command_is_extraction_error() {
        let extractor = YtDlpExtractor::new("ytpm-no-such-command", Duration::from_secs(5));
        let result = extractor.fetch_prefix("https://example.invalid/playlist", 3).await;
        match result {
            Err(ytpm_common::Error::Extraction(reason)) => {
                assert!(reason.contains("ytpm-no-such-command"))
            }
            other => panic!("expected extraction error, got {:?}", other),
        }
    }
}
