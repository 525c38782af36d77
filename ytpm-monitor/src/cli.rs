//! Command-line arguments
//!
//! Every setting flag falls back to an environment variable; anything left
//! unset is taken from the config file or the compiled default.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use ytpm_common::config::ConfigOverrides;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Run a single check and exit
    Once,
    /// Check now, then once per interval until interrupted
    Monitor,
    /// Send a synthetic notification and exit
    TestEmail,
    /// Print the resolved configuration and exit
    ShowConfig,
    /// Print the monitored entries with their tiers, without saving state
    Inspect,
}

/// Command-line arguments for ytpm-monitor
#[derive(Parser, Debug)]
#[command(name = "ytpm-monitor")]
#[command(about = "Watches a YouTube playlist for member-only videos that become free")]
#[command(version)]
pub struct Args {
    /// Run mode
    #[arg(long, value_enum, default_value_t = Mode::Once)]
    pub mode: Mode,

    /// Config file (TOML)
    #[arg(short, long, env = "YTPM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Playlist URL to monitor
    #[arg(long, env = "PLAYLIST_URL")]
    pub playlist_url: Option<String>,

    /// Number of leading playlist entries to observe
    #[arg(long, env = "PREFIX_SIZE")]
    pub prefix_size: Option<usize>,

    /// Minutes between scheduled checks
    #[arg(long, env = "MONITOR_INTERVAL_MINUTES")]
    pub interval_minutes: Option<u64>,

    /// Snapshot state file
    #[arg(long, env = "STATE_FILE")]
    pub state_file: Option<PathBuf>,

    /// Title substring marking an entry as open
    #[arg(long, env = "TITLE_MARKER")]
    pub title_marker: Option<String>,

    /// yt-dlp executable
    #[arg(long, env = "YTDLP_COMMAND")]
    pub ytdlp_command: Option<String>,

    /// Resend API key
    #[arg(long, env = "RESEND_API_KEY", hide_env_values = true)]
    pub resend_api_key: Option<String>,

    /// Sender address
    #[arg(long, env = "FROM_EMAIL")]
    pub from_email: Option<String>,

    /// Recipient address
    #[arg(long, env = "TO_EMAIL")]
    pub to_email: Option<String>,

    /// Log level or filter directive
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Also append logs to this file
    #[arg(long, env = "LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            playlist_url: self.playlist_url.clone(),
            prefix_size: self.prefix_size,
            interval_minutes: self.interval_minutes,
            state_file: self.state_file.clone(),
            title_marker: self.title_marker.clone(),
            extractor_command: self.ytdlp_command.clone(),
            resend_api_key: self.resend_api_key.clone(),
            from_email: self.from_email.clone(),
            to_email: self.to_email.clone(),
            log_level: self.log_level.clone(),
            log_file: self.log_file.clone(),
        }
    }
}
