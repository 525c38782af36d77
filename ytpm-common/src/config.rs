//! Configuration loading and validation
//!
//! Each setting resolves with the priority:
//! 1. Command-line flag or environment variable (merged by the binary into [`ConfigOverrides`])
//! 2. TOML config file
//! 3. Compiled default
//!
//! Resolution never fails on missing values; [`MonitorConfig::validate`] is
//! run before any monitor cycle and reports every missing required field at once.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Playlist monitored when none is configured
pub const DEFAULT_PLAYLIST_URL: &str =
    "https://www.youtube.com/playlist?list=PLO_DkCSmTKMNMgr-JKMDV2Sw2HW59LMvc";
pub const DEFAULT_PREFIX_SIZE: usize = 3;
pub const DEFAULT_INTERVAL_MINUTES: u64 = 30;
/// One year
pub const MAX_INTERVAL_MINUTES: u64 = 525_600;
pub const DEFAULT_STATE_FILE: &str = "playlist_state.json";
pub const DEFAULT_EXTRACTOR_COMMAND: &str = "yt-dlp";
pub const DEFAULT_EXTRACTOR_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_RESEND_BASE_URL: &str = "https://api.resend.com";
pub const DEFAULT_NOTIFIER_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// On-disk TOML configuration; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub playlist_url: Option<String>,
    pub prefix_size: Option<usize>,
    pub interval_minutes: Option<u64>,
    pub state_file: Option<PathBuf>,
    pub title_marker: Option<String>,
    #[serde(default)]
    pub extractor: ExtractorSection,
    #[serde(default)]
    pub notifier: NotifierSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorSection {
    pub command: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifierSection {
    pub resend_api_key: Option<String>,
    pub from_email: Option<String>,
    pub to_email: Option<String>,
    pub api_base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub playlist_url: Option<String>,
    pub prefix_size: Option<usize>,
    pub interval_minutes: Option<u64>,
    pub state_file: Option<PathBuf>,
    pub title_marker: Option<String>,
    pub extractor_command: Option<String>,
    pub resend_api_key: Option<String>,
    pub from_email: Option<String>,
    pub to_email: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// External extractor process settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    pub command: String,
    pub timeout: Duration,
}

/// Resend e-mail notifier settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    pub resend_api_key: String,
    pub from_email: String,
    pub to_email: String,
    pub api_base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            log_file: None,
        }
    }
}

/// Fully resolved monitor configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub playlist_url: String,
    /// Number of leading playlist entries observed each cycle
    pub prefix_size: usize,
    pub interval_minutes: u64,
    pub state_file: PathBuf,
    /// Title substring that marks an entry as open
    pub title_marker: String,
    pub extractor: ExtractorConfig,
    pub notifier: NotifierConfig,
    pub logging: LoggingConfig,
}

impl MonitorConfig {
    /// Merge overrides over the TOML file over compiled defaults.
    pub fn resolve(overrides: &ConfigOverrides, toml: &TomlConfig) -> Self {
        fn pick<T: Clone>(first: &Option<T>, second: &Option<T>, default: T) -> T {
            first.clone().or_else(|| second.clone()).unwrap_or(default)
        }

        Self {
            playlist_url: pick(
                &overrides.playlist_url,
                &toml.playlist_url,
                DEFAULT_PLAYLIST_URL.to_string(),
            ),
            prefix_size: pick(&overrides.prefix_size, &toml.prefix_size, DEFAULT_PREFIX_SIZE),
            interval_minutes: pick(
                &overrides.interval_minutes,
                &toml.interval_minutes,
                DEFAULT_INTERVAL_MINUTES,
            ),
            state_file: pick(
                &overrides.state_file,
                &toml.state_file,
                PathBuf::from(DEFAULT_STATE_FILE),
            ),
            title_marker: pick(
                &overrides.title_marker,
                &toml.title_marker,
                crate::classifier::DEFAULT_TITLE_MARKER.to_string(),
            ),
            extractor: ExtractorConfig {
                command: pick(
                    &overrides.extractor_command,
                    &toml.extractor.command,
                    DEFAULT_EXTRACTOR_COMMAND.to_string(),
                ),
                timeout: Duration::from_secs(
                    toml.extractor
                        .timeout_secs
                        .unwrap_or(DEFAULT_EXTRACTOR_TIMEOUT_SECS),
                ),
            },
            notifier: NotifierConfig {
                resend_api_key: pick(
                    &overrides.resend_api_key,
                    &toml.notifier.resend_api_key,
                    String::new(),
                ),
                from_email: pick(&overrides.from_email, &toml.notifier.from_email, String::new()),
                to_email: pick(&overrides.to_email, &toml.notifier.to_email, String::new()),
                api_base_url: toml
                    .notifier
                    .api_base_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_RESEND_BASE_URL.to_string()),
                timeout: Duration::from_secs(
                    toml.notifier
                        .timeout_secs
                        .unwrap_or(DEFAULT_NOTIFIER_TIMEOUT_SECS),
                ),
            },
            logging: LoggingConfig {
                level: pick(
                    &overrides.log_level,
                    &toml.logging.level,
                    DEFAULT_LOG_LEVEL.to_string(),
                ),
                log_file: overrides
                    .log_file
                    .clone()
                    .or_else(|| toml.logging.log_file.clone()),
            },
        }
    }

    /// Validate the configuration before any cycle runs.
    ///
    /// Every problem found is reported in one `Config` error.
    pub fn validate(&self) -> Result<()> {
        let mut problems = self.notifier_problems();
        problems.extend(self.source_problems());
        into_result(problems)
    }

    /// Check the notifier credentials and addresses
    pub fn validate_notifier(&self) -> Result<()> {
        into_result(self.notifier_problems())
    }

    /// Check everything needed to build and store snapshots
    pub fn validate_source(&self) -> Result<()> {
        into_result(self.source_problems())
    }

    fn notifier_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        let required = [
            ("RESEND_API_KEY", &self.notifier.resend_api_key),
            ("FROM_EMAIL", &self.notifier.from_email),
            ("TO_EMAIL", &self.notifier.to_email),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            problems.push(format!(
                "missing required configuration: {} \
                 (set them in the environment or in the [notifier] section of the config file)",
                missing.join(", ")
            ));
        }

        for (name, address) in [
            ("FROM_EMAIL", &self.notifier.from_email),
            ("TO_EMAIL", &self.notifier.to_email),
        ] {
            if !address.trim().is_empty() && !address.contains('@') {
                problems.push(format!("{} is not an e-mail address: {}", name, address));
            }
        }

        if self.notifier.timeout.is_zero() {
            problems.push("notifier timeout must be at least 1 second".to_string());
        }

        problems
    }

    fn source_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.playlist_url.trim().is_empty() {
            problems.push("playlist_url must not be empty".to_string());
        }
        if self.prefix_size == 0 {
            problems.push("prefix_size must be at least 1".to_string());
        }
        if self.interval_minutes == 0 || self.interval_minutes > MAX_INTERVAL_MINUTES {
            problems.push(format!(
                "interval_minutes must be between 1 and {}",
                MAX_INTERVAL_MINUTES
            ));
        }
        if self.title_marker.trim().is_empty() {
            problems.push("title_marker must not be blank".to_string());
        }
        if self.extractor.command.trim().is_empty() {
            problems.push("extractor command must not be empty".to_string());
        }
        if self.extractor.timeout.is_zero() {
            problems.push("extractor timeout must be at least 1 second".to_string());
        }
        if self.state_file.as_os_str().is_empty() {
            problems.push("state_file must not be empty".to_string());
        }

        problems
    }

    /// Interval between scheduled cycles
    pub fn interval(&self) -> Duration {
        crate::time::minutes_to_duration(self.interval_minutes)
    }

    /// Human-readable summary without secrets
    pub fn summary(&self) -> String {
        let api_key = if self.notifier.resend_api_key.trim().is_empty() {
            "missing"
        } else {
            "set"
        };
        let log_file = self
            .logging
            .log_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(console only)".to_string());

        format!(
            "Configuration:\n\
             \x20 Playlist URL: {}\n\
             \x20 Monitored prefix: {} entries\n\
             \x20 Monitor interval: {} minutes\n\
             \x20 State file: {}\n\
             \x20 Title marker: {}\n\
             \x20 Extractor: {} (timeout {}s)\n\
             \x20 To email: {}\n\
             \x20 From email: {}\n\
             \x20 API key: {}\n\
             \x20 Log level: {}\n\
             \x20 Log file: {}\n",
            self.playlist_url,
            self.prefix_size,
            self.interval_minutes,
            self.state_file.display(),
            self.title_marker,
            self.extractor.command,
            self.extractor.timeout.as_secs(),
            self.notifier.to_email,
            self.notifier.from_email,
            api_key,
            self.logging.level,
            log_file,
        )
    }
}

fn into_result(problems: Vec<String>) -> Result<()> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(problems.join("; ")))
    }
}

/// Platform default config file location (`<config dir>/ytpm/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ytpm").join("config.toml"))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Locate and load the config file.
///
/// An explicitly named file must exist. The platform default is optional:
/// when absent, an empty config (all defaults) is returned.
pub fn locate_config(explicit: Option<&Path>) -> Result<(Option<PathBuf>, TomlConfig)> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let config = load_toml_config(path)?;
        return Ok((Some(path.to_path_buf()), config));
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            let config = load_toml_config(&path)?;
            Ok((Some(path), config))
        }
        _ => Ok((None, TomlConfig::default())),
    }
}
