//! Configuration system for querybuilder.
//!
//! Settings are read from a TOML file; every field has a default, so a
//! partial (or missing) file is fine.
//!
//! # Example
//!
//! ```
//! use querybuilder::config::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.theme, "default-dark");
//! assert!(config.auto_complete);
//!
//! let custom = Config {
//!     tags: vec!["work".to_string(), "home".to_string()],
//!     ..Config::default()
//! };
//! assert_eq!(custom.date_format, "%Y-%m-%d");
//! ```

use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration for the querybuilder application.
///
/// # Fields
///
/// * `theme` - Color scheme name (default: "default-dark")
/// * `auto_complete` - Open the completer while typing (default: true)
/// * `date_format` - `chrono` format for picked dates (default: "%Y-%m-%d")
/// * `tags` - Tag names offered after `tag:` (default: empty)
/// * `contacts` - Contacts offered after `from:` and `sent by` (default: empty)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Color scheme name
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Open the completer automatically while typing
    #[serde(default = "default_auto_complete")]
    pub auto_complete: bool,

    /// Format of dates inserted by the date picker
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Known tag names
    #[serde(default)]
    pub tags: Vec<String>,

    /// Known contacts
    #[serde(default)]
    pub contacts: Vec<String>,
}

fn default_theme() -> String {
    "default-dark".to_string()
}

fn default_auto_complete() -> bool {
    true
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            auto_complete: default_auto_complete(),
            date_format: default_date_format(),
            tags: Vec::new(),
            contacts: Vec::new(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/querybuilder/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("querybuilder");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Loads configuration from `path`, falling back to defaults.
    ///
    /// An invalid `date_format` is replaced by the default one.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let mut config = match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|error| {
                tracing::warn!(path = %path.display(), %error, "invalid config, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        };

        if !is_valid_date_format(&config.date_format) {
            tracing::warn!(format = %config.date_format, "invalid date_format, using default");
            config.date_format = default_date_format();
        }
        config
    }
}

/// Returns `true` if `format` is a `chrono` strftime format without errors.
///
/// ```
/// use querybuilder::config::is_valid_date_format;
///
/// assert!(is_valid_date_format("%d.%m.%Y"));
/// assert!(!is_valid_date_format("%Q"));
/// ```
pub fn is_valid_date_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}
