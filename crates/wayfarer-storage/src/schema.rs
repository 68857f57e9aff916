//! Persisted document layout
//!
//! ```json
//! {
//!   "home": "https://www.google.com",
//!   "theme": "dark",
//!   "history": [{ "url": "https://example.com", "time": "14:03:27" }],
//!   "bookmarks": ["https://example.com"],
//!   "browser_type": "headless"
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

pub const DEFAULT_HOME: &str = "https://www.google.com";
pub const DEFAULT_BROWSER_TYPE: &str = "headless";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_home")]
    pub home: String,
    #[serde(default, deserialize_with = "lenient_theme")]
    pub theme: Theme,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    /// Insertion-ordered, never contains the same URL twice
    #[serde(default, deserialize_with = "unique_bookmarks")]
    pub bookmarks: Vec<String>,
    #[serde(default = "default_browser_type")]
    pub browser_type: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            home: default_home(),
            theme: Theme::default(),
            history: Vec::new(),
            bookmarks: Vec::new(),
            browser_type: default_browser_type(),
        }
    }
}

fn default_home() -> String {
    DEFAULT_HOME.to_string()
}

fn default_browser_type() -> String {
    DEFAULT_BROWSER_TYPE.to_string()
}

/// A completed page load. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    /// Wall-clock time of the load, `HH:MM:SS`
    pub time: String,
}

impl HistoryEntry {
    pub fn new(url: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            time: time.into(),
        }
    }

    /// Line shown in the history list
    pub fn display_line(&self) -> String {
        format!("[{}] {}", self.time, self.url)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Solarized,
    Amoled,
}

/// Colors applied to the top-level window. `None` keeps the platform look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemePalette {
    pub window_background: &'static str,
    pub window_foreground: &'static str,
    pub input_background: &'static str,
    pub input_foreground: &'static str,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Light, Theme::Dark, Theme::Solarized, Theme::Amoled];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Solarized => "solarized",
            Theme::Amoled => "amoled",
        }
    }

    pub fn palette(&self) -> Option<ThemePalette> {
        match self {
            Theme::Light => None,
            Theme::Dark => Some(ThemePalette {
                window_background: "#222",
                window_foreground: "#ddd",
                input_background: "#333",
                input_foreground: "#fff",
            }),
            Theme::Solarized => Some(ThemePalette {
                window_background: "#fdf6e3",
                window_foreground: "#586e75",
                input_background: "#eee8d5",
                input_foreground: "#657b83",
            }),
            Theme::Amoled => Some(ThemePalette {
                window_background: "#000",
                window_foreground: "#fff",
                input_background: "#111",
                input_foreground: "#fff",
            }),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "solarized" => Ok(Theme::Solarized),
            "amoled" => Ok(Theme::Amoled),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}

// An unrecognized theme name must not discard the rest of the document.
fn lenient_theme<'de, D>(deserializer: D) -> Result<Theme, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()).unwrap_or_default())
}

// Hand-edited files may repeat a URL; the first occurrence wins.
fn unique_bookmarks<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    let mut seen = HashSet::new();
    Ok(raw.into_iter().filter(|url| seen.insert(url.clone())).collect())
}
