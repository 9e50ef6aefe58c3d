use std::{fs, io, path::Path};

use chrono::NaiveTime;
use thiserror::Error;

use crate::time::{serde_clock, TimeRange};

/// Locale-specific vocabulary: the day keywords, the period keywords and their default windows.
///
/// Fields missing from a TOML document keep their built-in (Vietnamese) value. A `periods`
/// list, when present, replaces the built-in table entirely.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Settings {
    pub day_keywords: Vec<String>,
    pub period_prefixes: Vec<String>,
    pub default_day_label: String,
    pub fallback_window: Window,
    pub periods: Vec<PeriodWindow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Window {
    #[serde(with = "serde_clock")]
    pub start: NaiveTime,
    #[serde(with = "serde_clock")]
    pub end: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct PeriodWindow {
    pub keyword: String,
    #[serde(with = "serde_clock")]
    pub start: NaiveTime,
    #[serde(with = "serde_clock")]
    pub end: NaiveTime,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] io::Error),
    #[error("invalid settings file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("at least one day keyword is required")]
    NoDayKeywords,
    #[error("keywords must not be blank")]
    BlankKeyword,
    #[error("default day label must not be blank")]
    BlankDayLabel,
    #[error("failed to compile line patterns: {0}")]
    Pattern(#[from] regex::Error),
}

impl Window {
    pub fn range(&self) -> TimeRange {
        TimeRange::window(self.start, self.end)
    }
}

impl PeriodWindow {
    fn new(keyword: &str, start: (u32, u32), end: (u32, u32)) -> Self {
        Self {
            keyword: keyword.to_string(),
            start: hm(start),
            end: hm(end),
        }
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::window(self.start, self.end)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            day_keywords: vec!["Ngày".to_string(), "Day".to_string()],
            period_prefixes: vec!["Buổi".to_string()],
            default_day_label: "Ngày 1".to_string(),
            fallback_window: Window {
                start: hm((9, 0)),
                end: hm((11, 0)),
            },
            periods: vec![
                PeriodWindow::new("Sáng", (8, 0), (11, 0)),
                PeriodWindow::new("Giữa sáng", (10, 0), (12, 0)),
                PeriodWindow::new("Trưa", (12, 0), (13, 0)),
                PeriodWindow::new("Chiều", (14, 0), (17, 0)),
                PeriodWindow::new("Tối", (18, 0), (21, 0)),
                PeriodWindow::new("Tối muộn", (21, 0), (23, 0)),
                PeriodWindow::new("Morning", (8, 0), (11, 0)),
                PeriodWindow::new("Noon", (12, 0), (13, 0)),
                PeriodWindow::new("Afternoon", (14, 0), (17, 0)),
                PeriodWindow::new("Evening", (18, 0), (21, 0)),
            ],
        }
    }
}

impl Settings {
    pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.day_keywords.is_empty() {
            return Err(SettingsError::NoDayKeywords);
        }

        let keywords = self
            .day_keywords
            .iter()
            .chain(&self.period_prefixes)
            .chain(self.periods.iter().map(|period| &period.keyword));
        for keyword in keywords {
            if keyword.trim().is_empty() {
                return Err(SettingsError::BlankKeyword);
            }
        }

        if self.default_day_label.trim().is_empty() {
            return Err(SettingsError::BlankDayLabel);
        }

        Ok(())
    }

    /// Default window for a period label such as `Chiều` or `Buổi sáng`.
    ///
    /// Matching ignores case, extra whitespace and any configured prefix. Unknown labels get
    /// the fallback window.
    pub fn period_window(&self, label: &str) -> TimeRange {
        let wanted = self.period_keyword(label);
        self.periods
            .iter()
            .find(|period| normalize_keyword(&period.keyword) == wanted)
            .map(PeriodWindow::range)
            .unwrap_or_else(|| self.fallback_window.range())
    }

    fn period_keyword(&self, label: &str) -> String {
        let label = normalize_keyword(label);
        for prefix in &self.period_prefixes {
            let prefix = normalize_keyword(prefix);
            if let Some(rest) = label.strip_prefix(&prefix) {
                if rest.starts_with(' ') {
                    return rest.trim_start().to_string();
                }
            }
        }

        label
    }
}

fn normalize_keyword(keyword: &str) -> String {
    keyword
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn hm((hour, minute): (u32, u32)) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}
