//! Issue - one detected system condition
//!
//! Issues are produced by probes and are read-only afterwards.
//! The category is inferred from the text once, at construction time,
//! and never stored anywhere else.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Issue category, inferred from the issue text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Bios,
    Temperature,
    Audio,
    Storage,
    Memory,
    Unknown,
}

/// Category markers in match priority order (first match wins).
/// Markers are whole phrases so process names inside an issue
/// (`pulseaudio`, `temperature-daemon`) do not change its category.
const CATEGORY_MARKERS: &[(Category, &[&str])] = &[
    (Category::Bios, &["bios"]),
    (Category::Temperature, &["temperature alert"]),
    (Category::Audio, &["audio system"]),
    (Category::Storage, &["storage usage", "disk space"]),
    (Category::Memory, &["memory usage"]),
];

impl Category {
    /// Infer the category of an issue text.
    ///
    /// Matching is case-insensitive and follows the fixed priority
    /// BIOS > temperature > audio > storage > memory > unknown.
    pub fn infer(text: &str) -> Self {
        let lower = text.to_lowercase();
        CATEGORY_MARKERS
            .iter()
            .find(|(_, markers)| markers.iter().any(|m| lower.contains(m)))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Bios => "bios",
            Category::Temperature => "temperature",
            Category::Audio => "audio",
            Category::Storage => "storage",
            Category::Memory => "memory",
            Category::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue construction errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IssueError {
    #[error("issue text must not be empty")]
    Empty,
}

/// One detected condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    text: String,
    category: Category,
}

impl Issue {
    pub fn new(text: impl Into<String>) -> Result<Self, IssueError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(IssueError::Empty);
        }
        let category = Category::infer(&text);
        Ok(Self { text, category })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn category(&self) -> Category {
        self.category
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_each_category() {
        assert_eq!(
            Category::infer("Audio system check failed (PulseAudio may not be running)."),
            Category::Audio
        );
        assert_eq!(
            Category::infer("High memory usage by processes: firefox (PID 42) using 812.0 MB RAM"),
            Category::Memory
        );
        assert_eq!(
            Category::infer("High temperature alert: coretemp sensor 'Package id 0' at 91°C."),
            Category::Temperature
        );
        assert_eq!(
            Category::infer("High storage usage: / at 95.0% capacity."),
            Category::Storage
        );
        assert_eq!(
            Category::infer("WARNING: BIOS info detected. DO NOT attempt automated BIOS updates or changes."),
            Category::Bios
        );
        assert_eq!(Category::infer("Bluetooth adapter missing"), Category::Unknown);
    }

    #[test]
    fn test_infer_is_case_insensitive() {
        assert_eq!(Category::infer("low DISK SPACE on /home"), Category::Storage);
        assert_eq!(Category::infer("bios flashing is dangerous"), Category::Bios);
    }

    #[test]
    fn test_bios_wins_over_everything() {
        // A temperature issue that mentions the BIOS must still be treated as BIOS
        let issue = Issue::new("High temperature alert: BIOS fan curve at 99°C").unwrap();
        assert_eq!(issue.category(), Category::Bios);
    }

    #[test]
    fn test_temperature_wins_over_storage() {
        assert_eq!(
            Category::infer("temperature alert on disk space monitor"),
            Category::Temperature
        );
    }

    #[test]
    fn test_process_names_do_not_change_memory_category() {
        for text in [
            "High memory usage by processes: pulseaudio (PID 900) using 612.0 MB RAM...",
            "High memory usage by processes: temperature-daemon (PID 31) using 700.0 MB RAM...",
            "High memory usage by processes: audio-recorder (PID 77) using 512.5 MB RAM...",
        ] {
            assert_eq!(Category::infer(text), Category::Memory, "text: {}", text);
        }
    }

    #[test]
    fn test_bare_words_are_unknown() {
        assert_eq!(Category::infer("Audio crackles over HDMI"), Category::Unknown);
        assert_eq!(Category::infer("CPU temperature feels high"), Category::Unknown);
    }

    #[test]
    fn test_empty_issue_rejected() {
        assert_eq!(Issue::new(""), Err(IssueError::Empty));
        assert_eq!(Issue::new("   \n"), Err(IssueError::Empty));
    }

    #[test]
    fn test_category_computed_once() {
        let issue = Issue::new("High storage usage: /home at 93.4% capacity.").unwrap();
        assert_eq!(issue.category(), Category::Storage);
        assert_eq!(issue.text(), "High storage usage: /home at 93.4% capacity.");
        assert_eq!(issue.to_string(), issue.text());
    }
}
