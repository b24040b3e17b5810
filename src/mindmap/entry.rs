//! Raw history log parsing.
//!
//! A log is a sequence of blank-line separated segments, each shaped like
//! `[<timestamp>] [Tema: <theme>] <text>`. The first bracketed group is the
//! timestamp; the first `[Tema: ...]` group after it is the theme. Segments
//! without any bracketed group are skipped.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Separator between entries in a raw log.
pub const ENTRY_SEPARATOR: &str = "\n\n";

static TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(?P<timestamp>[^\]\n]*)\]").expect("timestamp pattern"));

static THEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[Tema:\s*(?P<theme>[^\]\n]*)\]").expect("theme pattern"));

/// One timestamped, optionally themed unit of the history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub timestamp: String,
    pub theme: Option<String>,
    pub text: String,
}

impl Entry {
    /// Parse a single segment. Returns `None` when no timestamp marker exists.
    pub fn parse(segment: &str) -> Option<Self> {
        let caps = TIMESTAMP_RE.captures(segment)?;
        let whole = caps.get(0)?;
        let timestamp = caps.name("timestamp")?.as_str().trim().to_string();

        let mut remainder = String::with_capacity(segment.len());
        remainder.push_str(&segment[..whole.start()]);
        remainder.push_str(&segment[whole.end()..]);

        let mut theme = None;
        if let Some(theme_caps) = THEME_RE.captures(&remainder) {
            if let (Some(group), Some(value)) = (theme_caps.get(0), theme_caps.name("theme")) {
                let value = value.as_str().trim();
                if !value.is_empty() {
                    theme = Some(value.to_string());
                }
                remainder.replace_range(group.range(), "");
            }
        }

        Some(Self {
            timestamp,
            theme,
            text: remainder.trim().to_string(),
        })
    }
}

/// Split a raw log into entries, preserving order and dropping segments
/// that carry no timestamp.
pub fn parse_log(raw: &str) -> Vec<Entry> {
    raw.split(ENTRY_SEPARATOR)
        .filter(|segment| !segment.trim().is_empty())
        .filter_map(|segment| {
            let entry = Entry::parse(segment);
            if entry.is_none() {
                debug!("Skipping history segment without timestamp ({} chars)", segment.len());
            }
            entry
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry_with_theme() {
        let entry = Entry::parse("[01/01/2024 10:00:00] [Tema: Trabalho] Reunião com o cliente").unwrap();
        assert_eq!(entry.timestamp, "01/01/2024 10:00:00");
        assert_eq!(entry.theme.as_deref(), Some("Trabalho"));
        assert_eq!(entry.text, "Reunião com o cliente");
    }

    #[test]
    fn test_parse_entry_without_theme() {
        let entry = Entry::parse("[02/01/2024 08:30:00] Bom dia!").unwrap();
        assert_eq!(entry.timestamp, "02/01/2024 08:30:00");
        assert_eq!(entry.theme, None);
        assert_eq!(entry.text, "Bom dia!");
    }

    #[test]
    fn test_theme_anywhere_in_remainder() {
        let entry = Entry::parse("[ts] Texto antes [Tema: Lazer] e depois").unwrap();
        assert_eq!(entry.theme.as_deref(), Some("Lazer"));
        assert_eq!(entry.text, "Texto antes  e depois");
    }

    #[test]
    fn test_first_bracket_is_always_timestamp() {
        let entry = Entry::parse("[Tema: Lazer] sem data").unwrap();
        assert_eq!(entry.timestamp, "Tema: Lazer");
        assert_eq!(entry.theme, None);
        assert_eq!(entry.text, "sem data");
    }

    #[test]
    fn test_only_first_theme_is_extracted() {
        let entry = Entry::parse("[ts] [Tema: A] texto [Tema: B]").unwrap();
        assert_eq!(entry.theme.as_deref(), Some("A"));
        assert_eq!(entry.text, "texto [Tema: B]");
    }

    #[test]
    fn test_multiline_text_is_kept() {
        let entry = Entry::parse("[ts] primeira linha\nsegunda linha").unwrap();
        assert_eq!(entry.text, "primeira linha\nsegunda linha");
    }

    #[test]
    fn test_segment_without_timestamp_is_dropped() {
        assert!(Entry::parse("texto solto sem colchetes").is_none());

        let entries = parse_log("texto solto\n\n[ts] válido\n\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "válido");
    }

    #[test]
    fn test_parse_log_preserves_order() {
        let raw = "[1] um\n\n[2] [Tema: X] dois\n\n[3] três\n\n";
        let entries = parse_log(raw);
        let stamps: Vec<&str> = entries.iter().map(|e| e.timestamp.as_str()).collect();
        assert_eq!(stamps, vec!["1", "2", "3"]);
        assert_eq!(entries[1].theme.as_deref(), Some("X"));
    }

    #[test]
    fn test_empty_log() {
        assert!(parse_log("").is_empty());
        assert!(parse_log("\n\n\n\n   ").is_empty());
    }

    #[test]
    fn test_blank_theme_is_absent() {
        let entry = Entry::parse("[ts] [Tema: ] texto").unwrap();
        assert_eq!(entry.theme, None);
        assert_eq!(entry.text, "texto");
    }
}
