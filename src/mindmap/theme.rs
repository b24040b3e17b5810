//! Root theme selection.

use std::collections::HashMap;

use super::entry::Entry;

/// Root label used when no entry carries a theme and no override is given.
pub const DEFAULT_THEME: &str = "Histórico de Textos";

/// Most frequent entry theme, ties resolved by first appearance.
/// Returns `None` when no entry has a theme.
pub fn dominant_theme(entries: &[Entry]) -> Option<&str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for theme in entries.iter().filter_map(|e| e.theme.as_deref()) {
        let count = counts.entry(theme).or_insert_with(|| {
            order.push(theme);
            0
        });
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for theme in order {
        let count = counts[theme];
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((theme, count));
        }
    }
    best.map(|(theme, _)| theme)
}

/// Resolve the root label: explicit override, then dominant theme, then
/// `default_theme`.
pub fn resolve_root_theme(entries: &[Entry], override_theme: Option<&str>, default_theme: &str) -> String {
    override_theme
        .or_else(|| dominant_theme(entries))
        .unwrap_or(default_theme)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(theme: Option<&str>) -> Entry {
        Entry {
            timestamp: "ts".into(),
            theme: theme.map(str::to_string),
            text: "texto".into(),
        }
    }

    #[test]
    fn test_majority_wins() {
        let entries = vec![
            entry(Some("Trabalho")),
            entry(Some("Lazer")),
            entry(None),
            entry(Some("Trabalho")),
        ];
        assert_eq!(dominant_theme(&entries), Some("Trabalho"));
    }

    #[test]
    fn test_tie_prefers_first_seen() {
        let entries = vec![entry(Some("Lazer")), entry(Some("Trabalho"))];
        assert_eq!(dominant_theme(&entries), Some("Lazer"));
    }

    #[test]
    fn test_no_themes_falls_back_to_default() {
        let entries = vec![entry(None), entry(None)];
        assert_eq!(dominant_theme(&entries), None);
        assert_eq!(resolve_root_theme(&entries, None, DEFAULT_THEME), DEFAULT_THEME);
    }

    #[test]
    fn test_override_takes_precedence() {
        let entries = vec![entry(Some("Trabalho"))];
        assert_eq!(resolve_root_theme(&entries, Some("Férias"), DEFAULT_THEME), "Férias");
        assert_eq!(resolve_root_theme(&[], Some("Férias"), DEFAULT_THEME), "Férias");
    }
}
