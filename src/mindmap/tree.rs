//! Mindmap node types.
//!
//! The tree is strictly two levels deep: one [`RootNode`] whose children
//! are [`EntryNode`]s. Field names serialize exactly as the rendering
//! layer expects them (`fullText`, lowercase sentiment).

use serde::{Deserialize, Serialize};

use super::keywords::KeywordList;
use super::sentiment::Sentiment;

/// Identifier of the root node.
pub const ROOT_ID: &str = "root";

/// Marker appended to truncated entry labels.
pub const ELLIPSIS: &str = "...";

/// A serialized mindmap is its root node.
pub type MindmapTree = RootNode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootNode {
    pub id: String,
    pub name: String,
    pub children: Vec<EntryNode>,
}

impl RootNode {
    pub fn new(name: impl Into<String>, children: Vec<EntryNode>) -> Self {
        Self {
            id: ROOT_ID.to_string(),
            name: name.into(),
            children,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryNode {
    pub id: String,
    pub name: String,
    pub timestamp: String,
    pub theme: Option<String>,
    pub full_text: String,
    pub sentiment: Sentiment,
    pub keywords: KeywordList,
}

/// Node id for the entry at `index` among parsed entries.
pub fn entry_id(index: usize) -> String {
    format!("entry-{index}")
}

/// Truncate `text` to `max_chars` characters, appending [`ELLIPSIS`] when
/// anything was cut.
pub fn truncate_label(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

/// Display label for an entry: truncated text, prefixed with the entry's
/// own theme when it differs from the root's.
pub fn entry_label(text: &str, theme: Option<&str>, root_name: &str, max_chars: usize) -> String {
    let label = truncate_label(text, max_chars);
    match theme {
        Some(theme) if theme != root_name => format!("{theme}: {label}"),
        _ => label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_label() {
        let text = "a".repeat(80);
        let label = truncate_label(&text, 50);
        assert_eq!(label, format!("{}...", "a".repeat(50)));
        assert_eq!(label.chars().count(), 53);

        assert_eq!(truncate_label("curto", 50), "curto");
        assert_eq!(truncate_label(&"b".repeat(50), 50), "b".repeat(50));
    }

    #[test]
    fn test_truncate_label_is_char_based() {
        let text = "ã".repeat(60);
        assert_eq!(truncate_label(&text, 50), format!("{}...", "ã".repeat(50)));
    }

    #[test]
    fn test_entry_label_prefix() {
        assert_eq!(entry_label("texto", Some("Lazer"), "Trabalho", 50), "Lazer: texto");
        assert_eq!(entry_label("texto", Some("Trabalho"), "Trabalho", 50), "texto");
        assert_eq!(entry_label("texto", None, "Trabalho", 50), "texto");
    }

    #[test]
    fn test_entry_node_json_shape() {
        let node = EntryNode {
            id: entry_id(0),
            name: "texto".into(),
            timestamp: "01/01/2024 10:00:00".into(),
            theme: None,
            full_text: "texto".into(),
            sentiment: Sentiment::Neutral,
            keywords: KeywordList::default(),
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "entry-0",
                "name": "texto",
                "timestamp": "01/01/2024 10:00:00",
                "theme": null,
                "fullText": "texto",
                "sentiment": "neutral",
                "keywords": [],
            })
        );
    }
}
