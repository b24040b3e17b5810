//! Mindmap: text history → two-level topic tree.
//!
//! Pure, synchronous pipeline over an in-memory log snapshot:
//! - `entry`: splits the log into timestamped, optionally themed entries
//! - `tokenizer`: normalization and Portuguese stop-word filtering
//! - `keywords`: phrase-biased topic extraction
//! - `sentiment`: lexicon polarity
//! - `theme`: dominant theme / root label resolution
//! - `tree`: node types and labels
//!
//! Nothing here performs I/O or fails; malformed segments are dropped.

pub mod entry;
pub mod keywords;
pub mod sentiment;
pub mod theme;
pub mod tokenizer;
pub mod tree;

use tracing::debug;

pub use entry::{parse_log, Entry};
pub use keywords::{KeywordExtractor, KeywordList, DEFAULT_MAX_KEYWORDS};
pub use sentiment::Sentiment;
pub use theme::DEFAULT_THEME;
pub use tree::{EntryNode, MindmapTree, RootNode};

/// Default maximum characters of entry text shown in a node label.
pub const DEFAULT_LABEL_MAX_CHARS: usize = 50;

/// Tunables for mindmap construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MindmapOptions {
    pub default_theme: String,
    pub max_keywords: usize,
    pub label_max_chars: usize,
}

impl Default for MindmapOptions {
    fn default() -> Self {
        Self {
            default_theme: DEFAULT_THEME.to_string(),
            max_keywords: DEFAULT_MAX_KEYWORDS,
            label_max_chars: DEFAULT_LABEL_MAX_CHARS,
        }
    }
}

/// Mindmap builder. Holds only configuration, so one instance can be shared
/// across concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct Mindmap {
    options: MindmapOptions,
    extractor: KeywordExtractor,
}

impl Mindmap {
    pub fn new(options: MindmapOptions) -> Self {
        let extractor = KeywordExtractor::new(options.max_keywords);
        Self { options, extractor }
    }

    /// Build the tree for `raw_log`. `override_theme`, when given, becomes
    /// the root name regardless of the log's content.
    pub fn build(&self, raw_log: &str, override_theme: Option<&str>) -> MindmapTree {
        let entries = parse_log(raw_log);
        let root_name =
            theme::resolve_root_theme(&entries, override_theme, &self.options.default_theme);

        let children: Vec<EntryNode> = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| self.entry_node(index, entry, &root_name))
            .collect();

        debug!(
            "Built mindmap '{}' with {} entries",
            root_name,
            children.len()
        );

        RootNode::new(root_name, children)
    }

    fn entry_node(&self, index: usize, entry: Entry, root_name: &str) -> EntryNode {
        let tokens = tokenizer::tokenize(&entry.text);
        let keywords = self.extractor.extract(&tokens);
        let sentiment = sentiment::classify(&entry.text);
        let name = tree::entry_label(
            &entry.text,
            entry.theme.as_deref(),
            root_name,
            self.options.label_max_chars,
        );

        EntryNode {
            id: tree::entry_id(index),
            name,
            timestamp: entry.timestamp,
            theme: entry.theme,
            full_text: entry.text,
            sentiment,
            keywords,
        }
    }
}

/// Build a mindmap with default options.
pub fn build_mindmap(raw_log: &str, override_theme: Option<&str>) -> MindmapTree {
    Mindmap::default().build(raw_log, override_theme)
}
