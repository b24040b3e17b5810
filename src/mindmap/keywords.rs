//! Keyword and topic phrase extraction.
//!
//! Seeds the topic list with contiguous two- and three-word phrases, then
//! fills the remaining slots with the most frequent single words that are
//! not already covered by a chosen phrase. Every result is title-cased.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Default number of keywords per entry.
pub const DEFAULT_MAX_KEYWORDS: usize = 5;

/// Bigrams must be longer than this many characters to become candidates.
const MIN_BIGRAM_LEN: usize = 5;

/// Trigrams must be longer than this many characters to become candidates.
const MIN_TRIGRAM_LEN: usize = 8;

/// Ordered, bounded list of display-ready topics for one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordList(Vec<String>);

impl KeywordList {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Heuristic phrase/word extractor. Deterministic for identical input.
#[derive(Debug, Clone, Copy)]
pub struct KeywordExtractor {
    max_keywords: usize,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_KEYWORDS)
    }
}

impl KeywordExtractor {
    pub fn new(max_keywords: usize) -> Self {
        Self { max_keywords }
    }

    /// Candidate phrases in first-seen order, without duplicates.
    fn candidate_phrases(tokens: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut phrases = Vec::new();

        for i in 0..tokens.len() {
            if i + 1 < tokens.len() {
                let bigram = format!("{} {}", tokens[i], tokens[i + 1]);
                if bigram.chars().count() > MIN_BIGRAM_LEN && seen.insert(bigram.clone()) {
                    phrases.push(bigram);
                }
            }
            if i + 2 < tokens.len() {
                let trigram = format!("{} {} {}", tokens[i], tokens[i + 1], tokens[i + 2]);
                if trigram.chars().count() > MIN_TRIGRAM_LEN && seen.insert(trigram.clone()) {
                    phrases.push(trigram);
                }
            }
        }

        phrases
    }

    /// Single-token counts ordered by descending frequency; ties keep the
    /// order in which tokens first appeared.
    fn ranked_tokens(tokens: &[String]) -> Vec<(&str, usize)> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<(&str, usize)> = Vec::new();

        for token in tokens {
            match index.get(token.as_str()) {
                Some(&pos) => counts[pos].1 += 1,
                None => {
                    index.insert(token.as_str(), counts.len());
                    counts.push((token.as_str(), 1));
                }
            }
        }

        // sort_by is stable, so equal counts stay in insertion order
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    /// Extract up to `max_keywords` topics from a filtered token sequence.
    pub fn extract(&self, tokens: &[String]) -> KeywordList {
        if tokens.is_empty() || self.max_keywords == 0 {
            return KeywordList::default();
        }

        let seed_limit = self.max_keywords.div_ceil(2);
        let mut chosen: Vec<String> = Self::candidate_phrases(tokens)
            .into_iter()
            .take(seed_limit)
            .collect();
        let seeds = chosen.len();

        for (token, _) in Self::ranked_tokens(tokens) {
            if chosen.len() >= self.max_keywords {
                break;
            }
            if chosen[..seeds].iter().any(|phrase| phrase.contains(token)) {
                continue;
            }
            chosen.push(token.to_string());
        }

        KeywordList(chosen.iter().map(|k| title_case(k)).collect())
    }
}

/// Capitalize the first letter of every space-separated word.
pub fn title_case(phrase: &str) -> String {
    phrase
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
