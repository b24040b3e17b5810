//! Lexicon-based sentiment classification.
//!
//! Counts whole-word hits from fixed positive and negative Portuguese word
//! lists. There is no intensity scoring and no negation handling, so
//! "não gostei" still counts as a positive hit for "gostei".

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

const POSITIVE_WORDS: &[&str] = &[
    "bom", "boa", "ótimo", "ótima", "excelente", "feliz", "alegre", "alegria", "maravilhoso",
    "maravilhosa", "incrível", "adorei", "gostei", "amor", "sucesso", "perfeito", "legal",
    "lindo", "linda", "fantástico", "tranquilo", "satisfeito", "animado", "obrigado",
];

const NEGATIVE_WORDS: &[&str] = &[
    "ruim", "péssimo", "péssima", "triste", "tristeza", "horrível", "terrível", "odeio",
    "raiva", "problema", "difícil", "medo", "cansado", "cansada", "chato", "fracasso", "dor",
    "preocupado", "ansioso", "pior", "mal", "infeliz",
];

fn compile(words: &[&str]) -> Vec<Regex> {
    words
        .iter()
        .map(|word| {
            Regex::new(&format!(r"\b{}\b", regex::escape(word))).expect("lexicon word is a valid pattern")
        })
        .collect()
}

static POSITIVE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(POSITIVE_WORDS));
static NEGATIVE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(NEGATIVE_WORDS));

/// Three-way polarity of an entry's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// Positive and negative hit counts for one text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentScore {
    pub positive: usize,
    pub negative: usize,
}

impl SentimentScore {
    pub fn label(&self) -> Sentiment {
        match self.positive.cmp(&self.negative) {
            std::cmp::Ordering::Greater => Sentiment::Positive,
            std::cmp::Ordering::Less => Sentiment::Negative,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        }
    }
}

fn count_hits(patterns: &[Regex], text: &str) -> usize {
    patterns.iter().map(|p| p.find_iter(text).count()).sum()
}

/// Count lexicon hits in `text` (lowercased before matching).
pub fn score(text: &str) -> SentimentScore {
    let lowered = text.to_lowercase();
    SentimentScore {
        positive: count_hits(&POSITIVE_PATTERNS, &lowered),
        negative: count_hits(&NEGATIVE_PATTERNS, &lowered),
    }
}

/// Classify `text` as positive, negative or neutral.
pub fn classify(text: &str) -> Sentiment {
    score(text).label()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive() {
        let s = score("Bom dia, hoje foi um ótimo dia!");
        assert_eq!(s, SentimentScore { positive: 2, negative: 0 });
        assert_eq!(s.label(), Sentiment::Positive);
    }

    #[test]
    fn test_negative() {
        assert_eq!(classify("Que dia horrível, estou muito cansado."), Sentiment::Negative);
    }

    #[test]
    fn test_tie_is_neutral() {
        assert_eq!(classify("Foi bom mas também foi ruim"), Sentiment::Neutral);
        assert_eq!(classify("Fui ao mercado comprar pão"), Sentiment::Neutral);
        assert_eq!(classify(""), Sentiment::Neutral);
    }

    #[test]
    fn test_whole_word_only() {
        // "bombeiro" contains "bom", "maldade" contains "mal"
        assert_eq!(score("O bombeiro falou da maldade"), SentimentScore::default());
    }

    #[test]
    fn test_accented_word_boundaries() {
        assert_eq!(score("Péssimo! péssimo, PÉSSIMO.").negative, 3);
    }

    #[test]
    fn test_repeated_hits_accumulate() {
        let s = score("bom bom bom, mas ruim");
        assert_eq!(s.positive, 3);
        assert_eq!(s.negative, 1);
        assert_eq!(s.label(), Sentiment::Positive);
    }

    #[test]
    fn test_negation_is_not_handled() {
        assert_eq!(classify("não gostei"), Sentiment::Positive);
    }

    #[test]
    fn test_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Sentiment::Negative).unwrap(), "\"negative\"");
        assert_eq!(Sentiment::Neutral.to_string(), "neutral");
    }
}
