//! Text normalization and tokenization for Portuguese entries.
//!
//! Lowercases, blanks out punctuation, splits on whitespace and drops
//! stop-words and tokens of three characters or fewer.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Tokens with this many characters or fewer are discarded.
const MAX_SHORT_TOKEN_LEN: usize = 3;

/// Portuguese stop-words: articles, pronouns, prepositions, conjunctions
/// and the most common auxiliary verb forms.
const STOPWORDS_PT: &[&str] = &[
    "a", "o", "as", "os", "um", "uma", "uns", "umas", "de", "do", "da", "dos", "das", "em", "no",
    "na", "nos", "nas", "por", "pelo", "pela", "pelos", "pelas", "para", "pra", "com", "sem",
    "sob", "sobre", "entre", "até", "após", "desde", "contra", "perante", "ante", "e", "ou",
    "mas", "porém", "contudo", "todavia", "entretanto", "porque", "pois", "que", "se", "como",
    "quando", "onde", "enquanto", "embora", "também", "nem", "já", "ainda", "muito", "muita",
    "muitos", "muitas", "pouco", "mais", "menos", "bem", "tão", "tanto", "eu", "tu", "ele",
    "ela", "nós", "vós", "eles", "elas", "você", "vocês", "me", "te", "lhe", "lhes",
    "vos", "meu", "minha", "meus", "minhas", "teu", "tua", "seu", "sua", "seus", "suas",
    "nosso", "nossa", "nossos", "nossas", "dele", "dela", "deles", "delas", "este", "esta",
    "estes", "estas", "esse", "essa", "esses", "essas", "aquele", "aquela", "aqueles",
    "aquelas", "isto", "isso", "aquilo", "qual", "quais", "quem", "cujo", "cuja", "ser", "sou",
    "é", "são", "era", "eram", "foi", "foram", "seja", "estar", "estou", "está", "estão",
    "estava", "estavam", "ter", "tenho", "tem", "têm", "tinha", "tinham", "teve", "haver",
    "há", "havia", "fazer", "faz", "fez", "não", "sim", "aqui", "ali", "lá", "então", "assim",
    "depois", "antes", "agora", "sempre", "nunca", "todo", "toda", "todos", "todas", "outro",
    "outra", "outros", "outras", "mesmo", "mesma", "cada", "algum", "alguma", "nenhum",
    "nenhuma", "coisa", "hoje",
];

static STOPWORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORDS_PT.iter().copied().collect());

/// Whether `word` (already lowercased) is a Portuguese stop-word.
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

/// Characters that survive normalization: ASCII word characters, Latin-1
/// accented letters and whitespace. Everything else becomes a space.
fn is_kept_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || ('\u{C0}'..='\u{FF}').contains(&c) || c.is_whitespace()
}

/// Lowercase `text` and replace punctuation with spaces, collapsing
/// whitespace runs into single spaces.
pub fn normalize(text: &str) -> String {
    let blanked: String = text
        .to_lowercase()
        .chars()
        .map(|c| if is_kept_char(c) { c } else { ' ' })
        .collect();

    blanked.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split `text` into content tokens, in order of appearance.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|token| token.chars().count() > MAX_SHORT_TOKEN_LEN && !is_stopword(token))
        .map(str::to_string)
        .collect()
}
