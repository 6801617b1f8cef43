//! Fixed Spanish lexicon used by the scorer: punctuation, stop-words and synonym map.

/// Characters stripped from both edges of every token.
const PUNCTUATION: &[char] = &['¿', '?', '.', ',', ';', ':'];

const STOPWORDS: &[&str] = &[
    "de", "la", "el", "en", "y", "a", "los", "las", "del", "al", "es", "un", "una", "con", "por",
    "para", "su", "sus", "que", "¿", "?", "están", "estan", "como", "cual", "cuales",
];

/// Location words collapse onto the stem used by "ubicado/ubicada/ubicadas".
const SYNONYMS: &[(&str, &str)] = &[
    ("donde", "ubicad"),
    ("ubicacion", "ubicad"),
    ("oficina", "ubicad"),
    ("direccion", "ubicad"),
];

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

fn canonical(token: String) -> String {
    SYNONYMS
        .iter()
        .find(|(word, _)| *word == token)
        .map(|(_, stem)| stem.to_string())
        .unwrap_or(token)
}

fn split_tokens(text: &str, keep_empty: bool) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(PUNCTUATION))
        .filter(|w| (keep_empty || !w.is_empty()) && !is_stopword(w))
        .map(str::to_string)
        .collect()
}

/// Lower-cases, splits on whitespace, trims punctuation from token edges and drops stop-words.
///
/// Tokens that are empty after trimming are discarded.
pub fn tokenize(text: &str) -> Vec<String> {
    split_tokens(text, false)
}

/// Entry-side tokenization. Like [`tokenize`], except that a word made only of punctuation
/// (a detached "¿" or "?") survives as an empty token, which every query token contains.
pub(crate) fn tokenize_question(text: &str) -> Vec<String> {
    split_tokens(text, true)
}

/// Query-side tokenization: [`tokenize`] followed by the one-to-one synonym map.
///
/// Entry questions are never passed through the synonym map.
pub fn normalize_query(query: &str) -> Vec<String> {
    tokenize(query).into_iter().map(canonical).collect()
}
