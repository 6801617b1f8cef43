//! Ordered, immutable FAQ index with best-match lexical search.

use super::lexicon::{normalize_query, tokenize_question};
use super::{Entry, FaqRecord, RecordSource};
use crate::error::KnowledgeBaseUnavailable;
use crate::shared::DEFAULT_CATEGORY;

/// Default minimum score a match must exceed.
pub const DEFAULT_THRESHOLD: f64 = 0.2;

const SUBSTRING_WEIGHT: f64 = 0.4;
const EXACT_WEIGHT: f64 = 0.2;
const CATEGORY_WEIGHT: f64 = 0.3;
const ANSWER_WEIGHT: f64 = 0.1;
const PHRASE_BONUS: f64 = 0.5;

/// Best entry for a query together with the score it won with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult<'a> {
    pub entry: &'a Entry,
    pub score: f64,
}

/// Entry plus the lower-cased / tokenized views the scorer needs, computed once at load.
#[derive(Debug)]
struct IndexedEntry {
    entry: Entry,
    question_lower: String,
    answer_lower: String,
    category_lower: String,
    question_tokens: Vec<String>,
}

impl IndexedEntry {
    fn new(entry: Entry) -> Self {
        Self {
            question_lower: entry.question.to_lowercase(),
            answer_lower: entry.answer.to_lowercase(),
            category_lower: entry.category.to_lowercase(),
            question_tokens: tokenize_question(&entry.question),
            entry,
        }
    }

    /// Score of this entry for an already-normalized, non-empty query.
    fn score(&self, query_lower: &str, query_tokens: &[String]) -> f64 {
        let mut score = 0.0;
        for query_token in query_tokens {
            for question_token in &self.question_tokens {
                if question_token.contains(query_token.as_str())
                    || query_token.contains(question_token.as_str())
                {
                    score += SUBSTRING_WEIGHT;
                }
                if query_token == question_token {
                    score += EXACT_WEIGHT;
                }
            }
            if self.category_lower.contains(query_token.as_str()) {
                score += CATEGORY_WEIGHT;
            }
            if self.answer_lower.contains(query_token.as_str()) {
                score += ANSWER_WEIGHT;
            }
        }

        score /= query_tokens.len() as f64;

        if self.question_lower.contains(query_lower) || self.answer_lower.contains(query_lower) {
            score += PHRASE_BONUS;
        }
        score
    }
}

/// Read-only FAQ index. Insertion order is preserved and breaks score ties (first wins).
#[derive(Debug, Default)]
pub struct KnowledgeIndex {
    entries: Vec<IndexedEntry>,
}

impl KnowledgeIndex {
    /// Loads and validates every record from `source`. Any invalid record fails the whole load.
    pub fn from_source<S: RecordSource + ?Sized>(
        source: &S,
    ) -> Result<Self, KnowledgeBaseUnavailable> {
        let records = source.load()?;
        let index = Self::from_records(records)?;
        tracing::info!(
            target: "faqbot::knowledge",
            entries = index.len(),
            "Knowledge base loaded"
        );
        Ok(index)
    }

    /// Validates records into entries: question and answer must be non-blank,
    /// a blank or missing category becomes [`DEFAULT_CATEGORY`].
    pub fn from_records(
        records: impl IntoIterator<Item = FaqRecord>,
    ) -> Result<Self, KnowledgeBaseUnavailable> {
        let mut entries = Vec::new();
        for (row, record) in records.into_iter().enumerate() {
            let question = record.question.trim();
            if question.is_empty() {
                return Err(KnowledgeBaseUnavailable::EmptyField {
                    row: row + 1,
                    field: "question",
                });
            }
            let answer = record.answer.trim();
            if answer.is_empty() {
                return Err(KnowledgeBaseUnavailable::EmptyField {
                    row: row + 1,
                    field: "answer",
                });
            }
            let category = record
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_CATEGORY);
            entries.push(IndexedEntry::new(Entry {
                question: question.to_string(),
                answer: answer.to_string(),
                category: category.to_string(),
            }));
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best entry scoring strictly above `threshold`, or `None`.
    pub fn search(&self, query: &str, threshold: f64) -> Option<&Entry> {
        self.search_match(query, threshold).map(|m| m.entry)
    }

    /// Like [`KnowledgeIndex::search`], also reporting the winning score.
    ///
    /// A query with no surviving tokens (only stop-words / punctuation) never matches.
    pub fn search_match(&self, query: &str, threshold: f64) -> Option<MatchResult<'_>> {
        let query_lower = query.to_lowercase();
        let query_tokens = normalize_query(query);
        if query_tokens.is_empty() {
            return None;
        }

        let mut best: Option<MatchResult<'_>> = None;
        let mut best_score = 0.0;
        for candidate in &self.entries {
            let score = candidate.score(&query_lower, &query_tokens);
            if score > best_score && score > threshold {
                best_score = score;
                best = Some(MatchResult {
                    entry: &candidate.entry,
                    score,
                });
            }
        }

        tracing::debug!(
            target: "faqbot::knowledge",
            tokens = ?query_tokens,
            best_score,
            matched = best.is_some(),
            "Knowledge search"
        );
        best
    }

    /// Entries whose category equals `category`, ignoring case, in index order.
    pub fn get_by_category(&self, category: &str) -> Vec<&Entry> {
        let wanted = category.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.category_lower == wanted)
            .map(|e| &e.entry)
            .collect()
    }

    /// All entries in insertion order.
    pub fn get_all(&self) -> Vec<&Entry> {
        self.entries.iter().map(|e| &e.entry).collect()
    }

    /// Distinct categories in first-seen order, with their entry counts.
    pub fn categories(&self) -> Vec<(String, usize)> {
        let mut out: Vec<(String, usize)> = Vec::new();
        for e in &self.entries {
            match out
                .iter_mut()
                .find(|(c, _)| c.to_lowercase() == e.category_lower)
            {
                Some((_, n)) => *n += 1,
                None => out.push((e.entry.category.clone(), 1)),
            }
        }
        out
    }
}
