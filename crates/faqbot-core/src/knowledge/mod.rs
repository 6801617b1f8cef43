//! In-memory FAQ knowledge base.
//!
//! Records come from a [`RecordSource`] once at startup and are validated into immutable
//! [`Entry`] values owned by the [`KnowledgeIndex`]. Search is purely lexical:
//!
//! | Signal                                   | Weight |
//! |------------------------------------------|--------|
//! | query token ⊂ question token (or ⊃)      | +0.4   |
//! | query token == question token            | +0.2   |
//! | query token inside the category          | +0.3   |
//! | query token inside the answer            | +0.1   |
//! | whole query inside question or answer    | +0.5 (after normalization) |

mod index;
mod lexicon;
mod source;

pub use index::{KnowledgeIndex, MatchResult, DEFAULT_THRESHOLD};
pub use lexicon::{normalize_query, tokenize};
pub use source::CsvRecordSource;

use crate::error::KnowledgeBaseUnavailable;
use serde::{Deserialize, Serialize};

/// One knowledge-base record. `category` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub question: String,
    pub answer: String,
    pub category: String,
}

/// Raw record as delivered by a source, before validation.
///
/// Column names are accepted in Spanish (`pregunta`, `respuesta`, `categoria`) or English.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaqRecord {
    #[serde(alias = "pregunta")]
    pub question: String,
    #[serde(alias = "respuesta")]
    pub answer: String,
    #[serde(default, alias = "categoria")]
    pub category: Option<String>,
}

impl FaqRecord {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        category: Option<&str>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            category: category.map(str::to_string),
        }
    }
}

/// Supplies the records a [`KnowledgeIndex`] is built from.
pub trait RecordSource {
    /// Reads every record. Failing here means no index is produced at all.
    fn load(&self) -> Result<Vec<FaqRecord>, KnowledgeBaseUnavailable>;
}

impl RecordSource for Vec<FaqRecord> {
    fn load(&self) -> Result<Vec<FaqRecord>, KnowledgeBaseUnavailable> {
        Ok(self.clone())
    }
}

impl RecordSource for [FaqRecord] {
    fn load(&self) -> Result<Vec<FaqRecord>, KnowledgeBaseUnavailable> {
        Ok(self.to_vec())
    }
}
