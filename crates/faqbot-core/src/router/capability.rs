//! Contracts for the external collaborators of the router.

use crate::error::CapabilityFailure;

/// Augmentation capability: writes prose for `question` given a context string.
#[async_trait::async_trait]
pub trait Generator: Send + Sync {
    /// Short identifier used in logs (e.g. "mock", "openrouter").
    fn name(&self) -> &str;

    async fn generate(&self, context: &str, question: &str) -> Result<String, CapabilityFailure>;
}

/// Verdict of a [`TransferJudge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferVerdict {
    pub should_transfer: bool,
    pub reason: String,
}

impl TransferVerdict {
    /// Builds a verdict from the judge's raw answer word (e.g. "Sí", "no", "TRUE").
    pub fn from_answer(answer: &str, reason: impl Into<String>) -> Self {
        Self {
            should_transfer: is_affirmative(answer),
            reason: reason.into(),
        }
    }
}

/// Transfer-judgment capability: decides whether a question needs a human agent.
#[async_trait::async_trait]
pub trait TransferJudge: Send + Sync {
    fn name(&self) -> &str;

    async fn judge(
        &self,
        question: &str,
        search_result: &str,
    ) -> Result<TransferVerdict, CapabilityFailure>;
}

/// Fire-and-forget hand-off notification. Errors are logged by the router and otherwise ignored.
pub trait TransferNotifier: Send + Sync {
    fn notify(&self, question: &str) -> Result<(), CapabilityFailure>;
}

/// Default notifier: a structured `warn` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransferNotifier;

impl TransferNotifier for LogTransferNotifier {
    fn notify(&self, question: &str) -> Result<(), CapabilityFailure> {
        tracing::warn!(target: "faqbot::transfer", question, "Transferring conversation to a human agent");
        Ok(())
    }
}

const AFFIRMATIVE: &[&str] = &["si", "sí", "yes", "true"];

/// True for affirmative words in Spanish or English, ignoring case and surrounding
/// whitespace / trailing punctuation.
pub fn is_affirmative(answer: &str) -> bool {
    let word = answer
        .trim()
        .trim_end_matches(|c: char| c == '.' || c == '!')
        .to_lowercase();
    AFFIRMATIVE.contains(&word.as_str())
}
