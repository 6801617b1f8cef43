//! Transfer judge: asks the model whether a question needs a human agent.
//!
//! The model is told to reply with exactly two lines:
//!
//! ```text
//! should_transfer: Sí
//! reason: La pregunta requiere una cotización personalizada
//! ```

use crate::chat_client::ChatClient;
use faqbot_core::{CapabilityFailure, TransferJudge, TransferVerdict};

const SYSTEM_PROMPT: &str = "Decides si una consulta de cliente debe transferirse a un agente humano. Recibes la pregunta del usuario y el resultado de la búsqueda en la base de conocimientos. Responde exactamente con dos líneas:\nshould_transfer: Sí o No\nreason: una frase breve con la razón de la decisión";

const DECISION_KEYS: &[&str] = &["should_transfer", "transferir"];
const REASON_KEYS: &[&str] = &["reason", "razón", "razon"];

/// [`TransferJudge`] backed by a live chat model.
#[derive(Debug, Clone)]
pub struct LlmTransferJudge {
    client: ChatClient,
}

impl LlmTransferJudge {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }
}

/// Parses the two-line verdict format. Keys are case-insensitive and may carry list bullets.
/// A missing reason yields an empty one; a missing decision is an invalid response.
pub fn parse_verdict(text: &str) -> Result<TransferVerdict, CapabilityFailure> {
    let mut decision = None;
    let mut reason = String::new();

    for line in text.lines() {
        let line = line.trim().trim_start_matches(['-', '*']).trim();
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().trim_matches('*').trim().to_lowercase();
        let value = value.trim().trim_matches('*').trim();
        if DECISION_KEYS.contains(&key.as_str()) && decision.is_none() {
            decision = Some(value.to_string());
        } else if REASON_KEYS.contains(&key.as_str()) && reason.is_empty() {
            reason = value.to_string();
        }
    }

    let decision = decision.ok_or_else(|| {
        CapabilityFailure::InvalidResponse(format!("no should_transfer line in {:?}", text))
    })?;
    Ok(TransferVerdict::from_answer(&decision, reason))
}

#[async_trait::async_trait]
impl TransferJudge for LlmTransferJudge {
    fn name(&self) -> &str {
        "llm"
    }

    async fn judge(
        &self,
        question: &str,
        search_result: &str,
    ) -> Result<TransferVerdict, CapabilityFailure> {
        let user = format!(
            "Pregunta del usuario: {}\nResultado de la búsqueda: {}",
            question, search_result
        );
        let text = self.client.complete(SYSTEM_PROMPT, &user).await?;
        let verdict = parse_verdict(&text)?;
        tracing::info!(
            target: "faqbot::skills",
            should_transfer = verdict.should_transfer,
            reason = %verdict.reason,
            "Transfer verdict"
        );
        Ok(verdict)
    }
}
