//! Model Router: answers a question from a context string, either with a deterministic
//! mock or through a live chat-completions API.

use crate::chat_client::ChatClient;
use faqbot_core::{CapabilityFailure, Generator};

const SYSTEM_PROMPT: &str = "Eres un asistente de atención al cliente. Responde únicamente con la información del contexto proporcionado. Si el contexto no contiene la respuesta, dilo con amabilidad y no inventes datos. Responde en el mismo idioma de la pregunta, de forma breve y cordial.";

const ANSWER_MARKER: &str = "Respuesta:";

const MOCK_NO_CONTEXT_REPLY: &str =
    "[Respuesta simulada] No encuentro información sobre eso en nuestra base de conocimientos.";

enum Backend {
    Mock,
    Live(ChatClient),
}

/// [`Generator`] backed by a mock or a live model.
pub struct ModelRouter {
    backend: Backend,
}

impl ModelRouter {
    /// Deterministic generator for demos and tests; never fails.
    pub fn mock() -> Self {
        Self {
            backend: Backend::Mock,
        }
    }

    pub fn live(client: ChatClient) -> Self {
        Self {
            backend: Backend::Live(client),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self.backend, Backend::Live(_))
    }

    /// Echoes the stored answer when the context carries one.
    fn mock_generate(context: &str) -> String {
        context
            .split_once(ANSWER_MARKER)
            .map(|(_, answer)| answer.trim())
            .filter(|answer| !answer.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| MOCK_NO_CONTEXT_REPLY.to_string())
    }
}

pub(crate) fn user_prompt(context: &str, question: &str) -> String {
    format!("Contexto:\n{}\n\nPregunta: {}", context, question)
}

#[async_trait::async_trait]
impl Generator for ModelRouter {
    fn name(&self) -> &str {
        match self.backend {
            Backend::Mock => "mock",
            Backend::Live(_) => "live",
        }
    }

    async fn generate(&self, context: &str, question: &str) -> Result<String, CapabilityFailure> {
        match &self.backend {
            Backend::Mock => Ok(Self::mock_generate(context)),
            Backend::Live(client) => {
                tracing::debug!(
                    target: "faqbot::skills",
                    model = client.model(),
                    "Generating answer"
                );
                client
                    .complete(SYSTEM_PROMPT, &user_prompt(context, question))
                    .await
            }
        }
    }
}
