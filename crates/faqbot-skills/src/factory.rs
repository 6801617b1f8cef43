//! Builds the capability set the configuration allows.

use crate::chat_client::ChatClient;
use crate::model_router::ModelRouter;
use crate::transfer_judge::LlmTransferJudge;
use faqbot_core::{CoreConfig, Generator, LlmMode, ResponseRouter, TransferJudge};
use std::sync::Arc;

/// Optional generator and transfer judge for a [`ResponseRouter`].
#[derive(Clone, Default)]
pub struct Capabilities {
    pub generator: Option<Arc<dyn Generator>>,
    pub judge: Option<Arc<dyn TransferJudge>>,
}

impl Capabilities {
    /// Fallback mode.
    pub fn none() -> Self {
        Self::default()
    }

    /// Short label for banners and the status endpoint: "off", "mock" or "live".
    pub fn mode_label(&self) -> &'static str {
        match (&self.generator, &self.judge) {
            (None, _) => "off",
            (Some(_), None) => "mock",
            (Some(_), Some(_)) => "live",
        }
    }

    pub fn install(self, router: ResponseRouter) -> ResponseRouter {
        router
            .with_generator(self.generator)
            .with_transfer_judge(self.judge)
    }
}

/// `off` builds nothing, `mock` builds the mock generator only, and `live` builds the
/// live generator plus the transfer judge when an API key is present. A missing key or an
/// unusable HTTP client degrades to fallback mode with a warning.
pub fn build_capabilities(config: &CoreConfig) -> Capabilities {
    match config.llm_mode {
        LlmMode::Off => Capabilities::none(),
        LlmMode::Mock => Capabilities {
            generator: Some(Arc::new(ModelRouter::mock())),
            judge: None,
        },
        LlmMode::Live => match ChatClient::from_config(config) {
            None => {
                tracing::warn!(
                    target: "faqbot::skills",
                    "No API key configured (FAQBOT__LLM_API_KEY or OPENROUTER_API_KEY); running in fallback mode"
                );
                Capabilities::none()
            }
            Some(Err(e)) => {
                tracing::warn!(target: "faqbot::skills", error = %e, "LLM client unavailable; running in fallback mode");
                Capabilities::none()
            }
            Some(Ok(client)) => {
                tracing::info!(
                    target: "faqbot::skills",
                    model = client.model(),
                    base = %config.llm_api_base,
                    "LLM capabilities enabled"
                );
                Capabilities {
                    generator: Some(Arc::new(ModelRouter::live(client.clone()))),
                    judge: Some(Arc::new(LlmTransferJudge::new(client))),
                }
            }
        },
    }
}
