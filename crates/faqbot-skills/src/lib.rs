//! Concrete implementations of the router's external capabilities.
//!
//! - [`ChatClient`]: OpenAI-compatible chat completions (OpenRouter by default).
//! - [`ModelRouter`]: augmentation capability, mock or live.
//! - [`LlmTransferJudge`]: asks the model whether a human agent should take over.
//! - [`build_capabilities`]: picks the set that the configuration and credentials allow.

mod chat_client;
mod factory;
mod model_router;
mod transfer_judge;

pub use chat_client::ChatClient;
pub use factory::{build_capabilities, Capabilities};
pub use model_router::ModelRouter;
pub use transfer_judge::{parse_verdict, LlmTransferJudge};
