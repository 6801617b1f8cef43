//! Shared types used across all faqbot crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Category assigned to records that do not carry one.
pub const DEFAULT_CATEGORY: &str = "General";

/// Where the answer of a [`Response`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseSource {
    /// Matched knowledge-base entry, tagged with its category.
    KnowledgeBase { category: String },
    /// Canned reply to a greeting or courtesy phrase.
    SmallTalk,
    /// Generated by the augmentation capability without knowledge-base context.
    Llm,
    /// Forced hand-off to a human agent.
    Transfer,
}

impl ResponseSource {
    /// Category of the matched entry, when the answer came from the knowledge base.
    pub fn category(&self) -> Option<&str> {
        match self {
            Self::KnowledgeBase { category } => Some(category),
            _ => None,
        }
    }
}

impl fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KnowledgeBase { category } => write!(f, "knowledge_base:{}", category),
            Self::SmallTalk => f.write_str("small_talk"),
            Self::Llm => f.write_str("llm"),
            Self::Transfer => f.write_str("transfer"),
        }
    }
}

impl Serialize for ResponseSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of one query. Built fresh per call and never mutated after it is returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub question: String,
    pub answer: String,
    pub source: ResponseSource,
    pub transfer_to_agent: bool,
    pub transfer_reason: String,
}

impl Response {
    pub(crate) fn new(question: &str, answer: impl Into<String>, source: ResponseSource) -> Self {
        Self {
            question: question.to_string(),
            answer: answer.into(),
            source,
            transfer_to_agent: false,
            transfer_reason: String::new(),
        }
    }

    pub(crate) fn with_transfer(mut self, reason: impl Into<String>) -> Self {
        self.transfer_to_agent = true;
        self.transfer_reason = reason.into();
        self
    }
}

/// Which augmentation backend the binaries should build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmMode {
    /// No augmentation or transfer judgment: fallback mode.
    Off,
    /// Deterministic offline generation, no transfer judgment.
    Mock,
    /// OpenAI-compatible API; requires an API key, otherwise degrades to `Off`.
    #[default]
    Live,
}

/// Global application configuration (CLI + gateway). Load from TOML or env.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Display name used in banners and the gateway status endpoint.
    pub app_name: String,
    /// CSV file holding the question/answer/category records.
    pub knowledge_path: String,
    /// Minimum score a knowledge-base match must exceed (strictly).
    pub search_threshold: f64,
    pub llm_mode: LlmMode,
    /// Base URL of the OpenAI-compatible API.
    pub llm_api_base: String,
    pub llm_model: String,
    /// Never written back out; comes from env `FAQBOT__LLM_API_KEY`, else `OPENROUTER_API_KEY`.
    #[serde(default, skip_serializing)]
    pub llm_api_key: Option<String>,
    pub llm_timeout_secs: u64,
    /// HTTP port for the gateway.
    pub port: u16,
    /// Words that end an interactive chat session (compared case-insensitively).
    pub exit_keywords: Vec<String>,
}

impl CoreConfig {
    /// API key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.llm_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// True when `input` is one of the configured exit keywords.
    pub fn is_exit_keyword(&self, input: &str) -> bool {
        let input = input.trim().to_lowercase();
        self.exit_keywords.iter().any(|k| k.to_lowercase() == input)
    }

    /// Load config from file and environment. Precedence: env `FAQBOT__*` > config file > defaults.
    /// The file is `FAQBOT_CONFIG` when set, else `config/faqbot` (extension resolved by `config`).
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("FAQBOT_CONFIG").unwrap_or_else(|_| "config/faqbot".to_string());
        Self::load_from(&config_path)
    }

    /// Same as [`CoreConfig::load`] with an explicit file path (which may not exist).
    ///
    /// `OPENROUTER_CHAT_MODEL` and `OPENROUTER_API_KEY` override the file, but lose to
    /// their `FAQBOT__*` counterparts.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("app_name", "FAQ Assistant")?
            .set_default("knowledge_path", "data/faq.csv")?
            .set_default("search_threshold", 0.2_f64)?
            .set_default("llm_mode", "live")?
            .set_default("llm_api_base", "https://openrouter.ai/api/v1")?
            .set_default("llm_model", "openai/gpt-3.5-turbo")?
            .set_default("llm_timeout_secs", 30_i64)?
            .set_default("port", 8010_i64)?
            .set_default("exit_keywords", vec!["salir", "exit", "quit", "adios"])?;
        for (key, value) in compat_overrides(|name| std::env::var(name).ok()) {
            builder = builder.set_override(key, value)?;
        }

        let path = Path::new(config_path);
        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder.add_source(config::File::with_name(config_path).required(false))
        };

        let built = builder
            .add_source(
                config::Environment::with_prefix("FAQBOT")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("exit_keywords"),
            )
            .build()?;

        built.try_deserialize()
    }
}

/// Un-prefixed env vars accepted for compatibility: (legacy var, namespaced var, field).
const COMPAT_ENV: &[(&str, &str, &str)] = &[
    ("OPENROUTER_CHAT_MODEL", "FAQBOT__LLM_MODEL", "llm_model"),
    ("OPENROUTER_API_KEY", "FAQBOT__LLM_API_KEY", "llm_api_key"),
];

/// Fields to force from legacy vars: set and non-blank, with no namespaced var present.
fn compat_overrides(lookup: impl Fn(&str) -> Option<String>) -> Vec<(&'static str, String)> {
    let present = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
    let mut overrides = Vec::new();
    for &(legacy, namespaced, field) in COMPAT_ENV {
        if present(namespaced).is_some() {
            continue;
        }
        if let Some(value) = present(legacy) {
            overrides.push((field, value));
        }
    }
    overrides
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            app_name: "FAQ Assistant".to_string(),
            knowledge_path: "data/faq.csv".to_string(),
            search_threshold: 0.2,
            llm_mode: LlmMode::Live,
            llm_api_base: "https://openrouter.ai/api/v1".to_string(),
            llm_model: "openai/gpt-3.5-turbo".to_string(),
            llm_api_key: None,
            llm_timeout_secs: 30,
            port: 8010,
            exit_keywords: ["salir", "exit", "quit", "adios"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
