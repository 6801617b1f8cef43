//! faqbot-core: FAQ assistant core library (shared types, knowledge index, response router).
//!
//! The knowledge index ranks question/answer records with a transparent lexical heuristic;
//! the response router combines that match with a small-talk classifier and the optional
//! augmentation / transfer-judgment capabilities into exactly one [`Response`] per query.

mod error;
mod knowledge;
mod router;
mod shared;

pub use error::{CapabilityFailure, KnowledgeBaseUnavailable};

pub use shared::{CoreConfig, LlmMode, Response, ResponseSource, DEFAULT_CATEGORY};

pub use knowledge::{
    normalize_query, tokenize, CsvRecordSource, Entry, FaqRecord, KnowledgeIndex, MatchResult,
    RecordSource, DEFAULT_THRESHOLD,
};

pub use router::{
    is_affirmative, is_small_talk, small_talk_reply, Generator, LogTransferNotifier,
    ResponseRouter, TransferJudge, TransferNotifier, TransferVerdict, APOLOGY_HANDOFF_MESSAGE,
    GREETING_REPLY, NO_CONTEXT_MARKER, NO_RESULTS_MARKER, REASON_GENERATION_FAILED,
    REASON_NO_RELEVANT_INFO, THANKS_REPLY,
};
