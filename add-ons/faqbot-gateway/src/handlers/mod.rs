//! Route handlers. Each reads the shared [`AppState`](crate::AppState).

pub(crate) mod answer;
pub(crate) mod faqs;
