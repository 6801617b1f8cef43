//! POST /v1/answer: one question in, one routed `Response` out.

use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use faqbot_core::Response;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerRequest {
    question: String,
}

pub(crate) async fn answer(
    State(state): State<AppState>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<Response>, (StatusCode, Json<serde_json::Value>)> {
    if req.question.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "question must not be empty" })),
        ));
    }

    let response = state.router.answer(&req.question).await;
    tracing::info!(
        target: "faqbot::gateway",
        source = %response.source,
        transfer = response.transfer_to_agent,
        "Answered"
    );
    Ok(Json(response))
}
