//! Read-only views over the knowledge base.

use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FaqQuery {
    #[serde(default)]
    category: Option<String>,
}

/// GET /v1/faqs?category=<c>: all entries, or only those of one category (case-insensitive).
pub(crate) async fn list_faqs(
    State(state): State<AppState>,
    Query(query): Query<FaqQuery>,
) -> Json<serde_json::Value> {
    let entries = match query.category.as_deref().map(str::trim) {
        Some(category) if !category.is_empty() => state.router.entries_by_category(category),
        _ => state.router.all_entries(),
    };
    Json(serde_json::json!({
        "count": entries.len(),
        "faqs": entries,
    }))
}

/// GET /v1/categories: distinct categories with entry counts, in load order.
pub(crate) async fn list_categories(State(state): State<AppState>) -> Json<serde_json::Value> {
    let categories: Vec<serde_json::Value> = state
        .router
        .index()
        .categories()
        .into_iter()
        .map(|(category, count)| serde_json::json!({ "category": category, "count": count }))
        .collect();
    Json(serde_json::json!({ "categories": categories }))
}
