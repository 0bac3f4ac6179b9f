use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{debug, error};

use crate::{
    api::{app_state::AppState, dto::query_dto::*},
    error::Result,
};

pub async fn submit_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> impl IntoResponse {
    debug!(
        "Processing query for session {}: regenerate={}",
        request.session_id, request.regenerate
    );

    match process_query(&state, &request).await {
        Ok(response_text) => (
            StatusCode::OK,
            Json(QueryResponse::success(response_text)),
        ),
        Err(e) => {
            error!("Query processing error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(QueryResponse::failure(e.to_string())),
            )
        }
    }
}

/// 分类 → 生成 → 记录
async fn process_query(state: &AppState, request: &QueryRequest) -> Result<String> {
    state.metrics.record_query();

    let (topic, difficulty) = state
        .context_store
        .classify(&request.session_id, &request.query);
    debug!(
        "Session {} classified: topic={:?}, difficulty={}",
        request.session_id,
        topic.map(|t| t.as_str()),
        difficulty.as_str()
    );

    let history_len = state.context_store.interaction_count(&request.session_id);
    let response_text = state
        .response_generator
        .generate(&request.query, history_len)
        .await;

    state
        .context_store
        .record(&request.session_id, &request.query, &response_text);

    Ok(response_text)
}
