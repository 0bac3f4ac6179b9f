use axum::{Json, extract::State, response::Html, response::IntoResponse};
use chrono::Local;
use tracing::{debug, error};

use crate::api::{app_state::AppState, dto::chat_dto::*};

/// 当前本地时间，12 小时制
fn current_timestamp() -> String {
    Local::now().format("%I:%M %p").to_string()
}

/// 欢迎提示语
const INITIAL_QUESTION: &str = "Welcome to Sage! What would you like to learn today?";

pub async fn generate_chat_response(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    debug!("Chat message received ({} chars)", request.message.len());
    state.metrics.record_chat_message();

    // 聊天路径直接返回模型原文；失败时以 200 返回带错误说明的响应
    match state.model.generate(&request.message).await {
        Ok(text) => Json(ChatResponse {
            response: text,
            timestamp: current_timestamp(),
        }),
        Err(e) => {
            error!("Chat generation error: {}", e);
            state.metrics.record_model_failure();
            Json(ChatResponse {
                response: format!("I'm experiencing some difficulties. Error: {}", e),
                timestamp: current_timestamp(),
            })
        }
    }
}

pub async fn home() -> impl IntoResponse {
    let now = current_timestamp();
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Sage</title>
</head>
<body>
  <header>
    <h1>Sage</h1>
    <span class="clock">{now}</span>
  </header>
  <main>
    <p class="initial-question">{INITIAL_QUESTION}</p>
  </main>
</body>
</html>
"#
    ))
}
