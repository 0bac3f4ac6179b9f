//! Chat Routes
//!
//! 定义聊天与首页路由。

use crate::api::handlers::chat_handler::*;
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::app_state::AppState;

/// 创建聊天路由器
pub fn create_chat_router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/generate_response", post(generate_chat_response))
}
