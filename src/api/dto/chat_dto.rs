//! 聊天 DTO

use serde::{Deserialize, Serialize};

/// 聊天消息请求
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ChatRequest {
    /// 用户消息
    pub message: String,
}

/// 聊天消息响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// 响应文本
    pub response: String,
    /// 12 小时制时间戳（HH:MM AM/PM）
    pub timestamp: String,
}
