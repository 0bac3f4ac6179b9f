//! 提问 DTO
//!
//! 缺失字段取默认值而不是报错：请求体格式不做强校验，
//! 降级处理但不崩溃。

use serde::{Deserialize, Serialize};

/// 提问请求
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct QueryRequest {
    /// 用户提问
    pub query: String,
    /// 是否为重新生成请求
    pub regenerate: bool,
    /// 会话标识
    pub session_id: String,
}

impl Default for QueryRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            regenerate: false,
            session_id: "default".to_string(),
        }
    }
}

/// 提问响应
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResponse {
    /// 是否成功
    pub success: bool,
    /// 生成的响应文本
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// 错误消息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResponse {
    /// 成功响应
    pub fn success(response: String) -> Self {
        Self {
            success: true,
            response: Some(response),
            error: None,
        }
    }

    /// 失败响应
    pub fn failure(error: String) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(error),
        }
    }
}
