//! 生成模型模块

pub mod gemini;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::ModelConfig;
use crate::error::Result;

pub use gemini::GeminiClient;

/// 生成模型客户端抽象
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// 对单条提示词生成补全文本
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// 按配置创建生成模型客户端
pub fn create_generative_model(config: &ModelConfig) -> Result<Arc<dyn GenerativeModel>> {
    Ok(Arc::new(GeminiClient::new(config)?))
}
