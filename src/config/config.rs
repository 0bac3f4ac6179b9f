use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
}

/// 生成模型配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModelConfig {
    /// Gemini API 密钥（GEMINI_API_KEY 环境变量优先）
    pub api_key: String,
    /// API 端点
    pub endpoint: String,
    /// 模型名称
    pub model_name: String,
    /// 采样温度
    pub temperature: f32,
    /// Top-p 采样
    pub top_p: f32,
    /// 最大输出 Token 数
    pub max_output_tokens: u32,
    /// 请求超时（秒）
    pub request_timeout: u64,
}

/// 对话上下文配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ContextConfig {
    /// 每个会话保留的最大交互数
    pub max_history: usize,
}

/// 保活配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeepaliveConfig {
    /// 是否启用保活循环
    pub enabled: bool,
    /// 保活目标 URL 列表
    pub urls: Vec<String>,
    /// 轮询间隔（秒）
    pub interval_secs: u64,
    /// 失败后重试延迟（秒）
    pub retry_delay_secs: u64,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// URL 之间的停顿（秒）
    pub pause_between_secs: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 日志文件路径
    pub log_dir: Option<PathBuf>,
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// 生成模型配置
    pub model: ModelConfig,
    /// 对话上下文配置
    pub context: ContextConfig,
    /// 保活配置
    pub keepalive: KeepaliveConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 应用名称
    pub app_name: String,
    /// 环境
    pub environment: String,
}

impl AppConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 8080,
            },
            model: ModelConfig {
                api_key: String::new(),
                endpoint: "https://generativelanguage.googleapis.com/v1beta".into(),
                model_name: "gemini-pro".into(),
                temperature: 0.7,
                top_p: 0.9,
                max_output_tokens: 2048,
                request_timeout: 60,
            },
            context: ContextConfig { max_history: 5 },
            keepalive: KeepaliveConfig {
                enabled: false,
                urls: vec![
                    "https://sage-ai.onrender.com".into(),
                    "https://sage-ai-mirror.onrender.com".into(),
                    "https://sage-ai-backup.onrender.com".into(),
                ],
                interval_secs: 300,
                retry_delay_secs: 60,
                request_timeout_secs: 10,
                pause_between_secs: 2,
            },
            logging: LoggingConfig {
                level: "debug".into(),
                log_dir: None,
            },
            app_name: "sage".into(),
            environment: "development".into(),
        }
    }

    /// 创建生产环境配置
    pub fn production() -> Self {
        let mut config = Self::development();
        config.environment = "production".into();
        config.logging.level = "info".into();
        config.keepalive.enabled = true;
        config
    }
}
