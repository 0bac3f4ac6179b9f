//! 配置模块

pub mod config;
pub mod loader;

pub use config::{
    AppConfig, ContextConfig, KeepaliveConfig, LoggingConfig, ModelConfig, ServerConfig,
};
pub use loader::{ConfigLoader, ConfigValidationError};
