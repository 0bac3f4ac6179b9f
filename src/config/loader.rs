use crate::config::config::AppConfig;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use std::path::PathBuf;

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 搜索路径：
    /// 1. ./config.toml
    /// 2. 环境变量
    pub fn load() -> Result<AppConfig, figment::Error> {
        let figment = Figment::from(figment::providers::Serialized::defaults(
            AppConfig::development(),
        ))
        .merge(Toml::file("config.toml"))
        .merge(Env::prefixed("SAGE_").split("_").global());

        let mut config: AppConfig = figment.extract()?;
        apply_api_key_env(&mut config);
        Ok(config)
    }

    /// 从指定路径加载配置
    pub fn load_from(path: PathBuf) -> Result<AppConfig, figment::Error> {
        let figment = Figment::from(figment::providers::Serialized::defaults(
            AppConfig::development(),
        ))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SAGE_").split("_").global());

        let mut config: AppConfig = figment.extract()?;
        apply_api_key_env(&mut config);
        Ok(config)
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        if config.model.api_key.is_empty() {
            return Err(ConfigValidationError::MissingApiKey);
        }

        if config.context.max_history == 0 {
            return Err(ConfigValidationError::InvalidMaxHistory);
        }

        Ok(())
    }
}

/// GEMINI_API_KEY 环境变量优先于配置文件
fn apply_api_key_env(config: &mut AppConfig) {
    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        if !key.is_empty() {
            config.model.api_key = key;
        }
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigValidationError {
    #[error("服务端口无效，必须大于 0")]
    InvalidPort,

    #[error("Gemini API 密钥未配置（设置 GEMINI_API_KEY 环境变量）")]
    MissingApiKey,

    #[error("max_history 无效，必须大于 0")]
    InvalidMaxHistory,

    #[error("配置路径无效: {0}")]
    InvalidPath(String),
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from("config.toml")
}

/// 检查配置文件是否存在
pub fn config_exists() -> bool {
    default_config_path().exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_missing_api_key() {
        let config = AppConfig::development();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::MissingApiKey)
        ));
    }

    #[test]
    fn test_validate_accepts_configured_key() {
        let mut config = AppConfig::development();
        config.model.api_key = "test-key".into();
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = AppConfig::development();
        config.model.api_key = "test-key".into();
        config.server.port = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::InvalidPort)
        ));
    }

    #[test]
    fn test_validate_rejects_zero_history() {
        let mut config = AppConfig::development();
        config.model.api_key = "test-key".into();
        config.context.max_history = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::InvalidMaxHistory)
        ));
    }
}
