//! 保活服务
//!
//! 固定间隔轮询一组 URL 的后台循环，防止托管平台因空闲而休眠
//! 实例。与请求处理完全解耦，不共享任何可变状态；响应状态只
//! 记录日志，不做任何处理。

use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::KeepaliveConfig;
use crate::error::{AppError, Result};

/// 保活服务
pub struct KeepaliveService {
    client: reqwest::Client,
    config: KeepaliveConfig,
}

impl KeepaliveService {
    /// 创建保活服务，单次请求超时取自配置
    pub fn new(config: KeepaliveConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// 在运行时上启动保活循环
    ///
    /// 正常轮次后等待固定间隔，整轮失败后按重试延迟退避，
    /// 循环永不终止。
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "Keepalive loop started: {} urls, {}s interval",
                self.config.urls.len(),
                self.config.interval_secs
            );

            loop {
                match self.ping_all().await {
                    Ok(_) => {
                        tokio::time::sleep(Duration::from_secs(self.config.interval_secs)).await;
                    }
                    Err(e) => {
                        warn!("Keepalive cycle failed: {}, retrying later", e);
                        tokio::time::sleep(Duration::from_secs(self.config.retry_delay_secs)).await;
                    }
                }
            }
        })
    }

    /// 依次 ping 全部 URL
    ///
    /// 单个 URL 失败只记日志并继续；所有 URL 都失败时整轮视为
    /// 失败，交由调用方退避。
    pub async fn ping_all(&self) -> Result<()> {
        let mut succeeded = 0usize;

        for url in &self.config.urls {
            match self.client.get(url).send().await {
                Ok(response) => {
                    debug!("Keepalive ping status for {}: {}", url, response.status());
                    succeeded += 1;
                }
                Err(e) => {
                    warn!("Keepalive ping error for {}: {}", url, e);
                }
            }

            tokio::time::sleep(Duration::from_secs(self.config.pause_between_secs)).await;
        }

        if succeeded == 0 && !self.config.urls.is_empty() {
            return Err(AppError::Upstream(
                "all keepalive targets unreachable".to_string(),
            ));
        }

        Ok(())
    }
}
