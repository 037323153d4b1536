use crate::core::constants::network::{DEFAULT_TIMEOUT_SECS, USER_AGENT};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// 获取远程文本内容的能力
#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// GET 请求并返回完整响应体
    async fn get_text(&self, url: &str) -> AppResult<String>;
}

/// HTTP 客户端包装器
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// 创建新的 HTTP 客户端
    pub fn new() -> AppResult<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// 创建带自定义超时的 HTTP 客户端
    pub fn with_timeout(timeout_secs: u64) -> AppResult<Self> {
        let timeout = Duration::from_secs(timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetch for HttpClient {
    async fn get_text(&self, url: &str) -> AppResult<String> {
        tracing::debug!(url, "GET");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::network(format!("HTTP {status}: {url}")));
        }

        Ok(response.text().await?)
    }
}
