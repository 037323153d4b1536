use crate::core::constants::server::SNAPSHOT_INDEX_URL;
use crate::error::{AppError, AppResult};
use crate::infrastructure::remote::HttpFetch;
use crate::server::version::ServerVersion;
use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// 快照版本来源
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// 获取已发布的快照版本（无序，不去重）
    async fn fetch_snapshot_versions(
        &self,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<ServerVersion>>;
}

/// 基于目录索引页面的快照目录
pub struct SnapshotCatalog<H> {
    http: H,
    index_url: String,
    timeout: Duration,
}

impl<H: HttpFetch> SnapshotCatalog<H> {
    pub fn new(http: H) -> Self {
        Self {
            http,
            index_url: SNAPSHOT_INDEX_URL.to_string(),
            timeout: Duration::from_secs(crate::core::constants::network::DEFAULT_TIMEOUT_SECS),
        }
    }

    /// 使用自定义索引地址
    pub fn with_url(mut self, url: &str) -> AppResult<Self> {
        let parsed = Url::parse(url).map_err(|e| AppError::Config {
            message: format!("无效的快照索引地址 {url}: {e}"),
        })?;
        self.index_url = parsed.to_string();
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn index_url(&self) -> &str {
        &self.index_url
    }
}

#[async_trait]
impl<H: HttpFetch> SnapshotSource for SnapshotCatalog<H> {
    async fn fetch_snapshot_versions(
        &self,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<ServerVersion>> {
        let request = tokio::time::timeout(self.timeout, self.http.get_text(&self.index_url));

        let body = tokio::select! {
            _ = cancel.cancelled() => return Err(AppError::Cancelled),
            result = request => match result {
                Ok(body) => body?,
                Err(_) => {
                    return Err(AppError::network(format!(
                        "获取快照索引超时 ({}s)",
                        self.timeout.as_secs()
                    )))
                }
            },
        };

        let versions = parse_snapshot_listing(&body);
        tracing::debug!(url = %self.index_url, count = versions.len(), "parsed snapshot catalog");
        Ok(versions)
    }
}

/// 从索引页面中解析快照版本
///
/// 只有以 `/` 结尾的目录项才被视为版本，无法解析的行直接丢弃。
pub fn parse_snapshot_listing(html: &str) -> Vec<ServerVersion> {
    extract_listing_rows(html)
        .into_iter()
        .filter_map(|cell| {
            let name = cell.strip_suffix('/')?;
            ServerVersion::parse(name)
        })
        .collect()
}

fn row_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>").expect("row pattern is valid"))
}

fn cell_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<td[^>]*>(.*?)</td>").expect("cell pattern is valid"))
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"))
}

/// 提取每个表格行第一个单元格的文本
pub fn extract_listing_rows(html: &str) -> Vec<String> {
    row_regex()
        .captures_iter(html)
        .filter_map(|row| {
            let inner = row.get(1)?.as_str();
            let cell = cell_regex().captures(inner)?.get(1)?.as_str();
            Some(cell_text(cell))
        })
        .collect()
}

fn cell_text(cell: &str) -> String {
    let text = tag_regex().replace_all(cell, "");
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#43;", "+")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}
