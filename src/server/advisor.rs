use crate::server::catalog::SnapshotSource;
use crate::server::version::ServerVersion;
use chrono::NaiveDate;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// 升级建议
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpgradeDecision {
    pub recommended_version: ServerVersion,
    pub is_snapshot_offer: bool,
}

impl UpgradeDecision {
    fn new(recommended_version: ServerVersion) -> Self {
        Self {
            is_snapshot_offer: recommended_version.is_snapshot(),
            recommended_version,
        }
    }
}

/// 一次升级检查的输入
#[derive(Debug, Clone)]
pub struct AdvisoryInput<'a> {
    /// 当前配置的版本（可能是用户自定义的）
    pub configured_version: &'a str,
    /// 随工具发布的最新稳定版本
    pub latest_stable_version: &'a str,
    /// 是否自动查找最新快照
    pub auto_latest_snapshot: bool,
}

/// 升级顾问
///
/// 每次调用相互独立，不保存任何状态。"每天最多查一次快照" 的节流完全由
/// 配置版本中内嵌的构建日期和当天日期决定。
pub struct UpgradeAdvisor<'a, S: ?Sized> {
    snapshots: &'a S,
}

impl<'a, S: SnapshotSource + ?Sized> UpgradeAdvisor<'a, S> {
    pub fn new(snapshots: &'a S) -> Self {
        Self { snapshots }
    }

    /// 计算升级建议，None 表示无需提示
    pub async fn advise(
        &self,
        input: &AdvisoryInput<'_>,
        today: NaiveDate,
        cancel: &CancellationToken,
    ) -> Option<UpgradeDecision> {
        let latest = ServerVersion::parse(input.latest_stable_version)?;
        let configured = ServerVersion::parse(input.configured_version)?;

        let is_outdated = configured.less_than(&latest);
        let fallback = || is_outdated.then(|| UpgradeDecision::new(latest.clone()));

        if !input.auto_latest_snapshot {
            return fallback();
        }

        if !should_lookup_snapshots(&configured, today) {
            tracing::debug!(
                configured = configured.raw(),
                "snapshot lookup already done today, skipping"
            );
            return fallback();
        }

        let snapshots = match self.snapshots.fetch_snapshot_versions(cancel).await {
            Ok(snapshots) => snapshots,
            Err(e) => {
                tracing::warn!("snapshot lookup failed, no upgrade offered: {e}");
                return None;
            }
        };

        let newest = snapshots
            .into_iter()
            .filter(|candidate| configured.less_than(candidate))
            .reduce(|best, candidate| {
                if best.less_than(&candidate) {
                    candidate
                } else {
                    best
                }
            });

        match newest {
            Some(snapshot) => Some(UpgradeDecision::new(snapshot)),
            None => fallback(),
        }
    }
}

/// 配置版本带构建日期时，同一天内不重复查找快照
pub fn should_lookup_snapshots(configured: &ServerVersion, today: NaiveDate) -> bool {
    match configured.build_date() {
        Some(date) => date != date_stamp(today),
        None => true,
    }
}

/// `YYYYMMDD`
pub fn date_stamp(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}
