use crate::core::constants::settings::{AUTO_LATEST_SNAPSHOT, SERVER_VERSION};
use crate::error::AppResult;
use crate::infrastructure::config::ConfigurationStore;
use crate::server::advisor::{AdvisoryInput, UpgradeAdvisor};
use crate::server::catalog::SnapshotSource;
use crate::server::offer::{configuration_target, Notifier, UpgradeChoice, UpgradeOffer};
use chrono::NaiveDate;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// 一次升级检查的结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    pub offer: UpgradeOffer,
    pub choice: UpgradeChoice,
}

/// 检查配置的服务器版本，必要时提示升级
///
/// 最新稳定版取 serverVersion 的默认值。配置无法解析、网络失败都不会报错，
/// 只返回 None；只有写入配置失败才返回错误。
pub async fn check_server_version<C, S, N>(
    config: &mut C,
    snapshots: &S,
    notifier: &N,
    today: NaiveDate,
    cancel: &CancellationToken,
) -> AppResult<Option<CheckOutcome>>
where
    C: ConfigurationStore + ?Sized,
    S: SnapshotSource + ?Sized,
    N: Notifier + ?Sized,
{
    let Some(configured) = config.get_string(SERVER_VERSION) else {
        return Ok(None);
    };
    let inspection = config.inspect(SERVER_VERSION);
    let Some(latest) = inspection
        .default_value
        .as_ref()
        .and_then(|v| v.as_str())
        .map(str::to_string)
    else {
        return Ok(None);
    };

    let input = AdvisoryInput {
        configured_version: &configured,
        latest_stable_version: &latest,
        auto_latest_snapshot: config.get_bool(AUTO_LATEST_SNAPSHOT).unwrap_or(false),
    };

    let Some(decision) = UpgradeAdvisor::new(snapshots)
        .advise(&input, today, cancel)
        .await
    else {
        tracing::debug!(configured = %configured, "server version is up to date");
        return Ok(None);
    };

    let offer = UpgradeOffer::from_decision(&decision, &configured, configuration_target(&inspection));
    tracing::info!(
        recommended = decision.recommended_version.raw(),
        snapshot = decision.is_snapshot_offer,
        "offering server upgrade"
    );

    let choice = notifier.offer_upgrade(&offer);
    if choice == UpgradeChoice::Upgrade {
        let intent = &offer.intent;
        config.set(
            &intent.key,
            toml::Value::String(intent.value.clone()),
            intent.target,
        )?;
    }

    Ok(Some(CheckOutcome { offer, choice }))
}
