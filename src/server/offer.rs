use crate::core::constants::server::SERVER_DISPLAY_NAME;
use crate::core::constants::settings::SERVER_VERSION;
use crate::infrastructure::config::{ConfigurationTarget, Inspection};
use crate::server::advisor::UpgradeDecision;
use serde::Serialize;

/// 用户对升级提示的选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UpgradeChoice {
    Upgrade,
    OpenSettings,
    Dismiss,
}

/// 升级时需要写入的配置
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeIntent {
    pub key: String,
    pub value: String,
    pub target: ConfigurationTarget,
}

/// 交给通知方展示的升级提示
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeOffer {
    pub message: String,
    pub upgrade_choice: String,
    pub open_settings_choice: String,
    pub dismiss_choice: String,
    pub intent: UpgradeIntent,
}

impl UpgradeOffer {
    /// 根据升级建议生成提示文案
    pub fn from_decision(
        decision: &UpgradeDecision,
        configured_version: &str,
        target: ConfigurationTarget,
    ) -> Self {
        let next = decision.recommended_version.raw();
        let message = if decision.is_snapshot_offer {
            format!("New snapshot version {next} is available")
        } else {
            format!(
                "You are running an out-of-date version of {SERVER_DISPLAY_NAME}. \
                 The latest version is {next}, but you have configured a custom server version {configured_version}"
            )
        };

        Self {
            message,
            upgrade_choice: format!("Upgrade to {next} now"),
            open_settings_choice: "Open settings".to_string(),
            dismiss_choice: "Not now".to_string(),
            intent: UpgradeIntent {
                key: SERVER_VERSION.to_string(),
                value: next.to_string(),
                target,
            },
        }
    }
}

/// 升级提示的展示方（编辑器弹窗、终端等）
pub trait Notifier {
    /// 展示提示并返回用户的选择
    fn offer_upgrade(&self, offer: &UpgradeOffer) -> UpgradeChoice;
}

/// 决定升级时写入哪一层配置
///
/// 用户在全局层改过版本就写全局，否则写工作区。
pub fn configuration_target(inspection: &Inspection) -> ConfigurationTarget {
    let differs = |value: &Option<toml::Value>| match value {
        Some(v) => inspection.default_value.as_ref() != Some(v),
        None => false,
    };

    if differs(&inspection.global_value) {
        ConfigurationTarget::Global
    } else {
        ConfigurationTarget::Workspace
    }
}
