use crate::cli::commands::*;
use crate::cli::output::{OutputFormat, FORMATTER};
use crate::core::session::Session;
use crate::environments::java::{rank_candidates, JavaScanner};
use crate::error::{AppError, AppResult};
use crate::infrastructure::config::{parse_setting_value, ConfigurationStore, ConfigurationTarget};
use crate::server::catalog::SnapshotSource;
use crate::server::offer::{Notifier, UpgradeChoice, UpgradeOffer};
use crate::server::version::ServerVersion;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// 终端中的升级提示
pub struct ConsoleNotifier {
    auto_accept: bool,
    settings_path: PathBuf,
}

impl Notifier for ConsoleNotifier {
    fn offer_upgrade(&self, offer: &UpgradeOffer) -> UpgradeChoice {
        eprintln!("⬆️  {}", offer.message);
        if self.auto_accept {
            eprintln!("-> {}", offer.upgrade_choice);
            UpgradeChoice::Upgrade
        } else {
            eprintln!(
                "   {} : serverpick check --yes\n   {} : {}\n   {}",
                offer.upgrade_choice,
                offer.open_settings_choice,
                self.settings_path.display(),
                offer.dismiss_choice
            );
            UpgradeChoice::Dismiss
        }
    }
}

/// 命令处理器
pub struct CommandHandler {
    session: Session,
    cancel: CancellationToken,
}

impl CommandHandler {
    /// 创建新的命令处理器
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            session: Session::load()?,
            cancel: CancellationToken::new(),
        })
    }

    /// 用于在收到 Ctrl-C 时取消网络请求
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// 处理命令
    pub async fn handle_command(&mut self, command: Commands) -> AppResult<()> {
        match command {
            Commands::Java { java_home, json } => self.handle_java(java_home, json),
            Commands::Scan { json } => self.handle_scan(json),
            Commands::Check { yes, offline, json } => self.handle_check(yes, offline, json).await,
            Commands::Snapshots { limit, json } => self.handle_snapshots(limit, json).await,
            Commands::Parse { version, json } => self.handle_parse(&version, json),
            Commands::Config { action } => self.handle_config_command(action),
        }
    }

    fn handle_java(&self, java_home: Option<PathBuf>, json: bool) -> AppResult<()> {
        let runtime = self.session.resolve_java(java_home, &JavaScanner::new())?;
        print!("{}", FORMATTER.format_runtime(&runtime, OutputFormat::from_flag(json))?);
        Ok(())
    }

    fn handle_scan(&self, json: bool) -> AppResult<()> {
        let candidates = rank_candidates(JavaScanner::new().scan_system());
        print!("{}", FORMATTER.format_candidates(&candidates, OutputFormat::from_flag(json))?);
        Ok(())
    }

    async fn handle_check(&mut self, yes: bool, offline: bool, json: bool) -> AppResult<()> {
        let notifier = ConsoleNotifier {
            auto_accept: yes,
            settings_path: crate::infrastructure::config::get_config_path()?,
        };

        let outcome = self
            .session
            .check_server_version(&notifier, offline, &self.cancel)
            .await?;

        print!("{}", FORMATTER.format_check(outcome.as_ref(), OutputFormat::from_flag(json))?);
        Ok(())
    }

    async fn handle_snapshots(&self, limit: usize, json: bool) -> AppResult<()> {
        let catalog = self.session.snapshot_catalog()?;
        let mut versions = catalog.fetch_snapshot_versions(&self.cancel).await?;
        versions.sort_by(|a, b| b.compare(a));
        versions.truncate(limit);

        print!("{}", FORMATTER.format_versions(&versions, OutputFormat::from_flag(json))?);
        Ok(())
    }

    fn handle_parse(&self, version: &str, json: bool) -> AppResult<()> {
        let parsed = ServerVersion::parse(version).ok_or_else(|| AppError::version_parse_failed(version))?;
        print!("{}", FORMATTER.format_version(&parsed, OutputFormat::from_flag(json))?);
        Ok(())
    }

    /// 处理配置命令
    fn handle_config_command(&mut self, action: ConfigCommands) -> AppResult<()> {
        match action {
            ConfigCommands::Show { json } => {
                let effective = self.session.config().effective();
                let output = if json {
                    let mut output = serde_json::to_string_pretty(&effective)?;
                    output.push('\n');
                    output
                } else {
                    effective
                        .iter()
                        .map(|(key, value)| format!("{key} = {value}\n"))
                        .collect()
                };
                print!("{output}");
            }
            ConfigCommands::Set { key, value, global } => {
                let target = if global {
                    ConfigurationTarget::Global
                } else {
                    ConfigurationTarget::Workspace
                };
                let value = parse_setting_value(&key, &value)?;
                self.session.config_mut().set(&key, value, target)?;

                let path = self.session.config().path_for(target).display().to_string();
                print!(
                    "{}",
                    FORMATTER.format_success(&format!("Updated {key} in {path}"), OutputFormat::Text)?
                );
            }
        }
        Ok(())
    }
}
