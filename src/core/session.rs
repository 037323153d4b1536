use crate::core::constants::settings::{AUTO_LATEST_SNAPSHOT, JAVA_HOME, SNAPSHOT_INDEX_URL};
use crate::environments::java::{
    FileProbe, ResolvedRuntime, RuntimeEnumerator, RuntimeSelector, RuntimeSources, SystemFileProbe,
};
use crate::error::AppResult;
use crate::infrastructure::config::{ConfigurationStore, ConfigurationTarget, Inspection, SettingsStore};
use crate::infrastructure::remote::HttpClient;
use crate::server::catalog::{SnapshotCatalog, SnapshotSource};
use crate::server::check::{check_server_version, CheckOutcome};
use crate::server::offer::Notifier;
use crate::server::version::ServerVersion;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// 一次会话：收集进程环境与配置，交给运行时选择和版本检查
pub struct Session<C = SettingsStore> {
    config: C,
}

impl Session<SettingsStore> {
    /// 使用默认位置的配置文件
    pub fn load() -> AppResult<Self> {
        Ok(Self::new(SettingsStore::load()?))
    }
}

impl<C: ConfigurationStore> Session<C> {
    pub fn new(config: C) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut C {
        &mut self.config
    }

    /// 命令行参数优先于配置中的 javaHome
    pub fn runtime_sources(&self, java_home: Option<PathBuf>) -> RuntimeSources {
        let explicit = java_home.or_else(|| self.config.get_string(JAVA_HOME).map(PathBuf::from));
        RuntimeSources::from_process_env(explicit)
    }

    /// 选择本次会话使用的 Java
    pub fn resolve_java<E: RuntimeEnumerator + ?Sized>(
        &self,
        java_home: Option<PathBuf>,
        enumerator: &E,
    ) -> AppResult<ResolvedRuntime> {
        self.resolve_java_with(java_home, &SystemFileProbe, enumerator)
    }

    pub fn resolve_java_with<P, E>(
        &self,
        java_home: Option<PathBuf>,
        probe: &P,
        enumerator: &E,
    ) -> AppResult<ResolvedRuntime>
    where
        P: FileProbe + ?Sized,
        E: RuntimeEnumerator + ?Sized,
    {
        let sources = self.runtime_sources(java_home);
        RuntimeSelector::new(probe).resolve(&sources, enumerator)
    }

    /// 快照目录，允许通过 snapshotIndexUrl 覆盖索引地址
    pub fn snapshot_catalog(&self) -> AppResult<SnapshotCatalog<HttpClient>> {
        build_catalog(self.config.get_string(SNAPSHOT_INDEX_URL).as_deref())
    }

    /// 执行升级检查；offline 时本次不查找快照
    pub async fn check_server_version<N: Notifier + ?Sized>(
        &mut self,
        notifier: &N,
        offline: bool,
        cancel: &CancellationToken,
    ) -> AppResult<Option<CheckOutcome>> {
        let catalog = DeferredCatalog {
            index_url: self.config.get_string(SNAPSHOT_INDEX_URL),
        };
        let today = chrono::Utc::now().date_naive();

        if offline {
            let mut overlay = OfflineOverlay {
                inner: &mut self.config,
            };
            check_server_version(&mut overlay, &catalog, notifier, today, cancel).await
        } else {
            check_server_version(&mut self.config, &catalog, notifier, today, cancel).await
        }
    }
}

fn build_catalog(index_url: Option<&str>) -> AppResult<SnapshotCatalog<HttpClient>> {
    let catalog = SnapshotCatalog::new(HttpClient::new()?);
    match index_url {
        Some(url) => catalog.with_url(url),
        None => Ok(catalog),
    }
}

/// 真正需要查找快照时才创建 HTTP 客户端并校验索引地址
struct DeferredCatalog {
    index_url: Option<String>,
}

#[async_trait]
impl SnapshotSource for DeferredCatalog {
    async fn fetch_snapshot_versions(&self, cancel: &CancellationToken) -> AppResult<Vec<ServerVersion>> {
        build_catalog(self.index_url.as_deref())?
            .fetch_snapshot_versions(cancel)
            .await
    }
}

/// 关闭自动快照查找，其余配置透传
struct OfflineOverlay<'a, C: ?Sized> {
    inner: &'a mut C,
}

impl<C: ConfigurationStore + ?Sized> ConfigurationStore for OfflineOverlay<'_, C> {
    fn get(&self, key: &str) -> Option<toml::Value> {
        if key == AUTO_LATEST_SNAPSHOT {
            return Some(toml::Value::Boolean(false));
        }
        self.inner.get(key)
    }

    fn inspect(&self, key: &str) -> Inspection {
        self.inner.inspect(key)
    }

    fn set(&mut self, key: &str, value: toml::Value, target: ConfigurationTarget) -> AppResult<()> {
        self.inner.set(key, value, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::defaults::{CONFIG_FILE, WORKSPACE_CONFIG_FILE};
    use crate::environments::java::{RuntimeCandidate, RuntimeSource, RuntimeVersion};
    use crate::server::offer::{UpgradeChoice, UpgradeOffer};
    use std::io;
    use std::path::Path;
    use tempfile::TempDir;

    struct NoLinks;

    impl FileProbe for NoLinks {
        fn find_launcher(&self, _dirs: &[PathBuf]) -> Option<PathBuf> {
            None
        }

        fn resolve_link(&self, path: &Path) -> io::Result<PathBuf> {
            Ok(path.to_path_buf())
        }
    }

    fn session(dir: &TempDir) -> Session {
        let store = SettingsStore::open(
            dir.path().join(CONFIG_FILE),
            dir.path().join(WORKSPACE_CONFIG_FILE),
        )
        .unwrap();
        Session::new(store)
    }

    #[test]
    fn test_cli_java_home_beats_config() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        session
            .config_mut()
            .set(
                JAVA_HOME,
                toml::Value::String("/from/config".to_string()),
                ConfigurationTarget::Workspace,
            )
            .unwrap();

        let sources = session.runtime_sources(None);
        assert_eq!(sources.explicit_path, Some(PathBuf::from("/from/config")));

        let sources = session.runtime_sources(Some(PathBuf::from("/from/cli")));
        assert_eq!(sources.explicit_path, Some(PathBuf::from("/from/cli")));
    }

    #[test]
    fn test_configured_java_home_is_used() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        session
            .config_mut()
            .set(
                JAVA_HOME,
                toml::Value::String("/opt/pinned-jdk".to_string()),
                ConfigurationTarget::Global,
            )
            .unwrap();

        let candidates = vec![RuntimeCandidate::new(
            "/opt/jdk21",
            RuntimeVersion::new(21, 0, 1),
            0,
            true,
        )];
        let resolved = session.resolve_java_with(None, &NoLinks, &candidates).unwrap();
        assert_eq!(resolved.java_home, PathBuf::from("/opt/pinned-jdk"));
        assert_eq!(resolved.source, RuntimeSource::Configuration);
    }

    #[test]
    fn test_snapshot_catalog_url_override() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        assert_eq!(
            session.snapshot_catalog().unwrap().index_url(),
            crate::core::constants::server::SNAPSHOT_INDEX_URL
        );

        session
            .config_mut()
            .set(
                SNAPSHOT_INDEX_URL,
                toml::Value::String("https://mirror.example.org/snapshots/".to_string()),
                ConfigurationTarget::Workspace,
            )
            .unwrap();
        assert_eq!(
            session.snapshot_catalog().unwrap().index_url(),
            "https://mirror.example.org/snapshots/"
        );
    }

    #[test]
    fn test_offline_overlay_disables_snapshots() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        session
            .config_mut()
            .set(
                AUTO_LATEST_SNAPSHOT,
                toml::Value::Boolean(true),
                ConfigurationTarget::Global,
            )
            .unwrap();

        let overlay = OfflineOverlay {
            inner: session.config_mut(),
        };
        assert_eq!(overlay.get_bool(AUTO_LATEST_SNAPSHOT), Some(false));
        assert!(overlay.get_string(crate::core::constants::settings::SERVER_VERSION).is_some());
    }

    struct Decline;

    impl Notifier for Decline {
        fn offer_upgrade(&self, _offer: &UpgradeOffer) -> UpgradeChoice {
            UpgradeChoice::Dismiss
        }
    }

    #[tokio::test]
    async fn test_bad_index_url_ignored_without_lookup() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        session
            .config_mut()
            .set(
                SNAPSHOT_INDEX_URL,
                toml::Value::String("not a url".to_string()),
                ConfigurationTarget::Workspace,
            )
            .unwrap();
        assert!(session.snapshot_catalog().is_err());

        let cancel = CancellationToken::new();
        assert!(session.check_server_version(&Decline, false, &cancel).await.unwrap().is_none());

        session
            .config_mut()
            .set(
                AUTO_LATEST_SNAPSHOT,
                toml::Value::Boolean(true),
                ConfigurationTarget::Global,
            )
            .unwrap();
        assert!(session.check_server_version(&Decline, true, &cancel).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_bad_index_url_fails_at_lookup() {
        let catalog = DeferredCatalog {
            index_url: Some("not a url".to_string()),
        };
        assert!(catalog
            .fetch_snapshot_versions(&CancellationToken::new())
            .await
            .is_err());
    }
}
