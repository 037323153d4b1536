use super::candidate::RuntimeCandidate;
use super::probe::FileProbe;
use super::scanner::RuntimeEnumerator;
use crate::core::constants::env;
use crate::error::{AppError, AppResult};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// 选择器的输入来源，调用方在会话开始时一次性收集
#[derive(Debug, Clone, Default)]
pub struct RuntimeSources {
    /// 配置中显式指定的 javaHome
    pub explicit_path: Option<PathBuf>,
    /// JAVA_HOME 环境变量
    pub env_path: Option<PathBuf>,
    /// PATH 中的目录，按顺序查找
    pub search_path: Vec<PathBuf>,
}

impl RuntimeSources {
    /// 从当前进程环境收集 JAVA_HOME 和 PATH
    pub fn from_process_env(explicit_path: Option<PathBuf>) -> Self {
        let env_path = std::env::var_os(env::JAVA_HOME).map(PathBuf::from);
        let search_path = std::env::var_os(env::PATH)
            .map(|paths| std::env::split_paths(&paths).collect())
            .unwrap_or_default();

        Self {
            explicit_path,
            env_path,
            search_path,
        }
    }
}

/// 选中的运行时来自哪一步
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuntimeSource {
    Configuration,
    Environment,
    SearchPath,
    Installed,
}

impl std::fmt::Display for RuntimeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeSource::Configuration => write!(f, "configuration"),
            RuntimeSource::Environment => write!(f, "JAVA_HOME"),
            RuntimeSource::SearchPath => write!(f, "PATH"),
            RuntimeSource::Installed => write!(f, "installed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRuntime {
    pub java_home: PathBuf,
    pub source: RuntimeSource,
}

/// Java 运行时选择器
///
/// 依次尝试：显式配置 -> JAVA_HOME -> PATH 中的 java 链接 -> 已安装运行时排名，
/// 某一步命中后不再继续。
pub struct RuntimeSelector<'a, P: ?Sized> {
    probe: &'a P,
}

impl<'a, P: FileProbe + ?Sized> RuntimeSelector<'a, P> {
    pub fn new(probe: &'a P) -> Self {
        Self { probe }
    }

    pub fn resolve<E: RuntimeEnumerator + ?Sized>(
        &self,
        sources: &RuntimeSources,
        enumerator: &E,
    ) -> AppResult<ResolvedRuntime> {
        if let Some(path) = non_empty(sources.explicit_path.as_deref()) {
            return Ok(found(path, RuntimeSource::Configuration));
        }

        if let Some(path) = non_empty(sources.env_path.as_deref()) {
            return Ok(found(path, RuntimeSource::Environment));
        }

        if let Some(home) = self.from_search_path(&sources.search_path) {
            return Ok(found(&home, RuntimeSource::SearchPath));
        }

        let candidates = match enumerator.scan() {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("failed to enumerate installed runtimes: {e}");
                Vec::new()
            }
        };

        rank_candidates(candidates)
            .into_iter()
            .next()
            .map(|best| found(&best.install_path, RuntimeSource::Installed))
            .ok_or_else(AppError::runtime_not_found)
    }

    /// 在 PATH 中找到第一个可执行的 java，只有它是指向别处的链接时才采用
    fn from_search_path(&self, search_path: &[PathBuf]) -> Option<PathBuf> {
        let launcher = self.probe.find_launcher(search_path)?;

        let real = match self.probe.resolve_link(&launcher) {
            Ok(real) => real,
            Err(e) => {
                tracing::debug!(launcher = %launcher.display(), "cannot resolve java on PATH: {e}");
                return None;
            }
        };

        if real == launcher {
            tracing::debug!(launcher = %launcher.display(), "java on PATH is not a link, skipping");
            return None;
        }

        installation_root(&real)
    }
}

/// 按 JDK 优先、版本降序、安全补丁降序排列；完全相同时保持扫描顺序
pub fn rank_candidates(mut candidates: Vec<RuntimeCandidate>) -> Vec<RuntimeCandidate> {
    candidates.sort_by(|a, b| b.rank_cmp(a));
    candidates
}

/// `<home>/bin/java` -> `<home>`
fn installation_root(launcher: &Path) -> Option<PathBuf> {
    let bin_dir = launcher.parent()?;
    match bin_dir.file_name() {
        Some(name) if name == "bin" => bin_dir.parent().map(Path::to_path_buf),
        _ => Some(bin_dir.to_path_buf()),
    }
}

fn non_empty(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}

fn found(path: &Path, source: RuntimeSource) -> ResolvedRuntime {
    tracing::info!(java_home = %path.display(), %source, "selected Java runtime");
    ResolvedRuntime {
        java_home: path.to_path_buf(),
        source,
    }
}
