use super::candidate::{parse_java_version, RuntimeCandidate, RuntimeVersion};
use crate::core::constants::defaults::CONFIG_DIR;
use crate::core::constants::java::{COMPILER, LAUNCHER, RELEASE_FILE};
use crate::error::AppResult;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

/// 已安装运行时的枚举接口
pub trait RuntimeEnumerator {
    fn scan(&self) -> AppResult<Vec<RuntimeCandidate>>;
}

/// 已知的候选列表直接作为枚举结果
impl RuntimeEnumerator for Vec<RuntimeCandidate> {
    fn scan(&self) -> AppResult<Vec<RuntimeCandidate>> {
        Ok(self.clone())
    }
}

/// Java 环境扫描器
pub struct JavaScanner {
    roots: Vec<PathBuf>,
}

impl Default for JavaScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeEnumerator for JavaScanner {
    fn scan(&self) -> AppResult<Vec<RuntimeCandidate>> {
        Ok(self.scan_system())
    }
}

impl JavaScanner {
    /// 使用系统常见路径
    pub fn new() -> Self {
        Self {
            roots: Self::get_common_java_paths(),
        }
    }

    /// 使用指定的扫描根目录
    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// 扫描所有根目录下的 Java 安装，按发现顺序返回且不重复
    pub fn scan_system(&self) -> Vec<RuntimeCandidate> {
        let mut seen = HashSet::new();
        let mut installations = Vec::new();

        for root in self.roots.iter().filter(|root| root.is_dir()) {
            for home in Self::installation_dirs(root) {
                if !seen.insert(home.clone()) {
                    continue;
                }
                match Self::inspect_installation(&home) {
                    Some(candidate) => installations.push(candidate),
                    None => tracing::debug!(path = %home.display(), "unable to determine Java version"),
                }
            }
        }

        tracing::debug!(count = installations.len(), "scanned installed Java runtimes");
        installations
    }

    /// 获取常见的 Java 安装路径
    fn get_common_java_paths() -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = if cfg!(target_os = "windows") {
            [
                r"C:\Program Files\Java",
                r"C:\Program Files (x86)\Java",
                r"C:\Program Files\Eclipse Adoptium",
                r"C:\Program Files\Amazon Corretto",
                r"C:\Program Files\Microsoft\jdk",
                r"C:\Program Files\Zulu",
            ]
            .iter()
            .map(PathBuf::from)
            .collect()
        } else if cfg!(target_os = "macos") {
            [
                "/Library/Java/JavaVirtualMachines",
                "/System/Library/Java/JavaVirtualMachines",
                "/usr/local/java",
                "/opt/homebrew/opt",
            ]
            .iter()
            .map(PathBuf::from)
            .collect()
        } else {
            ["/usr/lib/jvm", "/usr/local/java", "/opt/java", "/usr/java"]
                .iter()
                .map(PathBuf::from)
                .collect()
        };

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".sdkman").join("candidates").join("java"));
            paths.push(home.join(".jdks"));
            paths.push(home.join(CONFIG_DIR).join("jdks"));
        }

        paths
    }

    /// 根目录本身是安装目录时直接返回，否则查找一级子目录
    fn installation_dirs(root: &Path) -> Vec<PathBuf> {
        if Self::is_valid_java_installation(root) {
            return vec![root.to_path_buf()];
        }

        let mut entries: Vec<PathBuf> = WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_dir())
            .map(|entry| entry.into_path())
            .collect();
        entries.sort();

        entries
            .into_iter()
            .filter_map(|dir| {
                if Self::is_valid_java_installation(&dir) {
                    return Some(dir);
                }
                // macOS 的 .jdk 包
                let bundle_home = dir.join("Contents").join("Home");
                Self::is_valid_java_installation(&bundle_home).then_some(bundle_home)
            })
            .collect()
    }

    /// 检查路径是否是有效的 Java 安装
    pub fn is_valid_java_installation(path: &Path) -> bool {
        path.join("bin").join(LAUNCHER).is_file()
    }

    /// 读取安装目录的版本与类型
    pub fn inspect_installation(path: &Path) -> Option<RuntimeCandidate> {
        let version = Self::read_release_version(path).or_else(|| Self::detect_java_version(path))?;
        let (version, security_patch) = parse_java_version(&version)?;
        let is_jdk = path.join("bin").join(COMPILER).is_file();

        Some(RuntimeCandidate::new(path, version, security_patch, is_jdk))
    }

    /// 从 release 文件读取 JAVA_VERSION
    fn read_release_version(path: &Path) -> Option<String> {
        let content = std::fs::read_to_string(path.join(RELEASE_FILE)).ok()?;
        content.lines().find_map(|line| {
            let value = line.trim().strip_prefix("JAVA_VERSION=")?;
            Some(value.trim().trim_matches('"').to_string())
        })
    }

    /// 执行 java -version 检测版本
    fn detect_java_version(path: &Path) -> Option<String> {
        let java_exe = path.join("bin").join(LAUNCHER);
        let output = match Command::new(&java_exe).arg("-version").output() {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!(java = %java_exe.display(), "failed to execute java -version: {e}");
                return None;
            }
        };

        if !output.status.success() {
            return None;
        }

        // 例如：openjdk version "17.0.2" 2022-01-18
        let stderr = String::from_utf8_lossy(&output.stderr);
        parse_version_banner(&stderr)
    }
}

/// 从 `java -version` 输出中提取引号内的版本
pub fn parse_version_banner(banner: &str) -> Option<String> {
    let first_line = banner.lines().next()?;
    let start = first_line.find('"')?;
    let end = first_line.rfind('"')?;
    (end > start).then(|| first_line[start + 1..end].to_string())
}

/// 便于展示的候选摘要
pub fn describe(candidate: &RuntimeCandidate) -> String {
    let RuntimeVersion { major, minor, patch } = candidate.version;
    format!(
        "{} {}.{}.{} (security {}) {}",
        candidate.kind(),
        major,
        minor,
        patch,
        candidate.security_patch,
        candidate.install_path.display()
    )
}
