use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Java 发行版本号 (major.minor.patch)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuntimeVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl RuntimeVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// 一个已安装的 Java 运行时
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeCandidate {
    pub install_path: PathBuf,
    pub version: RuntimeVersion,
    /// 同一版本号内的安全补丁级别，越大越新
    pub security_patch: u32,
    /// 带有 javac 即为 JDK
    pub is_jdk: bool,
}

impl RuntimeCandidate {
    pub fn new(
        install_path: impl Into<PathBuf>,
        version: RuntimeVersion,
        security_patch: u32,
        is_jdk: bool,
    ) -> Self {
        Self {
            install_path: install_path.into(),
            version,
            security_patch,
            is_jdk,
        }
    }

    /// 排名比较：JDK 优先，其次版本号，最后安全补丁级别
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        self.is_jdk
            .cmp(&other.is_jdk)
            .then(self.version.cmp(&other.version))
            .then(self.security_patch.cmp(&other.security_patch))
    }

    pub fn kind(&self) -> &'static str {
        if self.is_jdk {
            "JDK"
        } else {
            "JRE"
        }
    }
}

fn java_version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:[._](\d+))?").expect("java version pattern is valid")
    })
}

/// 解析 Java 版本字符串，返回版本号与安全补丁级别
///
/// - `1.8.0_292` -> (1.8.0, 292)
/// - `17.0.8.1` -> (17.0.8, 1)
/// - `11.0.12` -> (11.0.12, 0)
/// - `21` / `21-ea` -> (21.0.0, 0)
pub fn parse_java_version(value: &str) -> Option<(RuntimeVersion, u32)> {
    let caps = java_version_regex().captures(value.trim())?;

    let number = |idx: usize| -> Option<u32> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse::<u32>().ok(),
            None => Some(0),
        }
    };

    let version = RuntimeVersion::new(number(1)?, number(2)?, number(3)?);
    Some((version, number(4)?))
}
