use crate::core::constants::server::VERSION_PATTERN;
use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

/// 服务器版本
///
/// 稳定版形如 `0.11.1`，快照版形如 `0.11.1+266-e916554b-SNAPSHOT`，
/// 新格式的快照还会带上构建日期 `0.11.1+266-e916554b-20220125-SNAPSHOT`。
/// 只能通过 [`ServerVersion::parse`] 创建，创建后不可修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerVersion {
    raw: String,
    major: u64,
    minor: u64,
    patch: u64,
    commit_number: Option<u64>,
    build_date: Option<String>,
}

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(VERSION_PATTERN).expect("version pattern is valid"))
}

impl ServerVersion {
    /// 解析版本字符串，不匹配时返回 None
    ///
    /// 模式不做锚定，字符串中任意位置出现版本即可匹配；`raw` 始终保留原始输入。
    pub fn parse(value: &str) -> Option<Self> {
        let caps = version_regex().captures(value)?;

        let major = caps.get(1)?.as_str().parse::<u64>().ok()?;
        let minor = caps.get(2)?.as_str().parse::<u64>().ok()?;
        let patch = caps.get(3)?.as_str().parse::<u64>().ok()?;
        let commit_number = match caps.get(6) {
            Some(m) => Some(m.as_str().parse::<u64>().ok()?),
            None => None,
        };
        let build_date = caps.get(8).map(|m| m.as_str().to_string());

        Some(Self {
            raw: value.to_string(),
            major,
            minor,
            patch,
            commit_number,
            build_date,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// 距上一个发布标签的提交数，仅快照版本有
    pub fn commit_number(&self) -> Option<u64> {
        self.commit_number
    }

    /// 构建日期 `YYYYMMDD`，仅新格式快照有
    pub fn build_date(&self) -> Option<&str> {
        self.build_date.as_deref()
    }

    pub fn is_snapshot(&self) -> bool {
        self.commit_number.is_some()
    }

    fn sort_key(&self) -> [u64; 4] {
        [
            self.major,
            self.minor,
            self.patch,
            self.commit_number.unwrap_or(0),
        ]
    }

    /// 按 (major, minor, patch, commit) 逐项比较，构建日期不参与比较
    pub fn compare(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }

    pub fn less_than(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Less
    }

    /// `less_than` 的取反，相等时也返回 true
    pub fn greater_than(&self, other: &Self) -> bool {
        !self.less_than(other)
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
