//! 应用程序常量定义
//!
//! 本模块包含全局使用的常量，避免魔数并提供统一的配置值。

/// 网络相关常量
pub mod network {
    /// 快照索引请求的总超时时间（秒）
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// HTTP User-Agent
    pub const USER_AGENT: &str = concat!("serverpick/", env!("CARGO_PKG_VERSION"));
}

/// 服务器版本相关常量
pub mod server {
    /// 快照版本的目录索引（每一行是一个版本目录）
    pub const SNAPSHOT_INDEX_URL: &str =
        "https://oss.sonatype.org/content/repositories/snapshots/org/scalameta/metals_2.12/";
    /// 随工具发布的最新稳定版本，即 serverVersion 的默认值
    pub const BUNDLED_SERVER_VERSION: &str = "1.3.5";
    /// 版本字符串格式
    pub const VERSION_PATTERN: &str =
        r"(\d+)\.(\d+)\.(\d+)((\+(\d+))-[0-9a-z]{8}(-(\d{8}))?-SNAPSHOT)?";
    /// 升级提示中的服务器名称
    pub const SERVER_DISPLAY_NAME: &str = "Metals";
}

/// 配置项名称
pub mod settings {
    pub const SERVER_VERSION: &str = "serverVersion";
    pub const AUTO_LATEST_SNAPSHOT: &str = "autoLatestSnapshot";
    pub const JAVA_HOME: &str = "javaHome";
    pub const SNAPSHOT_INDEX_URL: &str = "snapshotIndexUrl";

    /// 所有已知配置项
    pub const KNOWN_KEYS: &[&str] = &[SERVER_VERSION, AUTO_LATEST_SNAPSHOT, JAVA_HOME, SNAPSHOT_INDEX_URL];
}

/// 环境变量相关常量
pub mod env {
    /// Java 安装目录
    pub const JAVA_HOME: &str = "JAVA_HOME";
    /// 可执行文件搜索路径
    pub const PATH: &str = "PATH";
    /// 日志过滤器
    pub const LOG_FILTER: &str = "SERVERPICK_LOG";
}

/// 默认配置值
pub mod defaults {
    /// 默认配置目录（相对用户主目录）
    pub const CONFIG_DIR: &str = ".serverpick";
    /// 全局配置文件名
    pub const CONFIG_FILE: &str = "config.toml";
    /// 工作区配置文件名（相对当前目录）
    pub const WORKSPACE_CONFIG_FILE: &str = ".serverpick.toml";
    /// 默认日志级别
    pub const LOG_LEVEL: &str = "warn";
}

/// Java 安装布局
pub mod java {
    /// Java 启动器文件名
    pub const LAUNCHER: &str = if cfg!(target_os = "windows") { "java.exe" } else { "java" };
    /// Java 编译器文件名，存在即视为 JDK
    pub const COMPILER: &str = if cfg!(target_os = "windows") { "javac.exe" } else { "javac" };
    /// 安装目录中的版本描述文件
    pub const RELEASE_FILE: &str = "release";
}
