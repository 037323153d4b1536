use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// serverpick CLI 应用程序
#[derive(Parser)]
#[command(name = "serverpick")]
#[command(about = "选择语言服务器使用的 Java 运行时，并检查服务器版本更新", long_about = None)]
#[command(version)]
pub struct Cli {
    /// 输出调试日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 顶级命令
#[derive(Subcommand)]
pub enum Commands {
    /// 选择本次会话使用的 Java
    Java {
        /// 显式指定 JAVA_HOME，优先于配置和环境变量
        #[arg(long)]
        java_home: Option<PathBuf>,
        /// JSON 格式输出
        #[arg(long)]
        json: bool,
    },
    /// 扫描系统中的 Java 安装（按优先级排序）
    Scan {
        /// JSON 格式输出
        #[arg(long)]
        json: bool,
    },
    /// 检查服务器版本是否需要升级
    Check {
        /// 接受升级并写入配置
        #[arg(short, long)]
        yes: bool,
        /// 本次不查找快照版本
        #[arg(long)]
        offline: bool,
        /// JSON 格式输出
        #[arg(long)]
        json: bool,
    },
    /// 列出已发布的快照版本（从新到旧）
    Snapshots {
        /// 结果数量限制
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
        /// JSON 格式输出
        #[arg(long)]
        json: bool,
    },
    /// 解析版本字符串
    Parse {
        /// 版本字符串
        version: String,
        /// JSON 格式输出
        #[arg(long)]
        json: bool,
    },
    /// 配置管理
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// 配置管理命令
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// 显示生效的配置
    Show {
        /// JSON 格式输出
        #[arg(long)]
        json: bool,
    },
    /// 修改配置项
    Set {
        /// 配置项名称
        key: String,
        /// 配置值
        value: String,
        /// 写入全局配置（默认写入当前工作区）
        #[arg(long)]
        global: bool,
    },
}
