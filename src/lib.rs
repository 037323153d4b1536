// 核心模块
pub mod cli;
pub mod core;
pub mod environments;
pub mod error;
pub mod infrastructure;
pub mod server;

// 重新导出常用类型
pub use environments::java::{
    JavaScanner, ResolvedRuntime, RuntimeCandidate, RuntimeSelector, RuntimeSources,
    RuntimeVersion,
};
pub use error::{AppError, AppResult};
pub use infrastructure::config::{ConfigurationStore, ConfigurationTarget, SettingsStore};
pub use server::{
    check_server_version, ServerVersion, SnapshotCatalog, UpgradeAdvisor, UpgradeDecision,
    UpgradeOffer,
};
// 使用命名空间导入常量，避免冲突
pub use crate::core::constants as app_constants;
pub use crate::core::session::Session;
