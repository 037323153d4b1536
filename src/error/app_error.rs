use std::io;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO 错误: {0}")]
    Io(#[from] io::Error),

    #[error("配置错误: {message}")]
    Config { message: String },

    #[error("网络错误: {message}")]
    Network { message: String },

    #[error("请求已取消")]
    Cancelled,

    #[error("版本解析错误: {version}")]
    VersionParse { version: String },

    #[error("未找到请求的资源: {resource}")]
    NotFound { resource: String },

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 应用程序 Result 类型
pub type AppResult<T> = Result<T, AppError>;

/// 便捷的错误创建函数
impl AppError {
    pub fn config_load_failed(path: &str, reason: &str) -> Self {
        Self::Config {
            message: format!("无法加载配置文件 {}: {}", path, reason),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn version_parse_failed(version: &str) -> Self {
        Self::VersionParse {
            version: version.to_string(),
        }
    }

    pub fn runtime_not_found() -> Self {
        Self::NotFound {
            resource: "Java 运行时 (未配置 javaHome，未设置 JAVA_HOME，PATH 中未找到 java，也未扫描到已安装的 JDK/JRE)".to_string(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::network(format!("请求超时: {error}"))
        } else {
            Self::network(error.to_string())
        }
    }
}

impl From<toml::de::Error> for AppError {
    fn from(error: toml::de::Error) -> Self {
        Self::Config {
            message: format!("解析配置文件失败: {error}"),
        }
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(error: toml::ser::Error) -> Self {
        Self::Config {
            message: format!("序列化配置失败: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_message() {
        let err = AppError::network("connection reset");
        assert!(matches!(err, AppError::Network { .. }));
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_io_conversion() {
        let err: AppError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(err, AppError::Io(_)));
        assert!(err.to_string().contains("missing"));
    }
}
