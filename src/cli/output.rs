use crate::environments::java::scanner::describe;
use crate::environments::java::{ResolvedRuntime, RuntimeCandidate};
use crate::error::AppResult;
use crate::server::check::CheckOutcome;
use crate::server::version::ServerVersion;
use serde::Serialize;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// 输出格式化器
pub struct OutputFormatter;

impl OutputFormatter {
    /// 格式化选中的运行时
    pub fn format_runtime(&self, runtime: &ResolvedRuntime, format: OutputFormat) -> AppResult<String> {
        match format {
            OutputFormat::Text => Ok(format!("{}\n", runtime.java_home.display())),
            OutputFormat::Json => to_json(runtime),
        }
    }

    /// 格式化扫描结果
    pub fn format_candidates(&self, candidates: &[RuntimeCandidate], format: OutputFormat) -> AppResult<String> {
        match format {
            OutputFormat::Text => {
                if candidates.is_empty() {
                    return Ok("No Java installations found\n".to_string());
                }
                let mut output = String::from("Installed Java runtimes (best first):\n");
                for (idx, candidate) in candidates.iter().enumerate() {
                    let marker = if idx == 0 { "*" } else { " " };
                    output.push_str(&format!("{marker} {}\n", describe(candidate)));
                }
                Ok(output)
            }
            OutputFormat::Json => to_json(&candidates),
        }
    }

    /// 格式化版本列表
    pub fn format_versions(&self, versions: &[ServerVersion], format: OutputFormat) -> AppResult<String> {
        match format {
            OutputFormat::Text => {
                if versions.is_empty() {
                    return Ok("No snapshot versions found\n".to_string());
                }
                Ok(versions.iter().map(|v| format!("{}\n", v.raw())).collect())
            }
            OutputFormat::Json => to_json(&versions),
        }
    }

    /// 格式化单个版本
    pub fn format_version(&self, version: &ServerVersion, format: OutputFormat) -> AppResult<String> {
        match format {
            OutputFormat::Text => {
                let mut output = format!(
                    "version:  {}.{}.{}\n",
                    version.major(),
                    version.minor(),
                    version.patch()
                );
                output.push_str(&format!("snapshot: {}\n", version.is_snapshot()));
                if let Some(commit) = version.commit_number() {
                    output.push_str(&format!("commits:  {commit}\n"));
                }
                if let Some(date) = version.build_date() {
                    output.push_str(&format!("built:    {date}\n"));
                }
                Ok(output)
            }
            OutputFormat::Json => to_json(version),
        }
    }

    /// 格式化升级检查结果
    pub fn format_check(&self, outcome: Option<&CheckOutcome>, format: OutputFormat) -> AppResult<String> {
        match format {
            OutputFormat::Text => Ok(match outcome {
                None => "Server version is up to date\n".to_string(),
                Some(outcome) => format!("{}\n", outcome.offer.message),
            }),
            OutputFormat::Json => {
                let json_output = serde_json::json!({
                    "upgrade_available": outcome.is_some(),
                    "outcome": outcome,
                });
                to_json(&json_output)
            }
        }
    }

    /// 格式化成功信息
    pub fn format_success(&self, message: &str, format: OutputFormat) -> AppResult<String> {
        match format {
            OutputFormat::Text => Ok(format!("{message}\n")),
            OutputFormat::Json => to_json(&serde_json::json!({
                "message": message,
                "success": true
            })),
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> AppResult<String> {
    let mut output = serde_json::to_string_pretty(value)?;
    output.push('\n');
    Ok(output)
}

/// 默认输出格式化器实例
pub static FORMATTER: OutputFormatter = OutputFormatter;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environments::java::{RuntimeSource, RuntimeVersion};
    use std::path::PathBuf;

    #[test]
    fn test_format_runtime() {
        let runtime = ResolvedRuntime {
            java_home: PathBuf::from("/opt/jdk"),
            source: RuntimeSource::Installed,
        };
        assert_eq!(FORMATTER.format_runtime(&runtime, OutputFormat::Text).unwrap(), "/opt/jdk\n");

        let json: serde_json::Value =
            serde_json::from_str(&FORMATTER.format_runtime(&runtime, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["source"], "installed");
    }

    #[test]
    fn test_format_candidates_marks_best() {
        let candidates = vec![
            RuntimeCandidate::new("/opt/jdk17", RuntimeVersion::new(17, 0, 8), 1, true),
            RuntimeCandidate::new("/opt/jre8", RuntimeVersion::new(1, 8, 0), 292, false),
        ];
        let text = FORMATTER.format_candidates(&candidates, OutputFormat::Text).unwrap();
        assert!(text.contains("* JDK 17.0.8 (security 1) /opt/jdk17"));
        assert!(text.contains("  JRE 1.8.0 (security 292) /opt/jre8"));
    }

    #[test]
    fn test_format_version_json() {
        let version = ServerVersion::parse("0.11.1+266-e916554b-20220125-SNAPSHOT").unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&FORMATTER.format_version(&version, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["raw"], "0.11.1+266-e916554b-20220125-SNAPSHOT");
        assert_eq!(json["commit_number"], 266);
        assert_eq!(json["build_date"], "20220125");
    }

    #[test]
    fn test_format_check_up_to_date() {
        assert_eq!(
            FORMATTER.format_check(None, OutputFormat::Text).unwrap(),
            "Server version is up to date\n"
        );
    }
}
