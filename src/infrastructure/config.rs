use crate::core::constants::defaults::{CONFIG_DIR, CONFIG_FILE, WORKSPACE_CONFIG_FILE};
use crate::core::constants::server::BUNDLED_SERVER_VERSION;
use crate::core::constants::settings::{AUTO_LATEST_SNAPSHOT, KNOWN_KEYS, SERVER_VERSION};
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

/// 配置写入的作用域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigurationTarget {
    Global,
    Workspace,
}

impl std::fmt::Display for ConfigurationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigurationTarget::Global => write!(f, "global"),
            ConfigurationTarget::Workspace => write!(f, "workspace"),
        }
    }
}

/// 某个配置项在各层的取值
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Inspection {
    pub default_value: Option<Value>,
    pub global_value: Option<Value>,
    pub workspace_value: Option<Value>,
}

/// 配置存储接口
pub trait ConfigurationStore {
    /// 获取生效的值（工作区 > 全局 > 默认）
    fn get(&self, key: &str) -> Option<Value>;

    /// 获取各层的原始值
    fn inspect(&self, key: &str) -> Inspection;

    /// 写入指定作用域
    fn set(&mut self, key: &str, value: Value, target: ConfigurationTarget) -> AppResult<()>;

    fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        }
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }
}

/// 基于 TOML 文件的分层配置
#[derive(Debug)]
pub struct SettingsStore {
    defaults: Table,
    global: Table,
    workspace: Table,
    global_path: PathBuf,
    workspace_path: PathBuf,
}

impl SettingsStore {
    /// 从默认位置加载（~/.serverpick/config.toml 与 ./.serverpick.toml）
    pub fn load() -> AppResult<Self> {
        let global_path = get_config_path()?;
        let workspace_path = std::env::current_dir()?.join(WORKSPACE_CONFIG_FILE);
        Self::open(global_path, workspace_path)
    }

    /// 从指定文件加载，文件不存在时视为空
    pub fn open(global_path: PathBuf, workspace_path: PathBuf) -> AppResult<Self> {
        let global = read_table(&global_path)?;
        let workspace = read_table(&workspace_path)?;

        Ok(Self {
            defaults: default_settings(),
            global,
            workspace,
            global_path,
            workspace_path,
        })
    }

    pub fn path_for(&self, target: ConfigurationTarget) -> &Path {
        match target {
            ConfigurationTarget::Global => &self.global_path,
            ConfigurationTarget::Workspace => &self.workspace_path,
        }
    }

    /// 合并后的所有已知配置
    pub fn effective(&self) -> Table {
        KNOWN_KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|v| (key.to_string(), v)))
            .collect()
    }
}

impl ConfigurationStore for SettingsStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.workspace
            .get(key)
            .or_else(|| self.global.get(key))
            .or_else(|| self.defaults.get(key))
            .cloned()
    }

    fn inspect(&self, key: &str) -> Inspection {
        Inspection {
            default_value: self.defaults.get(key).cloned(),
            global_value: self.global.get(key).cloned(),
            workspace_value: self.workspace.get(key).cloned(),
        }
    }

    fn set(&mut self, key: &str, value: Value, target: ConfigurationTarget) -> AppResult<()> {
        if !KNOWN_KEYS.contains(&key) {
            return Err(AppError::Config {
                message: format!("未知的配置项: {key}"),
            });
        }

        let table = match target {
            ConfigurationTarget::Global => &mut self.global,
            ConfigurationTarget::Workspace => &mut self.workspace,
        };
        table.insert(key.to_string(), value);

        let path = match target {
            ConfigurationTarget::Global => &self.global_path,
            ConfigurationTarget::Workspace => &self.workspace_path,
        };
        let table = match target {
            ConfigurationTarget::Global => &self.global,
            ConfigurationTarget::Workspace => &self.workspace,
        };
        write_table(path, table)?;

        tracing::info!(key, %target, path = %path.display(), "configuration updated");
        Ok(())
    }
}

/// 内置默认值
fn default_settings() -> Table {
    let mut table = Table::new();
    table.insert(
        SERVER_VERSION.to_string(),
        Value::String(BUNDLED_SERVER_VERSION.to_string()),
    );
    table.insert(AUTO_LATEST_SNAPSHOT.to_string(), Value::Boolean(false));
    table
}

fn read_table(path: &Path) -> AppResult<Table> {
    if !path.exists() {
        return Ok(Table::new());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| AppError::config_load_failed(&path.display().to_string(), &e.to_string()))?;

    content
        .parse::<Table>()
        .map_err(|e| AppError::config_load_failed(&path.display().to_string(), &e.to_string()))
}

fn write_table(path: &Path, table: &Table) -> AppResult<()> {
    // 确保配置目录存在
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(table)?;
    fs::write(path, content)?;
    Ok(())
}

/// 将命令行输入转换为对应配置项的值
pub fn parse_setting_value(key: &str, raw: &str) -> AppResult<Value> {
    if key == AUTO_LATEST_SNAPSHOT {
        return raw
            .trim()
            .parse::<bool>()
            .map(Value::Boolean)
            .map_err(|_| AppError::Config {
                message: format!("{key} 只能是 true 或 false，实际为: {raw}"),
            });
    }
    Ok(Value::String(raw.to_string()))
}

/// 获取配置文件路径
pub fn get_config_path() -> AppResult<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE))
}

/// 获取配置目录
pub fn get_config_dir() -> AppResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| AppError::Config {
        message: "无法获取用户主目录".to_string(),
    })?;

    Ok(home_dir.join(CONFIG_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::settings::JAVA_HOME;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> SettingsStore {
        SettingsStore::open(
            dir.path().join("home").join(CONFIG_FILE),
            dir.path().join("project").join(WORKSPACE_CONFIG_FILE),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_when_files_missing() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        assert_eq!(
            store.get_string(SERVER_VERSION).as_deref(),
            Some(BUNDLED_SERVER_VERSION)
        );
        assert_eq!(store.get_bool(AUTO_LATEST_SNAPSHOT), Some(false));
        assert_eq!(store.get(JAVA_HOME), None);
    }

    #[test]
    fn test_workspace_overrides_global() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("home")).unwrap();
        fs::create_dir_all(dir.path().join("project")).unwrap();
        fs::write(
            dir.path().join("home").join(CONFIG_FILE),
            "serverVersion = \"0.9.0\"\nautoLatestSnapshot = true\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("project").join(WORKSPACE_CONFIG_FILE),
            "serverVersion = \"0.8.0\"\n",
        )
        .unwrap();

        let store = store(&dir);
        assert_eq!(store.get_string(SERVER_VERSION).as_deref(), Some("0.8.0"));
        assert_eq!(store.get_bool(AUTO_LATEST_SNAPSHOT), Some(true));

        let inspection = store.inspect(SERVER_VERSION);
        assert_eq!(
            inspection.default_value,
            Some(Value::String(BUNDLED_SERVER_VERSION.to_string()))
        );
        assert_eq!(inspection.global_value, Some(Value::String("0.9.0".to_string())));
        assert_eq!(inspection.workspace_value, Some(Value::String("0.8.0".to_string())));
    }

    #[test]
    fn test_set_persists_to_target_file() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);

        store
            .set(SERVER_VERSION, Value::String("1.0.0".to_string()), ConfigurationTarget::Global)
            .unwrap();

        let reopened = self::store(&dir);
        assert_eq!(reopened.get_string(SERVER_VERSION).as_deref(), Some("1.0.0"));
        assert!(reopened.path_for(ConfigurationTarget::Global).exists());
        assert!(!reopened.path_for(ConfigurationTarget::Workspace).exists());
    }

    #[test]
    fn test_set_rejects_unknown_key() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        let result = store.set("bogus", Value::Boolean(true), ConfigurationTarget::Workspace);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "serverVersion = ").unwrap();
        let result = SettingsStore::open(path, dir.path().join("none.toml"));
        assert!(matches!(result, Err(AppError::Config { .. })));
    }

    #[test]
    fn test_blank_string_is_unset() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        store
            .set(JAVA_HOME, Value::String("  ".to_string()), ConfigurationTarget::Workspace)
            .unwrap();
        assert_eq!(store.get_string(JAVA_HOME), None);
    }

    #[test]
    fn test_parse_setting_value() {
        assert_eq!(
            parse_setting_value(AUTO_LATEST_SNAPSHOT, "true").unwrap(),
            Value::Boolean(true)
        );
        assert!(parse_setting_value(AUTO_LATEST_SNAPSHOT, "yes").is_err());
        assert_eq!(
            parse_setting_value(SERVER_VERSION, "1.0.0").unwrap(),
            Value::String("1.0.0".to_string())
        );
    }

    #[test]
    fn test_effective_contains_defaults() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let effective = store.effective();
        assert!(effective.contains_key(SERVER_VERSION));
        assert!(effective.contains_key(AUTO_LATEST_SNAPSHOT));
        assert!(!effective.contains_key(JAVA_HOME));
    }
}
