//! 应用配置模块
//!
//! 配置以 JSON 形式保存在数据根目录的 `config.json` 中。
//! 文件不存在时写入默认配置；字段缺失时使用默认值（`#[serde(default)]`），
//! 因此旧版本配置文件可以直接被新版本读取。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::paths;
use crate::views::analytics::MAX_WINDOW_DAYS;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// 应用配置
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// 法院名称（导出文件标题、工作表名）
    pub court_name: String,
    /// 数据库文件名（位于数据根目录下）
    pub database_file: String,
    /// 导出目录（相对数据根目录或绝对路径）
    pub export_dir: String,
    /// 表格默认每页行数
    pub rows_per_page: usize,
    /// 面板“即将到期”统计窗口（天）
    pub upcoming_window_days: i64,
    /// 默认日志过滤指令（可被 RUST_LOG 覆盖）
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            court_name: "Kilungu Law Courts".to_string(),
            database_file: "court_registry.db".to_string(),
            export_dir: "exports".to_string(),
            rows_per_page: 5,
            upcoming_window_days: 7,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// 校验配置值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows_per_page == 0 {
            return Err(ConfigError::Invalid("rows_per_page must be at least 1".into()));
        }
        if !(0..=i64::from(MAX_WINDOW_DAYS)).contains(&self.upcoming_window_days) {
            return Err(ConfigError::Invalid(format!(
                "upcoming_window_days must be between 0 and {MAX_WINDOW_DAYS}"
            )));
        }
        if self.database_file.trim().is_empty() {
            return Err(ConfigError::Invalid("database_file must not be empty".into()));
        }
        Ok(())
    }
}

/// 已加载的配置及其所在数据根目录
#[derive(Clone, Debug)]
pub struct LoadedConfig {
    pub root: PathBuf,
    pub config: AppConfig,
}

impl LoadedConfig {
    /// 数据库文件完整路径
    pub fn database_path(&self) -> PathBuf {
        paths::database_path(&self.root, &self.config.database_file)
    }

    /// 当事人照片目录
    pub fn photo_dir(&self) -> PathBuf {
        paths::photo_dir(&self.root)
    }

    /// 导出目录
    pub fn export_dir(&self) -> PathBuf {
        paths::export_dir(&self.root, &self.config.export_dir)
    }
}

/// 读取配置文件，不存在时写入默认配置
pub fn load_or_init(root: &Path) -> Result<AppConfig, ConfigError> {
    let path = paths::config_path(root);

    if !path.exists() {
        let config = AppConfig::default();
        save(root, &config)?;
        tracing::info!("[Config] 已写入默认配置: {:?}", path);
        return Ok(config);
    }

    let content = fs::read_to_string(&path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    config.validate()?;

    tracing::debug!("[Config] 已加载配置: {:?}", path);
    Ok(config)
}

/// 保存配置文件
pub fn save(root: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    config.validate()?;
    fs::create_dir_all(root)?;
    let content = serde_json::to_string_pretty(config)?;
    fs::write(paths::config_path(root), content)?;
    Ok(())
}

/// 定位数据根目录、加载配置并创建目录结构
pub fn load() -> Result<LoadedConfig, ConfigError> {
    let root = paths::ensure_app_root()?;
    let config = load_or_init(&root)?;
    paths::ensure_layout(&root, &config.export_dir)?;
    Ok(LoadedConfig { root, config })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_or_init_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let config = load_or_init(dir.path()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(paths::config_path(dir.path()).exists());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            paths::config_path(dir.path()),
            r#"{ "court_name": "Machakos Law Courts", "rows_per_page": 10 }"#,
        )
        .unwrap();

        let config = load_or_init(dir.path()).unwrap();
        assert_eq!(config.court_name, "Machakos Law Courts");
        assert_eq!(config.rows_per_page, 10);
        assert_eq!(config.database_file, "court_registry.db");
    }

    #[test]
    fn test_zero_rows_per_page_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(paths::config_path(dir.path()), r#"{ "rows_per_page": 0 }"#).unwrap();

        assert!(matches!(
            load_or_init(dir.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_upcoming_window_bounds() {
        let mut config = AppConfig::default();
        config.upcoming_window_days = i64::from(MAX_WINDOW_DAYS);
        assert!(config.validate().is_ok());

        config.upcoming_window_days = 200_000_000;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.upcoming_window_days = -1;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
