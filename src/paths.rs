//! 应用数据目录管理模块
//!
//! 本地数据按以下结构存放：
//!
//! ```text
//! {数据根目录}/
//!   ├── config.json          # 应用配置
//!   ├── court_registry.db    # SQLite 数据库（文件名可配置）
//!   ├── offender_photos/     # 当事人照片
//!   └── exports/             # CSV / ICS / XLSX 导出（目录可配置）
//! ```
//!
//! 数据根目录默认为 `dirs::data_local_dir()/court-registry`，
//! 可通过环境变量 `COURT_REGISTRY_DATA_DIR` 覆盖（便携安装、测试）。

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// 覆盖数据根目录的环境变量
pub const DATA_DIR_ENV: &str = "COURT_REGISTRY_DATA_DIR";

/// 数据根目录下的应用子目录名
const APP_DIR_NAME: &str = "court-registry";

// ============================================================================
// 目录路径
// ============================================================================

/// 获取应用数据根目录（不创建）
pub fn app_root() -> io::Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }

    let base = dirs::data_local_dir().ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "Cannot find local data directory")
    })?;

    Ok(base.join(APP_DIR_NAME))
}

/// 获取应用数据根目录，不存在时创建
pub fn ensure_app_root() -> io::Result<PathBuf> {
    let root = app_root()?;
    fs::create_dir_all(&root)?;
    Ok(root)
}

/// 配置文件路径
pub fn config_path(root: &Path) -> PathBuf {
    root.join("config.json")
}

/// 数据库文件路径
pub fn database_path(root: &Path, file_name: &str) -> PathBuf {
    root.join(sanitize_filename(file_name))
}

/// 当事人照片目录
pub fn photo_dir(root: &Path) -> PathBuf {
    root.join("offender_photos")
}

/// 导出目录
///
/// 配置中的导出目录为绝对路径时直接使用，否则相对于数据根目录
pub fn export_dir(root: &Path, configured: &str) -> PathBuf {
    let configured = Path::new(configured);
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        root.join(configured)
    }
}

/// 确保数据根目录下的子目录存在
pub fn ensure_layout(root: &Path, export_dir_setting: &str) -> io::Result<()> {
    for dir in [photo_dir(root), export_dir(root, export_dir_setting)] {
        fs::create_dir_all(&dir)?;
    }
    tracing::debug!("[Paths] 数据目录已就绪: {:?}", root);
    Ok(())
}

// ============================================================================
// 文件名辅助
// ============================================================================

/// 清理文件名中的非法字符
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "unnamed".to_string()
    } else {
        cleaned
    }
}
