//! 当事人照片存储
//!
//! 照片以 `{毫秒时间戳}_{清理后的文件名}` 保存在照片目录下，
//! 数据库只记录完整路径。只会删除照片目录内的文件。

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::paths::sanitize_filename;

#[derive(Debug, Clone)]
pub struct PhotoStore {
    dir: PathBuf,
}

impl PhotoStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 保存照片，返回完整路径
    pub fn save(&self, bytes: &[u8], filename: &str) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let stamp = chrono::Utc::now().timestamp_millis();
        let name = sanitize_filename(filename);
        let mut path = self.dir.join(format!("{stamp}_{name}"));

        // 同一毫秒内的同名文件
        let mut counter = 1;
        while path.exists() {
            path = self.dir.join(format!("{stamp}_{counter}_{name}"));
            counter += 1;
        }

        fs::write(&path, bytes)?;
        tracing::debug!("[Photos] 已保存照片: {:?} ({} bytes)", path, bytes.len());
        Ok(path)
    }

    /// 读取照片
    pub fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    /// 删除照片目录内的文件，文件不存在时忽略
    ///
    /// 含 `..` 的路径一律跳过（`starts_with` 只比较路径组件，不解析 `..`）。
    pub fn remove(&self, path: &str) {
        let path = Path::new(path);
        let escapes = path.components().any(|c| matches!(c, Component::ParentDir));
        if escapes || !path.starts_with(&self.dir) {
            tracing::warn!("[Photos] 跳过照片目录外的文件: {:?}", path);
            return;
        }

        match fs::remove_file(path) {
            Ok(()) => tracing::debug!("[Photos] 已删除照片: {:?}", path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("[Photos] 删除照片失败: {:?}, {}", path, e),
        }
    }
}
