//! 导出模块
//!
//! - `csv`: 案卷、职员、审计日志表格，以及出庭日志导出（带标题行）
//! - `ics`: 出庭日期日历（RFC 5545）
//! - `xlsx`: Excel 工作簿（加粗表头，列宽 = 表头长度 + 5）
//!
//! 导出结果统一为 `ExportFile`（文件名 + 字节），由调用方决定写入磁盘或直接返回。

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::paths::sanitize_filename;

pub mod csv;
pub mod ics;
pub mod xlsx;

/// 导出错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("Excel error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Nothing to export: {0}")]
    Empty(String),
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;

/// 表格导出类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    Cases,
    Staff,
    AuditLogs,
}

impl ExportKind {
    pub fn title(self) -> &'static str {
        match self {
            ExportKind::Cases => "Cases",
            ExportKind::Staff => "Staff",
            ExportKind::AuditLogs => "Audit Logs",
        }
    }
}

/// 导出文件
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    /// 写入目录，返回完整路径
    pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(sanitize_filename(&self.file_name));
        fs::write(&path, &self.bytes)?;
        tracing::info!("[Export] 已写入 {:?} ({} bytes)", path, self.bytes.len());
        Ok(path)
    }
}

/// "Kilungu Law Courts" + "Audit Logs" → "Kilungu-Law-Courts-Audit-Logs"
pub(crate) fn file_stem(court_name: &str, kind: ExportKind) -> String {
    format!("{} {}", court_name.trim(), kind.title())
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
