//! 案卷表（CTS）
//!
//! 处理流程：过滤 → 排序 → 分页。已软删除的案卷永远不出现在表中。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::dates::{parse_day, parse_opt_day};
use super::table::{CellValue, Page, SortDescriptor, Sortable, into_page};
use crate::db::CaseFile;

/// 案卷过滤条件
///
/// 集合为空表示不过滤该字段；日期范围两端都包含。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseFilter {
    /// 在案号、目的、位置、备注中做不区分大小写的子串匹配
    pub text: String,
    pub case_types: BTreeSet<String>,
    pub purposes: BTreeSet<String>,
    pub locations: BTreeSet<String>,
    pub required_from: Option<NaiveDate>,
    pub required_to: Option<NaiveDate>,
    pub overdue_only: bool,
}

/// 未指定且没有配置值时的每页行数
pub const DEFAULT_ROWS_PER_PAGE: usize = 5;

/// 案卷表查询
///
/// `rows_per_page` 为空时由调用方填入配置值，见 [`CaseQuery::with_default_rows`]。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseQuery {
    pub filter: CaseFilter,
    pub sort: Option<SortDescriptor>,
    pub page: usize,
    pub rows_per_page: Option<usize>,
}

impl Default for CaseQuery {
    fn default() -> Self {
        Self {
            filter: CaseFilter::default(),
            sort: None,
            page: 1,
            rows_per_page: None,
        }
    }
}

impl CaseQuery {
    /// 未指定每页行数时使用 `rows`
    pub fn with_default_rows(mut self, rows: usize) -> Self {
        self.rows_per_page.get_or_insert(rows);
        self
    }
}

/// 过滤下拉框的可选值
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CaseFilterOptions {
    pub case_types: Vec<String>,
    pub purposes: Vec<String>,
    pub locations: Vec<String>,
}

/// 已过出庭日期且尚未归还
pub fn is_overdue(file: &CaseFile, today: NaiveDate) -> bool {
    let returned = file
        .date_returned
        .as_deref()
        .is_some_and(|d| !d.trim().is_empty());
    if returned {
        return false;
    }
    parse_opt_day(file.required_on.as_deref()).is_some_and(|day| day < today)
}

fn set_allows(set: &BTreeSet<String>, value: &str) -> bool {
    set.is_empty() || set.contains(value)
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(needle))
}

impl CaseFilter {
    pub fn matches(&self, file: &CaseFile, today: NaiveDate) -> bool {
        if file.deleted {
            return false;
        }

        let needle = self.text.trim().to_lowercase();
        if !needle.is_empty() {
            let hit = contains_ci(Some(&file.case_number), &needle)
                || contains_ci(Some(&file.purpose), &needle)
                || contains_ci(Some(&file.current_location), &needle)
                || contains_ci(file.notes.as_deref(), &needle);
            if !hit {
                return false;
            }
        }

        if !set_allows(&self.case_types, &file.case_type)
            || !set_allows(&self.purposes, &file.purpose)
            || !set_allows(&self.locations, &file.current_location)
        {
            return false;
        }

        if self.required_from.is_some() || self.required_to.is_some() {
            let Some(day) = parse_opt_day(file.required_on.as_deref()) else {
                return false;
            };
            if self.required_from.is_some_and(|from| day < from)
                || self.required_to.is_some_and(|to| day > to)
            {
                return false;
            }
        }

        !self.overdue_only || is_overdue(file, today)
    }
}

impl Sortable for CaseFile {
    fn cell(&self, column: &str) -> CellValue {
        match column {
            "file_id" => CellValue::number(Some(self.file_id)),
            "uploaded_by" => CellValue::number(Some(self.uploaded_by)),
            "case_number" => CellValue::text(Some(&self.case_number)),
            "case_type" => CellValue::text(Some(&self.case_type)),
            "purpose" => CellValue::text(Some(&self.purpose)),
            "current_location" => CellValue::text(Some(&self.current_location)),
            "notes" => CellValue::text(self.notes.as_deref()),
            "date_recieved" | "date_received" => CellValue::text(self.date_recieved.as_deref()),
            "required_on" => CellValue::text(self.required_on.as_deref()),
            "date_returned" => CellValue::text(self.date_returned.as_deref()),
            _ => CellValue::Missing,
        }
    }
}

/// 过滤后的全部案卷（未分页）
pub fn filter_files<'a>(
    files: &'a [CaseFile],
    filter: &CaseFilter,
    today: NaiveDate,
) -> Vec<&'a CaseFile> {
    files.iter().filter(|f| filter.matches(f, today)).collect()
}

/// 案卷表一页
pub fn case_table(files: &[CaseFile], query: &CaseQuery, today: NaiveDate) -> Page<CaseFile> {
    let rows: Vec<CaseFile> = filter_files(files, &query.filter, today)
        .into_iter()
        .cloned()
        .collect();
    let rows_per_page = query.rows_per_page.unwrap_or(DEFAULT_ROWS_PER_PAGE);
    into_page(rows, query.sort.as_ref(), query.page, rows_per_page)
}

/// 从现有案卷中收集过滤选项（去重、排序）
pub fn filter_options(files: &[CaseFile]) -> CaseFilterOptions {
    let mut case_types = BTreeSet::new();
    let mut purposes = BTreeSet::new();
    let mut locations = BTreeSet::new();

    for file in files.iter().filter(|f| !f.deleted) {
        for (set, value) in [
            (&mut case_types, &file.case_type),
            (&mut purposes, &file.purpose),
            (&mut locations, &file.current_location),
        ] {
            if !value.trim().is_empty() {
                set.insert(value.clone());
            }
        }
    }

    CaseFilterOptions {
        case_types: case_types.into_iter().collect(),
        purposes: purposes.into_iter().collect(),
        locations: locations.into_iter().collect(),
    }
}

/// 出庭日期为 `day` 的案卷（不含已删除）
pub fn files_required_on(files: &[CaseFile], day: NaiveDate) -> Vec<&CaseFile> {
    files
        .iter()
        .filter(|f| !f.deleted)
        .filter(|f| f.required_on.as_deref().and_then(parse_day) == Some(day))
        .collect()
}
