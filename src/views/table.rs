//! 通用表格：排序与分页
//!
//! 每种行类型实现 `Sortable`，按列名给出单元格值；
//! `compare_cells` 定义统一的比较规则：
//! - 数字按数值比较
//! - 字符串忽略大小写比较（相同时再按原文比较，保证顺序稳定）
//! - 缺失值在升序时排在最后
//!
//! 降序就是升序比较结果取反。

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ============================================================================
// 单元格与比较
// ============================================================================

/// 可排序的单元格值
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Missing,
}

impl CellValue {
    /// 空字符串与 None 都视为缺失
    pub fn text(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => CellValue::Text(v.to_string()),
            _ => CellValue::Missing,
        }
    }

    pub fn number(value: Option<i64>) -> Self {
        value.map_or(CellValue::Missing, |v| CellValue::Number(v as f64))
    }
}

/// 升序比较两个单元格
pub fn compare_cells(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Missing, CellValue::Missing) => Ordering::Equal,
        (CellValue::Missing, _) => Ordering::Greater,
        (_, CellValue::Missing) => Ordering::Less,
        (CellValue::Number(x), CellValue::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (CellValue::Text(x), CellValue::Text(y)) => x
            .to_lowercase()
            .cmp(&y.to_lowercase())
            .then_with(|| x.cmp(y)),
        // 数字排在文本前面
        (CellValue::Number(_), CellValue::Text(_)) => Ordering::Less,
        (CellValue::Text(_), CellValue::Number(_)) => Ordering::Greater,
    }
}

// ============================================================================
// 排序
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// 排序描述：列名 + 方向
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDescriptor {
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortDescriptor {
    pub fn ascending(column: &str) -> Self {
        Self {
            column: column.to_string(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(column: &str) -> Self {
        Self {
            column: column.to_string(),
            direction: SortDirection::Descending,
        }
    }
}

/// 按列名提供单元格值的行
pub trait Sortable {
    /// 未知列返回 `CellValue::Missing`
    fn cell(&self, column: &str) -> CellValue;
}

impl<T: Sortable> Sortable for &T {
    fn cell(&self, column: &str) -> CellValue {
        (**self).cell(column)
    }
}

/// 原地排序（稳定排序）
pub fn sort_rows<T: Sortable>(rows: &mut [T], sort: &SortDescriptor) {
    rows.sort_by(|a, b| {
        let ordering = compare_cells(&a.cell(&sort.column), &b.cell(&sort.column));
        match sort.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

// ============================================================================
// 分页
// ============================================================================

/// 一页结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 过滤后的总行数
    pub total: usize,
    /// 当前页（从 1 开始）
    pub page: usize,
    pub page_count: usize,
}

/// 总页数，没有数据时仍为 1 页
pub fn page_count(total: usize, rows_per_page: usize) -> usize {
    let rows_per_page = rows_per_page.max(1);
    total.div_ceil(rows_per_page).max(1)
}

/// 取第 `page` 页（从 1 开始）；超出范围返回空
pub fn paginate<T>(items: Vec<T>, page: usize, rows_per_page: usize) -> Vec<T> {
    let rows_per_page = rows_per_page.max(1);
    let start = page.max(1).saturating_sub(1).saturating_mul(rows_per_page);
    items.into_iter().skip(start).take(rows_per_page).collect()
}

/// 排序后分页
pub fn into_page<T: Sortable>(
    mut rows: Vec<T>,
    sort: Option<&SortDescriptor>,
    page: usize,
    rows_per_page: usize,
) -> Page<T> {
    if let Some(sort) = sort {
        sort_rows(&mut rows, sort);
    }
    let total = rows.len();
    let page = page.max(1);
    Page {
        page_count: page_count(total, rows_per_page),
        items: paginate(rows, page, rows_per_page),
        total,
        page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: Option<&'static str>,
        count: Option<i64>,
    }

    impl Sortable for Row {
        fn cell(&self, column: &str) -> CellValue {
            match column {
                "name" => CellValue::text(self.name),
                "count" => CellValue::number(self.count),
                _ => CellValue::Missing,
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: Some("bravo"), count: Some(10) },
            Row { name: None, count: Some(2) },
            Row { name: Some("Alpha"), count: None },
            Row { name: Some("charlie"), count: Some(-1) },
        ]
    }

    #[test]
    fn test_strings_ignore_case_and_missing_last() {
        let mut data = rows();
        sort_rows(&mut data, &SortDescriptor::ascending("name"));
        let names: Vec<_> = data.iter().map(|r| r.name).collect();
        assert_eq!(names, vec![Some("Alpha"), Some("bravo"), Some("charlie"), None]);
    }

    #[test]
    fn test_numbers_compare_numerically() {
        let mut data = rows();
        sort_rows(&mut data, &SortDescriptor::ascending("count"));
        let counts: Vec<_> = data.iter().map(|r| r.count).collect();
        assert_eq!(counts, vec![Some(-1), Some(2), Some(10), None]);
    }

    #[test]
    fn test_descending_reverses_ascending() {
        let mut asc = rows();
        sort_rows(&mut asc, &SortDescriptor::ascending("count"));
        let mut desc = rows();
        sort_rows(&mut desc, &SortDescriptor::descending("count"));

        asc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn test_paginate_pages_never_exceed_rows_per_page() {
        let items: Vec<u32> = (1..=12).collect();
        let pages = page_count(items.len(), 5);
        assert_eq!(pages, 3);

        for page in 1..=pages {
            let chunk = paginate(items.clone(), page, 5);
            assert!(chunk.len() <= 5);
            if page < pages {
                assert_eq!(chunk.len(), 5);
            }
        }
        assert_eq!(paginate(items.clone(), 3, 5), vec![11, 12]);
        assert!(paginate(items, 4, 5).is_empty());
    }

    #[test]
    fn test_page_count_minimum_one() {
        assert_eq!(page_count(0, 5), 1);
        assert_eq!(page_count(5, 5), 1);
        assert_eq!(page_count(6, 5), 2);
        assert_eq!(page_count(3, 0), 3);
    }

    #[test]
    fn test_into_page_reports_total() {
        let page = into_page(rows(), Some(&SortDescriptor::ascending("name")), 2, 3);
        assert_eq!(page.total, 4);
        assert_eq!(page.page_count, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, None);
    }
}
