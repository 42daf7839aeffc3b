//! 派生视图
//!
//! 从缓存数组计算界面需要的数据，全部是纯函数，不访问命令桥：
//!
//! - `table`: 通用排序、分页
//! - `dates`: 日期解析与格式化
//! - `cases`: 案卷表（CTS）过滤
//! - `staff`: 职员表
//! - `offenders`: 当事人检索、相似身份证号
//! - `audit`: 审计日志
//! - `diary`: 出庭日志与提醒文本
//! - `analytics`: 面板统计

pub mod analytics;
pub mod audit;
pub mod cases;
pub mod dates;
pub mod diary;
pub mod offenders;
pub mod staff;
pub mod table;

pub use cases::{CaseFilter, CaseQuery, is_overdue};
pub use table::{CellValue, Page, SortDescriptor, SortDirection, Sortable, page_count, paginate};
