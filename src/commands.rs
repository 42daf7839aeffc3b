//! Tauri 命令
//!
//! 前端通过 `invoke_command` 直接调用命令桥，其余命令在共享的
//! `DashboardStore` 上运行视图、表单流程和导出。
//! 错误在边界处转为字符串。

use chrono::{Local, NaiveDate, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tauri::State;

use crate::bridge::{Bridge, COMMANDS, CommandRouter};
use crate::config::{AppConfig, LoadedConfig};
use crate::db::{
    CaseFile, CaseFileUpdate, Database, DbResult, NewCaseFile, NewOffender, Offender, Staff,
    StaffUpdate,
};
use crate::export::{self, ExportFile, ExportKind};
use crate::photos::PhotoStore;
use crate::store::{DashboardStore, Notice, StaffForm};
use crate::views::analytics::{self, DailyCount, DashboardSummary};
use crate::views::audit::AuditEntry;
use crate::views::cases::CaseFilterOptions;
use crate::views::diary::{DiaryDay, ReminderFormat};
use crate::views::staff::StaffFilter;
use crate::views::{self, CaseQuery, Page, SortDescriptor};

/// 共享状态
pub struct AppState {
    pub router: Arc<CommandRouter>,
    pub store: Mutex<DashboardStore<Arc<CommandRouter>>>,
    pub loaded: LoadedConfig,
}

impl AppState {
    pub fn open(loaded: LoadedConfig) -> DbResult<Self> {
        let db = Arc::new(Database::open(&loaded.database_path())?);
        let router = Arc::new(CommandRouter::new(db, PhotoStore::new(loaded.photo_dir())));
        tracing::info!("[App] 数据目录: {:?}", loaded.root);

        Ok(Self {
            store: Mutex::new(DashboardStore::new(Arc::clone(&router))),
            router,
            loaded,
        })
    }

    fn config(&self) -> &AppConfig {
        &self.loaded.config
    }

    fn save_export(&self, file: &ExportFile) -> Result<String, String> {
        file.write_to(&self.loaded.export_dir())
            .map(|path| path.to_string_lossy().to_string())
            .map_err(|e| e.to_string())
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    views::dates::parse_day(value).ok_or_else(|| format!("Invalid date: {value}"))
}

// ============================================================================
// 命令桥
// ============================================================================

/// 按名称调用后端命令
#[tauri::command]
pub fn invoke_command(
    state: State<'_, AppState>,
    command: String,
    args: Option<Value>,
) -> Result<Value, String> {
    state
        .router
        .invoke(&command, args.unwrap_or(Value::Null))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn list_commands() -> Vec<&'static str> {
    COMMANDS.to_vec()
}

// ============================================================================
// 状态
// ============================================================================

#[tauri::command]
pub fn refresh_dashboard(state: State<'_, AppState>) -> Result<(), String> {
    state.store.lock().refresh_all().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn take_notices(state: State<'_, AppState>) -> Vec<Notice> {
    state.store.lock().drain_notices()
}

#[tauri::command]
pub fn app_config(state: State<'_, AppState>) -> AppConfig {
    state.config().clone()
}

// ============================================================================
// 视图
// ============================================================================

/// 未指定每页行数时使用配置值
#[tauri::command]
pub fn case_table(state: State<'_, AppState>, query: CaseQuery) -> Page<CaseFile> {
    let query = query.with_default_rows(state.config().rows_per_page);
    let store = state.store.lock();
    views::cases::case_table(store.files(), &query, views::dates::today())
}

#[tauri::command]
pub fn case_filter_options(state: State<'_, AppState>) -> CaseFilterOptions {
    views::cases::filter_options(state.store.lock().files())
}

#[tauri::command]
pub fn staff_table(
    state: State<'_, AppState>,
    filter: StaffFilter,
    sort: Option<SortDescriptor>,
    page: usize,
    rows_per_page: Option<usize>,
) -> Page<Staff> {
    let rows_per_page = rows_per_page.unwrap_or(state.config().rows_per_page);
    let store = state.store.lock();
    views::staff::staff_table(store.staff(), &filter, sort.as_ref(), page, rows_per_page)
}

#[tauri::command]
pub fn search_offenders(
    state: State<'_, AppState>,
    search: String,
    gender: Option<String>,
) -> Vec<Offender> {
    let store = state.store.lock();
    views::offenders::search_offenders(store.offenders(), &search, gender.as_deref())
        .into_iter()
        .cloned()
        .collect()
}

#[tauri::command]
pub fn similar_offenders(state: State<'_, AppState>, national_id: String) -> Vec<Offender> {
    let store = state.store.lock();
    views::offenders::similar_national_ids(store.offenders(), &national_id)
        .into_iter()
        .cloned()
        .collect()
}

#[tauri::command]
pub fn audit_log(
    state: State<'_, AppState>,
    search: Option<String>,
    sort: Option<SortDescriptor>,
    page: usize,
    rows_per_page: Option<usize>,
) -> Page<AuditEntry> {
    let rows_per_page = rows_per_page.unwrap_or(state.config().rows_per_page);
    let store = state.store.lock();
    let log = views::audit::audit_log(store.notifications(), store.users(), store.staff());
    let rows: Vec<AuditEntry> = views::audit::search_audit_log(&log, search.as_deref().unwrap_or(""))
        .into_iter()
        .cloned()
        .collect();
    views::table::into_page(rows, sort.as_ref(), page, rows_per_page)
}

#[tauri::command]
pub fn diary(state: State<'_, AppState>, date: String) -> Result<DiaryDay, String> {
    let date = parse_date(&date)?;
    Ok(views::diary::diary_for(state.store.lock().files(), date))
}

/// 面板"即将出庭"页签
#[tauri::command]
pub fn todays_files(state: State<'_, AppState>) -> Vec<CaseFile> {
    let store = state.store.lock();
    views::diary::todays_files(store.files(), views::dates::today())
        .into_iter()
        .cloned()
        .collect()
}

#[tauri::command]
pub fn diary_reminder(
    state: State<'_, AppState>,
    date: String,
    format: Option<ReminderFormat>,
) -> Result<Option<String>, String> {
    let date = parse_date(&date)?;
    let day = views::diary::diary_for(state.store.lock().files(), date);
    Ok(views::diary::reminder_message(
        &day.files,
        date,
        format.unwrap_or_default(),
    ))
}

#[tauri::command]
pub fn dashboard_summary(state: State<'_, AppState>) -> DashboardSummary {
    let store = state.store.lock();
    analytics::summary(
        store.files(),
        store.attendance(),
        views::dates::today(),
        state.config().upcoming_window_days,
    )
}

/// 面板图表数据
#[derive(Debug, Serialize)]
pub struct DashboardCharts {
    pub by_purpose: BTreeMap<String, usize>,
    pub by_case_type: BTreeMap<String, usize>,
    pub daily_processed: Vec<DailyCount>,
}

#[tauri::command]
pub fn dashboard_charts(state: State<'_, AppState>, days: Option<u32>) -> DashboardCharts {
    let store = state.store.lock();
    DashboardCharts {
        by_purpose: analytics::count_by_purpose(store.files()),
        by_case_type: analytics::count_by_case_type(store.files()),
        daily_processed: analytics::daily_processed(
            store.files(),
            views::dates::today(),
            days.unwrap_or(7).min(analytics::MAX_WINDOW_DAYS),
        ),
    }
}

// ============================================================================
// 表单流程
// ============================================================================

#[tauri::command]
pub fn add_staff_member(state: State<'_, AppState>, form: StaffForm) -> Result<i64, String> {
    state
        .store
        .lock()
        .add_staff_member(&form)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn edit_staff_member(state: State<'_, AppState>, update: StaffUpdate) -> Result<(), String> {
    state
        .store
        .lock()
        .edit_staff_member(&update)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn remove_staff_member(state: State<'_, AppState>, staff_id: i64) -> Result<(), String> {
    state
        .store
        .lock()
        .remove_staff_member(staff_id)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn add_case_file(state: State<'_, AppState>, file: NewCaseFile) -> Result<i64, String> {
    state
        .store
        .lock()
        .add_case_file(&file)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn edit_case_file(state: State<'_, AppState>, update: CaseFileUpdate) -> Result<(), String> {
    state
        .store
        .lock()
        .edit_case_file(&update)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn delete_case_file(state: State<'_, AppState>, file_id: i64) -> Result<(), String> {
    state
        .store
        .lock()
        .delete_case_file(file_id)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn restore_case_file(state: State<'_, AppState>, file_id: i64) -> Result<(), String> {
    state
        .store
        .lock()
        .restore_case_file(file_id)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn archive_notification(
    state: State<'_, AppState>,
    notification_id: i64,
) -> Result<(), String> {
    state
        .store
        .lock()
        .archive_notification(notification_id)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn delete_notification(
    state: State<'_, AppState>,
    notification_id: i64,
) -> Result<(), String> {
    state
        .store
        .lock()
        .delete_notification(notification_id)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn add_offender(state: State<'_, AppState>, offender: NewOffender) -> Result<Offender, String> {
    state
        .store
        .lock()
        .add_offender(&offender)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn delete_offender(state: State<'_, AppState>, offender_id: i64) -> Result<(), String> {
    state
        .store
        .lock()
        .delete_offender(offender_id)
        .map_err(|e| e.to_string())
}

// ============================================================================
// 导出
// ============================================================================

/// 导出表格，返回写入的文件路径
///
/// `format` 为 "csv" 或 "xlsx"
#[tauri::command]
pub fn export_table(
    state: State<'_, AppState>,
    kind: ExportKind,
    format: String,
) -> Result<String, String> {
    let court = state.config().court_name.clone();
    let file = {
        let store = state.store.lock();
        let audit = || views::audit::audit_log(store.notifications(), store.users(), store.staff());

        let result = match (kind, format.as_str()) {
            (ExportKind::Cases, "csv") => export::csv::cases_csv(store.files(), &court),
            (ExportKind::Cases, "xlsx") => export::xlsx::cases_xlsx(store.files(), &court),
            (ExportKind::Staff, "csv") => {
                export::csv::staff_csv(store.staff(), store.users(), &court)
            }
            (ExportKind::Staff, "xlsx") => {
                export::xlsx::staff_xlsx(store.staff(), store.users(), &court)
            }
            (ExportKind::AuditLogs, "csv") => export::csv::audit_csv(&audit(), &court),
            (ExportKind::AuditLogs, "xlsx") => export::xlsx::audit_xlsx(&audit(), &court),
            (_, other) => return Err(format!("Unsupported export format: {other}")),
        };
        result.map_err(|e| e.to_string())?
    };
    state.save_export(&file)
}

#[tauri::command]
pub fn export_diary(state: State<'_, AppState>, date: String) -> Result<String, String> {
    let date = parse_date(&date)?;
    let day = views::diary::diary_for(state.store.lock().files(), date);
    let file = export::csv::diary_csv(&day.files, date, Local::now().naive_local())
        .map_err(|e| e.to_string())?;
    state.save_export(&file)
}

#[tauri::command]
pub fn export_calendar(state: State<'_, AppState>) -> Result<String, String> {
    let file = {
        let store = state.store.lock();
        export::ics::calendar_file(store.files(), &state.config().court_name, Utc::now())
    };
    state.save_export(&file)
}
