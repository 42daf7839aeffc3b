//! Court Registry 桌面应用
//!
//! 法院登记处面板：案卷追踪（CTS）、职员与考勤、通知 / 审计日志、
//! 当事人记录、出庭日志与导出。
//!
//! ## 分层
//! - `db`: 本地 SQLite 存储
//! - `bridge`: 命令桥（`invoke(command, args)`）及本地命令路由器
//! - `client`: 每个命令一个方法的类型化客户端
//! - `store`: 面板状态与表单流程
//! - `views`: 过滤、排序、分页、统计等派生视图
//! - `export`: CSV / ICS / Excel 导出
//! - `config` / `paths` / `logging`: 配置、数据目录、日志
//!
//! 命令名与参数名使用下划线（如 `get_file_by_id`、`file_id`）。
//!
//! ## 构建
//! - 默认构建不含 GUI，可直接在 CI 中运行测试
//! - `desktop` 特性启用 Tauri 桌面壳

pub mod bridge;
pub mod client;
pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod paths;
pub mod photos;
pub mod store;
pub mod views;

// ============================================
// 桌面壳（desktop 特性）
// ============================================
#[cfg(feature = "desktop")]
mod commands;

#[cfg(feature = "desktop")]
pub fn run() {
    let loaded = match config::load() {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("[Config] 加载配置失败: {}", e);
            std::process::exit(1);
        }
    };
    logging::init(&loaded.config.log_filter);

    let state = match commands::AppState::open(loaded) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("[DB] 打开数据库失败: {}", e);
            std::process::exit(1);
        }
    };

    let result = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_window_state::Builder::new().build())
        .manage(state)
        .setup(|app| {
            use tauri::Manager;

            // 启动时加载全部列表；失败不阻止窗口打开
            let state = app.state::<commands::AppState>();
            if let Err(e) = state.store.lock().refresh_all() {
                tracing::warn!("[Store] 初始加载失败: {}", e);
            }
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // 命令桥
            commands::invoke_command,
            commands::list_commands,
            // 状态
            commands::refresh_dashboard,
            commands::take_notices,
            commands::app_config,
            // 视图
            commands::case_table,
            commands::case_filter_options,
            commands::staff_table,
            commands::search_offenders,
            commands::similar_offenders,
            commands::audit_log,
            commands::diary,
            commands::todays_files,
            commands::diary_reminder,
            commands::dashboard_summary,
            commands::dashboard_charts,
            // 表单流程
            commands::add_staff_member,
            commands::edit_staff_member,
            commands::remove_staff_member,
            commands::add_case_file,
            commands::edit_case_file,
            commands::delete_case_file,
            commands::restore_case_file,
            commands::archive_notification,
            commands::delete_notification,
            commands::add_offender,
            commands::delete_offender,
            // 导出
            commands::export_table,
            commands::export_diary,
            commands::export_calendar,
        ])
        .run(tauri::generate_context!());

    if let Err(e) = result {
        tracing::error!("[App] 运行失败: {}", e);
    }
}
