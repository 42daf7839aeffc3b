//! 面板状态端到端测试：真实命令路由器 + 文件数据库

use std::path::Path;
use std::sync::Arc;

use chrono::Duration;
use court_registry_lib::bridge::CommandRouter;
use court_registry_lib::db::{Database, NewAttendance, NewCaseFile, NewOffender};
use court_registry_lib::export;
use court_registry_lib::photos::PhotoStore;
use court_registry_lib::store::{DashboardStore, NoticeLevel, StaffForm};
use court_registry_lib::views::{self, CaseFilter, CaseQuery};

fn open_store(root: &Path) -> DashboardStore<Arc<CommandRouter>> {
    let db = Database::open(root.join("court_registry.db")).unwrap();
    let photos = PhotoStore::new(root.join("offender_photos"));
    let router = Arc::new(CommandRouter::new(Arc::new(db), photos));
    DashboardStore::new(router)
}

fn new_file(case_number: &str, case_type: &str, required_on: String) -> NewCaseFile {
    NewCaseFile {
        case_number: case_number.to_string(),
        case_type: case_type.to_string(),
        purpose: "Hearing".to_string(),
        uploaded_by: 1,
        current_location: "Registry".to_string(),
        notes: Some("Bring original exhibits".to_string()),
        required_on: Some(required_on),
    }
}

#[test]
fn test_registry_day_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(dir.path());
    let today = views::dates::today();
    let day = |offset: i64| (today + Duration::days(offset)).format("%Y-%m-%d").to_string();

    // 职员
    let staff_id = store
        .add_staff_member(&StaffForm {
            name: "Grace Mutheu".into(),
            email: "grace@courts.example".into(),
            role: "Clerk".into(),
            phone: Some("0722000000".into()),
            professional_title: None,
            password_hash: "hash".into(),
        })
        .unwrap();

    // 案卷：昨天、今天、明天
    let yesterday = store
        .add_case_file(&new_file("E1/2026", "Civil", day(-1)))
        .unwrap();
    store
        .add_case_file(&new_file("E2/2026", "Criminal", day(0)))
        .unwrap();
    let tomorrow = store
        .add_case_file(&new_file("E3/2026", "Civil", day(1)))
        .unwrap();
    store.delete_case_file(tomorrow).unwrap();

    store
        .client()
        .add_attendance(&NewAttendance {
            staff_id,
            date: day(0),
            status: "Absent".into(),
            reason: Some("Sick leave".into()),
            ..Default::default()
        })
        .unwrap();
    store.refresh_all().unwrap();

    // 已删除的案卷不在缓存里
    assert_eq!(store.files().len(), 2);

    let overdue = views::cases::case_table(
        store.files(),
        &CaseQuery {
            filter: CaseFilter {
                overdue_only: true,
                ..Default::default()
            },
            ..Default::default()
        },
        today,
    );
    assert_eq!(overdue.total, 1);
    assert_eq!(overdue.items[0].file_id, yesterday);

    let summary = views::analytics::summary(store.files(), store.attendance(), today, 7);
    assert_eq!(summary.active_files, 2);
    assert_eq!(summary.overdue_files, 1);
    assert_eq!(summary.absent_staff, 1);
    assert_eq!(summary.upcoming_files, 1);

    // 审计日志：最新在前，人员姓名可解析
    let log = views::audit::audit_log(store.notifications(), store.users(), store.staff());
    assert_eq!(log.len(), 5);
    assert_eq!(log[0].message, "Case File 'E3/2026' deleted successfully.");
    let staff_entry = log
        .iter()
        .find(|e| e.message.starts_with("New staff member added"))
        .unwrap();
    assert_eq!(staff_entry.assigned_to, "Grace Mutheu");

    // 今天的出庭日志导出
    let diary = views::diary::diary_for(store.files(), today);
    assert_eq!(diary.files.len(), 1);
    let generated = today.and_hms_opt(8, 0, 0).unwrap();
    let export = export::csv::diary_csv(&diary.files, today, generated).unwrap();
    let path = export.write_to(&dir.path().join("exports")).unwrap();
    let body = std::fs::read_to_string(path).unwrap();
    assert!(body.contains("E2/2026,Criminal,Hearing"));

    let notices = store.drain_notices();
    assert!(notices.iter().all(|n| n.level == NoticeLevel::Success));
}

#[test]
fn test_offender_photo_removed_with_record() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(dir.path());

    let offender = store
        .add_offender(&NewOffender {
            full_name: "Daniel Kiprono".into(),
            national_id: Some("30111222".into()),
            gender: Some("Male".into()),
            photo: Some(vec![0x89, b'P', b'N', b'G']),
            photo_filename: Some("daniel.png".into()),
            ..Default::default()
        })
        .unwrap();

    let photo = offender.photo_path.clone().unwrap();
    assert!(Path::new(&photo).exists());
    assert_eq!(
        views::offenders::similar_national_ids(store.offenders(), "3011").len(),
        1
    );

    store.delete_offender(offender.offender_id).unwrap();
    assert!(store.offenders().is_empty());
    assert!(!Path::new(&photo).exists());
}

#[test]
fn test_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut store = open_store(dir.path());
        store
            .add_case_file(&new_file("E9/2026", "Civil", "2026-11-02".into()))
            .unwrap();
    }

    let mut store = open_store(dir.path());
    store.refresh_files().unwrap();
    assert_eq!(store.files().len(), 1);
    assert_eq!(store.files()[0].case_number, "E9/2026");
}
