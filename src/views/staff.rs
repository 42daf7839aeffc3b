//! 职员表

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::table::{CellValue, Page, SortDescriptor, Sortable, into_page};
use crate::db::{Staff, User};

/// 职员过滤条件（状态集合为空表示全部）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffFilter {
    pub name: String,
    pub statuses: BTreeSet<String>,
}

impl StaffFilter {
    pub fn matches(&self, staff: &Staff) -> bool {
        let needle = self.name.trim().to_lowercase();
        (needle.is_empty() || staff.name.to_lowercase().contains(&needle))
            && (self.statuses.is_empty() || self.statuses.contains(&staff.status))
    }
}

impl Sortable for Staff {
    fn cell(&self, column: &str) -> CellValue {
        match column {
            "staff_id" => CellValue::number(Some(self.staff_id)),
            "user_id" => CellValue::number(Some(self.user_id)),
            "name" => CellValue::text(Some(&self.name)),
            "role" => CellValue::text(Some(&self.role)),
            "contact_number" => CellValue::text(self.contact_number.as_deref()),
            "status" => CellValue::text(Some(&self.status)),
            _ => CellValue::Missing,
        }
    }
}

/// 职员表一页
pub fn staff_table(
    staff: &[Staff],
    filter: &StaffFilter,
    sort: Option<&SortDescriptor>,
    page: usize,
    rows_per_page: usize,
) -> Page<Staff> {
    let rows: Vec<Staff> = staff.iter().filter(|s| filter.matches(s)).cloned().collect();
    into_page(rows, sort, page, rows_per_page)
}

/// 职员关联用户的邮箱
pub fn staff_email<'a>(staff: &Staff, users: &'a [User]) -> Option<&'a str> {
    users
        .iter()
        .find(|u| u.user_id == staff.user_id)
        .map(|u| u.email.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: i64, name: &str, status: &str) -> Staff {
        Staff {
            staff_id: id,
            user_id: id + 100,
            name: name.to_string(),
            role: "Clerk".to_string(),
            status: status.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_name_and_status_filter() {
        let staff = vec![
            member(1, "Jane Wanjiru", "Active"),
            member(2, "John Otieno", "On Leave"),
            member(3, "Janet Achieng", "On Leave"),
        ];

        let filter = StaffFilter {
            name: "jan".into(),
            statuses: BTreeSet::from(["On Leave".to_string()]),
        };
        let page = staff_table(&staff, &filter, None, 1, 10);
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].staff_id, 3);

        let all = staff_table(&staff, &StaffFilter::default(), None, 1, 10);
        assert_eq!(all.total, 3);
    }

    #[test]
    fn test_sort_by_name() {
        let staff = vec![
            member(1, "zawadi", "Active"),
            member(2, "Amina", "Active"),
        ];
        let page = staff_table(
            &staff,
            &StaffFilter::default(),
            Some(&SortDescriptor::ascending("name")),
            1,
            10,
        );
        assert_eq!(page.items[0].name, "Amina");
    }

    #[test]
    fn test_staff_email_lookup() {
        let users = vec![User {
            user_id: 101,
            email: "jane@courts.go.ke".into(),
            ..Default::default()
        }];
        assert_eq!(
            staff_email(&member(1, "Jane", "Active"), &users),
            Some("jane@courts.go.ke")
        );
        assert_eq!(staff_email(&member(2, "John", "Active"), &users), None);
    }
}
