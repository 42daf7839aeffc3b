//! 通讯录、公告与主题
//!
//! 三张小表，只有简单的增删改查。写入时忽略传入记录中的 ID 字段。

use rusqlite::{OptionalExtension, params};

use super::types::{Contact, NewsItem, Theme};
use super::{Database, DbResult, ensure_affected, with_db};

impl Database {
    // ========================================================================
    // 通讯录
    // ========================================================================

    pub fn get_all_contacts(&self) -> DbResult<Vec<Contact>> {
        with_db!(self, db, {
            let mut stmt = db.prepare(
                "SELECT contact_id, name, role, phone_number FROM contacts ORDER BY name COLLATE NOCASE ASC",
            )?;
            let contacts = stmt
                .query_map([], |row| {
                    Ok(Contact {
                        contact_id: row.get(0)?,
                        name: row.get(1)?,
                        role: row.get(2)?,
                        phone_number: row.get(3)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(contacts)
        })
    }

    pub fn create_contact(&self, contact: &Contact) -> DbResult<i64> {
        with_db!(self, db, {
            db.execute(
                "INSERT INTO contacts (name, role, phone_number) VALUES (?1, ?2, ?3)",
                params![contact.name, contact.role, contact.phone_number],
            )?;
            Ok(db.last_insert_rowid())
        })
    }

    pub fn update_contact(&self, contact: &Contact) -> DbResult<()> {
        with_db!(self, db, {
            let affected = db.execute(
                "UPDATE contacts SET name = ?1, role = ?2, phone_number = ?3 WHERE contact_id = ?4",
                params![
                    contact.name,
                    contact.role,
                    contact.phone_number,
                    contact.contact_id
                ],
            )?;
            ensure_affected(affected, "contact", contact.contact_id)
        })
    }

    pub fn delete_contact(&self, contact_id: i64) -> DbResult<()> {
        with_db!(self, db, {
            let affected =
                db.execute("DELETE FROM contacts WHERE contact_id = ?1", params![contact_id])?;
            ensure_affected(affected, "contact", contact_id)
        })
    }

    // ========================================================================
    // 公告
    // ========================================================================

    /// 获取全部公告（最新在前）
    pub fn get_all_news(&self) -> DbResult<Vec<NewsItem>> {
        with_db!(self, db, {
            let mut stmt = db.prepare(
                "SELECT news_id, title, content, date_created FROM news
                 ORDER BY date_created DESC, news_id DESC",
            )?;
            let news = stmt
                .query_map([], |row| {
                    Ok(NewsItem {
                        news_id: row.get(0)?,
                        title: row.get(1)?,
                        content: row.get(2)?,
                        date_created: row.get(3)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(news)
        })
    }

    pub fn create_news(&self, title: &str, content: &str) -> DbResult<i64> {
        with_db!(self, db, {
            db.execute(
                "INSERT INTO news (title, content) VALUES (?1, ?2)",
                params![title, content],
            )?;
            Ok(db.last_insert_rowid())
        })
    }

    pub fn update_news(&self, news_id: i64, title: &str, content: &str) -> DbResult<()> {
        with_db!(self, db, {
            let affected = db.execute(
                "UPDATE news SET title = ?1, content = ?2 WHERE news_id = ?3",
                params![title, content, news_id],
            )?;
            ensure_affected(affected, "news", news_id)
        })
    }

    pub fn delete_news(&self, news_id: i64) -> DbResult<()> {
        with_db!(self, db, {
            let affected = db.execute("DELETE FROM news WHERE news_id = ?1", params![news_id])?;
            ensure_affected(affected, "news", news_id)
        })
    }

    // ========================================================================
    // 主题
    // ========================================================================

    pub fn get_all_themes(&self) -> DbResult<Vec<Theme>> {
        with_db!(self, db, {
            let mut stmt = db.prepare(
                "SELECT theme_id, name, config_json, user_id FROM themes ORDER BY theme_id ASC",
            )?;
            let themes = stmt
                .query_map([], |row| {
                    Ok(Theme {
                        theme_id: row.get(0)?,
                        name: row.get(1)?,
                        config_json: row.get(2)?,
                        user_id: row.get(3)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(themes)
        })
    }

    pub fn get_theme(&self, theme_id: i64) -> DbResult<Option<Theme>> {
        with_db!(self, db, {
            let theme = db
                .query_row(
                    "SELECT theme_id, name, config_json, user_id FROM themes WHERE theme_id = ?1",
                    params![theme_id],
                    |row| {
                        Ok(Theme {
                            theme_id: row.get(0)?,
                            name: row.get(1)?,
                            config_json: row.get(2)?,
                            user_id: row.get(3)?,
                        })
                    },
                )
                .optional()?;
            Ok(theme)
        })
    }

    /// 新建主题，`config_json` 必须是合法 JSON
    pub fn create_theme(&self, theme: &Theme) -> DbResult<i64> {
        serde_json::from_str::<serde_json::Value>(&theme.config_json)?;

        with_db!(self, db, {
            db.execute(
                "INSERT INTO themes (name, config_json, user_id) VALUES (?1, ?2, ?3)",
                params![theme.name, theme.config_json, theme.user_id],
            )?;
            Ok(db.last_insert_rowid())
        })
    }

    pub fn update_theme(&self, theme: &Theme) -> DbResult<()> {
        serde_json::from_str::<serde_json::Value>(&theme.config_json)?;

        with_db!(self, db, {
            let affected = db.execute(
                "UPDATE themes SET name = ?1, config_json = ?2, user_id = ?3 WHERE theme_id = ?4",
                params![theme.name, theme.config_json, theme.user_id, theme.theme_id],
            )?;
            ensure_affected(affected, "theme", theme.theme_id)
        })
    }

    pub fn delete_theme(&self, theme_id: i64) -> DbResult<()> {
        with_db!(self, db, {
            let affected =
                db.execute("DELETE FROM themes WHERE theme_id = ?1", params![theme_id])?;
            ensure_affected(affected, "theme", theme_id)
        })
    }
}
