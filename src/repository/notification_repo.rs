// ==========================================
// 地铁车队投运排程系统 - 通知日志仓储
// ==========================================
// 对齐: notification 表
// 红线: 日志按上限裁剪,保留最新
// ==========================================

use crate::domain::notification::{Notification, NotificationFilter, NotificationStats};
use crate::domain::types::NotificationType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

/// 默认通知上限
pub const DEFAULT_NOTIFICATION_CAP: usize = 30;

pub struct NotificationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl NotificationRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入通知并裁剪
    ///
    /// # 返回
    /// - 被裁剪掉的条数
    pub fn insert(&self, notification: &Notification, cap: usize) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO notification (
                notification_id, message, notification_type, created_at, is_read
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                notification.notification_id,
                notification.message,
                notification.notification_type.to_db_str(),
                notification.created_at.to_rfc3339(),
                notification.is_read,
            ],
        )?;
        let pruned = tx.execute(
            r#"
            DELETE FROM notification
            WHERE seq_no NOT IN (
                SELECT seq_no FROM notification ORDER BY seq_no DESC LIMIT ?1
            )
            "#,
            params![cap as i64],
        )?;
        tx.commit()?;
        Ok(pruned)
    }

    /// 列出全部通知（新 → 旧）
    pub fn list_all(&self) -> RepositoryResult<Vec<Notification>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT notification_id, message, notification_type, created_at, is_read
            FROM notification
            ORDER BY seq_no DESC
            "#,
        )?;
        let rows = stmt
            .query_map([], |row| Self::map_row(row))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 按条件过滤（新 → 旧）
    pub fn list(&self, filter: &NotificationFilter) -> RepositoryResult<Vec<Notification>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|n| filter.matches(n))
            .collect())
    }

    pub fn stats(&self) -> RepositoryResult<NotificationStats> {
        Ok(NotificationStats::from_notifications(&self.list_all()?))
    }

    /// 标记已读
    ///
    /// # 返回
    /// - `Ok(false)`: 通知不存在
    pub fn mark_read(&self, notification_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE notification SET is_read = 1 WHERE notification_id = ?1",
            params![notification_id],
        )?;
        Ok(rows > 0)
    }

    pub fn mark_all_read(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(conn.execute("UPDATE notification SET is_read = 1 WHERE is_read = 0", [])?)
    }

    pub fn delete(&self, notification_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "DELETE FROM notification WHERE notification_id = ?1",
            params![notification_id],
        )?;
        Ok(rows > 0)
    }

    pub fn clear(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(conn.execute("DELETE FROM notification", [])?)
    }

    fn map_row(row: &Row) -> SqliteResult<Notification> {
        Ok(Notification {
            notification_id: row.get(0)?,
            message: row.get(1)?,
            notification_type: NotificationType::from_str(&row.get::<_, String>(2)?),
            created_at: row
                .get::<_, String>(3)?
                .parse::<DateTime<Utc>>()
                .unwrap_or_else(|_| Utc::now()),
            is_read: row.get(4)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_repo() -> NotificationRepository {
        let conn = crate::db::open_sqlite_connection(crate::db::IN_MEMORY_DB_PATH).unwrap();
        crate::db::init_schema(&conn).unwrap();
        NotificationRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_cap_keeps_newest() {
        let repo = setup_repo();
        for i in 0..35 {
            let n = Notification::new(format!("message {}", i), NotificationType::Info);
            repo.insert(&n, DEFAULT_NOTIFICATION_CAP).unwrap();
        }

        let all = repo.list_all().unwrap();
        assert_eq!(all.len(), 30);
        assert_eq!(all[0].message, "message 34");
        assert_eq!(all[29].message, "message 5");
    }

    #[test]
    fn test_read_flags_and_stats() {
        let repo = setup_repo();
        let a = Notification::new("Train T-001 added".to_string(), NotificationType::Success);
        let b = Notification::new("Import failed".to_string(), NotificationType::Error);
        repo.insert(&a, 30).unwrap();
        repo.insert(&b, 30).unwrap();

        assert!(repo.mark_read(&a.notification_id).unwrap());
        assert!(!repo.mark_read("missing").unwrap());

        let stats = repo.stats().unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.unread, 1);
        assert_eq!(stats.errors, 1);

        let unread = repo
            .list(&NotificationFilter {
                include_read: false,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].message, "Import failed");

        assert_eq!(repo.mark_all_read().unwrap(), 1);
        assert!(repo.delete(&b.notification_id).unwrap());
        assert_eq!(repo.clear().unwrap(), 1);
        assert!(repo.list_all().unwrap().is_empty());
    }
}
