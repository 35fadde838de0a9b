use super::store::{TrainRepository, DATE_FMT};
use crate::domain::train::TrainRecord;
use crate::domain::types::{MaintenancePriority, TrainStatus};
use crate::repository::error::RepositoryResult;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Result as SqliteResult, Row};

const SELECT_COLUMNS: &str = r#"
    SELECT train_id, train_name, status, mileage,
           fitness_clearance, open_job_card, needs_cleaning,
           maintenance_priority, next_maintenance_date, last_maintenance_date,
           branding, stabling_bay, route, current_location,
           operational_hours, capacity, updated_at
    FROM train
"#;

impl TrainRepository {
    // ==========================================
    // 查询操作
    // ==========================================

    /// 按名册顺序列出全部列车
    pub fn list_all(&self) -> RepositoryResult<Vec<TrainRecord>> {
        let conn = self.get_conn()?;
        Self::snapshot(&conn)
    }

    /// 在调用方持有的连接（或事务）上读取名册快照
    pub(crate) fn snapshot(conn: &Connection) -> RepositoryResult<Vec<TrainRecord>> {
        let sql = format!("{} ORDER BY seq_no ASC", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;

        let trains = stmt
            .query_map([], |row| Self::map_row(row))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(trains)
    }

    /// 按编号查询
    pub fn find_by_id(&self, train_id: &str) -> RepositoryResult<Option<TrainRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE train_id = ?1", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;

        match stmt.query_row(params![train_id], |row| Self::map_row(row)) {
            Ok(train) => Ok(Some(train)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn exists(&self, train_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM train WHERE train_id = ?1",
            params![train_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM train", [], |row| row.get(0))?;
        Ok(count.max(0) as usize)
    }

    /// 全部列车编号（名册顺序）
    pub fn list_ids(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT train_id FROM train ORDER BY seq_no ASC")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(ids)
    }

    // ==========================================
    // 行映射
    // ==========================================

    fn map_row(row: &Row) -> SqliteResult<TrainRecord> {
        let status_raw: String = row.get(2)?;
        let status = TrainStatus::parse(&status_raw)
            .ok_or_else(|| conversion_error(2, format!("未知列车状态: {}", status_raw)))?;

        let priority_raw: String = row.get(7)?;
        let maintenance_priority = MaintenancePriority::parse(&priority_raw)
            .ok_or_else(|| conversion_error(7, format!("未知检修优先级: {}", priority_raw)))?;

        let next_raw: String = row.get(8)?;
        let next_maintenance_date = NaiveDate::parse_from_str(&next_raw, DATE_FMT)
            .map_err(|e| conversion_error(8, format!("下次检修日期格式错误: {} ({})", next_raw, e)))?;

        Ok(TrainRecord {
            train_id: row.get(0)?,
            train_name: row.get(1)?,
            status,
            mileage: row.get(3)?,
            fitness_clearance: row.get(4)?,
            open_job_card: row.get(5)?,
            needs_cleaning: row.get(6)?,
            maintenance_priority,
            next_maintenance_date,
            last_maintenance_date: row
                .get::<_, Option<String>>(9)?
                .and_then(|s| NaiveDate::parse_from_str(&s, DATE_FMT).ok()),
            branding: row.get(10)?,
            stabling_bay: row.get(11)?,
            route: row.get(12)?,
            current_location: row.get(13)?,
            operational_hours: row.get(14)?,
            capacity: row.get(15)?,
            updated_at: row
                .get::<_, String>(16)?
                .parse::<DateTime<Utc>>()
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}
