use crate::db::open_sqlite_connection;
use crate::domain::train::TrainRecord;
use crate::domain::types::TrainStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

pub(super) const DATE_FMT: &str = "%Y-%m-%d";

const INSERT_SQL: &str = r#"
    INSERT INTO train (
        train_id, seq_no, train_name, status, mileage,
        fitness_clearance, open_job_card, needs_cleaning,
        maintenance_priority, next_maintenance_date, last_maintenance_date,
        branding, stabling_bay, route, current_location,
        operational_hours, capacity, updated_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
"#;

// ==========================================
// TrainRepository - 列车名册仓储
// ==========================================
pub struct TrainRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TrainRepository {
    /// 按路径打开（独立连接）
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        crate::db::init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    pub(super) fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 追加列车到名册末尾
    ///
    /// # 返回
    /// - `Err(UniqueConstraintViolation)`: 编号已存在
    pub fn insert(&self, train: &TrainRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let next_seq: i64 = conn.query_row(
            "SELECT COALESCE(MAX(seq_no), -1) + 1 FROM train",
            [],
            |row| row.get(0),
        )?;
        Self::insert_with_seq(&conn, train, next_seq)?;
        Ok(())
    }

    /// 整体更新列车档案（名册位置不变）
    pub fn update(&self, train: &TrainRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE train SET
                train_name = ?2, status = ?3, mileage = ?4,
                fitness_clearance = ?5, open_job_card = ?6, needs_cleaning = ?7,
                maintenance_priority = ?8, next_maintenance_date = ?9,
                last_maintenance_date = ?10, branding = ?11, stabling_bay = ?12,
                route = ?13, current_location = ?14, operational_hours = ?15,
                capacity = ?16, updated_at = ?17
            WHERE train_id = ?1
            "#,
            params![
                train.train_id,
                train.train_name,
                train.status.to_db_str(),
                train.mileage,
                train.fitness_clearance,
                train.open_job_card,
                train.needs_cleaning,
                train.maintenance_priority.to_db_str(),
                train.next_maintenance_date.format(DATE_FMT).to_string(),
                train
                    .last_maintenance_date
                    .map(|d| d.format(DATE_FMT).to_string()),
                train.branding,
                train.stabling_bay,
                train.route,
                train.current_location,
                train.operational_hours,
                train.capacity,
                train.updated_at.to_rfc3339(),
            ],
        )?;

        if rows == 0 {
            return Err(RepositoryError::train_not_found(&train.train_id));
        }
        Ok(())
    }

    /// 删除列车
    ///
    /// # 返回
    /// - `Ok(true)`: 已删除
    /// - `Ok(false)`: 编号不存在
    pub fn delete(&self, train_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let rows = conn.execute("DELETE FROM train WHERE train_id = ?1", params![train_id])?;
        Ok(rows > 0)
    }

    /// 批量写入状态（单事务）
    ///
    /// 名册中不存在的编号跳过
    ///
    /// # 返回
    /// - 实际更新的列车数
    pub fn update_status_batch(&self, assignments: &[(String, TrainStatus)]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let count = Self::write_statuses(&tx, assignments)?;
        tx.commit()?;
        Ok(count)
    }

    /// 在调用方事务内写入状态
    pub(crate) fn write_statuses(
        conn: &Connection,
        assignments: &[(String, TrainStatus)],
    ) -> RepositoryResult<usize> {
        let now = Utc::now().to_rfc3339();
        let mut stmt =
            conn.prepare("UPDATE train SET status = ?2, updated_at = ?3 WHERE train_id = ?1")?;

        let mut count = 0;
        for (train_id, status) in assignments {
            count += stmt.execute(params![train_id, status.to_db_str(), now])?;
        }
        Ok(count)
    }

    /// 用给定列车整体替换名册（单事务,按输入顺序重排 seq_no）
    pub fn replace_all(&self, trains: &[TrainRecord]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM train", [])?;
        for (seq, train) in trains.iter().enumerate() {
            Self::insert_with_seq(&tx, train, seq as i64)?;
        }

        tx.commit()?;
        Ok(trains.len())
    }

    fn insert_with_seq(conn: &Connection, train: &TrainRecord, seq_no: i64) -> rusqlite::Result<usize> {
        conn.execute(
            INSERT_SQL,
            params![
                train.train_id,
                seq_no,
                train.train_name,
                train.status.to_db_str(),
                train.mileage,
                train.fitness_clearance,
                train.open_job_card,
                train.needs_cleaning,
                train.maintenance_priority.to_db_str(),
                train.next_maintenance_date.format(DATE_FMT).to_string(),
                train
                    .last_maintenance_date
                    .map(|d| d.format(DATE_FMT).to_string()),
                train.branding,
                train.stabling_bay,
                train.route,
                train.current_location,
                train.operational_hours,
                train.capacity,
                train.updated_at.to_rfc3339(),
            ],
        )
    }
}

