// ==========================================
// 地铁车队投运排程系统 - 投运方案历史仓储
// ==========================================
// 对齐: induction_plan 表
// 红线: 方案内容写入后不可修改,仅 applied 标记可变
// 红线: 历史按上限裁剪,保留最新
// ==========================================

use crate::domain::plan::{InductionPlan, InductionPlanRecord};
use crate::domain::train::TrainRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::train_repo::TrainRepository;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

/// 默认历史上限
pub const DEFAULT_PLAN_HISTORY_CAP: usize = 20;

/// 一次排程落地的结果
#[derive(Debug, Clone)]
pub struct CommittedRun {
    pub record: InductionPlanRecord,
    /// 实际更新的列车数
    pub updated: usize,
    /// 被裁剪的历史条数
    pub pruned: usize,
}

pub struct PlanHistoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PlanHistoryRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入方案并裁剪历史
    ///
    /// # 参数
    /// - `record`: 方案记录
    /// - `cap`: 保留的最大条数（至少保留刚写入的一条）
    ///
    /// # 返回
    /// - 被裁剪掉的条数
    pub fn insert(&self, record: &InductionPlanRecord, cap: usize) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        Self::insert_row(&tx, record)?;
        let pruned = Self::prune(&tx, cap)?;
        tx.commit()?;

        Ok(pruned)
    }

    /// 单事务完成一次排程落地
    ///
    /// 同一把连接锁下: 读取名册快照 → `build` 生成方案 → 写入列车状态
    /// → 写入方案（已落地）→ 裁剪历史。任一步失败整体回滚
    ///
    /// # 参数
    /// - `cap`: 历史上限
    /// - `build`: 由名册快照生成方案记录
    pub fn commit_run<F, E>(&self, cap: usize, build: F) -> Result<CommittedRun, E>
    where
        F: FnOnce(&[TrainRecord]) -> Result<InductionPlanRecord, E>,
        E: From<RepositoryError>,
    {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction().map_err(RepositoryError::from)?;

        let roster = TrainRepository::snapshot(&tx)?;
        let mut record = build(&roster)?;
        record.applied = true;

        let updated = TrainRepository::write_statuses(&tx, &record.plan.assignments())?;
        Self::insert_row(&tx, &record)?;
        let pruned = Self::prune(&tx, cap)?;
        tx.commit().map_err(RepositoryError::from)?;

        Ok(CommittedRun {
            record,
            updated,
            pruned,
        })
    }

    /// 单事务重新落地历史方案（写入状态并标记已落地）
    ///
    /// # 返回
    /// - 实际更新的列车数
    /// - `Err(NotFound)`: 方案不存在,无任何写入
    pub fn reapply(&self, plan_id: &str) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let record = Self::find_in(&tx, plan_id)?
            .ok_or_else(|| RepositoryError::plan_not_found(plan_id))?;
        let updated = TrainRepository::write_statuses(&tx, &record.plan.assignments())?;
        tx.execute(
            "UPDATE induction_plan SET applied = 1 WHERE plan_id = ?1",
            params![plan_id],
        )?;
        tx.commit()?;

        Ok(updated)
    }

    fn insert_row(conn: &Connection, record: &InductionPlanRecord) -> RepositoryResult<()> {
        let plan_json = serde_json::to_string(&record.plan)?;
        conn.execute(
            r#"
            INSERT INTO induction_plan (
                plan_id, generated_at, actor, desired_service_count, applied, plan_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                record.plan_id,
                record.plan.generated_at.to_rfc3339(),
                record.actor,
                record.plan.desired_service_count as i64,
                record.applied,
                plan_json,
            ],
        )?;
        Ok(())
    }

    fn prune(conn: &Connection, cap: usize) -> RepositoryResult<usize> {
        let keep = cap.max(1) as i64;
        let pruned = conn.execute(
            r#"
            DELETE FROM induction_plan
            WHERE seq_no NOT IN (
                SELECT seq_no FROM induction_plan ORDER BY seq_no DESC LIMIT ?1
            )
            "#,
            params![keep],
        )?;
        Ok(pruned)
    }

    fn find_in(conn: &Connection, plan_id: &str) -> RepositoryResult<Option<InductionPlanRecord>> {
        let result = conn.query_row(
            "SELECT plan_id, actor, applied, plan_json FROM induction_plan WHERE plan_id = ?1",
            params![plan_id],
            |row| Self::map_row(row),
        );
        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 最近的方案（新 → 旧）
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<InductionPlanRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT plan_id, actor, applied, plan_json
            FROM induction_plan
            ORDER BY seq_no DESC
            LIMIT ?1
            "#,
        )?;
        let rows = stmt
            .query_map(params![limit as i64], |row| Self::map_row(row))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn find_by_id(&self, plan_id: &str) -> RepositoryResult<Option<InductionPlanRecord>> {
        let conn = self.get_conn()?;
        Self::find_in(&conn, plan_id)
    }

    pub fn latest(&self) -> RepositoryResult<Option<InductionPlanRecord>> {
        Ok(self.list_recent(1)?.into_iter().next())
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM induction_plan", [], |row| row.get(0))?;
        Ok(count.max(0) as usize)
    }

    pub fn clear(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(conn.execute("DELETE FROM induction_plan", [])?)
    }

    fn map_row(row: &Row) -> SqliteResult<InductionPlanRecord> {
        let plan_json: String = row.get(3)?;
        let plan: InductionPlan = serde_json::from_str(&plan_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(InductionPlanRecord {
            plan_id: row.get(0)?,
            actor: row.get(1)?,
            applied: row.get(2)?,
            plan,
        })
    }
}
