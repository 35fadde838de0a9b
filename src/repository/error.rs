// ==========================================
// 地铁车队投运排程系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: rusqlite 错误在此收口,上层只看到 RepositoryError
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    /// 共享连接的互斥锁中毒
    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    /// 库中行无法还原为领域类型（状态码 / 日期 / 方案 JSON）
    #[error("存储记录损坏 (列 {column}): {message}")]
    CorruptRecord { column: usize, message: String },

    #[error("序列化失败: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl RepositoryError {
    /// 列车不存在
    pub fn train_not_found(train_id: &str) -> Self {
        RepositoryError::NotFound {
            entity: "Train".to_string(),
            id: train_id.to_string(),
        }
    }

    /// 排程方案不存在（未生成或已被历史上限淘汰）
    pub fn plan_not_found(plan_id: &str) -> Self {
        RepositoryError::NotFound {
            entity: "InductionPlan".to_string(),
            id: plan_id.to_string(),
        }
    }
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("UNIQUE") => {
                RepositoryError::UniqueConstraintViolation(msg)
            }
            rusqlite::Error::FromSqlConversionFailure(column, _, source) => {
                RepositoryError::CorruptRecord {
                    column,
                    message: source.to_string(),
                }
            }
            other => RepositoryError::DatabaseQueryError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
