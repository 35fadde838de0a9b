// ==========================================
// 地铁车队投运排程系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型,将各层错误转换为面向调用方的错误消息
// 红线: API层只返回 ApiError,不向调用方泄漏 rusqlite 等底层类型
// ==========================================

use crate::engine::induction::InductionError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    /// 排程参数无效（负数 / 非整数 / 名册编号重复）
    #[error("参数无效: {0}")]
    InvalidArgument(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // 导入 / 配置错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            err @ RepositoryError::CorruptRecord { .. } => ApiError::DatabaseError(err.to_string()),
            RepositoryError::SerializationError(e) => ApiError::InternalError(e.to_string()),
        }
    }
}

impl From<InductionError> for ApiError {
    fn from(err: InductionError) -> Self {
        match err {
            InductionError::InvalidArgument(msg) => ApiError::InvalidArgument(msg),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => ApiError::NotFound(format!("文件{}不存在", path)),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let api_err: ApiError = RepositoryError::train_not_found("T-042").into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("Train"));
                assert!(msg.contains("T-042"));
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }

        let api_err: ApiError = RepositoryError::LockError("poisoned".to_string()).into();
        assert!(matches!(api_err, ApiError::DatabaseConnectionError(ref m) if m.contains("poisoned")));

        let api_err: ApiError =
            RepositoryError::UniqueConstraintViolation("train.train_id".to_string()).into();
        assert!(matches!(api_err, ApiError::BusinessRuleViolation(_)));
    }

    #[test]
    fn test_induction_error_conversion() {
        let api_err: ApiError = InductionError::InvalidArgument("-1".to_string()).into();
        assert!(matches!(api_err, ApiError::InvalidArgument(ref m) if m == "-1"));
    }

    #[test]
    fn test_import_error_conversion() {
        let api_err: ApiError = ImportError::FileNotFound("roster.csv".to_string()).into();
        assert!(matches!(api_err, ApiError::NotFound(_)));

        let api_err: ApiError = ImportError::DuplicateTrainId {
            row: 3,
            train_id: "T-001".to_string(),
        }
        .into();
        match api_err {
            ApiError::ImportError(msg) => assert!(msg.contains("T-001")),
            other => panic!("Expected ImportError, got {:?}", other),
        }
    }
}
