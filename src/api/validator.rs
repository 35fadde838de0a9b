// ==========================================
// 地铁车队投运排程系统 - 人工操作校验器
// ==========================================
// 职责: 人工录入 / 编辑列车前的字段校验,排程参数校验
// 红线: 校验失败不产生任何写入
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::train::{TrainPatch, TrainRecord};
use crate::engine::induction::InductionOptimizer;

/// 校验列车编号
///
/// # 返回
/// - Err(InvalidInput): 编号为空或包含空白字符
pub fn validate_train_id(train_id: &str) -> ApiResult<()> {
    if train_id.trim().is_empty() {
        return Err(ApiError::InvalidInput("列车编号不能为空".to_string()));
    }
    if train_id.chars().any(char::is_whitespace) {
        return Err(ApiError::InvalidInput(format!(
            "列车编号不能包含空白字符: '{}'",
            train_id
        )));
    }
    Ok(())
}

/// 校验列车名称
pub fn validate_train_name(train_name: &str) -> ApiResult<()> {
    if train_name.trim().is_empty() {
        return Err(ApiError::InvalidInput("列车名称不能为空".to_string()));
    }
    Ok(())
}

/// 校验新增列车档案
pub fn validate_new_train(train: &TrainRecord) -> ApiResult<()> {
    validate_train_id(&train.train_id)?;
    validate_train_name(&train.train_name)
}

/// 校验编辑补丁
///
/// # 返回
/// - Err(InvalidInput): 补丁为空或名称为空
pub fn validate_patch(patch: &TrainPatch) -> ApiResult<()> {
    if patch.is_empty() {
        return Err(ApiError::InvalidInput("编辑补丁不能为空".to_string()));
    }
    if let Some(ref name) = patch.train_name {
        validate_train_name(name)?;
    }
    Ok(())
}

/// 校验期望投运数量
///
/// 负数返回 InvalidArgument;超过车队规模不视为错误
pub fn validate_service_count(desired_service_count: i64) -> ApiResult<usize> {
    Ok(InductionOptimizer::validate_service_count(
        desired_service_count,
    )?)
}
