// ==========================================
// 地铁车队投运排程系统 - 投运排程引擎核心
// ==========================================
// 红线: 只记录第一个命中的扣车原因
// 红线: 同走行公里的候选保持输入顺序 (稳定排序)
// 红线: 不修改名册,不读取时钟以外的环境
// ==========================================
// 流程:
// 1. 门槛判定 → 扣车检修 / 候选
// 2. 候选按走行公里升序
// 3. 前 min(N, 候选数) 列投运,其余备用
// ==========================================

use crate::domain::plan::InductionPlan;
use crate::domain::train::TrainRecord;
use crate::engine::eligibility_core::{
    EligibilityCore, REASON_SELECTED_FOR_SERVICE, REASON_STANDBY_RESERVE,
};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::{debug, instrument, warn};

// ==========================================
// InductionError - 排程引擎错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InductionError {
    #[error("参数无效: {0}")]
    InvalidArgument(String),
}

// ==========================================
// InductionOptimizer - 投运排程引擎
// ==========================================
// 无状态: 可在多个线程间共享,每次调用传入各自的名册快照
#[derive(Debug, Clone, Copy, Default)]
pub struct InductionOptimizer;

impl InductionOptimizer {
    pub fn new() -> Self {
        Self
    }

    // ==========================================
    // 参数校验
    // ==========================================

    /// 校验期望投运数量
    ///
    /// # 返回
    /// - `Ok(usize)`: 合法数量
    /// - `Err(InvalidArgument)`: 负数
    pub fn validate_service_count(desired_service_count: i64) -> Result<usize, InductionError> {
        usize::try_from(desired_service_count).map_err(|_| {
            InductionError::InvalidArgument(format!(
                "期望投运数量不能为负数: {}",
                desired_service_count
            ))
        })
    }

    /// 校验浮点形式的期望投运数量（表单输入）
    ///
    /// 非整数、NaN、无穷大与负数均视为无效
    pub fn validate_service_count_f64(desired_service_count: f64) -> Result<usize, InductionError> {
        if !desired_service_count.is_finite() || desired_service_count.fract() != 0.0 {
            return Err(InductionError::InvalidArgument(format!(
                "期望投运数量必须为整数: {}",
                desired_service_count
            )));
        }
        if desired_service_count > i64::MAX as f64 {
            return Err(InductionError::InvalidArgument(format!(
                "期望投运数量超出范围: {}",
                desired_service_count
            )));
        }
        Self::validate_service_count(desired_service_count as i64)
    }

    /// 解析文本形式的期望投运数量
    pub fn parse_service_count(raw: &str) -> Result<usize, InductionError> {
        let trimmed = raw.trim();
        if let Ok(value) = trimmed.parse::<i64>() {
            return Self::validate_service_count(value);
        }
        match trimmed.parse::<f64>() {
            Ok(value) => Self::validate_service_count_f64(value),
            Err(_) => Err(InductionError::InvalidArgument(format!(
                "期望投运数量不是数字: '{}'",
                raw
            ))),
        }
    }

    /// 名册中的列车编号必须唯一,否则原因映射无法一一对应
    fn ensure_unique_ids(roster: &[TrainRecord]) -> Result<(), InductionError> {
        let mut seen = HashSet::with_capacity(roster.len());
        for train in roster {
            if !seen.insert(train.train_id.as_str()) {
                warn!(train_id = %train.train_id, "名册中存在重复列车编号");
                return Err(InductionError::InvalidArgument(format!(
                    "名册中存在重复列车编号: {}",
                    train.train_id
                )));
            }
        }
        Ok(())
    }

    // ==========================================
    // 排程主流程
    // ==========================================

    /// 生成投运方案（以当前时间作为生成时间）
    ///
    /// # 参数
    /// - `roster`: 名册快照
    /// - `desired_service_count`: 期望投运数量
    pub fn plan(
        &self,
        roster: &[TrainRecord],
        desired_service_count: i64,
    ) -> Result<InductionPlan, InductionError> {
        self.plan_at(roster, desired_service_count, Utc::now())
    }

    /// 生成投运方案
    ///
    /// # 参数
    /// - `roster`: 名册快照
    /// - `desired_service_count`: 期望投运数量
    /// - `generated_at`: 方案生成时间
    ///
    /// # 返回
    /// - `Ok(InductionPlan)`: 完整方案
    /// - `Err(InvalidArgument)`: 参数无效,未做任何计算
    #[instrument(skip(self, roster), fields(roster_size = roster.len()))]
    pub fn plan_at(
        &self,
        roster: &[TrainRecord],
        desired_service_count: i64,
        generated_at: DateTime<Utc>,
    ) -> Result<InductionPlan, InductionError> {
        let desired = Self::validate_service_count(desired_service_count)?;
        Self::ensure_unique_ids(roster)?;

        let mut reasons = BTreeMap::new();
        let mut maintenance = Vec::new();
        let mut candidates: Vec<&TrainRecord> = Vec::with_capacity(roster.len());

        // 1. 门槛判定
        for train in roster {
            match EligibilityCore::check_train(train) {
                Some(hold) => {
                    maintenance.push(train.train_id.clone());
                    reasons.insert(train.train_id.clone(), hold.reason().to_string());
                }
                None => candidates.push(train),
            }
        }

        // 2. 走行公里升序 (sort_by_key 为稳定排序)
        candidates.sort_by_key(|train| train.mileage);

        // 3. 分组
        let take = desired.min(candidates.len());
        let (service_part, standby_part) = candidates.split_at(take);

        let in_service: Vec<String> = service_part.iter().map(|t| t.train_id.clone()).collect();
        let standby: Vec<String> = standby_part.iter().map(|t| t.train_id.clone()).collect();

        for id in &in_service {
            reasons.insert(id.clone(), REASON_SELECTED_FOR_SERVICE.to_string());
        }
        for id in &standby {
            reasons.insert(id.clone(), REASON_STANDBY_RESERVE.to_string());
        }

        debug!(
            desired = desired,
            in_service = in_service.len(),
            standby = standby.len(),
            maintenance = maintenance.len(),
            "投运方案生成完成"
        );

        Ok(InductionPlan {
            generated_at,
            desired_service_count: desired,
            in_service,
            standby,
            maintenance,
            reasons,
        })
    }
}
