// ==========================================
// 地铁车队投运排程系统 - Eligibility Core 纯函数库
// ==========================================
// 职责: 投运门槛判定与决策原因文案
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use crate::domain::train::TrainRecord;
use serde::{Deserialize, Serialize};

// ==========================================
// 决策原因文案
// ==========================================
pub const REASON_MISSING_FITNESS: &str = "Missing fitness clearance";
pub const REASON_OPEN_JOB_CARD: &str = "Open job-card";
pub const REASON_REQUIRES_CLEANING: &str = "Requires cleaning";
pub const REASON_SELECTED_FOR_SERVICE: &str = "Selected for service (mileage balancing)";
pub const REASON_STANDBY_RESERVE: &str = "Standby - reserve";

// ==========================================
// HoldReason - 扣车原因
// ==========================================
// 顺序即判定优先级,只记录第一个命中的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HoldReason {
    MissingFitnessClearance,
    OpenJobCard,
    RequiresCleaning,
}

impl HoldReason {
    /// 决策原因文案
    pub fn reason(&self) -> &'static str {
        match self {
            HoldReason::MissingFitnessClearance => REASON_MISSING_FITNESS,
            HoldReason::OpenJobCard => REASON_OPEN_JOB_CARD,
            HoldReason::RequiresCleaning => REASON_REQUIRES_CLEANING,
        }
    }
}

// ==========================================
// EligibilityCore - 纯函数工具类
// ==========================================
pub struct EligibilityCore;

impl EligibilityCore {
    /// 判定扣车原因
    ///
    /// # 规则
    /// 1. fitness_clearance=false → MissingFitnessClearance
    /// 2. open_job_card=true → OpenJobCard
    /// 3. needs_cleaning=true → RequiresCleaning
    /// 4. 否则 → None (可投运候选)
    ///
    /// # 参数
    /// - fitness_clearance: 适用性证书
    /// - open_job_card: 是否存在未关闭工单
    /// - needs_cleaning: 是否待清洁
    pub fn determine_hold_reason(
        fitness_clearance: bool,
        open_job_card: bool,
        needs_cleaning: bool,
    ) -> Option<HoldReason> {
        // 规则 1: 证书优先
        if !fitness_clearance {
            return Some(HoldReason::MissingFitnessClearance);
        }

        // 规则 2: 工单
        if open_job_card {
            return Some(HoldReason::OpenJobCard);
        }

        // 规则 3: 清洁
        if needs_cleaning {
            return Some(HoldReason::RequiresCleaning);
        }

        None
    }

    /// 对单列车做门槛判定
    pub fn check_train(train: &TrainRecord) -> Option<HoldReason> {
        Self::determine_hold_reason(
            train.fitness_clearance,
            train.open_job_card,
            train.needs_cleaning,
        )
    }

    /// 是否为可投运候选
    pub fn is_eligible(train: &TrainRecord) -> bool {
        Self::check_train(train).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_clear_is_eligible() {
        assert_eq!(EligibilityCore::determine_hold_reason(true, false, false), None);
    }

    #[test]
    fn test_fitness_wins_over_other_flags() {
        assert_eq!(
            EligibilityCore::determine_hold_reason(false, true, true),
            Some(HoldReason::MissingFitnessClearance)
        );
    }

    #[test]
    fn test_job_card_wins_over_cleaning() {
        assert_eq!(
            EligibilityCore::determine_hold_reason(true, true, true),
            Some(HoldReason::OpenJobCard)
        );
    }

    #[test]
    fn test_cleaning_only() {
        let hold = EligibilityCore::determine_hold_reason(true, false, true);
        assert_eq!(hold, Some(HoldReason::RequiresCleaning));
        assert_eq!(hold.unwrap().reason(), "Requires cleaning");
    }
}
