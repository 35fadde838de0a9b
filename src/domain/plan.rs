// ==========================================
// 地铁车队投运排程系统 - 投运方案领域模型
// ==========================================
// 职责: 单次排程输出 (InductionPlan) 与历史记录 (InductionPlanRecord)
// 红线: 方案一经返回不可变
// ==========================================

use crate::domain::types::TrainStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// PlanBucket - 方案分组
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanBucket {
    InService,
    Standby,
    Maintenance,
}

impl PlanBucket {
    /// 方案落地后列车应处的状态
    pub fn target_status(&self) -> TrainStatus {
        match self {
            PlanBucket::InService => TrainStatus::InService,
            PlanBucket::Standby => TrainStatus::Standby,
            PlanBucket::Maintenance => TrainStatus::Maintenance,
        }
    }
}

// ==========================================
// InductionPlan - 投运方案
// ==========================================
// in_service / standby: 按走行公里升序
// maintenance: 按名册输入顺序
// reasons: 名册中每列车恰好一条
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InductionPlan {
    pub generated_at: DateTime<Utc>,
    pub desired_service_count: usize,
    pub in_service: Vec<String>,
    pub standby: Vec<String>,
    pub maintenance: Vec<String>,
    pub reasons: BTreeMap<String, String>,
}

/// 方案分组计数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanCounts {
    pub in_service: usize,
    pub standby: usize,
    pub maintenance: usize,
}

impl InductionPlan {
    /// 查询列车所在分组
    pub fn bucket_of(&self, train_id: &str) -> Option<PlanBucket> {
        if self.in_service.iter().any(|id| id == train_id) {
            Some(PlanBucket::InService)
        } else if self.standby.iter().any(|id| id == train_id) {
            Some(PlanBucket::Standby)
        } else if self.maintenance.iter().any(|id| id == train_id) {
            Some(PlanBucket::Maintenance)
        } else {
            None
        }
    }

    /// 查询列车的决策原因
    pub fn reason_of(&self, train_id: &str) -> Option<&str> {
        self.reasons.get(train_id).map(|s| s.as_str())
    }

    pub fn counts(&self) -> PlanCounts {
        PlanCounts {
            in_service: self.in_service.len(),
            standby: self.standby.len(),
            maintenance: self.maintenance.len(),
        }
    }

    /// 方案覆盖的列车总数
    pub fn total(&self) -> usize {
        self.in_service.len() + self.standby.len() + self.maintenance.len()
    }

    /// 按分组展开为 (train_id, 目标状态) 列表
    pub fn assignments(&self) -> Vec<(String, TrainStatus)> {
        let mut out = Vec::with_capacity(self.total());
        for (ids, bucket) in [
            (&self.in_service, PlanBucket::InService),
            (&self.standby, PlanBucket::Standby),
            (&self.maintenance, PlanBucket::Maintenance),
        ] {
            out.extend(ids.iter().map(|id| (id.clone(), bucket.target_status())));
        }
        out
    }
}

// ==========================================
// InductionPlanRecord - 方案历史记录
// ==========================================
// 对齐: induction_plan 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InductionPlanRecord {
    pub plan_id: String,
    pub actor: String,
    pub applied: bool,
    pub plan: InductionPlan,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> InductionPlan {
        let mut reasons = BTreeMap::new();
        reasons.insert("B".to_string(), "Selected for service (mileage balancing)".to_string());
        reasons.insert("A".to_string(), "Standby - reserve".to_string());
        reasons.insert("C".to_string(), "Missing fitness clearance".to_string());
        InductionPlan {
            generated_at: Utc::now(),
            desired_service_count: 1,
            in_service: vec!["B".to_string()],
            standby: vec!["A".to_string()],
            maintenance: vec!["C".to_string()],
            reasons,
        }
    }

    #[test]
    fn test_bucket_lookup() {
        let plan = sample_plan();
        assert_eq!(plan.bucket_of("B"), Some(PlanBucket::InService));
        assert_eq!(plan.bucket_of("A"), Some(PlanBucket::Standby));
        assert_eq!(plan.bucket_of("C"), Some(PlanBucket::Maintenance));
        assert_eq!(plan.bucket_of("Z"), None);
        assert_eq!(plan.reason_of("A"), Some("Standby - reserve"));
    }

    #[test]
    fn test_assignments_follow_bucket_order() {
        let plan = sample_plan();
        let assignments = plan.assignments();
        assert_eq!(
            assignments,
            vec![
                ("B".to_string(), TrainStatus::InService),
                ("A".to_string(), TrainStatus::Standby),
                ("C".to_string(), TrainStatus::Maintenance),
            ]
        );
        assert_eq!(plan.total(), 3);
        assert_eq!(plan.counts().in_service, 1);
    }
}
