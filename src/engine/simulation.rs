// ==========================================
// 地铁车队投运排程系统 - 仿真分析引擎
// ==========================================
// 职责: 对比方案与当前名册,生成统计与建议
// 红线: 仿真不落地方案,不修改名册
// 说明: include_maintenance / optimize_cleaning / priority_strategy
//       仅回显在报告中,不改变排程分支
// ==========================================

use crate::domain::plan::InductionPlan;
use crate::domain::train::TrainRecord;
use crate::engine::fleet_stats::FleetStatsEngine;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const REC_DEPLOY_STANDBY: &str = "Consider deploying additional trains to handle peak hour demand";
pub const REC_HIGH_MAINTENANCE: &str = "High maintenance count detected. Review maintenance schedules";
pub const REC_NOT_ENOUGH_TRAINS: &str = "Not enough trains available. Consider accelerating maintenance";
pub const REC_SCHEDULE_CLEANING: &str = "Multiple trains require cleaning. Schedule cleaning operations";
pub const REC_LOOKS_GOOD: &str = "Fleet optimization looks good. Current configuration is efficient.";

/// 备用超过该数量时建议加开
const STANDBY_SURPLUS_THRESHOLD: usize = 3;
/// 待清洁超过该数量时建议安排清洁
const CLEANING_BACKLOG_THRESHOLD: usize = 2;

// ==========================================
// PriorityStrategy - 仿真策略（展示用）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityStrategy {
    #[default]
    Balanced,
    Efficiency,
    Safety,
    Maintenance,
}

impl PriorityStrategy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "balanced" => Some(PriorityStrategy::Balanced),
            "efficiency" => Some(PriorityStrategy::Efficiency),
            "safety" => Some(PriorityStrategy::Safety),
            "maintenance" => Some(PriorityStrategy::Maintenance),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityStrategy::Balanced => "balanced",
            PriorityStrategy::Efficiency => "efficiency",
            PriorityStrategy::Safety => "safety",
            PriorityStrategy::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for PriorityStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// SimulationOptions - 仿真参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationOptions {
    pub include_maintenance: bool,
    pub optimize_cleaning: bool,
    pub priority_strategy: PriorityStrategy,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            include_maintenance: true,
            optimize_cleaning: true,
            priority_strategy: PriorityStrategy::Balanced,
        }
    }
}

// ==========================================
// SimulationStatistics / SimulationReport
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStatistics {
    pub total_trains: usize,
    pub service_percentage: u32,
    /// 当前检修数 - 方案检修数,可为负
    pub maintenance_reduction: i64,
    /// 相对当前投运数的增幅（%）,当前投运为 0 时为 None
    pub efficiency_gain: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub plan: InductionPlan,
    pub options: SimulationOptions,
    pub statistics: SimulationStatistics,
    pub recommendations: Vec<String>,
}

// ==========================================
// SimulationAnalyzer
// ==========================================
pub struct SimulationAnalyzer;

impl SimulationAnalyzer {
    /// 生成仿真报告
    ///
    /// # 参数
    /// - `current_roster`: 生成方案时使用的名册快照（方案未落地）
    /// - `plan`: 仿真方案
    /// - `options`: 仿真参数（仅回显）
    pub fn analyze(
        current_roster: &[TrainRecord],
        plan: InductionPlan,
        options: SimulationOptions,
    ) -> SimulationReport {
        let statistics = Self::statistics(current_roster, &plan);
        let recommendations = Self::recommendations(current_roster, &plan);
        SimulationReport {
            plan,
            options,
            statistics,
            recommendations,
        }
    }

    pub fn statistics(current_roster: &[TrainRecord], plan: &InductionPlan) -> SimulationStatistics {
        let current = FleetStatsEngine::compute(current_roster);
        let counts = plan.counts();

        let efficiency_gain = if current.in_service == 0 {
            None
        } else {
            let delta = counts.in_service as f64 - current.in_service as f64;
            Some((delta / current.in_service as f64 * 100.0).round() as i64)
        };

        SimulationStatistics {
            total_trains: plan.total(),
            service_percentage: FleetStatsEngine::percentage(counts.in_service, current.total),
            maintenance_reduction: current.maintenance as i64 - counts.maintenance as i64,
            efficiency_gain,
        }
    }

    /// 生成建议,无命中时给出默认结论
    pub fn recommendations(current_roster: &[TrainRecord], plan: &InductionPlan) -> Vec<String> {
        let current = FleetStatsEngine::compute(current_roster);
        let counts = plan.counts();
        let mut out = Vec::new();

        if counts.standby > STANDBY_SURPLUS_THRESHOLD {
            out.push(REC_DEPLOY_STANDBY.to_string());
        }
        if counts.maintenance > current.maintenance {
            out.push(REC_HIGH_MAINTENANCE.to_string());
        }
        if counts.in_service < plan.desired_service_count {
            out.push(REC_NOT_ENOUGH_TRAINS.to_string());
        }
        if current.needs_cleaning > CLEANING_BACKLOG_THRESHOLD {
            out.push(REC_SCHEDULE_CLEANING.to_string());
        }

        if out.is_empty() {
            out.push(REC_LOOKS_GOOD.to_string());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::TrainStatus;
    use crate::engine::induction::InductionOptimizer;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn train(id: &str, status: TrainStatus, mileage: u32) -> TrainRecord {
        let mut t = TrainRecord::new(id, id, NaiveDate::from_ymd_opt(2026, 5, 1).unwrap());
        t.status = status;
        t.mileage = mileage;
        t
    }

    fn plan_for(roster: &[TrainRecord], desired: i64) -> InductionPlan {
        InductionOptimizer::new()
            .plan_at(roster, desired, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap())
            .unwrap()
    }

    #[test]
    fn test_balanced_fleet_looks_good() {
        let roster = vec![
            train("T-1", TrainStatus::InService, 100),
            train("T-2", TrainStatus::Standby, 200),
        ];
        let plan = plan_for(&roster, 1);
        let report = SimulationAnalyzer::analyze(&roster, plan, SimulationOptions::default());

        assert_eq!(report.recommendations, vec![REC_LOOKS_GOOD.to_string()]);
        assert_eq!(report.statistics.total_trains, 2);
        assert_eq!(report.statistics.service_percentage, 50);
        assert_eq!(report.statistics.maintenance_reduction, 0);
        assert_eq!(report.statistics.efficiency_gain, Some(0));
    }

    #[test]
    fn test_shortfall_and_new_holds_are_reported() {
        let mut roster = vec![
            train("T-1", TrainStatus::InService, 100),
            train("T-2", TrainStatus::InService, 200),
            train("T-3", TrainStatus::InService, 300),
        ];
        roster[1].open_job_card = true;
        roster[2].needs_cleaning = true;

        let plan = plan_for(&roster, 3);
        let report = SimulationAnalyzer::analyze(&roster, plan, SimulationOptions::default());

        assert_eq!(
            report.recommendations,
            vec![REC_HIGH_MAINTENANCE.to_string(), REC_NOT_ENOUGH_TRAINS.to_string()]
        );
        assert_eq!(report.statistics.maintenance_reduction, -2);
        assert_eq!(report.statistics.efficiency_gain, Some(-67));
    }

    #[test]
    fn test_standby_surplus_and_cleaning_backlog() {
        let mut roster: Vec<TrainRecord> = (0..8)
            .map(|i| train(&format!("T-{}", i), TrainStatus::Standby, i * 10))
            .collect();
        for t in roster.iter_mut().skip(5) {
            t.needs_cleaning = true;
        }

        let plan = plan_for(&roster, 1);
        let recs = SimulationAnalyzer::recommendations(&roster, &plan);
        assert!(recs.contains(&REC_DEPLOY_STANDBY.to_string()));
        assert!(recs.contains(&REC_SCHEDULE_CLEANING.to_string()));

        // 当前无投运列车时不计算增幅
        let stats = SimulationAnalyzer::statistics(&roster, &plan);
        assert_eq!(stats.efficiency_gain, None);
    }

    #[test]
    fn test_priority_strategy_parse() {
        assert_eq!(PriorityStrategy::parse("Safety"), Some(PriorityStrategy::Safety));
        assert_eq!(PriorityStrategy::parse("random"), None);
        assert_eq!(PriorityStrategy::default().to_string(), "balanced");
    }
}
