// ==========================================
// 地铁车队投运排程系统 - 告警推导引擎
// ==========================================
// 职责: 从名册派生检修到期告警与看板关键告警
// 红线: 纯投影,不落库,不修改名册
// ==========================================

use crate::domain::alert::{CriticalAlert, MaintenanceAlert};
use crate::domain::train::TrainRecord;
use crate::domain::types::{AlertCategory, AlertPriority, MaintenancePriority, TrainStatus};
use chrono::NaiveDate;
use tracing::debug;

/// 默认告警窗口（天）
pub const DEFAULT_ALERT_WINDOW_DAYS: i64 = 7;
/// 默认高优先级阈值（天）
pub const DEFAULT_HIGH_PRIORITY_DAYS: i64 = 3;
/// 看板最多展示的清洁告警数量
pub const MAX_CLEANING_ALERTS: usize = 2;

pub const ISSUE_HIGH_PRIORITY_MAINTENANCE: &str = "High priority maintenance required";
pub const ISSUE_FITNESS_EXPIRED: &str = "Fitness certificate expired";
pub const ISSUE_CLEANING_OVERDUE: &str = "Cleaning overdue";

// ==========================================
// MaintenanceAlertEngine - 检修到期告警
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct MaintenanceAlertEngine {
    window_days: i64,
    high_priority_days: i64,
}

impl Default for MaintenanceAlertEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MaintenanceAlertEngine {
    pub fn new() -> Self {
        Self {
            window_days: DEFAULT_ALERT_WINDOW_DAYS,
            high_priority_days: DEFAULT_HIGH_PRIORITY_DAYS,
        }
    }

    /// 使用自定义阈值
    ///
    /// # 参数
    /// - `window_days`: 剩余天数 ≤ 该值时告警
    /// - `high_priority_days`: 剩余天数 ≤ 该值时为高优先级
    pub fn with_thresholds(window_days: i64, high_priority_days: i64) -> Self {
        Self {
            window_days,
            high_priority_days,
        }
    }

    /// 按剩余天数分级,超出窗口返回 None
    pub fn classify(&self, days_remaining: i64) -> Option<AlertPriority> {
        if days_remaining > self.window_days {
            None
        } else if days_remaining <= self.high_priority_days {
            Some(AlertPriority::High)
        } else {
            Some(AlertPriority::Medium)
        }
    }

    /// 推导检修到期告警
    ///
    /// 已逾期列车同样告警（剩余天数为负,高优先级）
    ///
    /// # 返回
    /// 按剩余天数升序,同天数保持名册顺序
    pub fn derive_alerts(&self, roster: &[TrainRecord], today: NaiveDate) -> Vec<MaintenanceAlert> {
        let mut alerts: Vec<MaintenanceAlert> = roster
            .iter()
            .filter_map(|train| {
                let days_remaining = train.days_until_maintenance(today);
                self.classify(days_remaining).map(|priority| MaintenanceAlert {
                    train_id: train.train_id.clone(),
                    next_maintenance_date: train.next_maintenance_date,
                    days_remaining,
                    priority,
                })
            })
            .collect();

        alerts.sort_by_key(|a| a.days_remaining);

        debug!(
            today = %today,
            window_days = self.window_days,
            alert_count = alerts.len(),
            "检修到期告警推导完成"
        );
        alerts
    }
}

// ==========================================
// CriticalAlertEngine - 看板关键告警
// ==========================================
// 顺序: 高优先级检修 → 证书失效 → 清洁（最多两条）
pub struct CriticalAlertEngine;

impl CriticalAlertEngine {
    pub fn derive_alerts(roster: &[TrainRecord]) -> Vec<CriticalAlert> {
        let mut alerts = Vec::new();

        for train in roster.iter().filter(|t| {
            t.maintenance_priority == MaintenancePriority::High && t.status != TrainStatus::Maintenance
        }) {
            alerts.push(Self::alert(
                train,
                ISSUE_HIGH_PRIORITY_MAINTENANCE,
                AlertPriority::High,
                AlertCategory::Maintenance,
            ));
        }

        for train in roster.iter().filter(|t| !t.fitness_clearance) {
            alerts.push(Self::alert(
                train,
                ISSUE_FITNESS_EXPIRED,
                AlertPriority::High,
                AlertCategory::Certification,
            ));
        }

        for train in roster
            .iter()
            .filter(|t| t.needs_cleaning)
            .take(MAX_CLEANING_ALERTS)
        {
            alerts.push(Self::alert(
                train,
                ISSUE_CLEANING_OVERDUE,
                AlertPriority::Medium,
                AlertCategory::Cleaning,
            ));
        }

        alerts
    }

    fn alert(
        train: &TrainRecord,
        issue: &str,
        priority: AlertPriority,
        category: AlertCategory,
    ) -> CriticalAlert {
        CriticalAlert {
            alert_id: format!("{}-{}", train.train_id, category.to_string().to_lowercase()),
            train_id: train.train_id.clone(),
            issue: issue.to_string(),
            priority,
            category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn train_due(id: &str, next: NaiveDate) -> TrainRecord {
        TrainRecord::new(id, id, next)
    }

    #[test]
    fn test_classify_boundaries() {
        let engine = MaintenanceAlertEngine::new();
        assert_eq!(engine.classify(8), None);
        assert_eq!(engine.classify(7), Some(AlertPriority::Medium));
        assert_eq!(engine.classify(4), Some(AlertPriority::Medium));
        assert_eq!(engine.classify(3), Some(AlertPriority::High));
        assert_eq!(engine.classify(0), Some(AlertPriority::High));
        assert_eq!(engine.classify(-5), Some(AlertPriority::High));
    }

    #[test]
    fn test_derive_alerts_sorted_by_days_remaining() {
        let today = date(2026, 3, 10);
        let roster = vec![
            train_due("T-001", date(2026, 3, 16)), // 6 天
            train_due("T-002", date(2026, 4, 30)), // 窗口外
            train_due("T-003", date(2026, 3, 8)),  // 逾期 2 天
            train_due("T-004", date(2026, 3, 12)), // 2 天
        ];

        let alerts = MaintenanceAlertEngine::new().derive_alerts(&roster, today);
        let ids: Vec<&str> = alerts.iter().map(|a| a.train_id.as_str()).collect();
        assert_eq!(ids, vec!["T-003", "T-004", "T-001"]);
        assert!(alerts[0].is_overdue());
        assert_eq!(alerts[0].days_remaining, -2);
        assert_eq!(alerts[1].priority, AlertPriority::High);
        assert_eq!(alerts[2].priority, AlertPriority::Medium);
    }

    #[test]
    fn test_custom_thresholds() {
        let today = date(2026, 3, 10);
        let roster = vec![train_due("T-001", date(2026, 3, 20))];
        let engine = MaintenanceAlertEngine::with_thresholds(14, 10);
        let alerts = engine.derive_alerts(&roster, today);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].priority, AlertPriority::High);
    }

    #[test]
    fn test_critical_alerts_order_and_cleaning_cap() {
        let next = date(2026, 6, 1);
        let mut high = train_due("T-001", next);
        high.maintenance_priority = MaintenancePriority::High;
        let mut held_high = train_due("T-002", next);
        held_high.maintenance_priority = MaintenancePriority::High;
        held_high.status = TrainStatus::Maintenance;
        let mut unfit = train_due("T-003", next);
        unfit.fitness_clearance = false;
        let dirty: Vec<TrainRecord> = (4..7)
            .map(|i| {
                let mut t = train_due(&format!("T-00{}", i), next);
                t.needs_cleaning = true;
                t
            })
            .collect();

        let mut roster = vec![high, held_high, unfit];
        roster.extend(dirty);

        let alerts = CriticalAlertEngine::derive_alerts(&roster);
        let ids: Vec<&str> = alerts.iter().map(|a| a.alert_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["T-001-maintenance", "T-003-certification", "T-004-cleaning", "T-005-cleaning"]
        );
        assert_eq!(alerts[0].issue, ISSUE_HIGH_PRIORITY_MAINTENANCE);
        assert_eq!(alerts[2].priority, AlertPriority::Medium);
    }
}
