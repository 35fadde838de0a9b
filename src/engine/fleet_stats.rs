// ==========================================
// 地铁车队投运排程系统 - 车队统计引擎
// ==========================================
// 职责: 名册聚合统计（看板指标）
// 红线: 纯投影,空名册返回全零
// ==========================================

use crate::domain::fleet::{FleetStats, MaintenanceOverview};
use crate::domain::train::TrainRecord;
use crate::domain::types::{MaintenancePriority, TrainStatus};

pub struct FleetStatsEngine;

impl FleetStatsEngine {
    /// 计算车队统计
    pub fn compute(roster: &[TrainRecord]) -> FleetStats {
        let total = roster.len();
        if total == 0 {
            return FleetStats::default();
        }

        let count_status = |status: TrainStatus| roster.iter().filter(|t| t.status == status).count();
        let in_service = count_status(TrainStatus::InService);
        let standby = count_status(TrainStatus::Standby);
        let maintenance = count_status(TrainStatus::Maintenance);
        let available = in_service + standby;

        let total_mileage: u64 = roster.iter().map(|t| u64::from(t.mileage)).sum();
        let total_hours: u64 = roster.iter().map(|t| u64::from(t.operational_hours)).sum();

        FleetStats {
            total,
            in_service,
            standby,
            maintenance,
            available,
            utilization_rate: Self::percentage(in_service, total),
            maintenance_rate: Self::percentage(maintenance, total),
            availability_rate: Self::percentage(available, total),
            avg_mileage: total_mileage as f64 / total as f64,
            avg_operational_hours: total_hours as f64 / total as f64,
            high_priority_maintenance: roster
                .iter()
                .filter(|t| t.maintenance_priority == MaintenancePriority::High)
                .count(),
            needs_cleaning: roster.iter().filter(|t| t.needs_cleaning).count(),
            fitness_issues: roster.iter().filter(|t| !t.fitness_clearance).count(),
        }
    }

    /// 检修概况
    pub fn maintenance_overview(roster: &[TrainRecord]) -> MaintenanceOverview {
        let high = |t: &&TrainRecord| t.maintenance_priority == MaintenancePriority::High;
        MaintenanceOverview {
            pending: roster.iter().filter(high).count(),
            in_progress: roster
                .iter()
                .filter(|t| t.status == TrainStatus::Maintenance)
                .count(),
            critical: roster
                .iter()
                .filter(high)
                .filter(|t| t.status != TrainStatus::Maintenance)
                .count(),
        }
    }

    /// 四舍五入百分比,分母为 0 时返回 0
    pub fn percentage(part: usize, total: usize) -> u32 {
        if total == 0 {
            return 0;
        }
        (part as f64 / total as f64 * 100.0).round() as u32
    }
}
