// ==========================================
// 地铁车队投运排程系统 - 车队统计模型
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// FleetStats - 车队统计
// ==========================================
// 比率字段为四舍五入后的百分数
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetStats {
    pub total: usize,
    pub in_service: usize,
    pub standby: usize,
    pub maintenance: usize,
    pub available: usize, // in_service + standby

    pub utilization_rate: u32,
    pub maintenance_rate: u32,
    pub availability_rate: u32,

    pub avg_mileage: f64,
    pub avg_operational_hours: f64,

    pub high_priority_maintenance: usize,
    pub needs_cleaning: usize,
    pub fitness_issues: usize,
}

// ==========================================
// MaintenanceOverview - 检修概况
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceOverview {
    pub pending: usize,     // 高检修优先级列车数
    pub in_progress: usize, // 当前检修扣车数
    pub critical: usize,    // 高优先级但仍未扣车
}
