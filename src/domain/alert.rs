// ==========================================
// 地铁车队投运排程系统 - 告警领域模型
// ==========================================
// 职责: 检修到期告警与看板关键告警
// 说明: 均为名册的派生投影,不落库
// ==========================================

use crate::domain::types::{AlertCategory, AlertPriority};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// MaintenanceAlert - 检修到期告警
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceAlert {
    pub train_id: String,
    pub next_maintenance_date: NaiveDate,
    pub days_remaining: i64, // 负数表示已逾期
    pub priority: AlertPriority,
}

impl MaintenanceAlert {
    pub fn is_overdue(&self) -> bool {
        self.days_remaining < 0
    }
}

// ==========================================
// CriticalAlert - 看板关键告警
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalAlert {
    pub alert_id: String, // {train_id}-{category}
    pub train_id: String,
    pub issue: String,
    pub priority: AlertPriority,
    pub category: AlertCategory,
}
