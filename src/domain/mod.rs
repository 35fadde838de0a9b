// ==========================================
// 地铁车队投运排程系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod alert;
pub mod fleet;
pub mod notification;
pub mod plan;
pub mod train;
pub mod types;

// 重导出核心类型
pub use alert::{CriticalAlert, MaintenanceAlert};
pub use fleet::{FleetStats, MaintenanceOverview};
pub use notification::{Notification, NotificationFilter, NotificationStats};
pub use plan::{InductionPlan, InductionPlanRecord, PlanBucket, PlanCounts};
pub use train::{RosterSortKey, SortOrder, TrainPatch, TrainRecord};
pub use types::{AlertCategory, AlertPriority, MaintenancePriority, NotificationType, TrainStatus};
