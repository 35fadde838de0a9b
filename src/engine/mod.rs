// ==========================================
// 地铁车队投运排程系统 - 引擎层
// ==========================================
// 职责: 实现排程规则与名册投影,不拼 SQL
// 红线: Engine 不拼 SQL, 所有分组必须输出 reason
// ==========================================

pub mod alerts;
pub mod eligibility_core;
pub mod events;
pub mod fleet_stats;
pub mod induction;
pub mod simulation;

// 重导出核心引擎
pub use alerts::{CriticalAlertEngine, MaintenanceAlertEngine};
pub use eligibility_core::{EligibilityCore, HoldReason};
pub use events::{
    CallbackEventPublisher, ChannelEventPublisher, FleetEvent, FleetEventPublisher,
    FleetEventType, NoOpEventPublisher, OptionalEventPublisher,
};
pub use fleet_stats::FleetStatsEngine;
pub use induction::{InductionError, InductionOptimizer};
pub use simulation::{
    PriorityStrategy, SimulationAnalyzer, SimulationOptions, SimulationReport,
    SimulationStatistics,
};
