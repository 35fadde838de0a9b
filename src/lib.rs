// ==========================================
// 地铁车队投运排程系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 决策支持系统 (人工可覆写排程结果)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 排程规则与投影
pub mod engine;

// 导入层 - 外部名册
pub mod importer;

// 配置层 - 车队设置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AlertCategory, AlertPriority, MaintenancePriority, NotificationType, TrainStatus,
};

// 领域实体
pub use domain::{
    CriticalAlert, FleetStats, InductionPlan, InductionPlanRecord, MaintenanceAlert,
    MaintenanceOverview, Notification, TrainPatch, TrainRecord,
};

// 引擎
pub use engine::{
    CriticalAlertEngine, EligibilityCore, FleetStatsEngine, InductionError, InductionOptimizer,
    MaintenanceAlertEngine, SimulationAnalyzer,
};

// API
pub use api::{ApiError, ApiResult, ConfigApi, DashboardApi, FleetApi, InductionApi};
pub use app::AppState;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "地铁车队投运排程系统";
