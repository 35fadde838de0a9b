// ==========================================
// 地铁车队投运排程系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供 CLI 与嵌入方调用
// ==========================================

pub mod config_api;
pub mod dashboard_api;
pub mod error;
pub mod fleet_api;
pub mod induction_api;
pub mod notifier;
pub mod validator;

// 重导出核心类型
pub use config_api::ConfigApi;
pub use dashboard_api::{DashboardApi, DashboardSnapshot};
pub use error::{ApiError, ApiResult};
pub use fleet_api::FleetApi;
pub use induction_api::{InductionApi, SIMULATION_HISTORY_CAP, SYSTEM_ACTOR};
pub use notifier::FleetNotifier;
