// ==========================================
// 地铁车队投运排程系统 - 配置层
// ==========================================
// 职责: 系统配置管理,强类型车队设置
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod settings;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use settings::{FleetSettings, MAX_SERVICE_COUNT, MIN_SERVICE_COUNT};
