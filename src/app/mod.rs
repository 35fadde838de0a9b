// ==========================================
// 地铁车队投运排程系统 - 应用层
// ==========================================
// 职责: 组装仓储与 API,供 CLI 与嵌入方使用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, get_persistent_db_path, AppState, DB_PATH_ENV};
