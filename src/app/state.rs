// ==========================================
// 地铁车队投运排程系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 红线: 所有仓储共享同一连接,排程引擎保持无状态
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::{ConfigApi, DashboardApi, FleetApi, FleetNotifier, InductionApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection, IN_MEMORY_DB_PATH};
use crate::engine::events::{FleetEventPublisher, OptionalEventPublisher};
use crate::repository::{NotificationRepository, PlanHistoryRepository, TrainRepository};

/// 指定数据库路径的环境变量
pub const DB_PATH_ENV: &str = "METRO_INDUCTION_DB_PATH";

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径（":memory:" 表示内存库）
    pub db_path: String,

    /// 车队名册API
    pub fleet_api: Arc<FleetApi>,

    /// 投运排程API
    pub induction_api: Arc<InductionApi>,

    /// 看板API
    pub dashboard_api: Arc<DashboardApi>,

    /// 设置与通知API
    pub config_api: Arc<ConfigApi>,
}

impl AppState {
    /// 创建新的AppState实例（不发布车队事件）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        Self::build(db_path, OptionalEventPublisher::none())
    }

    /// 创建带事件发布者的AppState实例
    pub fn new_with_publisher(
        db_path: String,
        publisher: Arc<dyn FleetEventPublisher>,
    ) -> Result<Self, String> {
        Self::build(db_path, OptionalEventPublisher::with_publisher(publisher))
    }

    /// 内存库实例（测试 / 演示）
    pub fn in_memory() -> Result<Self, String> {
        Self::new(IN_MEMORY_DB_PATH.to_string())
    }

    fn build(db_path: String, event_publisher: OptionalEventPublisher) -> Result<Self, String> {
        tracing::info!(
            db_path = %db_path,
            publisher = event_publisher.is_configured(),
            "初始化AppState"
        );

        // 共享连接
        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库表结构初始化失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let train_repo = Arc::new(TrainRepository::from_connection(conn.clone()));
        let plan_history_repo = Arc::new(PlanHistoryRepository::from_connection(conn.clone()));
        let notification_repo = Arc::new(NotificationRepository::from_connection(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 创建API实例
        // ==========================================
        let notifier = Arc::new(FleetNotifier::new(
            notification_repo.clone(),
            config_manager.clone(),
            event_publisher,
        ));

        let fleet_api = Arc::new(FleetApi::new(train_repo.clone(), notifier.clone()));
        let induction_api = Arc::new(InductionApi::new(
            train_repo.clone(),
            plan_history_repo,
            config_manager.clone(),
            notifier.clone(),
        ));
        let dashboard_api = Arc::new(DashboardApi::new(train_repo, config_manager.clone()));
        let config_api = Arc::new(ConfigApi::new(config_manager, notification_repo, notifier));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            fleet_api,
            induction_api,
            dashboard_api,
            config_api,
        })
    }

    /// 获取数据库路径
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }
}

/// 默认数据库路径
///
/// 优先使用环境变量 METRO_INDUCTION_DB_PATH,否则为内存库
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    IN_MEMORY_DB_PATH.to_string()
}

/// 持久化数据库路径（用户数据目录）
///
/// 拿不到数据目录时回退到当前目录
pub fn get_persistent_db_path() -> String {
    let mut path = PathBuf::from("./metro_induction.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("metro-induction");
        // 目录创建失败时由打开数据库报错
        std::fs::create_dir_all(&dir).ok();
        path = dir.join("metro_induction.db");
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_state_starts_empty() {
        let state = AppState::in_memory().unwrap();
        assert_eq!(state.get_db_path(), IN_MEMORY_DB_PATH);
        assert!(state.fleet_api.list_trains().unwrap().is_empty());
        assert!(state.config_api.list_notifications().unwrap().is_empty());
    }

    #[test]
    fn test_apis_share_one_connection() {
        let state = AppState::in_memory().unwrap();
        let seeded = state.fleet_api.seed_initial_roster_if_empty().unwrap();
        assert_eq!(seeded, 25);

        let stats = state.dashboard_api.fleet_stats().unwrap();
        assert_eq!(stats.total, 25);
    }

    #[test]
    fn test_persistent_db_path_has_file_name() {
        assert!(get_persistent_db_path().ends_with("metro_induction.db"));
    }
}
