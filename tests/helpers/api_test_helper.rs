// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用辅助函数
// ==========================================

#[path = "../test_helpers.rs"]
mod test_helpers;

use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

use metro_induction::app::AppState;
use metro_induction::engine::events::{CallbackEventPublisher, FleetEvent};

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 包含应用状态与已发布事件的记录
pub struct ApiTestEnv {
    pub db_path: String,
    pub state: AppState,
    events: Arc<Mutex<Vec<FleetEvent>>>,

    // 临时文件（确保生命周期）
    _temp_file: Option<NamedTempFile>,
}

impl ApiTestEnv {
    /// 创建新的API测试环境（临时数据库文件,空名册）
    pub fn new() -> Result<Self, String> {
        let (temp_file, db_path) =
            test_helpers::create_test_db().map_err(|e| format!("创建测试数据库失败: {}", e))?;
        Self::build(db_path, Some(temp_file))
    }

    /// 内存库测试环境
    pub fn in_memory() -> Result<Self, String> {
        Self::build(":memory:".to_string(), None)
    }

    /// 写入内置样例名册（25 列车）的测试环境
    pub fn seeded() -> Result<Self, String> {
        let env = Self::new()?;
        env.state
            .fleet_api
            .seed_initial_roster_if_empty()
            .map_err(|e| format!("写入样例名册失败: {}", e))?;
        Ok(env)
    }

    fn build(db_path: String, temp_file: Option<NamedTempFile>) -> Result<Self, String> {
        metro_induction::logging::init_test();

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let publisher = CallbackEventPublisher::new(move |event: &FleetEvent| {
            sink.lock().unwrap().push(event.clone());
        });

        let state = AppState::new_with_publisher(db_path.clone(), Arc::new(publisher))?;

        Ok(Self {
            db_path,
            state,
            events,
            _temp_file: temp_file,
        })
    }

    /// 已发布事件（按发布顺序）
    pub fn events(&self) -> Vec<FleetEvent> {
        self.events.lock().unwrap().clone()
    }

    /// 已发布事件的通知文案
    pub fn event_messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .map(|e| e.notification.message)
            .collect()
    }

    pub fn clear_events(&self) {
        self.events.lock().unwrap().clear();
    }

    /// 通过独立连接直接执行 SQL（仅文件库环境）
    pub fn execute_sql(&self, sql: &str) {
        let conn = metro_induction::db::open_sqlite_connection(&self.db_path)
            .expect("无法打开测试数据库");
        conn.execute_batch(sql).expect("执行 SQL 失败");
    }
}
