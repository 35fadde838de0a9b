// ==========================================
// 地铁车队投运排程系统 - 看板 API
// ==========================================
// 职责: 车队统计、关键告警、检修到期告警、检修概览
// 红线: 只读投影,不写名册
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::ConfigManager;
use crate::domain::alert::{CriticalAlert, MaintenanceAlert};
use crate::domain::fleet::{FleetStats, MaintenanceOverview};
use crate::engine::alerts::{CriticalAlertEngine, MaintenanceAlertEngine};
use crate::engine::fleet_stats::FleetStatsEngine;
use crate::repository::train_repo::TrainRepository;

/// 看板聚合快照（同一名册快照计算）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub as_of: NaiveDate,
    pub stats: FleetStats,
    pub overview: MaintenanceOverview,
    pub critical_alerts: Vec<CriticalAlert>,
    pub maintenance_alerts: Vec<MaintenanceAlert>,
}

pub struct DashboardApi {
    train_repo: Arc<TrainRepository>,
    config_manager: Arc<ConfigManager>,
}

impl DashboardApi {
    pub fn new(train_repo: Arc<TrainRepository>, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            train_repo,
            config_manager,
        }
    }

    /// 车队统计
    pub fn fleet_stats(&self) -> ApiResult<FleetStats> {
        let roster = self.train_repo.list_all()?;
        Ok(FleetStatsEngine::compute(&roster))
    }

    /// 检修概览
    pub fn maintenance_overview(&self) -> ApiResult<MaintenanceOverview> {
        let roster = self.train_repo.list_all()?;
        Ok(FleetStatsEngine::maintenance_overview(&roster))
    }

    /// 看板关键告警
    pub fn critical_alerts(&self) -> ApiResult<Vec<CriticalAlert>> {
        let roster = self.train_repo.list_all()?;
        Ok(CriticalAlertEngine::derive_alerts(&roster))
    }

    /// 检修到期告警
    ///
    /// # 参数
    /// - today: 计算剩余天数的基准日期
    ///
    /// # 返回
    /// - 设置中关闭检修告警时返回空列表
    pub fn maintenance_alerts(&self, today: NaiveDate) -> ApiResult<Vec<MaintenanceAlert>> {
        let roster = self.train_repo.list_all()?;
        match self.alert_engine()? {
            Some(engine) => Ok(engine.derive_alerts(&roster, today)),
            None => Ok(Vec::new()),
        }
    }

    /// 看板聚合快照
    pub fn snapshot(&self, today: NaiveDate) -> ApiResult<DashboardSnapshot> {
        let roster = self.train_repo.list_all()?;
        let maintenance_alerts = match self.alert_engine()? {
            Some(engine) => engine.derive_alerts(&roster, today),
            None => Vec::new(),
        };

        Ok(DashboardSnapshot {
            as_of: today,
            stats: FleetStatsEngine::compute(&roster),
            overview: FleetStatsEngine::maintenance_overview(&roster),
            critical_alerts: CriticalAlertEngine::derive_alerts(&roster),
            maintenance_alerts,
        })
    }

    /// 按设置构造告警引擎,告警关闭时返回 None
    fn alert_engine(&self) -> ApiResult<Option<MaintenanceAlertEngine>> {
        let settings = self
            .config_manager
            .load_settings()
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        if !settings.maintenance_alerts_enabled {
            return Ok(None);
        }
        if let Err(reason) = settings.validate() {
            warn!(%reason, "告警设置不合法, 使用默认阈值");
            return Ok(Some(MaintenanceAlertEngine::new()));
        }
        Ok(Some(MaintenanceAlertEngine::with_thresholds(
            settings.alert_window_days,
            settings.high_priority_days,
        )))
    }
}
