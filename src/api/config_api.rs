// ==========================================
// 地铁车队投运排程系统 - 设置与通知 API
// ==========================================
// 职责: 车队设置查询、更新、重置、快照管理;通知日志管理
// 红线: 设置先校验后写入,不合法设置不落库
// ==========================================

use std::sync::Arc;
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::api::notifier::FleetNotifier;
use crate::config::config_manager::ConfigManager;
use crate::config::settings::FleetSettings;
use crate::domain::notification::{Notification, NotificationFilter, NotificationStats};
use crate::domain::types::NotificationType;
use crate::engine::events::FleetEventType;
use crate::repository::notification_repo::NotificationRepository;

// ==========================================
// ConfigApi - 设置与通知 API
// ==========================================

/// 设置与通知API
///
/// 职责：
/// 1. 设置查询、更新（校验）、重置
/// 2. 设置快照与恢复
/// 3. 通知日志查询、已读标记、删除
pub struct ConfigApi {
    config_manager: Arc<ConfigManager>,
    notification_repo: Arc<NotificationRepository>,
    notifier: Arc<FleetNotifier>,
}

impl ConfigApi {
    /// 创建新的ConfigApi实例
    pub fn new(
        config_manager: Arc<ConfigManager>,
        notification_repo: Arc<NotificationRepository>,
        notifier: Arc<FleetNotifier>,
    ) -> Self {
        Self {
            config_manager,
            notification_repo,
            notifier,
        }
    }

    // ==========================================
    // 设置
    // ==========================================

    /// 查询设置（缺失项取默认值）
    pub fn get_settings(&self) -> ApiResult<FleetSettings> {
        self.config_manager
            .load_settings()
            .map_err(|e| ApiError::DatabaseError(e.to_string()))
    }

    /// 更新设置
    ///
    /// # 返回
    /// - Err(ValidationError): 设置不合法,不写入
    #[instrument(skip(self, settings))]
    pub fn update_settings(&self, settings: &FleetSettings) -> ApiResult<()> {
        settings.validate().map_err(ApiError::ValidationError)?;
        self.config_manager
            .save_settings(settings)
            .map_err(|e| ApiError::DatabaseTransactionError(e.to_string()))?;
        info!("车队设置已更新");

        self.emit_settings_changed("settings.updated");
        Ok(())
    }

    /// 重置设置为默认值
    pub fn reset_settings(&self) -> ApiResult<FleetSettings> {
        let removed = self
            .config_manager
            .reset_settings()
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        info!(removed, "车队设置已重置");

        self.emit_settings_changed("settings.reset");
        Ok(FleetSettings::default())
    }

    /// 获取配置快照（JSON）
    pub fn get_config_snapshot(&self) -> ApiResult<String> {
        self.config_manager
            .get_config_snapshot()
            .map_err(|e| ApiError::DatabaseError(e.to_string()))
    }

    /// 从配置快照恢复
    ///
    /// # 返回
    /// - 恢复的配置项数量
    /// - Err(ValidationError): 快照不是合法 JSON 对象,或还原出的设置未通过校验（无任何写入）
    pub fn restore_config_snapshot(&self, snapshot_json: &str) -> ApiResult<usize> {
        let config_map =
            serde_json::from_str::<std::collections::HashMap<String, String>>(snapshot_json)
                .map_err(|e| ApiError::ValidationError(format!("配置快照格式错误: {}", e)))?;
        ConfigManager::settings_from_map(&config_map)
            .and_then(|settings| settings.validate())
            .map_err(|e| ApiError::ValidationError(format!("配置快照校验失败: {}", e)))?;

        let restored = self
            .config_manager
            .restore_config_from_snapshot(snapshot_json)
            .map_err(|e| ApiError::DatabaseTransactionError(e.to_string()))?;
        info!(restored, "配置已从快照恢复");

        self.emit_settings_changed("settings.restored");
        Ok(restored)
    }

    fn emit_settings_changed(&self, key: &str) {
        let event = self.notifier.notice(
            FleetEventType::SettingsChanged,
            NotificationType::Info,
            key,
            &[],
        );
        self.notifier.emit(event);
    }

    // ==========================================
    // 通知日志
    // ==========================================

    /// 全部通知（新 → 旧）
    pub fn list_notifications(&self) -> ApiResult<Vec<Notification>> {
        Ok(self.notification_repo.list_all()?)
    }

    /// 过滤通知
    pub fn filter_notifications(&self, filter: &NotificationFilter) -> ApiResult<Vec<Notification>> {
        Ok(self.notification_repo.list(filter)?)
    }

    pub fn notification_stats(&self) -> ApiResult<NotificationStats> {
        Ok(self.notification_repo.stats()?)
    }

    /// 标记已读
    ///
    /// # 返回
    /// - Err(NotFound): 通知不存在
    pub fn mark_notification_read(&self, notification_id: &str) -> ApiResult<()> {
        if !self.notification_repo.mark_read(notification_id)? {
            return Err(ApiError::NotFound(format!(
                "Notification(id={})不存在",
                notification_id
            )));
        }
        Ok(())
    }

    /// 全部标记已读
    pub fn mark_all_notifications_read(&self) -> ApiResult<usize> {
        Ok(self.notification_repo.mark_all_read()?)
    }

    /// 删除通知
    pub fn delete_notification(&self, notification_id: &str) -> ApiResult<()> {
        if !self.notification_repo.delete(notification_id)? {
            return Err(ApiError::NotFound(format!(
                "Notification(id={})不存在",
                notification_id
            )));
        }
        Ok(())
    }

    /// 清空通知
    pub fn clear_notifications(&self) -> ApiResult<usize> {
        Ok(self.notification_repo.clear()?)
    }
}
