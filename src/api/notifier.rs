// ==========================================
// 地铁车队投运排程系统 - 通知派发
// ==========================================
// 职责: 写入通知日志 (按上限裁剪) + 发布车队事件
// 红线: 通知失败只记录告警,不回滚已完成的业务写入
// ==========================================

use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::config_manager::ConfigManager;
use crate::config::settings::FleetSettings;
use crate::domain::notification::Notification;
use crate::domain::types::NotificationType;
use crate::engine::events::{FleetEvent, FleetEventType, OptionalEventPublisher};
use crate::i18n;
use crate::repository::notification_repo::NotificationRepository;

pub struct FleetNotifier {
    notification_repo: Arc<NotificationRepository>,
    config_manager: Arc<ConfigManager>,
    event_publisher: OptionalEventPublisher,
}

impl FleetNotifier {
    pub fn new(
        notification_repo: Arc<NotificationRepository>,
        config_manager: Arc<ConfigManager>,
        event_publisher: OptionalEventPublisher,
    ) -> Self {
        Self {
            notification_repo,
            config_manager,
            event_publisher,
        }
    }

    fn settings(&self) -> FleetSettings {
        self.config_manager.load_settings().unwrap_or_else(|e| {
            warn!(error = %e, "读取设置失败, 通知使用默认设置");
            FleetSettings::default()
        })
    }

    /// 按设置中的语言构造事件
    ///
    /// # 参数
    /// - key: 文案键（locales/*.yml）
    /// - args: 文案参数
    pub fn notice(
        &self,
        event_type: FleetEventType,
        notification_type: NotificationType,
        key: &str,
        args: &[(&str, &str)],
    ) -> FleetEvent {
        let language = self.settings().language;
        let message = i18n::t_in(&language, key, args);
        FleetEvent::new(event_type, Notification::new(message, notification_type))
    }

    /// 记录并发布事件
    ///
    /// 通知关闭时仍写入日志,只跳过发布
    pub fn emit(&self, event: FleetEvent) {
        let settings = self.settings();

        if let Err(e) = self
            .notification_repo
            .insert(&event.notification, settings.notification_cap)
        {
            warn!(error = %e, event_type = event.event_type.as_str(), "写入通知日志失败");
        }

        if !settings.notifications_enabled {
            debug!(event_type = event.event_type.as_str(), "通知已关闭, 跳过事件发布");
            return;
        }

        let event_type = event.event_type;
        if let Err(e) = self.event_publisher.publish(event) {
            warn!(error = %e, event_type = event_type.as_str(), "车队事件发布失败");
        }
    }
}
