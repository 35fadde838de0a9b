// ==========================================
// 地铁车队投运排程系统 - 车队设置
// ==========================================
// 职责: 看板设置项的强类型表示与校验
// 存储: config_kv 表 (由 ConfigManager 读写)
// ==========================================

use crate::engine::simulation::PriorityStrategy;
use serde::{Deserialize, Serialize};

/// 期望投运数量的取值范围（看板数字控件）
pub const MIN_SERVICE_COUNT: u32 = 1;
pub const MAX_SERVICE_COUNT: u32 = 12;

/// 检修告警窗口上限（天）
pub const MAX_ALERT_WINDOW_DAYS: i64 = 90;

/// 历史保留上限的取值范围
pub const MIN_PLAN_HISTORY_CAP: usize = 1;
pub const MAX_PLAN_HISTORY_CAP: usize = 100;
pub const MIN_NOTIFICATION_CAP: usize = 1;
pub const MAX_NOTIFICATION_CAP: usize = 500;

pub const SUPPORTED_LANGUAGES: [&str; 2] = ["en", "zh-CN"];

// ==========================================
// FleetSettings - 车队设置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetSettings {
    pub default_service_count: u32,
    pub notifications_enabled: bool,
    pub maintenance_alerts_enabled: bool,
    pub alert_window_days: i64,
    pub high_priority_days: i64,
    pub plan_history_cap: usize,
    pub notification_cap: usize,
    pub default_strategy: PriorityStrategy,
    pub default_depot: String,
    pub language: String,
}

impl Default for FleetSettings {
    fn default() -> Self {
        Self {
            default_service_count: 6,
            notifications_enabled: true,
            maintenance_alerts_enabled: true,
            alert_window_days: 7,
            high_priority_days: 3,
            plan_history_cap: 20,
            notification_cap: 30,
            default_strategy: PriorityStrategy::Balanced,
            default_depot: "muttom".to_string(),
            language: "en".to_string(),
        }
    }
}

impl FleetSettings {
    /// 校验设置
    ///
    /// # 返回
    /// - `Ok(())`: 设置有效
    /// - `Err(String)`: 第一个不合法字段的描述
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_SERVICE_COUNT..=MAX_SERVICE_COUNT).contains(&self.default_service_count) {
            return Err(format!(
                "default_service_count 必须在 [{}, {}] 范围内: {}",
                MIN_SERVICE_COUNT, MAX_SERVICE_COUNT, self.default_service_count
            ));
        }
        if !(0..=MAX_ALERT_WINDOW_DAYS).contains(&self.alert_window_days) {
            return Err(format!(
                "alert_window_days 必须在 [0, {}] 范围内: {}",
                MAX_ALERT_WINDOW_DAYS, self.alert_window_days
            ));
        }
        if self.high_priority_days < 0 || self.high_priority_days > self.alert_window_days {
            return Err(format!(
                "high_priority_days 必须在 [0, alert_window_days] 范围内: {}",
                self.high_priority_days
            ));
        }
        if !(MIN_PLAN_HISTORY_CAP..=MAX_PLAN_HISTORY_CAP).contains(&self.plan_history_cap) {
            return Err(format!(
                "plan_history_cap 必须在 [{}, {}] 范围内: {}",
                MIN_PLAN_HISTORY_CAP, MAX_PLAN_HISTORY_CAP, self.plan_history_cap
            ));
        }
        if !(MIN_NOTIFICATION_CAP..=MAX_NOTIFICATION_CAP).contains(&self.notification_cap) {
            return Err(format!(
                "notification_cap 必须在 [{}, {}] 范围内: {}",
                MIN_NOTIFICATION_CAP, MAX_NOTIFICATION_CAP, self.notification_cap
            ));
        }
        if self.default_depot.trim().is_empty() {
            return Err("default_depot 不能为空".to_string());
        }
        if !SUPPORTED_LANGUAGES.contains(&self.language.as_str()) {
            return Err(format!("不支持的语言: {}", self.language));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = FleetSettings::default();
        assert_eq!(settings.default_service_count, 6);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_service_count_range() {
        let mut settings = FleetSettings::default();
        settings.default_service_count = 0;
        assert!(settings.validate().is_err());
        settings.default_service_count = 13;
        assert!(settings.validate().is_err());
        settings.default_service_count = 12;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_high_priority_must_fit_window() {
        let settings = FleetSettings {
            alert_window_days: 5,
            high_priority_days: 6,
            ..Default::default()
        };
        assert!(settings.validate().unwrap_err().contains("high_priority_days"));
    }

    #[test]
    fn test_unknown_language_rejected() {
        let settings = FleetSettings {
            language: "fr".to_string(),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
