// ==========================================
// 地铁车队投运排程系统 - 通知领域模型
// ==========================================
// 对齐: notification 表
// ==========================================

use crate::domain::types::NotificationType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Notification - 通知
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub notification_id: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

impl Notification {
    /// 创建新的未读通知
    pub fn new(message: String, notification_type: NotificationType) -> Self {
        Self {
            notification_id: uuid::Uuid::new_v4().to_string(),
            message,
            notification_type,
            created_at: Utc::now(),
            is_read: false,
        }
    }
}

// ==========================================
// NotificationFilter - 通知过滤条件
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationFilter {
    pub notification_type: Option<NotificationType>, // None 表示全部
    pub search: Option<String>,                      // 文案包含（忽略大小写）
    pub include_read: bool,
}

impl Default for NotificationFilter {
    fn default() -> Self {
        Self {
            notification_type: None,
            search: None,
            include_read: true,
        }
    }
}

impl NotificationFilter {
    /// 判断通知是否命中过滤条件
    pub fn matches(&self, n: &Notification) -> bool {
        if let Some(t) = self.notification_type {
            if n.notification_type != t {
                return false;
            }
        }
        if let Some(ref term) = self.search {
            if !n.message.to_lowercase().contains(&term.to_lowercase()) {
                return false;
            }
        }
        self.include_read || !n.is_read
    }
}

// ==========================================
// NotificationStats - 通知统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationStats {
    pub total: usize,
    pub unread: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl NotificationStats {
    pub fn from_notifications(items: &[Notification]) -> Self {
        Self {
            total: items.len(),
            unread: items.iter().filter(|n| !n.is_read).count(),
            errors: items
                .iter()
                .filter(|n| n.notification_type == NotificationType::Error)
                .count(),
            warnings: items
                .iter()
                .filter(|n| n.notification_type == NotificationType::Warning)
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_by_type_search_and_read_flag() {
        let mut read = Notification::new("Train T-001 added".to_string(), NotificationType::Info);
        read.is_read = true;
        let warn = Notification::new("Optimizer run: Service=0".to_string(), NotificationType::Warning);

        let filter = NotificationFilter {
            notification_type: None,
            search: Some("TRAIN".to_string()),
            include_read: true,
        };
        assert!(filter.matches(&read));
        assert!(!filter.matches(&warn));

        let unread_only = NotificationFilter {
            include_read: false,
            ..Default::default()
        };
        assert!(!unread_only.matches(&read));
        assert!(unread_only.matches(&warn));

        let warnings = NotificationFilter {
            notification_type: Some(NotificationType::Warning),
            ..Default::default()
        };
        assert!(warnings.matches(&warn));
        assert!(!warnings.matches(&read));
    }

    #[test]
    fn test_stats() {
        let mut a = Notification::new("a".to_string(), NotificationType::Error);
        a.is_read = true;
        let b = Notification::new("b".to_string(), NotificationType::Warning);
        let c = Notification::new("c".to_string(), NotificationType::Info);

        let stats = NotificationStats::from_notifications(&[a, b, c]);
        assert_eq!(
            stats,
            NotificationStats {
                total: 3,
                unread: 2,
                errors: 1,
                warnings: 1
            }
        );
    }
}
