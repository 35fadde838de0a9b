// ==========================================
// 地铁车队投运排程系统 - 领域类型定义
// ==========================================
// 职责: 列车状态、检修优先级、告警等级、通知类型
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 列车状态 (Train Status)
// ==========================================
// 红线: 只能由排程方案落地或人工覆写修改
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrainStatus {
    InService,   // 投入运营
    Standby,     // 备用
    Maintenance, // 检修扣车
}

impl fmt::Display for TrainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl TrainStatus {
    /// 从字符串解析状态
    ///
    /// 兼容看板旧数据中的 "Service" 写法
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().replace([' ', '-'], "_").as_str() {
            "IN_SERVICE" | "INSERVICE" | "SERVICE" => Some(TrainStatus::InService),
            "STANDBY" => Some(TrainStatus::Standby),
            "MAINTENANCE" => Some(TrainStatus::Maintenance),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            TrainStatus::InService => "IN_SERVICE",
            TrainStatus::Standby => "STANDBY",
            TrainStatus::Maintenance => "MAINTENANCE",
        }
    }

    /// 展示名称（通知文案使用）
    pub fn label(&self) -> &'static str {
        match self {
            TrainStatus::InService => "Service",
            TrainStatus::Standby => "Standby",
            TrainStatus::Maintenance => "Maintenance",
        }
    }
}

// ==========================================
// 检修优先级 (Maintenance Priority)
// ==========================================
// 仅用于告警推导,不直接参与可投运判定
// 顺序: Low < Medium < High
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenancePriority {
    Low,
    Medium,
    High,
}

impl fmt::Display for MaintenancePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl MaintenancePriority {
    /// 从字符串解析优先级
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "LOW" => Some(MaintenancePriority::Low),
            "MEDIUM" => Some(MaintenancePriority::Medium),
            "HIGH" => Some(MaintenancePriority::High),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            MaintenancePriority::Low => "LOW",
            MaintenancePriority::Medium => "MEDIUM",
            MaintenancePriority::High => "HIGH",
        }
    }
}

// ==========================================
// 告警等级 (Alert Priority)
// ==========================================
// 顺序: Medium < High
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertPriority {
    Medium,
    High,
}

impl fmt::Display for AlertPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertPriority::Medium => write!(f, "MEDIUM"),
            AlertPriority::High => write!(f, "HIGH"),
        }
    }
}

// ==========================================
// 告警类别 (Alert Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertCategory {
    Maintenance,   // 检修
    Certification, // 适用性证书
    Cleaning,      // 清洁
}

impl fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertCategory::Maintenance => write!(f, "MAINTENANCE"),
            AlertCategory::Certification => write!(f, "CERTIFICATION"),
            AlertCategory::Cleaning => write!(f, "CLEANING"),
        }
    }
}

// ==========================================
// 通知类型 (Notification Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    Info,
    Success,
    Warning,
    Alert,
    Error,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl NotificationType {
    /// 从字符串解析通知类型（未知值回落为 INFO）
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "SUCCESS" => NotificationType::Success,
            "WARNING" => NotificationType::Warning,
            "ALERT" => NotificationType::Alert,
            "ERROR" => NotificationType::Error,
            _ => NotificationType::Info,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            NotificationType::Info => "INFO",
            NotificationType::Success => "SUCCESS",
            NotificationType::Warning => "WARNING",
            NotificationType::Alert => "ALERT",
            NotificationType::Error => "ERROR",
        }
    }
}
