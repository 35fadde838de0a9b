// ==========================================
// 地铁车队投运排程系统 - 车队事件发布
// ==========================================
// 职责: 定义车队事件发布 trait,解耦排程核心与提示展示
// 说明: API 层发布,调用方选择实现 (空操作 / 回调 / tokio 通道)
// ==========================================

use crate::domain::notification::Notification;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;
use tokio::sync::mpsc;

// ==========================================
// 车队事件类型
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FleetEventType {
    /// 排程完成并落地
    PlanGenerated,
    /// 历史方案重新落地
    PlanApplied,
    /// 仿真完成
    SimulationCompleted,
    TrainAdded,
    TrainUpdated,
    TrainRemoved,
    /// 人工批量覆写状态
    StatusOverridden,
    /// 名册重置或导入
    RosterReset,
    SettingsChanged,
}

impl FleetEventType {
    pub fn as_str(&self) -> &str {
        match self {
            FleetEventType::PlanGenerated => "PlanGenerated",
            FleetEventType::PlanApplied => "PlanApplied",
            FleetEventType::SimulationCompleted => "SimulationCompleted",
            FleetEventType::TrainAdded => "TrainAdded",
            FleetEventType::TrainUpdated => "TrainUpdated",
            FleetEventType::TrainRemoved => "TrainRemoved",
            FleetEventType::StatusOverridden => "StatusOverridden",
            FleetEventType::RosterReset => "RosterReset",
            FleetEventType::SettingsChanged => "SettingsChanged",
        }
    }
}

/// 车队事件
///
/// 携带已写入通知日志的通知,供调用方展示提示
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetEvent {
    pub event_type: FleetEventType,
    pub notification: Notification,
    /// 受影响的列车（None 表示未指定）
    pub affected_trains: Option<Vec<String>>,
    /// 关联的方案 ID
    pub plan_id: Option<String>,
}

impl FleetEvent {
    pub fn new(event_type: FleetEventType, notification: Notification) -> Self {
        Self {
            event_type,
            notification,
            affected_trains: None,
            plan_id: None,
        }
    }

    pub fn with_trains(mut self, trains: Vec<String>) -> Self {
        self.affected_trains = Some(trains);
        self
    }

    pub fn with_plan(mut self, plan_id: &str) -> Self {
        self.plan_id = Some(plan_id.to_string());
        self
    }
}

// ==========================================
// 事件发布 Trait
// ==========================================

/// 车队事件发布者
///
/// # 实现说明
/// - `NoOpEventPublisher`: 单元测试
/// - `CallbackEventPublisher`: 同步回调
/// - `ChannelEventPublisher`: tokio 通道,由异步任务消费
pub trait FleetEventPublisher: Send + Sync {
    fn publish(&self, event: FleetEvent) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// 空操作事件发布者
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

impl FleetEventPublisher for NoOpEventPublisher {
    fn publish(&self, event: FleetEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        tracing::debug!(
            "NoOpEventPublisher: 跳过事件发布 - event_type={}",
            event.event_type.as_str()
        );
        Ok(())
    }
}

/// 回调事件发布者
pub struct CallbackEventPublisher {
    callback: Box<dyn Fn(&FleetEvent) + Send + Sync>,
}

impl CallbackEventPublisher {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&FleetEvent) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }
}

impl FleetEventPublisher for CallbackEventPublisher {
    fn publish(&self, event: FleetEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        (self.callback)(&event);
        Ok(())
    }
}

/// tokio 通道事件发布者
///
/// 发送端不阻塞;接收端关闭后发布返回错误
#[derive(Debug, Clone)]
pub struct ChannelEventPublisher {
    tx: mpsc::UnboundedSender<FleetEvent>,
}

impl ChannelEventPublisher {
    /// 创建发布者与对应的接收端
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<FleetEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl FleetEventPublisher for ChannelEventPublisher {
    fn publish(&self, event: FleetEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.tx
            .send(event)
            .map_err(|e| -> Box<dyn Error + Send + Sync> {
                format!("事件通道已关闭: event_type={}", e.0.event_type.as_str()).into()
            })
    }
}

/// 可选的事件发布者包装
///
/// 简化 Option<Arc<dyn FleetEventPublisher>> 的使用
#[derive(Clone)]
pub struct OptionalEventPublisher {
    inner: Option<Arc<dyn FleetEventPublisher>>,
}

impl OptionalEventPublisher {
    pub fn with_publisher(publisher: Arc<dyn FleetEventPublisher>) -> Self {
        Self {
            inner: Some(publisher),
        }
    }

    /// 创建空实例（不发布事件）
    pub fn none() -> Self {
        Self { inner: None }
    }

    /// 发布事件（如果有发布者）
    pub fn publish(&self, event: FleetEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        match &self.inner {
            Some(publisher) => publisher.publish(event),
            None => {
                tracing::debug!(
                    "OptionalEventPublisher: 未配置发布者,跳过事件 - event_type={}",
                    event.event_type.as_str()
                );
                Ok(())
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}

impl Default for OptionalEventPublisher {
    fn default() -> Self {
        Self::none()
    }
}
