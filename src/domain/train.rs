// ==========================================
// 地铁车队投运排程系统 - 列车领域模型
// ==========================================
// 职责: 列车档案 (TrainRecord) 与人工编辑补丁 (TrainPatch)
// 对齐: train 表
// ==========================================

use crate::domain::types::{MaintenancePriority, TrainStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// TrainRecord - 列车档案
// ==========================================
// 红线: train_id 创建后不可变
// 红线: status 仅由方案落地或人工覆写修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainRecord {
    // ===== 主键 =====
    pub train_id: String,   // 列车编号 (如 T-001)
    pub train_name: String, // 展示名称,可重名

    // ===== 状态 =====
    pub status: TrainStatus,
    pub mileage: u32, // 距上次大修的走行公里

    // ===== 投运门槛 =====
    pub fitness_clearance: bool, // 适用性证书: false 时禁止投运
    pub open_job_card: bool,     // 未关闭工单: true 时禁止投运
    pub needs_cleaning: bool,    // 待清洁: true 时排程器不会选为投运

    // ===== 检修信息 =====
    pub maintenance_priority: MaintenancePriority,
    pub next_maintenance_date: NaiveDate,
    pub last_maintenance_date: Option<NaiveDate>,

    // ===== 运营信息 (展示用) =====
    pub branding: Option<String>,
    pub stabling_bay: Option<String>,
    pub route: Option<String>,
    pub current_location: Option<String>,
    pub operational_hours: u32,
    pub capacity: u32,

    pub updated_at: DateTime<Utc>,
}

/// 默认载客量（与看板新建列车表单一致）
pub const DEFAULT_TRAIN_CAPACITY: u32 = 375;

impl TrainRecord {
    /// 创建新的列车档案
    ///
    /// 新车默认: 备用状态、所有门槛通过、低检修优先级
    ///
    /// # 参数
    /// - `train_id`: 列车编号
    /// - `train_name`: 展示名称
    /// - `next_maintenance_date`: 下次检修日期
    pub fn new(train_id: &str, train_name: &str, next_maintenance_date: NaiveDate) -> Self {
        Self {
            train_id: train_id.to_string(),
            train_name: train_name.to_string(),
            status: TrainStatus::Standby,
            mileage: 0,
            fitness_clearance: true,
            open_job_card: false,
            needs_cleaning: false,
            maintenance_priority: MaintenancePriority::Low,
            next_maintenance_date,
            last_maintenance_date: None,
            branding: None,
            stabling_bay: None,
            route: None,
            current_location: None,
            operational_hours: 0,
            capacity: DEFAULT_TRAIN_CAPACITY,
            updated_at: Utc::now(),
        }
    }

    /// 距离下次检修的天数（负数表示已逾期）
    pub fn days_until_maintenance(&self, today: NaiveDate) -> i64 {
        self.next_maintenance_date
            .signed_duration_since(today)
            .num_days()
    }

    /// 应用编辑补丁
    ///
    /// # 返回
    /// - true: 补丁中包含 status 变更（人工覆写）
    pub fn apply_patch(&mut self, patch: &TrainPatch) -> bool {
        if let Some(ref name) = patch.train_name {
            self.train_name = name.clone();
        }
        if let Some(mileage) = patch.mileage {
            self.mileage = mileage;
        }
        if let Some(flag) = patch.fitness_clearance {
            self.fitness_clearance = flag;
        }
        if let Some(flag) = patch.open_job_card {
            self.open_job_card = flag;
        }
        if let Some(flag) = patch.needs_cleaning {
            self.needs_cleaning = flag;
        }
        if let Some(priority) = patch.maintenance_priority {
            self.maintenance_priority = priority;
        }
        if let Some(date) = patch.next_maintenance_date {
            self.next_maintenance_date = date;
        }
        if let Some(date) = patch.last_maintenance_date {
            self.last_maintenance_date = Some(date);
        }
        if let Some(ref v) = patch.branding {
            self.branding = Some(v.clone());
        }
        if let Some(ref v) = patch.stabling_bay {
            self.stabling_bay = Some(v.clone());
        }
        if let Some(ref v) = patch.route {
            self.route = Some(v.clone());
        }
        if let Some(ref v) = patch.current_location {
            self.current_location = Some(v.clone());
        }
        if let Some(hours) = patch.operational_hours {
            self.operational_hours = hours;
        }
        if let Some(capacity) = patch.capacity {
            self.capacity = capacity;
        }

        let status_changed = match patch.status {
            Some(status) if status != self.status => {
                self.status = status;
                true
            }
            _ => false,
        };

        self.updated_at = Utc::now();
        status_changed
    }
}

// ==========================================
// TrainPatch - 人工编辑补丁
// ==========================================
// 所有字段可选,None 表示保持原值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainPatch {
    pub train_name: Option<String>,
    pub status: Option<TrainStatus>,
    pub mileage: Option<u32>,
    pub fitness_clearance: Option<bool>,
    pub open_job_card: Option<bool>,
    pub needs_cleaning: Option<bool>,
    pub maintenance_priority: Option<MaintenancePriority>,
    pub next_maintenance_date: Option<NaiveDate>,
    pub last_maintenance_date: Option<NaiveDate>,
    pub branding: Option<String>,
    pub stabling_bay: Option<String>,
    pub route: Option<String>,
    pub current_location: Option<String>,
    pub operational_hours: Option<u32>,
    pub capacity: Option<u32>,
}

impl TrainPatch {
    /// 补丁是否为空
    pub fn is_empty(&self) -> bool {
        self.train_name.is_none()
            && self.status.is_none()
            && self.mileage.is_none()
            && self.fitness_clearance.is_none()
            && self.open_job_card.is_none()
            && self.needs_cleaning.is_none()
            && self.maintenance_priority.is_none()
            && self.next_maintenance_date.is_none()
            && self.last_maintenance_date.is_none()
            && self.branding.is_none()
            && self.stabling_bay.is_none()
            && self.route.is_none()
            && self.current_location.is_none()
            && self.operational_hours.is_none()
            && self.capacity.is_none()
    }
}

// ==========================================
// 列表排序键
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterSortKey {
    TrainId,
    TrainName,
    Mileage,
    Status,
    NextMaintenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}
