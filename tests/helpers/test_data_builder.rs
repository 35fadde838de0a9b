// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::NaiveDate;
use metro_induction::domain::train::TrainRecord;
use metro_induction::domain::types::{MaintenancePriority, TrainStatus};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ==========================================
// TrainRecord 构建器
// ==========================================
// 缺省: 备用、所有门槛通过、走行 0、下次检修 2026-03-01

pub struct TrainBuilder {
    train: TrainRecord,
}

impl TrainBuilder {
    pub fn new(train_id: &str) -> Self {
        Self {
            train: TrainRecord::new(train_id, &format!("Train {}", train_id), date(2026, 3, 1)),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.train.train_name = name.to_string();
        self
    }

    pub fn status(mut self, status: TrainStatus) -> Self {
        self.train.status = status;
        self
    }

    pub fn mileage(mut self, mileage: u32) -> Self {
        self.train.mileage = mileage;
        self
    }

    pub fn fitness(mut self, clearance: bool) -> Self {
        self.train.fitness_clearance = clearance;
        self
    }

    pub fn job_card_open(mut self, open: bool) -> Self {
        self.train.open_job_card = open;
        self
    }

    pub fn needs_cleaning(mut self, needs: bool) -> Self {
        self.train.needs_cleaning = needs;
        self
    }

    pub fn priority(mut self, priority: MaintenancePriority) -> Self {
        self.train.maintenance_priority = priority;
        self
    }

    pub fn next_maintenance(mut self, next: NaiveDate) -> Self {
        self.train.next_maintenance_date = next;
        self
    }

    pub fn build(self) -> TrainRecord {
        self.train
    }
}

/// 可投运的候选列车
pub fn eligible(train_id: &str, mileage: u32) -> TrainRecord {
    TrainBuilder::new(train_id).mileage(mileage).build()
}

pub fn ids(trains: &[&str]) -> Vec<String> {
    trains.iter().map(|s| s.to_string()).collect()
}
