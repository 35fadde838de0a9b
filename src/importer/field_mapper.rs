// ==========================================
// 地铁车队投运排程系统 - 字段映射器实现
// ==========================================
// 职责: 原始行 → TrainRecord (别名识别 + 类型转换)
// 红线: 名册形状在此边界完成校验,下游只接收强类型记录
// ==========================================

use crate::domain::train::{TrainRecord, DEFAULT_TRAIN_CAPACITY};
use crate::domain::types::{MaintenancePriority, TrainStatus};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;
use chrono::{NaiveDate, Utc};

pub struct FieldMapper;

impl FieldMapper {
    /// 映射单行
    ///
    /// # 必填
    /// train_id / train_name / next_maintenance
    ///
    /// # 缺省
    /// status=Standby, fitness_clearance=yes, job_card_open=no, needs_cleaning=no
    pub fn map_row(&self, row: &RawRow, row_number: usize) -> ImportResult<TrainRecord> {
        let train_id = self.require(row, "train_id", row_number)?;
        let train_name = self.require(row, "train_name", row_number)?;

        let next_raw = self.require(row, "next_maintenance", row_number)?;
        let next_maintenance_date = Self::parse_date_value(&next_raw)
            .ok_or_else(|| ImportError::DateFormatError {
                row: row_number,
                field: "next_maintenance".to_string(),
                value: next_raw.clone(),
            })?;

        let status = match self.get_string(row, "status") {
            None => TrainStatus::Standby,
            Some(raw) => TrainStatus::parse(&raw).ok_or_else(|| ImportError::TypeConversionError {
                row: row_number,
                field: "status".to_string(),
                message: format!("未知列车状态: {}", raw),
            })?,
        };

        let maintenance_priority = match self.get_string(row, "maintenance_priority") {
            None => MaintenancePriority::Low,
            Some(raw) => MaintenancePriority::parse(&raw).ok_or_else(|| {
                ImportError::TypeConversionError {
                    row: row_number,
                    field: "maintenance_priority".to_string(),
                    message: format!("未知检修优先级: {}", raw),
                }
            })?,
        };

        Ok(TrainRecord {
            train_id,
            train_name,
            status,
            mileage: self.parse_u32(row, "mileage", row_number)?.unwrap_or(0),
            fitness_clearance: self
                .parse_flag(row, "fitness_clearance", row_number)?
                .unwrap_or(true),
            open_job_card: self
                .parse_flag(row, "job_card_open", row_number)?
                .unwrap_or(false),
            needs_cleaning: self
                .parse_flag(row, "needs_cleaning", row_number)?
                .unwrap_or(false),
            maintenance_priority,
            next_maintenance_date,
            last_maintenance_date: self.parse_date(row, "last_maintenance", row_number)?,
            branding: self.get_string(row, "branding"),
            stabling_bay: self.get_string(row, "stabling_bay"),
            route: self.get_string(row, "route"),
            current_location: self.get_string(row, "current_location"),
            operational_hours: self
                .parse_u32(row, "operational_hours", row_number)?
                .unwrap_or(0),
            capacity: self
                .parse_u32(row, "capacity", row_number)?
                .unwrap_or(DEFAULT_TRAIN_CAPACITY),
            updated_at: Utc::now(),
        })
    }

    /// 提取字符串字段,支持别名,空白视为缺失
    fn get_string(&self, row: &RawRow, key: &str) -> Option<String> {
        let aliases: &[&str] = match key {
            "train_id" => &["train_id", "trainId", "id"],
            "train_name" => &["train_name", "trainName", "name"],
            "fitness_clearance" => &["fitness_clearance", "fitnessClearance"],
            "job_card_open" => &["job_card_open", "open_job_card", "openJobCard"],
            "needs_cleaning" => &["needs_cleaning", "needsCleaning"],
            "maintenance_priority" => &["maintenance_priority", "maintenancePriority"],
            "next_maintenance" => &["next_maintenance", "next_maintenance_date", "nextMaintenanceDate"],
            "last_maintenance" => &["last_maintenance", "last_maintenance_date", "lastMaintenanceDate"],
            "stabling_bay" => &["stabling_bay", "stablingBay"],
            "current_location" => &["current_location", "currentLocation"],
            "operational_hours" => &["operational_hours", "operationalHours"],
            _ => &[],
        };

        let fallback = [key];
        let candidates: &[&str] = if aliases.is_empty() { &fallback } else { aliases };

        for alias in candidates {
            if let Some(v) = row.get(*alias) {
                let trimmed = v.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
        None
    }

    fn require(&self, row: &RawRow, key: &str, row_number: usize) -> ImportResult<String> {
        self.get_string(row, key).ok_or_else(|| ImportError::MissingField {
            row: row_number,
            field: key.to_string(),
        })
    }

    fn parse_u32(&self, row: &RawRow, key: &str, row_number: usize) -> ImportResult<Option<u32>> {
        match self.get_string(row, key) {
            None => Ok(None),
            Some(value) => value
                .parse::<u32>()
                .map(Some)
                .map_err(|_| ImportError::TypeConversionError {
                    row: row_number,
                    field: key.to_string(),
                    message: format!("无法解析为非负整数: {}", value),
                }),
        }
    }

    /// 解析布尔标志: yes/no、true/false、1/0、y/n
    fn parse_flag(&self, row: &RawRow, key: &str, row_number: usize) -> ImportResult<Option<bool>> {
        match self.get_string(row, key) {
            None => Ok(None),
            Some(value) => match value.to_lowercase().as_str() {
                "yes" | "y" | "true" | "1" => Ok(Some(true)),
                "no" | "n" | "false" | "0" => Ok(Some(false)),
                _ => Err(ImportError::TypeConversionError {
                    row: row_number,
                    field: key.to_string(),
                    message: format!("无法解析为布尔值: {}", value),
                }),
            },
        }
    }

    fn parse_date(&self, row: &RawRow, key: &str, row_number: usize) -> ImportResult<Option<NaiveDate>> {
        match self.get_string(row, key) {
            None => Ok(None),
            Some(value) => Self::parse_date_value(&value)
                .map(Some)
                .ok_or(ImportError::DateFormatError {
                    row: row_number,
                    field: key.to_string(),
                    value,
                }),
        }
    }

    /// 日期: YYYY-MM-DD,兼容 YYYYMMDD 与 YYYY/MM/DD
    fn parse_date_value(value: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(value, "%Y%m%d"))
            .or_else(|_| NaiveDate::parse_from_str(value, "%Y/%m/%d"))
            .ok()
    }
}
