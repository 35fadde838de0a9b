// ==========================================
// 地铁车队投运排程系统 - 名册导入器
// ==========================================
// 职责: 文件 / 内置样例 → 校验后的名册
// 流程: 解析 → 字段映射 → 编号去重
// 红线: 任一行失败则整体失败,不返回部分名册
// ==========================================

use crate::domain::train::TrainRecord;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::{CsvParser, JsonParser, RawRow, UniversalFileParser};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, instrument};

/// 内置样例名册（25 列车）
const INITIAL_ROSTER_JSON: &str = include_str!("../../fixtures/initial_roster.json");

pub struct RosterImporter {
    parser: UniversalFileParser,
    mapper: FieldMapper,
}

impl Default for RosterImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RosterImporter {
    pub fn new() -> Self {
        Self {
            parser: UniversalFileParser,
            mapper: FieldMapper,
        }
    }

    /// 从文件导入名册（.json / .csv）
    #[instrument(skip(self, file_path), fields(path = %file_path.as_ref().display()))]
    pub fn import_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<TrainRecord>> {
        let rows = self.parser.parse(file_path.as_ref())?;
        let trains = self.map_rows(&rows)?;
        info!(train_count = trains.len(), "名册文件导入完成");
        Ok(trains)
    }

    /// 从 JSON 文本导入
    pub fn import_json_str(&self, content: &str) -> ImportResult<Vec<TrainRecord>> {
        let rows = JsonParser.parse_str(content)?;
        self.map_rows(&rows)
    }

    /// 从 CSV 文本导入
    pub fn import_csv_str(&self, content: &str) -> ImportResult<Vec<TrainRecord>> {
        let rows = CsvParser.parse_reader(content.as_bytes())?;
        self.map_rows(&rows)
    }

    /// 加载内置样例名册
    pub fn load_initial_roster(&self) -> ImportResult<Vec<TrainRecord>> {
        self.import_json_str(INITIAL_ROSTER_JSON)
    }

    /// 映射并校验编号唯一（行号从 1 开始）
    fn map_rows(&self, rows: &[RawRow]) -> ImportResult<Vec<TrainRecord>> {
        let mut seen = HashSet::with_capacity(rows.len());
        let mut trains = Vec::with_capacity(rows.len());

        for (idx, row) in rows.iter().enumerate() {
            let row_number = idx + 1;
            let train = self.mapper.map_row(row, row_number)?;
            if !seen.insert(train.train_id.clone()) {
                return Err(ImportError::DuplicateTrainId {
                    row: row_number,
                    train_id: train.train_id,
                });
            }
            trains.push(train);
        }

        Ok(trains)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::TrainStatus;
    use std::io::Write;

    #[test]
    fn test_initial_roster_loads() {
        let trains = RosterImporter::new().load_initial_roster().unwrap();
        assert_eq!(trains.len(), 25);
        assert_eq!(trains[0].train_id, "T-001");
        assert_eq!(trains[0].status, TrainStatus::InService);
        assert_eq!(trains[24].train_id, "T-025");
        assert_eq!(trains.iter().filter(|t| !t.fitness_clearance).count(), 5);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let csv = "train_id,train_name,next_maintenance\nT-1,A,2026-01-01\nT-1,B,2026-01-02\n";
        let err = RosterImporter::new().import_csv_str(csv).unwrap_err();
        assert!(matches!(err, ImportError::DuplicateTrainId { row: 2, .. }));
    }

    #[test]
    fn test_import_csv_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "train_id,train_name,status,mileage,fitness_clearance,job_card_open,needs_cleaning,next_maintenance").unwrap();
        writeln!(file, "T-101,Alpha,Standby,300,yes,no,no,2026-05-01").unwrap();
        writeln!(file, "T-102,Beta,Maintenance,100,no,yes,yes,2026-05-02").unwrap();

        let trains = RosterImporter::new().import_file(file.path()).unwrap();
        assert_eq!(trains.len(), 2);
        assert_eq!(trains[1].status, TrainStatus::Maintenance);
        assert!(!trains[1].fitness_clearance);
    }
}
