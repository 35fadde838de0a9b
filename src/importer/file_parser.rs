// ==========================================
// 地铁车队投运排程系统 - 文件解析器实现
// ==========================================
// 职责: 文件 → 原始行记录 (HashMap<列名, 值>)
// 支持: JSON (.json, 对象数组) / CSV (.csv, 首行表头)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 原始行记录
pub type RawRow = HashMap<String, String>;

/// 文件解析器
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行记录
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 从任意读取器解析（文件 / 内存字符串）
    pub fn parse_reader<R: std::io::Read>(&self, reader: R) -> ImportResult<Vec<RawRow>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row_map = HashMap::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(row_map);
        }

        Ok(records)
    }
}

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        ensure_exists(file_path)?;
        let file = File::open(file_path)?;
        self.parse_reader(file)
    }
}

// ==========================================
// JSON Parser 实现
// ==========================================
pub struct JsonParser;

impl JsonParser {
    /// 解析 JSON 文本（顶层必须是对象数组）
    ///
    /// 标量统一转为字符串,null 视为缺失,嵌套对象/数组忽略
    pub fn parse_str(&self, content: &str) -> ImportResult<Vec<RawRow>> {
        let value: Value = serde_json::from_str(content)?;
        let items = match value {
            Value::Array(items) => items,
            _ => {
                return Err(ImportError::JsonParseError(
                    "顶层必须是对象数组".to_string(),
                ))
            }
        };

        let mut records = Vec::with_capacity(items.len());
        for (idx, item) in items.into_iter().enumerate() {
            let object = match item {
                Value::Object(map) => map,
                other => {
                    return Err(ImportError::JsonParseError(format!(
                        "第 {} 项不是对象: {}",
                        idx + 1,
                        other
                    )))
                }
            };

            let mut row_map = HashMap::new();
            for (key, value) in object {
                let text = match value {
                    Value::String(s) => s.trim().to_string(),
                    Value::Bool(b) => b.to_string(),
                    Value::Number(n) => n.to_string(),
                    Value::Null | Value::Array(_) | Value::Object(_) => continue,
                };
                row_map.insert(key, text);
            }
            records.push(row_map);
        }

        Ok(records)
    }
}

impl FileParser for JsonParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        ensure_exists(file_path)?;
        let content = std::fs::read_to_string(file_path)?;
        self.parse_str(&content)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<RawRow>> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_to_raw_records(path),
            "json" => JsonParser.parse_to_raw_records(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_csv_parser_skips_blank_rows() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "train_id,train_name,mileage").unwrap();
        writeln!(temp_file, "T-001, Metro Express ,100").unwrap();
        writeln!(temp_file, ",,").unwrap();
        writeln!(temp_file, "T-002,Marine Drive,200").unwrap();

        let records = CsvParser.parse_to_raw_records(temp_file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("train_name"), Some(&"Metro Express".to_string()));
        assert_eq!(records[1].get("mileage"), Some(&"200".to_string()));
    }

    #[test]
    fn test_json_parser_stringifies_scalars() {
        let records = JsonParser
            .parse_str(r#"[{"train_id":"T-001","mileage":12450,"needs_cleaning":false,"branding":null}]"#)
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("mileage"), Some(&"12450".to_string()));
        assert_eq!(records[0].get("needs_cleaning"), Some(&"false".to_string()));
        assert!(records[0].get("branding").is_none());
    }

    #[test]
    fn test_json_parser_rejects_non_array() {
        assert!(matches!(
            JsonParser.parse_str(r#"{"train_id":"T-001"}"#),
            Err(ImportError::JsonParseError(_))
        ));
    }

    #[test]
    fn test_universal_parser_rejects_unknown_extension() {
        let temp_file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let result = UniversalFileParser.parse(temp_file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = UniversalFileParser.parse("does_not_exist.csv");
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }
}
