// ==========================================
// 地铁车队投运排程系统 - 导入层
// ==========================================
// 职责: 外部名册数据导入,生成强类型列车档案
// 支持: JSON, CSV, 内置样例
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod roster_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, FileParser, JsonParser, RawRow, UniversalFileParser};
pub use roster_importer::RosterImporter;
