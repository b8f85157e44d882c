// ==========================================
// 咖啡售货亭配置器 - 表格导入导出层
// ==========================================
// 职责: 目录/颜色表的整表导出与按主键 upsert 的批量导入
// 支持: Excel (.xlsx), CSV
// ==========================================

pub mod cell;
pub mod converter;
pub mod error;
pub mod exporter;
pub mod file_parser;
pub mod importer;
pub mod schema;
pub mod writer;

use serde::{Deserialize, Serialize};

/// 导入汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

// 重导出核心类型
pub use cell::{CellValue, FieldValue};
pub use converter::{convert_cell, convert_row, parse_bool_text, ConvertedRow, TRUE_TOKENS};
pub use error::{TabularError, TabularResult};
pub use exporter::{CatalogTableExporter, ExportOutput};
pub use file_parser::{parse_bytes, parse_file, RawRow, TabularFormat};
pub use importer::{CatalogTableImporter, TabularImporter};
pub use schema::{ColumnDef, ColumnKind, TableSchema};
pub use writer::{write_csv, write_table, write_xlsx};
