// ==========================================
// 咖啡售货亭配置器 - 表格导出器
// ==========================================

use crate::domain::types::EntityKind;
use crate::i18n::t;
use crate::repository::tabular_repo::TabularRowRepository;
use crate::tabular::error::TabularResult;
use crate::tabular::file_parser::TabularFormat;
use crate::tabular::schema::TableSchema;
use crate::tabular::writer::write_table;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// 导出结果
#[derive(Debug, Clone)]
pub struct ExportOutput {
    pub content: Vec<u8>,
    pub rows: usize,
}

pub struct CatalogTableExporter {
    rows_repo: Arc<TabularRowRepository>,
}

impl CatalogTableExporter {
    pub fn new(rows_repo: Arc<TabularRowRepository>) -> Self {
        Self { rows_repo }
    }

    /// 导出为内存内容（工作表名为本地化复数名）
    #[instrument(skip(self))]
    pub fn export_bytes(&self, kind: EntityKind, format: TabularFormat) -> TabularResult<ExportOutput> {
        let schema = TableSchema::for_kind(kind);
        let rows = self.rows_repo.export_rows(&schema)?;
        let label = t(&kind.plural_label_key());
        let content = write_table(format, &label, &schema.column_names(), &rows)?;
        info!(kind = %kind, rows = rows.len(), bytes = content.len(), "导出完成");
        Ok(ExportOutput {
            content,
            rows: rows.len(),
        })
    }

    /// 导出到文件（格式由扩展名决定）
    pub fn export_file(&self, kind: EntityKind, path: &Path) -> TabularResult<usize> {
        let format = TabularFormat::from_path(path)?;
        let output = self.export_bytes(kind, format)?;
        std::fs::write(path, &output.content)?;
        Ok(output.rows)
    }
}
