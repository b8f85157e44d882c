// ==========================================
// 咖啡售货亭配置器 - 批量导入导出 API
// ==========================================
// 职责: 目录/颜色表的 xlsx/csv 导出与导入
// 套装不参与导入导出（冗余列只能经挂接变体维护）
// ==========================================

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::types::EntityKind;
use crate::i18n::t_with_args;
use crate::tabular::exporter::{CatalogTableExporter, ExportOutput};
use crate::tabular::file_parser::TabularFormat;
use crate::tabular::importer::{CatalogTableImporter, TabularImporter};
use crate::tabular::ImportSummary;

pub struct TransferApi {
    exporter: CatalogTableExporter,
    importer: Arc<CatalogTableImporter>,
}

impl TransferApi {
    pub fn new(exporter: CatalogTableExporter, importer: Arc<CatalogTableImporter>) -> Self {
        Self { exporter, importer }
    }

    pub fn export_bytes(&self, kind: EntityKind, format: TabularFormat) -> ApiResult<ExportOutput> {
        Ok(self.exporter.export_bytes(kind, format)?)
    }

    /// 导出到文件，返回行数
    pub fn export_file(&self, kind: EntityKind, path: &Path) -> ApiResult<usize> {
        let rows = self.exporter.export_file(kind, path)?;
        info!(
            "{}",
            t_with_args("export.done", &[("rows", &rows.to_string())])
        );
        Ok(rows)
    }

    pub async fn import_bytes(
        &self,
        kind: EntityKind,
        data: &[u8],
        format: TabularFormat,
    ) -> ApiResult<ImportSummary> {
        let result = self.importer.import_bytes(kind, data, format).await;
        Self::report(result)
    }

    pub async fn import_file(&self, kind: EntityKind, path: &Path) -> ApiResult<ImportSummary> {
        if !path.exists() {
            let message = t_with_args("import.file_not_found", &[("path", &path.display().to_string())]);
            return Err(ApiError::ImportError(message));
        }
        let result = self.importer.import_file(kind, path).await;
        Self::report(result)
    }

    fn report(result: crate::tabular::TabularResult<ImportSummary>) -> ApiResult<ImportSummary> {
        match result {
            Ok(summary) => {
                info!(
                    "{}",
                    t_with_args(
                        "import.done",
                        &[
                            ("created", &summary.created.to_string()),
                            ("updated", &summary.updated.to_string()),
                            ("skipped", &summary.skipped.to_string()),
                        ],
                    )
                );
                Ok(summary)
            }
            Err(e) => {
                let err = ApiError::from(e);
                if let ApiError::Conversion { row, column, message } = &err {
                    warn!(
                        "{}",
                        t_with_args(
                            "import.failed",
                            &[("row", &row.to_string()), ("column", column), ("message", message)],
                        )
                    );
                } else {
                    warn!(error = %err, "导入失败");
                }
                Err(err)
            }
        }
    }
}
