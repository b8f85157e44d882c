// ==========================================
// 咖啡售货亭配置器 - 表格导入器
// ==========================================
// 导入流程:
// 1. 文件解析（表头 -> 原始单元值）
// 2. 按列类型转换（任一单元转换失败即中止，不写入任何行）
// 3. 单事务 upsert（按主键查找，命中更新，否则新建）
// ==========================================

use crate::domain::types::EntityKind;
use crate::repository::tabular_repo::TabularRowRepository;
use crate::tabular::converter::{convert_row, ConvertedRow};
use crate::tabular::error::TabularResult;
use crate::tabular::file_parser::{parse_bytes, parse_file, RawRow, TabularFormat};
use crate::tabular::schema::TableSchema;
use crate::tabular::ImportSummary;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};

// ==========================================
// TabularImporter Trait
// ==========================================
// 实现者: CatalogTableImporter
#[async_trait]
pub trait TabularImporter: Send + Sync {
    /// 导入内存中的文件内容
    async fn import_bytes(
        &self,
        kind: EntityKind,
        data: &[u8],
        format: TabularFormat,
    ) -> TabularResult<ImportSummary>;

    /// 导入磁盘文件（格式由扩展名决定）
    async fn import_file<P: AsRef<Path> + Send>(
        &self,
        kind: EntityKind,
        file_path: P,
    ) -> TabularResult<ImportSummary>;
}

pub struct CatalogTableImporter {
    rows_repo: Arc<TabularRowRepository>,
}

impl CatalogTableImporter {
    pub fn new(rows_repo: Arc<TabularRowRepository>) -> Self {
        Self { rows_repo }
    }

    /// 转换全部行后一次性写入
    fn apply(&self, kind: EntityKind, raw_rows: Vec<RawRow>) -> TabularResult<ImportSummary> {
        let schema = TableSchema::for_kind(kind);

        let converted = raw_rows
            .iter()
            .map(|raw| convert_row(&schema, raw))
            .collect::<TabularResult<Vec<ConvertedRow>>>()
            .map_err(|e| {
                warn!(kind = %kind, error = %e, "导入转换失败，整批放弃");
                e
            })?;

        let summary = self.rows_repo.apply_rows(&schema, &converted)?;
        info!(
            kind = %kind,
            created = summary.created,
            updated = summary.updated,
            skipped = summary.skipped,
            "导入完成"
        );
        Ok(summary)
    }
}

#[async_trait]
impl TabularImporter for CatalogTableImporter {
    #[instrument(skip(self, data), fields(bytes = data.len()))]
    async fn import_bytes(
        &self,
        kind: EntityKind,
        data: &[u8],
        format: TabularFormat,
    ) -> TabularResult<ImportSummary> {
        let raw_rows = parse_bytes(data, format)?;
        info!(rows = raw_rows.len(), "文件解析完成");
        self.apply(kind, raw_rows)
    }

    #[instrument(skip(self, file_path))]
    async fn import_file<P: AsRef<Path> + Send>(
        &self,
        kind: EntityKind,
        file_path: P,
    ) -> TabularResult<ImportSummary> {
        let path = file_path.as_ref();
        info!(file_path = %path.display(), "开始导入");
        let raw_rows = parse_file(path)?;
        info!(rows = raw_rows.len(), "文件解析完成");
        self.apply(kind, raw_rows)
    }
}
