// ==========================================
// 咖啡售货亭配置器 - 表格列定义
// ==========================================
// 每种可导入导出的实体各有一份固定的有序列清单
// 列类型在此一次性声明，导入时按类型转换，不做运行时探测
// ==========================================

use crate::domain::types::EntityKind;

/// 列类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Boolean,
    Integer,
    Float,
    Text,
    Timestamp,
    Untyped, // 不透明内容，原样透传
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
}

const fn col(name: &'static str, kind: ColumnKind, nullable: bool) -> ColumnDef {
    ColumnDef { name, kind, nullable }
}

/// 主键列名
pub const PRIMARY_KEY: &str = "id";

const MACHINE_COLUMNS: &[ColumnDef] = &[
    col("id", ColumnKind::Integer, false),
    col("code", ColumnKind::Text, false),
    col("name", ColumnKind::Text, false),
    col("short_title", ColumnKind::Text, true),
    col("specs", ColumnKind::Text, false),
    col("price", ColumnKind::Integer, false),
    col("main_image", ColumnKind::Text, true),
    col("gallery_images", ColumnKind::Untyped, false),
    col("active", ColumnKind::Boolean, false),
    col("created_at", ColumnKind::Timestamp, false),
];

const CATALOG_COLUMNS: &[ColumnDef] = &[
    col("id", ColumnKind::Integer, false),
    col("code", ColumnKind::Text, false),
    col("name", ColumnKind::Text, false),
    col("specs", ColumnKind::Text, false),
    col("price", ColumnKind::Integer, false),
    col("main_image", ColumnKind::Text, true),
    col("gallery_images", ColumnKind::Untyped, false),
    col("active", ColumnKind::Boolean, false),
    col("created_at", ColumnKind::Timestamp, false),
];

const COLOR_COLUMNS: &[ColumnDef] = &[
    col("id", ColumnKind::Integer, false),
    col("code", ColumnKind::Text, false),
    col("name", ColumnKind::Text, false),
    col("price_delta", ColumnKind::Integer, false),
    col("main_image", ColumnKind::Text, true),
    col("gallery_images", ColumnKind::Untyped, false),
    col("active", ColumnKind::Boolean, false),
    col("created_at", ColumnKind::Timestamp, false),
];

// ==========================================
// TableSchema - 实体的导入导出列清单
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub kind: EntityKind,
    pub columns: &'static [ColumnDef],
}

impl TableSchema {
    pub fn for_kind(kind: EntityKind) -> Self {
        let columns = match kind {
            EntityKind::Machine => MACHINE_COLUMNS,
            EntityKind::Fridge | EntityKind::Cabinet | EntityKind::Terminal => CATALOG_COLUMNS,
            EntityKind::CabinetColor | EntityKind::DesignColor => COLOR_COLUMNS,
        };
        Self { kind, columns }
    }

    pub fn table_name(&self) -> &'static str {
        self.kind.table_name()
    }

    pub fn primary_key(&self) -> &'static str {
        PRIMARY_KEY
    }

    pub fn column(&self, name: &str) -> Option<&'static ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// 导出列名（有序）
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_machine_exports_short_title() {
        assert!(TableSchema::for_kind(EntityKind::Machine).column("short_title").is_some());
        assert!(TableSchema::for_kind(EntityKind::Fridge).column("short_title").is_none());
    }

    #[test]
    fn test_every_schema_starts_with_primary_key() {
        for kind in EntityKind::ALL {
            let schema = TableSchema::for_kind(kind);
            assert_eq!(schema.column_names()[0], schema.primary_key());
        }
    }

    #[test]
    fn test_color_schema_has_delta_not_price() {
        let schema = TableSchema::for_kind(EntityKind::DesignColor);
        assert_eq!(schema.column("price_delta").map(|c| c.kind), Some(ColumnKind::Integer));
        assert!(schema.column("price").is_none());
    }
}
