// ==========================================
// 咖啡售货亭配置器 - 单元值类型转换
// ==========================================
// 按列声明的类型把原始单元值转换为字段值:
// - Boolean:   文本按真值词表判断，其他按通用真值
// - Integer:   空白文本 -> NULL，浮点截断，文本按整数解析
// - Float:     按浮点解析
// - Text:      NULL -> 空文本，其余转字符串
// - Timestamp: 日期时间直通，文本按固定格式解析
// - Untyped:   原样透传
// 空单元（NULL）对所有非文本列均保持 NULL
// ==========================================

use crate::tabular::cell::{format_float, CellValue, FieldValue};
use crate::tabular::error::{TabularError, TabularResult};
use crate::tabular::file_parser::RawRow;
use crate::tabular::schema::{ColumnDef, ColumnKind, TableSchema};
use chrono::{NaiveDate, NaiveDateTime};

/// 布尔真值词表（含俄语“да”，与当前语言无关）
pub const TRUE_TOKENS: [&str; 5] = ["1", "true", "yes", "on", "да"];

/// 文本时间格式
const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// 文本是否表示“真”
pub fn parse_bool_text(text: &str) -> bool {
    let normalized = text.trim().to_lowercase();
    TRUE_TOKENS.contains(&normalized.as_str())
}

fn parse_timestamp_text(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// 转换单个单元值
///
/// # 参数
/// - column: 目标列定义
/// - value: 原始单元值
/// - row: 1 基行号（用于错误定位）
pub fn convert_cell(column: &ColumnDef, value: &CellValue, row: usize) -> TabularResult<FieldValue> {
    let fail = |message: String| TabularError::TypeConversionError {
        row,
        field: column.name.to_string(),
        message,
    };

    if column.kind != ColumnKind::Text && matches!(value, CellValue::Empty) {
        return Ok(FieldValue::Null);
    }

    let converted = match column.kind {
        ColumnKind::Boolean => match value {
            CellValue::Text(s) => FieldValue::Bool(parse_bool_text(s)),
            other => FieldValue::Bool(other.truthy()),
        },

        ColumnKind::Integer => match value {
            CellValue::Text(s) if s.trim().is_empty() => FieldValue::Null,
            CellValue::Text(s) => FieldValue::Int(
                s.trim()
                    .parse::<i64>()
                    .map_err(|e| fail(format!("无法解析为整数 '{}': {}", s, e)))?,
            ),
            CellValue::Float(f) if f.is_finite() => FieldValue::Int(f.trunc() as i64),
            CellValue::Float(f) => return Err(fail(format!("无法解析为整数: {}", f))),
            CellValue::Int(i) => FieldValue::Int(*i),
            CellValue::Bool(b) => FieldValue::Int(i64::from(*b)),
            CellValue::DateTime(dt) => return Err(fail(format!("日期时间不能转为整数: {}", dt))),
            CellValue::Empty => FieldValue::Null,
        },

        ColumnKind::Float => match value {
            CellValue::Text(s) if s.trim().is_empty() => FieldValue::Null,
            CellValue::Text(s) => FieldValue::Float(
                s.trim()
                    .parse::<f64>()
                    .map_err(|e| fail(format!("无法解析为浮点数 '{}': {}", s, e)))?,
            ),
            CellValue::Float(f) => FieldValue::Float(*f),
            CellValue::Int(i) => FieldValue::Float(*i as f64),
            CellValue::Bool(b) => FieldValue::Float(if *b { 1.0 } else { 0.0 }),
            CellValue::DateTime(dt) => return Err(fail(format!("日期时间不能转为浮点数: {}", dt))),
            CellValue::Empty => FieldValue::Null,
        },

        ColumnKind::Text => match value {
            CellValue::Empty => FieldValue::Text(String::new()),
            CellValue::Float(f) => FieldValue::Text(format_float(*f)),
            other => FieldValue::Text(other.to_string()),
        },

        ColumnKind::Timestamp => match value {
            CellValue::DateTime(dt) => FieldValue::Timestamp(*dt),
            CellValue::Text(s) if s.trim().is_empty() => FieldValue::Null,
            CellValue::Text(s) => FieldValue::Timestamp(
                parse_timestamp_text(s).ok_or_else(|| fail(format!("无法解析为日期时间: '{}'", s)))?,
            ),
            other => return Err(fail(format!("无法转换为日期时间: {:?}", other))),
        },

        ColumnKind::Untyped => FieldValue::from_cell(value),
    };

    Ok(converted)
}

// ==========================================
// ConvertedRow - 已转换的一行
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedRow {
    pub row_number: usize,
    pub primary_key: Option<i64>, // 仅用于查找已有记录
    pub fields: Vec<(&'static ColumnDef, FieldValue)>, // 按列清单顺序，不含主键
}

impl ConvertedRow {
    pub fn is_empty(&self) -> bool {
        self.primary_key.is_none() && self.fields.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(col, _)| col.name == name)
            .map(|(_, value)| value)
    }
}

/// 转换一行：只处理表头对应真实列的单元，未知表头忽略
pub fn convert_row(schema: &TableSchema, raw: &RawRow) -> TabularResult<ConvertedRow> {
    let mut primary_key = None;
    let mut fields = Vec::new();

    for column in schema.columns {
        let Some(value) = raw.values.get(column.name) else {
            continue;
        };
        let converted = convert_cell(column, value, raw.row_number)?;

        if column.name == schema.primary_key() {
            primary_key = match converted {
                FieldValue::Int(id) => Some(id),
                _ => None,
            };
            continue;
        }
        fields.push((column, converted));
    }

    Ok(ConvertedRow {
        row_number: raw.row_number,
        primary_key,
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::EntityKind;
    use std::collections::HashMap;

    fn column(kind: ColumnKind) -> ColumnDef {
        ColumnDef {
            name: "x",
            kind,
            nullable: true,
        }
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_boolean_tokens() {
        let col = column(ColumnKind::Boolean);
        for token in ["Да", "TRUE", "1", "on", " yes "] {
            assert_eq!(convert_cell(&col, &text(token), 2).unwrap(), FieldValue::Bool(true), "{}", token);
        }
        for token in ["", "0", "no", "нет", "off"] {
            assert_eq!(convert_cell(&col, &text(token), 2).unwrap(), FieldValue::Bool(false), "{}", token);
        }
        assert_eq!(convert_cell(&col, &CellValue::Float(1.0), 2).unwrap(), FieldValue::Bool(true));
        assert_eq!(convert_cell(&col, &CellValue::Int(0), 2).unwrap(), FieldValue::Bool(false));
        assert_eq!(convert_cell(&col, &CellValue::Empty, 2).unwrap(), FieldValue::Null);
    }

    #[test]
    fn test_integer_conversion() {
        let col = column(ColumnKind::Integer);
        assert_eq!(convert_cell(&col, &text("  "), 2).unwrap(), FieldValue::Null);
        assert_eq!(convert_cell(&col, &CellValue::Float(12.9), 2).unwrap(), FieldValue::Int(12));
        assert_eq!(convert_cell(&col, &text(" 42 "), 2).unwrap(), FieldValue::Int(42));

        let err = convert_cell(&col, &text("abc"), 5).unwrap_err();
        match err {
            TabularError::TypeConversionError { row, field, .. } => {
                assert_eq!(row, 5);
                assert_eq!(field, "x");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_float_conversion() {
        let col = column(ColumnKind::Float);
        assert_eq!(convert_cell(&col, &text("1.25"), 2).unwrap(), FieldValue::Float(1.25));
        assert_eq!(convert_cell(&col, &CellValue::Int(3), 2).unwrap(), FieldValue::Float(3.0));
        assert!(convert_cell(&col, &text("x1"), 2).is_err());
        assert_eq!(convert_cell(&col, &text(" "), 2).unwrap(), FieldValue::Null);
    }

    #[test]
    fn test_text_conversion() {
        let col = column(ColumnKind::Text);
        assert_eq!(convert_cell(&col, &CellValue::Empty, 2).unwrap(), FieldValue::Text(String::new()));
        assert_eq!(convert_cell(&col, &CellValue::Float(1500.0), 2).unwrap(), FieldValue::Text("1500".to_string()));
        assert_eq!(convert_cell(&col, &CellValue::Int(7), 2).unwrap(), FieldValue::Text("7".to_string()));
    }

    #[test]
    fn test_timestamp_conversion() {
        let col = column(ColumnKind::Timestamp);
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(10, 30, 0).unwrap();
        assert_eq!(
            convert_cell(&col, &text("2024-03-01 10:30:00"), 2).unwrap(),
            FieldValue::Timestamp(expected)
        );
        assert_eq!(
            convert_cell(&col, &CellValue::DateTime(expected), 2).unwrap(),
            FieldValue::Timestamp(expected)
        );
        assert!(convert_cell(&col, &text("вчера"), 2).is_err());
        assert!(convert_cell(&col, &CellValue::Float(3.5), 2).is_err());
    }

    #[test]
    fn test_untyped_passthrough() {
        let col = column(ColumnKind::Untyped);
        assert_eq!(
            convert_cell(&col, &text("[\"a.jpg\"]"), 2).unwrap(),
            FieldValue::Text("[\"a.jpg\"]".to_string())
        );
    }

    #[test]
    fn test_convert_row_extracts_primary_key_and_ignores_unknown() {
        let schema = TableSchema::for_kind(EntityKind::Fridge);
        let mut values = HashMap::new();
        values.insert("id".to_string(), CellValue::Float(3.0));
        values.insert("name".to_string(), text("Liebherr"));
        values.insert("unknown".to_string(), text("zzz"));
        let row = convert_row(&schema, &RawRow { row_number: 2, values }).unwrap();

        assert_eq!(row.primary_key, Some(3));
        assert_eq!(row.fields.len(), 1);
        assert_eq!(row.field("name"), Some(&FieldValue::Text("Liebherr".to_string())));
    }

    #[test]
    fn test_convert_row_blank_primary_key() {
        let schema = TableSchema::for_kind(EntityKind::Fridge);
        let mut values = HashMap::new();
        values.insert("id".to_string(), text(""));
        values.insert("name".to_string(), text("New"));
        let row = convert_row(&schema, &RawRow { row_number: 2, values }).unwrap();
        assert_eq!(row.primary_key, None);
    }
}
