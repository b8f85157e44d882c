// ==========================================
// 咖啡售货亭配置器 - 表格单元值模型
// ==========================================
// CellValue:  文件中读到的原始单元值（无类型约定）
// FieldValue: 按列类型转换后的值，可直接绑定到 SQL
// ==========================================

use chrono::NaiveDateTime;
use rusqlite::types::{ToSql, ToSqlOutput, Value, ValueRef};
use std::fmt;

// ==========================================
// CellValue - 原始单元值
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// 空单元或去空白后为空的文本
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 通用真值判断（非文本单元使用）
    pub fn truthy(&self) -> bool {
        match self {
            CellValue::Empty => false,
            CellValue::Bool(b) => *b,
            CellValue::Int(i) => *i != 0,
            CellValue::Float(f) => *f != 0.0,
            CellValue::Text(s) => !s.is_empty(),
            CellValue::DateTime(_) => true,
        }
    }
}

/// 浮点格式化：无小数部分时不带 ".0"
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", format_float(*v)),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

// ==========================================
// FieldValue - 已转换的列值
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// 未声明类型的列：原样透传
    pub fn from_cell(cell: &CellValue) -> Self {
        match cell {
            CellValue::Empty => FieldValue::Null,
            CellValue::Bool(b) => FieldValue::Bool(*b),
            CellValue::Int(i) => FieldValue::Int(*i),
            CellValue::Float(v) => FieldValue::Float(*v),
            CellValue::Text(s) => FieldValue::Text(s.clone()),
            CellValue::DateTime(dt) => FieldValue::Timestamp(*dt),
        }
    }

    /// 从数据库读取的值构造（导出使用）
    pub fn from_sql(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => FieldValue::Null,
            ValueRef::Integer(i) => FieldValue::Int(i),
            ValueRef::Real(f) => FieldValue::Float(f),
            ValueRef::Text(bytes) => FieldValue::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => FieldValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }
}

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            FieldValue::Null => ToSqlOutput::Owned(Value::Null),
            FieldValue::Bool(b) => ToSqlOutput::Owned(Value::Integer(i64::from(*b))),
            FieldValue::Int(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            FieldValue::Float(f) => ToSqlOutput::Owned(Value::Real(*f)),
            FieldValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            FieldValue::Timestamp(dt) => {
                ToSqlOutput::Owned(Value::Text(dt.format("%Y-%m-%d %H:%M:%S").to_string()))
            }
        })
    }
}
