// ==========================================
// 咖啡售货亭配置器 - 表格导入导出错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约定: 行号为表格中的 1 基行号（表头为第 1 行）
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabularError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("文件写入失败: {0}")]
    WriteError(String),

    // ===== 数据转换错误 =====
    #[error("类型转换失败 (行 {row}, 字段 {field}): {message}")]
    TypeConversionError {
        row: usize,
        field: String,
        message: String,
    },

    // ===== 数据库错误 =====
    #[error("写入失败 (行 {row}): {source}")]
    RowWriteFailed {
        row: usize,
        #[source]
        source: RepositoryError,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<std::io::Error> for TabularError {
    fn from(err: std::io::Error) -> Self {
        TabularError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for TabularError {
    fn from(err: csv::Error) -> Self {
        TabularError::CsvParseError(err.to_string())
    }
}

impl From<calamine::XlsxError> for TabularError {
    fn from(err: calamine::XlsxError) -> Self {
        TabularError::ExcelParseError(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for TabularError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        TabularError::WriteError(err.to_string())
    }
}

pub type TabularResult<T> = Result<T, TabularError>;
