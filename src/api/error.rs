// ==========================================
// 咖啡售货亭配置器 - API层错误类型
// ==========================================
// 职责: 把仓储/导入错误转换为调用方可理解的拒绝原因
// 约定: 所有被拒绝的操作均无部分副作用
// ==========================================

use crate::repository::error::RepositoryError;
use crate::tabular::error::TabularError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("重复的变体: {0}")]
    Duplicate(String),

    #[error("引用一致性违反: {0}")]
    Consistency(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 导入错误
    // ==========================================
    /// 单元值无法转换为列类型（整批导入已放弃）
    #[error("类型转换失败 (行 {row}, 列 {column}): {message}")]
    Conversion {
        row: usize,
        column: String,
        message: String,
    },

    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("文件导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DuplicateVariation {
                cabinet_id,
                cabinet_color_id,
                design_color_id,
            } => ApiError::Duplicate(format!(
                "cabinet_id={}, cabinet_color_id={}, design_color_id={}",
                cabinet_id, cabinet_color_id, design_color_id
            )),
            RepositoryError::ConsistencyViolation(msg) => ApiError::Consistency(msg),
            RepositoryError::ForeignKeyViolation(msg) => ApiError::Consistency(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::InvalidInput(format!("唯一约束冲突: {}", msg))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(e) => ApiError::Other(e),
        }
    }
}

// ==========================================
// 从 TabularError 转换
// ==========================================
impl From<TabularError> for ApiError {
    fn from(err: TabularError) -> Self {
        match err {
            TabularError::TypeConversionError { row, field, message } => ApiError::Conversion {
                row,
                column: field,
                message,
            },
            TabularError::RowWriteFailed { row, source } => {
                ApiError::ImportError(format!("行 {}: {}", row, source))
            }
            TabularError::Repository(e) => ApiError::from(e),
            TabularError::WriteError(msg) => ApiError::ExportError(msg),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

/// API层Result类型别名
pub type ApiResult<T> = Result<T, ApiError>;
