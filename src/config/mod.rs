// ==========================================
// 咖啡售货亭配置器 - 配置层
// ==========================================

pub mod media_fields;
pub mod settings;

pub use media_fields::{MediaFieldConfig, MediaFields, MediaTarget};
pub use settings::{default_db_path, AppSettings};
