// ==========================================
// 咖啡售货亭配置器 - API 层
// ==========================================
// 职责: 对外业务接口（后台管理 / 公开读取 / 批量导入导出）
// ==========================================

pub mod error;
pub mod admin_api;
pub mod variation_api;
pub mod bundle_api;
pub mod catalog_api;
pub mod transfer_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use admin_api::AdminApi;
pub use variation_api::VariationApi;
pub use bundle_api::BundleApi;
pub use catalog_api::CatalogApi;
pub use transfer_api::TransferApi;
