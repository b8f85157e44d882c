// ==========================================
// 咖啡售货亭配置器 - 数据仓储层
// ==========================================
// 红线: Repository 不含展示逻辑
// 约束: 所有查询使用参数化（表名来自固定枚举，不来自输入）
// ==========================================

pub mod bundle_repo;
pub mod catalog_repo;
pub mod color_repo;
pub mod error;
pub mod snapshot_repo;
pub mod tabular_repo;
pub mod variation_repo;

// 重导出核心仓储
pub use bundle_repo::{BundleRepository, ABSENT_PLACEHOLDER};
pub use catalog_repo::CatalogItemRepository;
pub use color_repo::ColorOptionRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use snapshot_repo::{CatalogRecords, SnapshotRepository};
pub use tabular_repo::TabularRowRepository;
pub use variation_repo::VariationRepository;
