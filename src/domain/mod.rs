// ==========================================
// 咖啡售货亭配置器 - 领域层
// ==========================================
// 职责: 实体与值类型定义，不含数据访问
// ==========================================

pub mod bundle;
pub mod catalog;
pub mod gallery;
pub mod types;
pub mod variation;

// 重导出核心类型
pub use bundle::{Bundle, BundleDraft, BundlePatch, BundleSelection, BundleSummary, PreviewResult};
pub use catalog::{
    CatalogItem, CatalogItemPatch, ColorOption, ColorOptionPatch, MediaAttachment, NewCatalogItem,
    NewColorOption,
};
pub use gallery::{append_gallery, encode_gallery, parse_gallery};
pub use types::{CatalogKind, ColorKind, EntityKind};
pub use variation::{ColorRef, Variation, VariationDetail, VariationRequest};
