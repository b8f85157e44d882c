// ==========================================
// 咖啡售货亭配置器 - 引擎层
// ==========================================
// 职责: 编码生成 / 套装精确匹配 / 计算价格 / 展示投影
// ==========================================

pub mod bundle_matcher;
pub mod code_gen;
pub mod pricing;
pub mod projector;

// 重导出核心类型
pub use bundle_matcher::{matches_selection, BundleMatcher};
pub use code_gen::{ensure_code, slugify};
pub use pricing::{PriceBreakdown, PriceCalculator};
pub use projector::{
    absolute_url, split_specs, CabinetView, CatalogItemView, CatalogSnapshot, ColorView,
    Projector, VariationView,
};
