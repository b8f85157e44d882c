// ==========================================
// 咖啡售货亭配置器 - 核心库
// ==========================================
// 组成: 目录实体存储 / 变体注册 / 套装匹配 / 表格编解码 / 展示投影
// 技术栈: Rust + SQLite
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "ru");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 匹配/计价/投影/编码生成
pub mod engine;

// 表格层 - xlsx/csv 导入导出
pub mod tabular;

// 配置层 - 运行配置与媒体字段
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{CatalogKind, ColorKind, EntityKind};

// 领域实体
pub use domain::{
    Bundle, BundleDraft, BundlePatch, BundleSelection, BundleSummary, CatalogItem, ColorOption,
    PreviewResult, Variation, VariationRequest,
};

// 引擎
pub use engine::{BundleMatcher, PriceCalculator, Projector};

// API
pub use api::{AdminApi, ApiError, ApiResult, BundleApi, CatalogApi, TransferApi, VariationApi};

// 应用
pub use app::AppState;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "CoffeeZone 配置器";
