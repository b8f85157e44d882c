// ==========================================
// 咖啡售货亭配置器 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和 API 实例
// 所有仓储共享同一个连接（Arc<Mutex<Connection>>）
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{AdminApi, BundleApi, CatalogApi, TransferApi, VariationApi};
use crate::config::media_fields::MediaFieldConfig;
use crate::config::settings::AppSettings;
use crate::db::{init_schema, open_in_memory, open_sqlite_connection};
use crate::repository::{
    bundle_repo::BundleRepository, catalog_repo::CatalogItemRepository,
    color_repo::ColorOptionRepository, snapshot_repo::SnapshotRepository,
    tabular_repo::TabularRowRepository,
    variation_repo::VariationRepository,
};
use crate::tabular::{CatalogTableExporter, CatalogTableImporter};

/// 应用状态
pub struct AppState {
    /// 运行配置
    pub settings: AppSettings,

    /// 目录管理 API
    pub admin_api: Arc<AdminApi>,

    /// 柜体变体 API
    pub variation_api: Arc<VariationApi>,

    /// 套装管理 API
    pub bundle_api: Arc<BundleApi>,

    /// 公开读取 API
    pub catalog_api: Arc<CatalogApi>,

    /// 导入导出 API
    pub transfer_api: Arc<TransferApi>,

    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    /// 打开（必要时创建）数据库并装配全部 API
    ///
    /// # 返回
    /// - Err(String): 数据库无法打开或建表失败
    pub fn new(settings: AppSettings) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", settings.db_path);

        let conn = open_sqlite_connection(&settings.db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库初始化失败: {}", e))?;

        Ok(Self::assemble(settings, conn))
    }

    /// 内存数据库（测试与演示用）
    pub fn in_memory() -> Result<Self, String> {
        let conn = open_in_memory().map_err(|e| format!("无法打开内存数据库: {}", e))?;
        Ok(Self::assemble(AppSettings::with_db_path(":memory:"), conn))
    }

    fn assemble(settings: AppSettings, conn: Connection) -> Self {
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // Repository 层
        // ==========================================
        let catalog_repo = Arc::new(CatalogItemRepository::from_connection(conn.clone()));
        let color_repo = Arc::new(ColorOptionRepository::from_connection(conn.clone()));
        let variation_repo = Arc::new(VariationRepository::from_connection(conn.clone()));
        let bundle_repo = Arc::new(BundleRepository::from_connection(conn.clone()));
        let snapshot_repo = Arc::new(SnapshotRepository::from_connection(conn.clone()));
        let rows_repo = Arc::new(TabularRowRepository::from_connection(conn.clone()));

        // ==========================================
        // API 层
        // ==========================================
        let admin_api = Arc::new(AdminApi::new(
            catalog_repo.clone(),
            color_repo.clone(),
            variation_repo.clone(),
            MediaFieldConfig::default(),
        ));
        let variation_api = Arc::new(VariationApi::new(variation_repo.clone()));
        let bundle_api = Arc::new(BundleApi::new(bundle_repo.clone()));
        let catalog_api = Arc::new(CatalogApi::new(
            catalog_repo,
            color_repo,
            variation_repo,
            bundle_repo,
            snapshot_repo,
        ));
        let transfer_api = Arc::new(TransferApi::new(
            CatalogTableExporter::new(rows_repo.clone()),
            Arc::new(CatalogTableImporter::new(rows_repo)),
        ));

        tracing::info!("AppState初始化完成");

        Self {
            settings,
            admin_api,
            variation_api,
            bundle_api,
            catalog_api,
            transfer_api,
            conn,
        }
    }

    /// 共享连接（工具与测试直接查询用）
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        self.conn.clone()
    }

    /// 媒体绝对 URL 的基础地址
    pub fn base_url(&self) -> &str {
        &self.settings.public_base_url
    }
}
