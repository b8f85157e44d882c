// ==========================================
// 咖啡售货亭配置器 - 目录快照仓储
// ==========================================
// 职责: 一次加锁、一个读事务内读取全部有效目录记录
// 保证快照内的部件、颜色、变体来自同一数据版本
// ==========================================

use crate::domain::catalog::{CatalogItem, ColorOption};
use crate::domain::types::{CatalogKind, ColorKind};
use crate::domain::variation::VariationDetail;
use crate::repository::catalog_repo::CatalogItemRepository;
use crate::repository::color_repo::ColorOptionRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::variation_repo::VariationRepository;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// 快照原始记录（尚未投影）
#[derive(Debug, Clone, Default)]
pub struct CatalogRecords {
    pub machines: Vec<CatalogItem>,
    pub fridges: Vec<CatalogItem>,
    pub cabinets: Vec<CatalogItem>,
    pub terminals: Vec<CatalogItem>,
    pub cabinet_colors: Vec<ColorOption>,
    pub design_colors: Vec<ColorOption>,
    pub variations: Vec<VariationDetail>,
}

pub struct SnapshotRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SnapshotRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取全部有效记录
    pub fn load_active(&self) -> RepositoryResult<CatalogRecords> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let records = CatalogRecords {
            machines: CatalogItemRepository::list_with(&tx, CatalogKind::Machine, true)?,
            fridges: CatalogItemRepository::list_with(&tx, CatalogKind::Fridge, true)?,
            cabinets: CatalogItemRepository::list_with(&tx, CatalogKind::Cabinet, true)?,
            terminals: CatalogItemRepository::list_with(&tx, CatalogKind::Terminal, true)?,
            cabinet_colors: ColorOptionRepository::list_with(&tx, ColorKind::CabinetColor, true)?,
            design_colors: ColorOptionRepository::list_with(&tx, ColorKind::DesignColor, true)?,
            variations: VariationRepository::list_details_with(&tx, true)?,
        };

        tx.commit()?;
        Ok(records)
    }
}
