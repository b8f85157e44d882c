// ==========================================
// 咖啡售货亭配置器 - 套装仓储
// ==========================================
// 职责: bundles 表的 CRUD 与匹配候选查询
// 冗余列: cabinet_id / cabinet_color_id / design_color_id 只在挂接变体时从变体复制
// 孤儿引用: 读取侧容忍（后台列表显示 "-"）
// ==========================================

use crate::domain::bundle::{Bundle, BundleDraft, BundlePatch, BundleSummary};
use crate::domain::types::CatalogKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};
use tracing::info;

/// 后台列表中缺失引用的占位符
pub const ABSENT_PLACEHOLDER: &str = "-";

const BUNDLE_SELECT: &str = "b.id, b.name, b.machine_id, b.fridge_id, b.cabinet_id, b.cabinet_color_id, \
     b.design_color_id, b.variation_id, b.terminal_id, b.custom_price, b.ozon_url, \
     b.is_available, b.show_on_site, b.created_at, b.updated_at";

fn map_bundle_row(row: &Row) -> SqliteResult<Bundle> {
    Ok(Bundle {
        id: row.get(0)?,
        name: row.get(1)?,
        machine_id: row.get(2)?,
        fridge_id: row.get(3)?,
        cabinet_id: row.get(4)?,
        cabinet_color_id: row.get(5)?,
        design_color_id: row.get(6)?,
        variation_id: row.get(7)?,
        terminal_id: row.get(8)?,
        custom_price: row.get(9)?,
        ozon_url: row.get(10)?,
        is_available: row.get(11)?,
        show_on_site: row.get(12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}

/// 变体的三元组（挂接时复制到套装）
struct AttachedTriple {
    cabinet_id: i64,
    cabinet_color_id: i64,
    design_color_id: i64,
}

// ==========================================
// BundleRepository - 套装仓储
// ==========================================
pub struct BundleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl BundleRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn require_exists(conn: &Connection, table: &str, id: i64) -> RepositoryResult<()> {
        let found = conn
            .query_row(
                &format!("SELECT 1 FROM {} WHERE id = ?1", table),
                params![id],
                |_| Ok(()),
            )
            .optional()?;
        if found.is_none() {
            return Err(RepositoryError::ConsistencyViolation(format!(
                "引用不存在: {}#{}",
                table, id
            )));
        }
        Ok(())
    }

    /// 读取变体三元组（变体不存在视为一致性错误）
    fn load_triple(conn: &Connection, variation_id: i64) -> RepositoryResult<AttachedTriple> {
        conn.query_row(
            "SELECT cabinet_id, cabinet_color_id, design_color_id FROM variations WHERE id = ?1",
            params![variation_id],
            |row| {
                Ok(AttachedTriple {
                    cabinet_id: row.get(0)?,
                    cabinet_color_id: row.get(1)?,
                    design_color_id: row.get(2)?,
                })
            },
        )
        .optional()?
        .ok_or_else(|| RepositoryError::ConsistencyViolation(format!("引用不存在: variations#{}", variation_id)))
    }

    fn check_components(
        conn: &Connection,
        machine_id: i64,
        fridge_id: Option<i64>,
        terminal_id: Option<i64>,
    ) -> RepositoryResult<()> {
        Self::require_exists(conn, CatalogKind::Machine.table_name(), machine_id)?;
        if let Some(fridge_id) = fridge_id {
            Self::require_exists(conn, CatalogKind::Fridge.table_name(), fridge_id)?;
        }
        if let Some(terminal_id) = terminal_id {
            Self::require_exists(conn, CatalogKind::Terminal.table_name(), terminal_id)?;
        }
        Ok(())
    }

    fn find_with(conn: &Connection, id: i64) -> RepositoryResult<Option<Bundle>> {
        let sql = format!("SELECT {} FROM bundles b WHERE b.id = ?1", BUNDLE_SELECT);
        let bundle = conn.query_row(&sql, params![id], map_bundle_row).optional()?;
        Ok(bundle)
    }

    /// 新建套装（cabinet/颜色 从变体复制）
    pub fn create(&self, draft: &BundleDraft) -> RepositoryResult<Bundle> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let triple = Self::load_triple(&tx, draft.variation_id)?;
        Self::check_components(&tx, draft.machine_id, draft.fridge_id, draft.terminal_id)?;

        tx.execute(
            "INSERT INTO bundles (
                name, machine_id, fridge_id, cabinet_id, cabinet_color_id, design_color_id,
                variation_id, terminal_id, custom_price, ozon_url, is_available, show_on_site
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                draft.name,
                draft.machine_id,
                draft.fridge_id,
                triple.cabinet_id,
                triple.cabinet_color_id,
                triple.design_color_id,
                draft.variation_id,
                draft.terminal_id,
                draft.custom_price,
                draft.ozon_url,
                draft.is_available,
                draft.show_on_site,
            ],
        )?;
        let id = tx.last_insert_rowid();
        let bundle = Self::find_with(&tx, id)?
            .ok_or_else(|| RepositoryError::InternalError(format!("新建后无法读取 bundles#{}", id)))?;
        tx.commit()?;

        info!(bundle_id = id, variation_id = draft.variation_id, "套装已创建");
        Ok(bundle)
    }

    /// 局部更新套装
    ///
    /// 重新挂接变体时同步复制 cabinet/颜色；未挂接时保持原冗余列
    pub fn update(&self, id: i64, patch: &BundlePatch) -> RepositoryResult<Bundle> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut bundle = Self::find_with(&tx, id)?.ok_or_else(|| RepositoryError::not_found("bundles", id))?;

        if let Some(variation_id) = patch.variation_id {
            let triple = Self::load_triple(&tx, variation_id)?;
            bundle.variation_id = Some(variation_id);
            bundle.cabinet_id = triple.cabinet_id;
            bundle.cabinet_color_id = triple.cabinet_color_id;
            bundle.design_color_id = triple.design_color_id;
        }
        if let Some(name) = &patch.name {
            bundle.name = name.clone();
        }
        if let Some(machine_id) = patch.machine_id {
            bundle.machine_id = machine_id;
        }
        if let Some(fridge_id) = patch.fridge_id {
            bundle.fridge_id = fridge_id;
        }
        if let Some(terminal_id) = patch.terminal_id {
            bundle.terminal_id = terminal_id;
        }
        if let Some(custom_price) = patch.custom_price {
            bundle.custom_price = custom_price;
        }
        if let Some(ozon_url) = &patch.ozon_url {
            bundle.ozon_url = ozon_url.clone();
        }
        if let Some(is_available) = patch.is_available {
            bundle.is_available = is_available;
        }
        if let Some(show_on_site) = patch.show_on_site {
            bundle.show_on_site = show_on_site;
        }

        // 仅校验本次改动的引用，已有的孤儿引用保持容忍
        if patch.machine_id.is_some() {
            Self::require_exists(&tx, CatalogKind::Machine.table_name(), bundle.machine_id)?;
        }
        if let Some(Some(fridge_id)) = patch.fridge_id {
            Self::require_exists(&tx, CatalogKind::Fridge.table_name(), fridge_id)?;
        }
        if let Some(Some(terminal_id)) = patch.terminal_id {
            Self::require_exists(&tx, CatalogKind::Terminal.table_name(), terminal_id)?;
        }

        tx.execute(
            "UPDATE bundles SET
                name = ?1, machine_id = ?2, fridge_id = ?3, cabinet_id = ?4, cabinet_color_id = ?5,
                design_color_id = ?6, variation_id = ?7, terminal_id = ?8, custom_price = ?9,
                ozon_url = ?10, is_available = ?11, show_on_site = ?12, updated_at = datetime('now')
             WHERE id = ?13",
            params![
                bundle.name,
                bundle.machine_id,
                bundle.fridge_id,
                bundle.cabinet_id,
                bundle.cabinet_color_id,
                bundle.design_color_id,
                bundle.variation_id,
                bundle.terminal_id,
                bundle.custom_price,
                bundle.ozon_url,
                bundle.is_available,
                bundle.show_on_site,
                id,
            ],
        )?;
        let updated = Self::find_with(&tx, id)?.ok_or_else(|| RepositoryError::not_found("bundles", id))?;
        tx.commit()?;
        Ok(updated)
    }

    pub fn delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM bundles WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::not_found("bundles", id));
        }
        info!(bundle_id = id, "套装已删除");
        Ok(())
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Bundle>> {
        let conn = self.get_conn()?;
        Self::find_with(&conn, id)
    }

    /// 按必填四元组查询匹配候选（id 升序，走 idx_bundles_match）
    pub fn find_candidates(
        &self,
        machine_id: i64,
        cabinet_id: i64,
        cabinet_color_id: i64,
        design_color_id: i64,
    ) -> RepositoryResult<Vec<Bundle>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM bundles b
             WHERE b.machine_id = ?1 AND b.cabinet_id = ?2
               AND b.cabinet_color_id = ?3 AND b.design_color_id = ?4
             ORDER BY b.id ASC",
            BUNDLE_SELECT
        );
        let mut stmt = conn.prepare(&sql)?;
        let bundles = stmt
            .query_map(
                params![machine_id, cabinet_id, cabinet_color_id, design_color_id],
                map_bundle_row,
            )?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(bundles)
    }

    /// 列出套装（id 升序）
    pub fn list(&self, visible_only: bool) -> RepositoryResult<Vec<Bundle>> {
        let conn = self.get_conn()?;
        let filter = if visible_only { "WHERE b.show_on_site = 1" } else { "" };
        let sql = format!(
            "SELECT {} FROM bundles b {} ORDER BY b.id ASC",
            BUNDLE_SELECT, filter
        );
        let mut stmt = conn.prepare(&sql)?;
        let bundles = stmt
            .query_map([], map_bundle_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(bundles)
    }

    /// 后台列表：引用名称通过 LEFT JOIN 解析，缺失显示 "-"
    pub fn list_summaries(&self) -> RepositoryResult<Vec<BundleSummary>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT b.id, b.name, m.name, f.name, v.name, t.name,
                    b.custom_price, b.ozon_url, b.is_available, b.show_on_site
             FROM bundles b
             LEFT JOIN coffee_machines m ON m.id = b.machine_id
             LEFT JOIN fridges f ON f.id = b.fridge_id
             LEFT JOIN variations v ON v.id = b.variation_id
             LEFT JOIN terminals t ON t.id = b.terminal_id
             ORDER BY b.id ASC",
        )?;
        let display = |name: Option<String>| name.unwrap_or_else(|| ABSENT_PLACEHOLDER.to_string());
        let summaries = stmt
            .query_map([], |row| {
                Ok(BundleSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    machine: display(row.get(2)?),
                    fridge: display(row.get(3)?),
                    variation: display(row.get(4)?),
                    terminal: display(row.get(5)?),
                    custom_price: row.get(6)?,
                    ozon_url: row.get(7)?,
                    is_available: row.get(8)?,
                    show_on_site: row.get(9)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(summaries)
    }
}
