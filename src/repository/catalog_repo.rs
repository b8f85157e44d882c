// ==========================================
// 咖啡售货亭配置器 - 目录部件仓储
// ==========================================
// 职责: 管理 coffee_machines / fridges / cabinets / terminals 表的 CRUD
// 红线: 不含业务逻辑（编码生成、媒体合并在上层完成）
// ==========================================

use crate::domain::catalog::{CatalogItem, CatalogItemPatch, NewCatalogItem};
use crate::domain::gallery::{encode_gallery, parse_gallery};
use crate::domain::types::CatalogKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

/// 查询列（非咖啡机表以 NULL 占位 short_title）
fn select_columns(kind: CatalogKind) -> String {
    let short_title = if kind.has_short_title() {
        "short_title"
    } else {
        "NULL AS short_title"
    };
    format!(
        "id, code, name, {}, specs, price, main_image, gallery_images, active, created_at",
        short_title
    )
}

fn map_catalog_row(kind: CatalogKind, row: &Row) -> SqliteResult<CatalogItem> {
    let gallery_raw: Option<String> = row.get(7)?;
    Ok(CatalogItem {
        id: row.get(0)?,
        kind,
        code: row.get(1)?,
        name: row.get(2)?,
        short_title: row.get(3)?,
        specs: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        price: row.get(5)?,
        main_image: row.get(6)?,
        gallery_images: parse_gallery(gallery_raw.as_deref()),
        active: row.get(8)?,
        created_at: row.get(9)?,
    })
}

// ==========================================
// CatalogItemRepository - 目录部件仓储
// ==========================================
pub struct CatalogItemRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CatalogItemRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新建部件（编码需由调用方保证非空）
    pub fn insert(
        &self,
        kind: CatalogKind,
        code: &str,
        item: &NewCatalogItem,
    ) -> RepositoryResult<CatalogItem> {
        let conn = self.get_conn()?;
        let gallery = encode_gallery(&item.gallery_images);

        if kind.has_short_title() {
            conn.execute(
                &format!(
                    "INSERT INTO {} (code, name, short_title, specs, price, main_image, gallery_images, active)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    kind.table_name()
                ),
                params![
                    code,
                    item.name,
                    item.short_title,
                    item.specs,
                    item.price,
                    item.main_image,
                    gallery,
                    item.active,
                ],
            )?;
        } else {
            conn.execute(
                &format!(
                    "INSERT INTO {} (code, name, specs, price, main_image, gallery_images, active)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    kind.table_name()
                ),
                params![
                    code,
                    item.name,
                    item.specs,
                    item.price,
                    item.main_image,
                    gallery,
                    item.active,
                ],
            )?;
        }

        let id = conn.last_insert_rowid();
        Self::find_with(&conn, kind, id)?
            .ok_or_else(|| RepositoryError::InternalError(format!("新建后无法读取 {}#{}", kind, id)))
    }

    fn find_with(conn: &Connection, kind: CatalogKind, id: i64) -> RepositoryResult<Option<CatalogItem>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            select_columns(kind),
            kind.table_name()
        );
        let item = conn
            .query_row(&sql, params![id], |row| map_catalog_row(kind, row))
            .optional()?;
        Ok(item)
    }

    /// 按主键查询
    pub fn find_by_id(&self, kind: CatalogKind, id: i64) -> RepositoryResult<Option<CatalogItem>> {
        let conn = self.get_conn()?;
        Self::find_with(&conn, kind, id)
    }

    /// 查询部件列表（按 id 升序）
    pub fn list(&self, kind: CatalogKind, active_only: bool) -> RepositoryResult<Vec<CatalogItem>> {
        let conn = self.get_conn()?;
        Self::list_with(&conn, kind, active_only)
    }

    /// 在调用方持有的连接/事务上列出部件
    pub(crate) fn list_with(
        conn: &Connection,
        kind: CatalogKind,
        active_only: bool,
    ) -> RepositoryResult<Vec<CatalogItem>> {
        let filter = if active_only { "WHERE active = 1" } else { "" };
        let sql = format!(
            "SELECT {} FROM {} {} ORDER BY id ASC",
            select_columns(kind),
            kind.table_name(),
            filter
        );
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map([], |row| map_catalog_row(kind, row))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(items)
    }

    /// 局部更新（读-改-写，在同一事务内完成）
    pub fn update(
        &self,
        kind: CatalogKind,
        id: i64,
        patch: &CatalogItemPatch,
    ) -> RepositoryResult<CatalogItem> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut item = Self::find_with(&tx, kind, id)?
            .ok_or_else(|| RepositoryError::not_found(kind.table_name(), id))?;

        if let Some(code) = &patch.code {
            item.code = code.clone();
        }
        if let Some(name) = &patch.name {
            item.name = name.clone();
        }
        if let Some(short_title) = &patch.short_title {
            item.short_title = short_title.clone();
        }
        if let Some(specs) = &patch.specs {
            item.specs = specs.clone();
        }
        if let Some(price) = patch.price {
            item.price = price;
        }
        if let Some(main_image) = &patch.main_image {
            item.main_image = main_image.clone();
        }
        if let Some(gallery) = &patch.gallery_images {
            item.gallery_images = gallery.clone();
        }
        if let Some(active) = patch.active {
            item.active = active;
        }

        let gallery = encode_gallery(&item.gallery_images);
        if kind.has_short_title() {
            tx.execute(
                &format!(
                    "UPDATE {} SET code = ?1, name = ?2, short_title = ?3, specs = ?4, price = ?5,
                     main_image = ?6, gallery_images = ?7, active = ?8 WHERE id = ?9",
                    kind.table_name()
                ),
                params![
                    item.code,
                    item.name,
                    item.short_title,
                    item.specs,
                    item.price,
                    item.main_image,
                    gallery,
                    item.active,
                    id,
                ],
            )?;
        } else {
            tx.execute(
                &format!(
                    "UPDATE {} SET code = ?1, name = ?2, specs = ?3, price = ?4,
                     main_image = ?5, gallery_images = ?6, active = ?7 WHERE id = ?8",
                    kind.table_name()
                ),
                params![
                    item.code,
                    item.name,
                    item.specs,
                    item.price,
                    item.main_image,
                    gallery,
                    item.active,
                    id,
                ],
            )?;
        }

        tx.commit()?;
        Ok(item)
    }

    /// 删除部件（柜体删除时由外键级联删除其变体）
    pub fn delete(&self, kind: CatalogKind, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", kind.table_name()),
            params![id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found(kind.table_name(), id));
        }
        Ok(())
    }
}
