// ==========================================
// 咖啡售货亭配置器 - 颜色选项仓储
// ==========================================
// 职责: 管理 cabinet_colors / design_colors 表的 CRUD
// 红线: 被变体引用的颜色不可删除（外键无级联）
// ==========================================

use crate::domain::catalog::{ColorOption, ColorOptionPatch, NewColorOption};
use crate::domain::gallery::{encode_gallery, parse_gallery};
use crate::domain::types::ColorKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const COLOR_SELECT: &str =
    "id, code, name, price_delta, main_image, gallery_images, active, created_at";

fn map_color_row(kind: ColorKind, row: &Row) -> SqliteResult<ColorOption> {
    let gallery_raw: Option<String> = row.get(5)?;
    Ok(ColorOption {
        id: row.get(0)?,
        kind,
        code: row.get(1)?,
        name: row.get(2)?,
        price_delta: row.get(3)?,
        main_image: row.get(4)?,
        gallery_images: parse_gallery(gallery_raw.as_deref()),
        active: row.get(6)?,
        created_at: row.get(7)?,
    })
}

// ==========================================
// ColorOptionRepository - 颜色选项仓储
// ==========================================
pub struct ColorOptionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ColorOptionRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn find_with(conn: &Connection, kind: ColorKind, id: i64) -> RepositoryResult<Option<ColorOption>> {
        let sql = format!("SELECT {} FROM {} WHERE id = ?1", COLOR_SELECT, kind.table_name());
        let color = conn
            .query_row(&sql, params![id], |row| map_color_row(kind, row))
            .optional()?;
        Ok(color)
    }

    /// 新建颜色（编码需由调用方保证非空）
    pub fn insert(&self, kind: ColorKind, code: &str, color: &NewColorOption) -> RepositoryResult<ColorOption> {
        let conn = self.get_conn()?;
        conn.execute(
            &format!(
                "INSERT INTO {} (code, name, price_delta, main_image, gallery_images, active)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                kind.table_name()
            ),
            params![
                code,
                color.name,
                color.price_delta,
                color.main_image,
                encode_gallery(&color.gallery_images),
                color.active,
            ],
        )?;
        let id = conn.last_insert_rowid();
        Self::find_with(&conn, kind, id)?
            .ok_or_else(|| RepositoryError::InternalError(format!("新建后无法读取 {}#{}", kind, id)))
    }

    pub fn find_by_id(&self, kind: ColorKind, id: i64) -> RepositoryResult<Option<ColorOption>> {
        let conn = self.get_conn()?;
        Self::find_with(&conn, kind, id)
    }

    /// 查询颜色列表（按 id 升序）
    pub fn list(&self, kind: ColorKind, active_only: bool) -> RepositoryResult<Vec<ColorOption>> {
        let conn = self.get_conn()?;
        Self::list_with(&conn, kind, active_only)
    }

    pub(crate) fn list_with(
        conn: &Connection,
        kind: ColorKind,
        active_only: bool,
    ) -> RepositoryResult<Vec<ColorOption>> {
        let filter = if active_only { "WHERE active = 1" } else { "" };
        let sql = format!(
            "SELECT {} FROM {} {} ORDER BY id ASC",
            COLOR_SELECT,
            kind.table_name(),
            filter
        );
        let mut stmt = conn.prepare(&sql)?;
        let colors = stmt
            .query_map([], |row| map_color_row(kind, row))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(colors)
    }

    pub fn update(&self, kind: ColorKind, id: i64, patch: &ColorOptionPatch) -> RepositoryResult<ColorOption> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut color = Self::find_with(&tx, kind, id)?
            .ok_or_else(|| RepositoryError::not_found(kind.table_name(), id))?;

        if let Some(code) = &patch.code {
            color.code = code.clone();
        }
        if let Some(name) = &patch.name {
            color.name = name.clone();
        }
        if let Some(delta) = patch.price_delta {
            color.price_delta = delta;
        }
        if let Some(main_image) = &patch.main_image {
            color.main_image = main_image.clone();
        }
        if let Some(gallery) = &patch.gallery_images {
            color.gallery_images = gallery.clone();
        }
        if let Some(active) = patch.active {
            color.active = active;
        }

        tx.execute(
            &format!(
                "UPDATE {} SET code = ?1, name = ?2, price_delta = ?3, main_image = ?4,
                 gallery_images = ?5, active = ?6 WHERE id = ?7",
                kind.table_name()
            ),
            params![
                color.code,
                color.name,
                color.price_delta,
                color.main_image,
                encode_gallery(&color.gallery_images),
                color.active,
                id,
            ],
        )?;
        tx.commit()?;
        Ok(color)
    }

    /// 删除颜色
    ///
    /// # 错误
    /// - 仍被变体引用时返回 ConsistencyViolation
    pub fn delete(&self, kind: ColorKind, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let result = conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", kind.table_name()),
            params![id],
        );
        match result {
            Ok(0) => Err(RepositoryError::not_found(kind.table_name(), id)),
            Ok(_) => Ok(()),
            Err(e) => match RepositoryError::from(e) {
                RepositoryError::ForeignKeyViolation(_) => Err(RepositoryError::ConsistencyViolation(
                    format!("{}#{} 仍被变体引用", kind.table_name(), id),
                )),
                other => Err(other),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn repo() -> ColorOptionRepository {
        ColorOptionRepository::from_connection(Arc::new(Mutex::new(open_in_memory().unwrap())))
    }

    #[test]
    fn test_insert_list_update() {
        let repo = repo();
        let white = repo
            .insert(ColorKind::CabinetColor, "white", &NewColorOption::new("Белый", 0))
            .unwrap();
        let black = repo
            .insert(ColorKind::CabinetColor, "black", &NewColorOption::new("Чёрный", 500))
            .unwrap();
        assert_eq!(repo.list(ColorKind::CabinetColor, true).unwrap().len(), 2);
        assert!(repo.list(ColorKind::DesignColor, false).unwrap().is_empty());

        let patch = ColorOptionPatch {
            price_delta: Some(-100),
            ..Default::default()
        };
        let updated = repo.update(ColorKind::CabinetColor, white.id, &patch).unwrap();
        assert_eq!(updated.price_delta, -100);
        assert_eq!(
            repo.find_by_id(ColorKind::CabinetColor, black.id).unwrap().unwrap().price_delta,
            500
        );
    }

    #[test]
    fn test_delete_missing_color() {
        let repo = repo();
        let err = repo.delete(ColorKind::DesignColor, 7).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }
}
