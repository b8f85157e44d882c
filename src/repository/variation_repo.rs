// ==========================================
// 咖啡售货亭配置器 - 柜体变体仓储
// ==========================================
// 职责: variations 表的注册 / 默认切换 / 删除 / 查询
// 不变量 A: 三元组唯一（注册前先查重，唯一约束冲突同样视为重复）
// 不变量 B: 每个柜体至多一个默认变体（IMMEDIATE 事务内“先清后设”）
// ==========================================

use crate::domain::gallery::{encode_gallery, parse_gallery};
use crate::domain::types::{CatalogKind, ColorKind};
use crate::domain::variation::{
    variation_display_name, ColorRef, Variation, VariationDetail, VariationRequest,
};
use crate::engine::code_gen::ensure_code;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{
    params, Connection, OptionalExtension, Result as SqliteResult, Row, TransactionBehavior,
};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

const VARIATION_SELECT: &str = "v.id, v.cabinet_id, v.cabinet_color_id, v.design_color_id, v.code, v.name, \
     v.main_image, v.gallery_images, v.active, v.is_default, v.created_at, v.updated_at";

/// 变体编码兜底前缀
const VARIATION_CODE_PREFIX: &str = "variation";

fn map_variation_row(row: &Row) -> SqliteResult<Variation> {
    let gallery_raw: Option<String> = row.get(7)?;
    Ok(Variation {
        id: row.get(0)?,
        cabinet_id: row.get(1)?,
        cabinet_color_id: row.get(2)?,
        design_color_id: row.get(3)?,
        code: row.get(4)?,
        name: row.get(5)?,
        main_image: row.get(6)?,
        gallery_images: parse_gallery(gallery_raw.as_deref()),
        active: row.get(8)?,
        is_default: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

/// 唯一约束冲突是否来自三元组约束
fn is_triple_conflict(err: &RepositoryError) -> bool {
    matches!(err, RepositoryError::UniqueConstraintViolation(msg) if msg.contains("variations.design_color_id"))
}

// ==========================================
// VariationRepository - 变体仓储
// ==========================================
pub struct VariationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl VariationRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn lookup_name(conn: &Connection, table: &str, id: i64) -> RepositoryResult<Option<String>> {
        let name = conn
            .query_row(
                &format!("SELECT name FROM {} WHERE id = ?1", table),
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(name)
    }

    fn find_with(conn: &Connection, id: i64) -> RepositoryResult<Option<Variation>> {
        let sql = format!("SELECT {} FROM variations v WHERE v.id = ?1", VARIATION_SELECT);
        let variation = conn.query_row(&sql, params![id], map_variation_row).optional()?;
        Ok(variation)
    }

    /// 在事务内清除同柜体其他默认变体并设置新的默认
    fn switch_default(conn: &Connection, cabinet_id: i64, variation_id: i64) -> RepositoryResult<()> {
        let cleared = conn.execute(
            "UPDATE variations SET is_default = 0, updated_at = datetime('now')
             WHERE cabinet_id = ?1 AND is_default = 1 AND id <> ?2",
            params![cabinet_id, variation_id],
        )?;
        conn.execute(
            "UPDATE variations SET is_default = 1, updated_at = datetime('now')
             WHERE id = ?1 AND is_default = 0",
            params![variation_id],
        )?;
        debug!(cabinet_id, variation_id, cleared, "默认变体已切换");
        Ok(())
    }

    // ==========================================
    // 注册变体
    // ==========================================

    /// 注册新变体
    ///
    /// # 检查顺序
    /// 1. 柜体存在（NotFound）
    /// 2. 三元组未注册（DuplicateVariation）
    /// 3. 两种颜色存在（ConsistencyViolation）
    ///
    /// 请求默认时，在同一事务内完成默认切换
    pub fn register(&self, cabinet_id: i64, request: &VariationRequest) -> RepositoryResult<Variation> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let cabinet_name = Self::lookup_name(&tx, CatalogKind::Cabinet.table_name(), cabinet_id)?
            .ok_or_else(|| RepositoryError::not_found(CatalogKind::Cabinet.table_name(), cabinet_id))?;

        let exists = tx
            .query_row(
                "SELECT id FROM variations
                 WHERE cabinet_id = ?1 AND cabinet_color_id = ?2 AND design_color_id = ?3",
                params![cabinet_id, request.cabinet_color_id, request.design_color_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        if exists.is_some() {
            return Err(RepositoryError::DuplicateVariation {
                cabinet_id,
                cabinet_color_id: request.cabinet_color_id,
                design_color_id: request.design_color_id,
            });
        }

        let cabinet_color_name =
            Self::lookup_name(&tx, ColorKind::CabinetColor.table_name(), request.cabinet_color_id)?
                .ok_or_else(|| {
                    RepositoryError::ConsistencyViolation(format!(
                        "柜体颜色不存在: id={}",
                        request.cabinet_color_id
                    ))
                })?;
        let design_color_name =
            Self::lookup_name(&tx, ColorKind::DesignColor.table_name(), request.design_color_id)?
                .ok_or_else(|| {
                    RepositoryError::ConsistencyViolation(format!(
                        "设计颜色不存在: id={}",
                        request.design_color_id
                    ))
                })?;

        let derived = variation_display_name(&cabinet_name, &cabinet_color_name, &design_color_name);
        let name = request
            .name_override
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or(derived);
        let code = ensure_code(None, &name, VARIATION_CODE_PREFIX);

        let inserted = tx.execute(
            "INSERT INTO variations (
                cabinet_id, cabinet_color_id, design_color_id, code, name,
                main_image, gallery_images, active, is_default
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, 0)",
            params![
                cabinet_id,
                request.cabinet_color_id,
                request.design_color_id,
                code,
                name,
                request.main_image,
                encode_gallery(&request.gallery_images),
            ],
        );
        if let Err(e) = inserted {
            let err = RepositoryError::from(e);
            return Err(if is_triple_conflict(&err) {
                RepositoryError::DuplicateVariation {
                    cabinet_id,
                    cabinet_color_id: request.cabinet_color_id,
                    design_color_id: request.design_color_id,
                }
            } else {
                err
            });
        }
        let id = tx.last_insert_rowid();

        if request.is_default {
            Self::switch_default(&tx, cabinet_id, id)?;
        }

        let variation = Self::find_with(&tx, id)?
            .ok_or_else(|| RepositoryError::InternalError(format!("新建后无法读取 variations#{}", id)))?;
        tx.commit()?;

        info!(
            variation_id = variation.id,
            cabinet_id,
            is_default = variation.is_default,
            "变体已注册"
        );
        Ok(variation)
    }

    /// 设置柜体的默认变体（幂等）
    ///
    /// # 错误
    /// - 变体不属于该柜体时返回 NotFound
    pub fn set_default(&self, cabinet_id: i64, variation_id: i64) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let owned = tx
            .query_row(
                "SELECT 1 FROM variations WHERE id = ?1 AND cabinet_id = ?2",
                params![variation_id, cabinet_id],
                |_| Ok(()),
            )
            .optional()?;
        if owned.is_none() {
            return Err(RepositoryError::not_found("variations", variation_id));
        }

        Self::switch_default(&tx, cabinet_id, variation_id)?;
        tx.commit()?;
        Ok(())
    }

    /// 删除变体（不自动重新选举默认）
    pub fn delete(&self, cabinet_id: i64, variation_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM variations WHERE id = ?1 AND cabinet_id = ?2",
            params![variation_id, cabinet_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("variations", variation_id));
        }
        info!(variation_id, cabinet_id, "变体已删除");
        Ok(())
    }

    /// 按 id 升序列出柜体下的变体（未知柜体返回空）
    pub fn list_for_cabinet(&self, cabinet_id: i64, active_only: bool) -> RepositoryResult<Vec<Variation>> {
        let conn = self.get_conn()?;
        let filter = if active_only { "AND v.active = 1" } else { "" };
        let sql = format!(
            "SELECT {} FROM variations v WHERE v.cabinet_id = ?1 {} ORDER BY v.id ASC",
            VARIATION_SELECT, filter
        );
        let mut stmt = conn.prepare(&sql)?;
        let variations = stmt
            .query_map(params![cabinet_id], map_variation_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(variations)
    }

    pub fn find_by_id(&self, variation_id: i64) -> RepositoryResult<Option<Variation>> {
        let conn = self.get_conn()?;
        Self::find_with(&conn, variation_id)
    }

    /// 查询带颜色引用的变体（快照使用）
    ///
    /// 颜色行缺失的变体不会出现（内连接）
    pub fn list_details(&self, active_only: bool) -> RepositoryResult<Vec<VariationDetail>> {
        let conn = self.get_conn()?;
        Self::list_details_with(&conn, active_only)
    }

    pub(crate) fn list_details_with(
        conn: &Connection,
        active_only: bool,
    ) -> RepositoryResult<Vec<VariationDetail>> {
        let filter = if active_only { "WHERE v.active = 1" } else { "" };
        let sql = format!(
            "SELECT {}, cc.id, cc.code, cc.name, dc.id, dc.code, dc.name
             FROM variations v
             JOIN cabinet_colors cc ON cc.id = v.cabinet_color_id
             JOIN design_colors dc ON dc.id = v.design_color_id
             {}
             ORDER BY v.cabinet_id ASC, v.id ASC",
            VARIATION_SELECT, filter
        );
        let mut stmt = conn.prepare(&sql)?;
        let details = stmt
            .query_map([], |row| {
                Ok(VariationDetail {
                    variation: map_variation_row(row)?,
                    cabinet_color: ColorRef {
                        id: row.get(12)?,
                        code: row.get(13)?,
                        name: row.get(14)?,
                    },
                    design_color: ColorRef {
                        id: row.get(15)?,
                        code: row.get(16)?,
                        name: row.get(17)?,
                    },
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(details)
    }

    /// 覆盖媒体字段（合并逻辑由上层完成）
    pub fn set_media(
        &self,
        variation_id: i64,
        main_image: Option<&str>,
        gallery_images: &[String],
    ) -> RepositoryResult<Variation> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE variations SET main_image = ?1, gallery_images = ?2, updated_at = datetime('now')
             WHERE id = ?3",
            params![main_image, encode_gallery(gallery_images), variation_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("variations", variation_id));
        }
        Self::find_with(&conn, variation_id)?
            .ok_or_else(|| RepositoryError::not_found("variations", variation_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    struct Fixture {
        repo: VariationRepository,
        conn: Arc<Mutex<Connection>>,
    }

    fn fixture() -> Fixture {
        let conn = open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO cabinets (id, code, name) VALUES (1, 'cab-l', 'Каркас L');
            INSERT INTO cabinets (id, code, name) VALUES (2, 'cab-m', 'Каркас M');
            INSERT INTO cabinet_colors (id, code, name) VALUES (10, 'white', 'Белый');
            INSERT INTO cabinet_colors (id, code, name) VALUES (11, 'black', 'Чёрный');
            INSERT INTO design_colors (id, code, name) VALUES (10, 'oak', 'Дуб');
            INSERT INTO design_colors (id, code, name) VALUES (11, 'walnut', 'Орех');
            "#,
        )
        .unwrap();
        let conn = Arc::new(Mutex::new(conn));
        Fixture {
            repo: VariationRepository::from_connection(conn.clone()),
            conn,
        }
    }

    fn default_count(repo: &VariationRepository, cabinet_id: i64) -> usize {
        repo.list_for_cabinet(cabinet_id, false)
            .unwrap()
            .iter()
            .filter(|v| v.is_default)
            .count()
    }

    #[test]
    fn test_register_derives_name_and_code() {
        let f = fixture();
        let v = f.repo.register(1, &VariationRequest::new(10, 10)).unwrap();
        assert_eq!(v.name, "Каркас L · Белый + Дуб");
        // 名称中只有 "L" 可转为 slug
        let (slug, suffix) = v.code.rsplit_once('-').unwrap();
        assert_eq!(slug, "l");
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!v.is_default);
        assert!(v.active);
    }

    #[test]
    fn test_register_cyrillic_name_uses_fallback_prefix() {
        let f = fixture();
        let mut req = VariationRequest::new(10, 10);
        req.name_override = Some("Классика".to_string());
        let v = f.repo.register(1, &req).unwrap();
        assert!(v.code.starts_with("variation-"));
    }

    #[test]
    fn test_register_name_override() {
        let f = fixture();
        let mut req = VariationRequest::new(10, 11);
        req.name_override = Some("Classic".to_string());
        let v = f.repo.register(1, &req).unwrap();
        assert_eq!(v.name, "Classic");
        assert!(v.code.starts_with("classic-"));
    }

    #[test]
    fn test_register_duplicate_triple() {
        let f = fixture();
        f.repo.register(1, &VariationRequest::new(10, 10)).unwrap();
        let err = f.repo.register(1, &VariationRequest::new(10, 10)).unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateVariation { .. }));

        // 颜色角色互换是不同的三元组
        f.repo.register(1, &VariationRequest::new(11, 10)).unwrap();
        f.repo.register(1, &VariationRequest::new(10, 11)).unwrap();
    }

    #[test]
    fn test_register_unknown_cabinet_and_color() {
        let f = fixture();
        let err = f.repo.register(99, &VariationRequest::new(10, 10)).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));

        let err = f.repo.register(1, &VariationRequest::new(10, 99)).unwrap_err();
        assert!(matches!(err, RepositoryError::ConsistencyViolation(_)));
    }

    #[test]
    fn test_default_switch_keeps_single_default() {
        let f = fixture();
        let a = f.repo.register(1, &VariationRequest::new(10, 10).as_default()).unwrap();
        let b = f.repo.register(1, &VariationRequest::new(11, 10).as_default()).unwrap();
        assert_eq!(default_count(&f.repo, 1), 1);
        assert!(f.repo.find_by_id(b.id).unwrap().unwrap().is_default);

        f.repo.set_default(1, a.id).unwrap();
        f.repo.set_default(1, a.id).unwrap();
        assert_eq!(default_count(&f.repo, 1), 1);
        assert!(f.repo.find_by_id(a.id).unwrap().unwrap().is_default);
    }

    #[test]
    fn test_set_default_wrong_cabinet() {
        let f = fixture();
        let v = f.repo.register(1, &VariationRequest::new(10, 10)).unwrap();
        let err = f.repo.set_default(2, v.id).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
        assert_eq!(default_count(&f.repo, 1), 0);
    }

    #[test]
    fn test_delete_leaves_zero_defaults() {
        let f = fixture();
        let v = f.repo.register(1, &VariationRequest::new(10, 10).as_default()).unwrap();
        f.repo.delete(1, v.id).unwrap();
        assert_eq!(default_count(&f.repo, 1), 0);
        assert!(matches!(
            f.repo.delete(1, v.id).unwrap_err(),
            RepositoryError::NotFound { .. }
        ));
    }

    #[test]
    fn test_cabinet_delete_cascades() {
        let f = fixture();
        f.repo.register(1, &VariationRequest::new(10, 10)).unwrap();
        f.conn
            .lock()
            .unwrap()
            .execute("DELETE FROM cabinets WHERE id = 1", [])
            .unwrap();
        assert!(f.repo.list_for_cabinet(1, false).unwrap().is_empty());
    }

    #[test]
    fn test_list_details_joins_colors() {
        let f = fixture();
        f.repo.register(2, &VariationRequest::new(11, 11)).unwrap();
        let details = f.repo.list_details(true).unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].cabinet_color.code, "black");
        assert_eq!(details[0].design_color.name, "Орех");
    }
}
