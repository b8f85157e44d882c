// ==========================================
// 咖啡售货亭配置器 - 表格行仓储
// ==========================================
// 职责: 按列清单读出整表 / 在单个事务内按主键 upsert 已转换的行
// 红线: 任一行失败则整批回滚
// ==========================================

use crate::engine::code_gen::ensure_code;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::tabular::cell::FieldValue;
use crate::tabular::converter::ConvertedRow;
use crate::tabular::error::{TabularError, TabularResult};
use crate::tabular::schema::TableSchema;
use crate::tabular::ImportSummary;
use rusqlite::types::ToSql;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use tracing::debug;

enum RowOutcome {
    Created,
    Updated,
    Skipped,
}

// ==========================================
// TabularRowRepository - 通用行读写
// ==========================================
pub struct TabularRowRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TabularRowRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按列清单顺序读出全部行（id 升序）
    pub fn export_rows(&self, schema: &TableSchema) -> RepositoryResult<Vec<Vec<FieldValue>>> {
        let conn = self.get_conn()?;
        let columns = schema.column_names();
        let sql = format!(
            "SELECT {} FROM {} ORDER BY {} ASC",
            columns.join(", "),
            schema.table_name(),
            schema.primary_key()
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(columns.len());
            for idx in 0..columns.len() {
                values.push(FieldValue::from_sql(row.get_ref(idx)?));
            }
            out.push(values);
        }
        Ok(out)
    }

    /// 在单个事务内应用所有行
    ///
    /// - 主键存在且命中: 用该行提供的字段更新（允许部分列）
    /// - 否则新建（自增 id，编码缺失时自动生成）
    /// - NOT NULL 列得到 NULL 时跳过该列
    pub fn apply_rows(&self, schema: &TableSchema, rows: &[ConvertedRow]) -> TabularResult<ImportSummary> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction().map_err(RepositoryError::from)?;

        let mut summary = ImportSummary::default();
        for row in rows {
            let outcome = Self::apply_row(&tx, schema, row).map_err(|source| TabularError::RowWriteFailed {
                row: row.row_number,
                source,
            })?;
            match outcome {
                RowOutcome::Created => summary.created += 1,
                RowOutcome::Updated => summary.updated += 1,
                RowOutcome::Skipped => summary.skipped += 1,
            }
        }

        tx.commit().map_err(RepositoryError::from)?;
        Ok(summary)
    }

    fn apply_row(conn: &Connection, schema: &TableSchema, row: &ConvertedRow) -> RepositoryResult<RowOutcome> {
        if row.is_empty() {
            return Ok(RowOutcome::Skipped);
        }

        let writable: Vec<(&str, &FieldValue)> = row
            .fields
            .iter()
            .filter(|(col, value)| col.nullable || !value.is_null())
            .map(|(col, value)| (col.name, value))
            .collect();

        let existing = match row.primary_key {
            Some(id) => conn
                .query_row(
                    &format!(
                        "SELECT {pk} FROM {} WHERE {pk} = ?1",
                        schema.table_name(),
                        pk = schema.primary_key()
                    ),
                    params![id],
                    |r| r.get::<_, i64>(0),
                )
                .optional()?,
            None => None,
        };

        if let Some(id) = existing {
            if writable.is_empty() {
                return Ok(RowOutcome::Skipped);
            }
            let assignments: Vec<String> = writable
                .iter()
                .enumerate()
                .map(|(idx, (name, _))| format!("{} = ?{}", name, idx + 1))
                .collect();
            let sql = format!(
                "UPDATE {} SET {} WHERE {} = ?{}",
                schema.table_name(),
                assignments.join(", "),
                schema.primary_key(),
                writable.len() + 1
            );
            let mut values: Vec<&dyn ToSql> = writable.iter().map(|(_, v)| *v as &dyn ToSql).collect();
            values.push(&id);
            conn.execute(&sql, params_from_iter(values))?;
            debug!(table = schema.table_name(), id, "导入行已更新");
            return Ok(RowOutcome::Updated);
        }

        // 新建: 编码缺失或已被占用时按名称重新生成
        let mut names: Vec<&str> = Vec::new();
        let mut values: Vec<FieldValue> = Vec::new();
        for (name, value) in &writable {
            if *name == "code" {
                match value {
                    FieldValue::Text(s) if s.trim().is_empty() => continue,
                    FieldValue::Text(s) if Self::code_taken(conn, schema, s)? => {
                        debug!(table = schema.table_name(), code = %s, "导入编码已被占用，重新生成");
                        continue;
                    }
                    _ => {}
                }
            }
            names.push(*name);
            values.push((*value).clone());
        }
        if !names.contains(&"code") {
            let display_name = match row.field("name") {
                Some(FieldValue::Text(s)) => s.clone(),
                _ => String::new(),
            };
            names.push("code");
            values.push(FieldValue::Text(ensure_code(
                None,
                &display_name,
                schema.kind.code_prefix(),
            )));
        }

        let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            schema.table_name(),
            names.join(", "),
            placeholders.join(", ")
        );
        conn.execute(&sql, params_from_iter(values.iter()))?;
        debug!(table = schema.table_name(), id = conn.last_insert_rowid(), "导入行已新建");
        Ok(RowOutcome::Created)
    }

    fn code_taken(conn: &Connection, schema: &TableSchema, code: &str) -> RepositoryResult<bool> {
        let found = conn
            .query_row(
                &format!("SELECT 1 FROM {} WHERE code = ?1", schema.table_name()),
                params![code],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }
}
