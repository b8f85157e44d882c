// ==========================================
// 咖啡售货亭配置器 - SQLite 连接初始化与建库
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键必须逐连接开启）
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 建表幂等，启动/测试均可重复调用
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启（级联删除 cabinet → variations 依赖它）
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 打开内存库（测试/一次性工具使用），同样完成建表
pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// 目录表（整机/冰箱/柜体/终端）公共列
const CATALOG_COLUMNS: &str = r#"
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    specs TEXT NOT NULL DEFAULT '',
    price INTEGER NOT NULL DEFAULT 0,
    main_image TEXT,
    gallery_images TEXT NOT NULL DEFAULT '[]',
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
"#;

/// 颜色表（柜体颜色/设计颜色）公共列
const COLOR_COLUMNS: &str = r#"
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    price_delta INTEGER NOT NULL DEFAULT 0,
    main_image TEXT,
    gallery_images TEXT NOT NULL DEFAULT '[]',
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
"#;

/// 初始化数据库 schema（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    let mut ddl = String::new();

    ddl.push_str(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    );

    ddl.push_str(&format!(
        "CREATE TABLE IF NOT EXISTS coffee_machines ({}, short_title TEXT);\n",
        CATALOG_COLUMNS
    ));
    for table in ["fridges", "cabinets", "terminals"] {
        ddl.push_str(&format!(
            "CREATE TABLE IF NOT EXISTS {} ({});\n",
            table, CATALOG_COLUMNS
        ));
    }
    for table in ["cabinet_colors", "design_colors"] {
        ddl.push_str(&format!(
            "CREATE TABLE IF NOT EXISTS {} ({});\n",
            table, COLOR_COLUMNS
        ));
    }

    ddl.push_str(
        r#"
        CREATE TABLE IF NOT EXISTS variations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            cabinet_id INTEGER NOT NULL REFERENCES cabinets(id) ON DELETE CASCADE,
            cabinet_color_id INTEGER NOT NULL REFERENCES cabinet_colors(id),
            design_color_id INTEGER NOT NULL REFERENCES design_colors(id),
            code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            main_image TEXT,
            gallery_images TEXT NOT NULL DEFAULT '[]',
            active INTEGER NOT NULL DEFAULT 1,
            is_default INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            CONSTRAINT uq_variation_triple UNIQUE (cabinet_id, cabinet_color_id, design_color_id)
        );

        CREATE INDEX IF NOT EXISTS idx_variations_cabinet ON variations(cabinet_id);

        -- 每个柜体至多一个默认变体
        CREATE UNIQUE INDEX IF NOT EXISTS uq_variations_single_default
            ON variations(cabinet_id) WHERE is_default = 1;

        -- 除 variation_id 外的引用不建外键：允许孤儿引用，由读取方容忍
        CREATE TABLE IF NOT EXISTS bundles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            machine_id INTEGER NOT NULL,
            fridge_id INTEGER,
            cabinet_id INTEGER NOT NULL,
            cabinet_color_id INTEGER NOT NULL,
            design_color_id INTEGER NOT NULL,
            variation_id INTEGER REFERENCES variations(id) ON DELETE SET NULL,
            terminal_id INTEGER,
            custom_price INTEGER,
            ozon_url TEXT,
            is_available INTEGER NOT NULL DEFAULT 1,
            show_on_site INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_bundles_match
            ON bundles(machine_id, cabinet_id, cabinet_color_id, design_color_id);
        "#,
    );

    conn.execute_batch(&ddl)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let conn = open_in_memory().unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_schema_version_absent_on_empty_db() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);
    }
}
