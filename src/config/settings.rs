// ==========================================
// 咖啡售货亭配置器 - 运行配置
// ==========================================
// 来源: 环境变量（缺省值见各字段）
// - COFFEEZONE_DB_PATH:         SQLite 文件路径（缺省为用户数据目录）
// - COFFEEZONE_PUBLIC_BASE_URL: 媒体绝对 URL 的基础地址
// - COFFEEZONE_LOCALE:          界面语言（ru / en）
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "COFFEEZONE_DB_PATH";
pub const ENV_PUBLIC_BASE_URL: &str = "COFFEEZONE_PUBLIC_BASE_URL";
pub const ENV_LOCALE: &str = "COFFEEZONE_LOCALE";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_LOCALE: &str = "ru";
pub const SUPPORTED_LOCALES: [&str; 2] = ["ru", "en"];

const DB_FILE_NAME: &str = "coffeezone.db";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    pub db_path: String,
    pub public_base_url: String,
    pub locale: String,
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AppSettings {
    /// 从环境变量读取
    pub fn from_env() -> Self {
        let locale = non_empty_env(ENV_LOCALE)
            .map(|l| l.to_lowercase())
            .filter(|l| SUPPORTED_LOCALES.contains(&l.as_str()))
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        Self {
            db_path: non_empty_env(ENV_DB_PATH).unwrap_or_else(default_db_path),
            public_base_url: non_empty_env(ENV_PUBLIC_BASE_URL)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            locale,
        }
    }

    /// 指定数据库路径（测试/工具使用）
    pub fn with_db_path(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            public_base_url: DEFAULT_BASE_URL.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

/// 缺省数据库路径: <用户数据目录>/coffeezone-configurator/coffeezone.db
///
/// 无法取得数据目录时回退到当前目录
pub fn default_db_path() -> String {
    let mut path = PathBuf::from(format!("./{}", DB_FILE_NAME));

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("coffeezone-configurator");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join(DB_FILE_NAME);
        }
    }

    path.to_string_lossy().to_string()
}
