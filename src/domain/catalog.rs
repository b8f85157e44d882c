// ==========================================
// 咖啡售货亭配置器 - 目录与颜色领域模型
// ==========================================
// 对齐: coffee_machines / fridges / cabinets / terminals 表
// 对齐: cabinet_colors / design_colors 表
// ==========================================

use crate::domain::types::{CatalogKind, ColorKind};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// CatalogItem - 目录部件
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    pub kind: CatalogKind,
    pub code: String,                // 唯一外部编码
    pub name: String,
    pub short_title: Option<String>, // 仅咖啡机
    pub specs: String,               // 换行分隔的要点
    pub price: i64,                  // 最小货币单位
    pub main_image: Option<String>,  // 媒体引用（不透明字符串）
    pub gallery_images: Vec<String>,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

/// 新建目录部件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCatalogItem {
    pub code: Option<String>, // 为空时按名称自动生成
    pub name: String,
    pub short_title: Option<String>,
    pub specs: String,
    pub price: i64,
    pub main_image: Option<String>,
    pub gallery_images: Vec<String>,
    pub active: bool,
}

impl NewCatalogItem {
    pub fn new(name: impl Into<String>, price: i64) -> Self {
        Self {
            name: name.into(),
            price,
            active: true,
            ..Default::default()
        }
    }
}

/// 目录部件局部更新（None 表示保持不变）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogItemPatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub short_title: Option<Option<String>>,
    pub specs: Option<String>,
    pub price: Option<i64>,
    pub main_image: Option<Option<String>>,
    pub gallery_images: Option<Vec<String>>,
    pub active: Option<bool>,
}

// ==========================================
// ColorOption - 颜色选项
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorOption {
    pub id: i64,
    pub kind: ColorKind,
    pub code: String,
    pub name: String,
    pub price_delta: i64, // 有符号，叠加到计算价格
    pub main_image: Option<String>,
    pub gallery_images: Vec<String>,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewColorOption {
    pub code: Option<String>,
    pub name: String,
    pub price_delta: i64,
    pub main_image: Option<String>,
    pub gallery_images: Vec<String>,
    pub active: bool,
}

impl NewColorOption {
    pub fn new(name: impl Into<String>, price_delta: i64) -> Self {
        Self {
            name: name.into(),
            price_delta,
            active: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColorOptionPatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub price_delta: Option<i64>,
    pub main_image: Option<Option<String>>,
    pub gallery_images: Option<Vec<String>>,
    pub active: Option<bool>,
}

// ==========================================
// MediaAttachment - 已持久化媒体的引用
// ==========================================
// 由外部媒体存储返回的不透明引用；核心只保存不做 I/O
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaAttachment {
    pub main_image: Option<String>,   // 替换主图
    pub gallery_append: Vec<String>,  // 追加到图库
}

impl MediaAttachment {
    pub fn is_empty(&self) -> bool {
        self.main_image.as_deref().map_or(true, |s| s.trim().is_empty())
            && self.gallery_append.iter().all(|s| s.trim().is_empty())
    }
}
