// ==========================================
// 咖啡售货亭配置器 - 套装领域模型
// ==========================================
// 套装 = 策划好的固定组合（可自定义价格）
// 约定: fridge_id / terminal_id 为 NULL 表示“明确不含”
// 约定: cabinet/颜色 id 从挂接的变体复制（冗余，仅为匹配加速）
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    pub id: i64,
    pub name: String,
    pub machine_id: i64,
    pub fridge_id: Option<i64>,
    pub cabinet_id: i64,
    pub cabinet_color_id: i64,
    pub design_color_id: i64,
    pub variation_id: Option<i64>,
    pub terminal_id: Option<i64>,
    pub custom_price: Option<i64>,
    pub ozon_url: Option<String>,
    pub is_available: bool,
    pub show_on_site: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// ==========================================
// BundleDraft - 新建套装
// ==========================================
// 不提供 cabinet/颜色 字段：只能通过挂接变体获得
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleDraft {
    pub name: String,
    pub variation_id: i64,
    pub machine_id: i64,
    pub fridge_id: Option<i64>,
    pub terminal_id: Option<i64>,
    pub custom_price: Option<i64>,
    pub ozon_url: Option<String>,
    pub is_available: bool,
    pub show_on_site: bool,
}

impl BundleDraft {
    pub fn new(name: impl Into<String>, variation_id: i64, machine_id: i64) -> Self {
        Self {
            name: name.into(),
            variation_id,
            machine_id,
            fridge_id: None,
            terminal_id: None,
            custom_price: None,
            ozon_url: None,
            is_available: true,
            show_on_site: true,
        }
    }
}

/// 套装局部更新
///
/// - 外层 None: 保持不变
/// - Some(None): 显式置空（fridge/terminal 表示“不含”）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BundlePatch {
    pub name: Option<String>,
    pub variation_id: Option<i64>, // 重新挂接变体（同时复制 cabinet/颜色）
    pub machine_id: Option<i64>,
    pub fridge_id: Option<Option<i64>>,
    pub terminal_id: Option<Option<i64>>,
    pub custom_price: Option<Option<i64>>,
    pub ozon_url: Option<Option<String>>,
    pub is_available: Option<bool>,
    pub show_on_site: Option<bool>,
}

// ==========================================
// BundleSelection - 用户的完整选择
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleSelection {
    pub machine_id: i64,
    pub cabinet_id: i64,
    pub cabinet_color_id: i64,
    pub design_color_id: i64,
    pub fridge_id: Option<i64>,     // None = 不要冰箱
    pub terminal_id: Option<i64>,   // None = 不要终端
    pub variation_id: Option<i64>,  // 可选的额外过滤
}

impl BundleSelection {
    pub fn new(machine_id: i64, cabinet_id: i64, cabinet_color_id: i64, design_color_id: i64) -> Self {
        Self {
            machine_id,
            cabinet_id,
            cabinet_color_id,
            design_color_id,
            ..Default::default()
        }
    }

    pub fn with_fridge(mut self, fridge_id: i64) -> Self {
        self.fridge_id = Some(fridge_id);
        self
    }

    pub fn with_terminal(mut self, terminal_id: i64) -> Self {
        self.terminal_id = Some(terminal_id);
        self
    }

    pub fn with_variation(mut self, variation_id: i64) -> Self {
        self.variation_id = Some(variation_id);
        self
    }
}

// ==========================================
// PreviewResult - 预览结果
// ==========================================
// is_exact_bundle = false 时只给出计算价格
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewResult {
    pub is_exact_bundle: bool,
    pub bundle_id: Option<i64>,
    pub custom_price: Option<i64>,
    pub ozon_url: Option<String>,
    pub computed_price: i64,
}

impl PreviewResult {
    pub fn not_exact(computed_price: i64) -> Self {
        Self {
            is_exact_bundle: false,
            bundle_id: None,
            custom_price: None,
            ozon_url: None,
            computed_price,
        }
    }

    pub fn exact(bundle: &Bundle, computed_price: i64) -> Self {
        Self {
            is_exact_bundle: true,
            bundle_id: Some(bundle.id),
            custom_price: bundle.custom_price,
            ozon_url: bundle.ozon_url.clone(),
            computed_price,
        }
    }

    /// 最终价格：自定义价格优先
    pub fn effective_price(&self) -> i64 {
        self.custom_price.unwrap_or(self.computed_price)
    }
}

// ==========================================
// BundleSummary - 后台列表行
// ==========================================
// 引用对象已被删除时显示为 "-"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleSummary {
    pub id: i64,
    pub name: String,
    pub machine: String,
    pub fridge: String,
    pub variation: String,
    pub terminal: String,
    pub custom_price: Option<i64>,
    pub ozon_url: Option<String>,
    pub is_available: bool,
    pub show_on_site: bool,
}
