// ==========================================
// 咖啡售货亭配置器 - 柜体变体领域模型
// ==========================================
// 变体 = 柜体 × 柜体颜色 × 设计颜色
// 不变量 A: (cabinet_id, cabinet_color_id, design_color_id) 唯一
// 不变量 B: 同一柜体下至多一个 is_default = true
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    pub id: i64,
    pub cabinet_id: i64,
    pub cabinet_color_id: i64,
    pub design_color_id: i64,
    pub code: String,
    pub name: String, // "<柜体> · <柜体颜色> + <设计颜色>"
    pub main_image: Option<String>,
    pub gallery_images: Vec<String>,
    pub active: bool,
    pub is_default: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Variation {
    /// 变体的颜色三元组
    pub fn triple(&self) -> (i64, i64, i64) {
        (self.cabinet_id, self.cabinet_color_id, self.design_color_id)
    }
}

/// 注册变体请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariationRequest {
    pub cabinet_color_id: i64,
    pub design_color_id: i64,
    pub name_override: Option<String>,
    pub main_image: Option<String>,
    pub gallery_images: Vec<String>,
    pub is_default: bool,
}

impl VariationRequest {
    pub fn new(cabinet_color_id: i64, design_color_id: i64) -> Self {
        Self {
            cabinet_color_id,
            design_color_id,
            ..Default::default()
        }
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }
}

/// 生成变体展示名
pub fn variation_display_name(cabinet: &str, cabinet_color: &str, design_color: &str) -> String {
    format!("{} · {} + {}", cabinet, cabinet_color, design_color)
}

/// 颜色引用（变体展示用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRef {
    pub id: i64,
    pub code: String,
    pub name: String,
}

/// 带颜色引用的变体（读取侧联表结果）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationDetail {
    pub variation: Variation,
    pub cabinet_color: ColorRef,
    pub design_color: ColorRef,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(
            variation_display_name("Каркас L", "Белый", "Дуб"),
            "Каркас L · Белый + Дуб"
        );
    }

    #[test]
    fn test_request_builder() {
        let req = VariationRequest::new(3, 4).as_default();
        assert_eq!(req.cabinet_color_id, 3);
        assert_eq!(req.design_color_id, 4);
        assert!(req.is_default);
        assert!(req.name_override.is_none());
    }
}
