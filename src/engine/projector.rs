// ==========================================
// 咖啡售货亭配置器 - 展示投影
// ==========================================
// 职责: 把存储记录展开为对外展示结构
// - 相对媒体引用 -> 绝对 URL（已带 scheme 的保持不变）
// - 多行 specs -> 去空白、去空行的列表
// - 图库 JSON -> 有序列表（损坏时为空列表）
// 红线: 纯函数，不访问存储
// ==========================================

use crate::domain::catalog::{CatalogItem, ColorOption};
use crate::domain::types::CatalogKind;
use crate::domain::variation::{ColorRef, VariationDetail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 引用是否已是绝对 URL：`scheme://...` 或 `data:` 内联数据
///
/// `a:b.jpg` 这类带冒号的文件名仍按相对路径处理
fn has_scheme(reference: &str) -> bool {
    let Some((scheme, rest)) = reference.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return false;
    }
    rest.starts_with("//") || scheme.eq_ignore_ascii_case("data")
}

/// 把媒体引用解析为绝对 URL，基础地址与相对路径之间恰好一个 "/"
pub fn absolute_url(base_url: &str, reference: &str) -> String {
    if has_scheme(reference) {
        return reference.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        reference.trim_start_matches('/')
    )
}

/// 可选媒体引用（空白视为不存在）
pub fn resolve_media(base_url: &str, reference: Option<&str>) -> Option<String> {
    reference
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(|r| absolute_url(base_url, r))
}

pub fn resolve_gallery(base_url: &str, gallery: &[String]) -> Vec<String> {
    gallery
        .iter()
        .filter_map(|r| resolve_media(base_url, Some(r)))
        .collect()
}

/// 按行拆分 specs
pub fn split_specs(specs: &str) -> Vec<String> {
    specs
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

// ==========================================
// 展示结构
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItemView {
    pub id: i64,
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_title: Option<String>,
    pub price: i64,
    pub main_image_url: Option<String>,
    pub gallery_image_urls: Vec<String>,
    pub specs_short: Vec<String>,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorView {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub price_delta: i64,
    pub main_image_url: Option<String>,
    pub gallery_image_urls: Vec<String>,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationView {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub cabinet_color: ColorRef,
    pub design_color: ColorRef,
    pub main_image_url: Option<String>,
    pub gallery_image_urls: Vec<String>,
    pub active: bool,
    pub is_default: bool,
}

/// 柜体及其变体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CabinetView {
    #[serde(flatten)]
    pub cabinet: CatalogItemView,
    pub variations: Vec<VariationView>,
}

/// 全量目录快照
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub machines: Vec<CatalogItemView>,
    pub fridges: Vec<CatalogItemView>,
    pub cabinets: Vec<CatalogItemView>,
    pub terminals: Vec<CatalogItemView>,
    pub cabinet_colors: Vec<ColorView>,
    pub design_colors: Vec<ColorView>,
    pub variations: BTreeMap<i64, Vec<VariationView>>, // 按 cabinet_id 分组
}

// ==========================================
// Projector - 绑定基础地址的投影器
// ==========================================
#[derive(Debug, Clone)]
pub struct Projector {
    base_url: String,
}

impl Projector {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn catalog_item(&self, item: &CatalogItem) -> CatalogItemView {
        CatalogItemView {
            id: item.id,
            code: item.code.clone(),
            name: item.name.clone(),
            short_title: if item.kind == CatalogKind::Machine {
                item.short_title.clone()
            } else {
                None
            },
            price: item.price,
            main_image_url: resolve_media(&self.base_url, item.main_image.as_deref()),
            gallery_image_urls: resolve_gallery(&self.base_url, &item.gallery_images),
            specs_short: split_specs(&item.specs),
            active: item.active,
        }
    }

    pub fn color(&self, color: &ColorOption) -> ColorView {
        ColorView {
            id: color.id,
            code: color.code.clone(),
            name: color.name.clone(),
            price_delta: color.price_delta,
            main_image_url: resolve_media(&self.base_url, color.main_image.as_deref()),
            gallery_image_urls: resolve_gallery(&self.base_url, &color.gallery_images),
            active: color.active,
        }
    }

    pub fn variation(&self, detail: &VariationDetail) -> VariationView {
        let v = &detail.variation;
        VariationView {
            id: v.id,
            code: v.code.clone(),
            name: v.name.clone(),
            cabinet_color: detail.cabinet_color.clone(),
            design_color: detail.design_color.clone(),
            main_image_url: resolve_media(&self.base_url, v.main_image.as_deref()),
            gallery_image_urls: resolve_gallery(&self.base_url, &v.gallery_images),
            active: v.active,
            is_default: v.is_default,
        }
    }

    /// 变体按 cabinet_id 分组（组内保持输入顺序）
    pub fn group_variations(&self, details: &[VariationDetail]) -> BTreeMap<i64, Vec<VariationView>> {
        let mut grouped: BTreeMap<i64, Vec<VariationView>> = BTreeMap::new();
        for detail in details {
            grouped
                .entry(detail.variation.cabinet_id)
                .or_default()
                .push(self.variation(detail));
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gallery::parse_gallery;
    use chrono::NaiveDate;

    const BASE: &str = "https://kiosk.example/";

    #[test]
    fn test_absolute_url_single_separator() {
        assert_eq!(absolute_url(BASE, "/media/a.jpg"), "https://kiosk.example/media/a.jpg");
        assert_eq!(absolute_url("https://kiosk.example", "media/a.jpg"), "https://kiosk.example/media/a.jpg");
        assert_eq!(absolute_url(BASE, "http://x/a.jpg"), "http://x/a.jpg");
        assert_eq!(absolute_url(BASE, "data:image/png;base64,AA"), "data:image/png;base64,AA");
    }

    #[test]
    fn test_colon_in_file_name_is_relative() {
        assert_eq!(absolute_url(BASE, "a:b.jpg"), "https://kiosk.example/a:b.jpg");
        assert_eq!(absolute_url(BASE, "media/a:b.jpg"), "https://kiosk.example/media/a:b.jpg");
        assert_eq!(absolute_url(BASE, "HTTPS://cdn.example/a.jpg"), "HTTPS://cdn.example/a.jpg");
    }

    #[test]
    fn test_resolve_media_blank_is_none() {
        assert_eq!(resolve_media(BASE, Some("  ")), None);
        assert_eq!(resolve_media(BASE, None), None);
    }

    #[test]
    fn test_split_specs() {
        assert_eq!(
            split_specs("  Помол 3 ступени \r\n\n Бойлер 1.5 л\n   "),
            vec!["Помол 3 ступени".to_string(), "Бойлер 1.5 л".to_string()]
        );
        assert!(split_specs("").is_empty());
    }

    #[test]
    fn test_gallery_projection() {
        let base = "https://k.example";
        let stored = parse_gallery(Some("[\"a.jpg\",\"b.jpg\"]"));
        assert_eq!(
            resolve_gallery(base, &stored),
            vec!["https://k.example/a.jpg".to_string(), "https://k.example/b.jpg".to_string()]
        );
        assert!(resolve_gallery(base, &parse_gallery(Some("not json"))).is_empty());
        assert_eq!(
            resolve_gallery(base, &parse_gallery(Some("[\"http://x/a.jpg\"]"))),
            vec!["http://x/a.jpg".to_string()]
        );
    }

    #[test]
    fn test_catalog_item_view_hides_short_title_for_non_machine() {
        let item = CatalogItem {
            id: 1,
            kind: CatalogKind::Fridge,
            code: "f".to_string(),
            name: "Fridge".to_string(),
            short_title: Some("ignored".to_string()),
            specs: "a\nb".to_string(),
            price: 10,
            main_image: Some("f.jpg".to_string()),
            gallery_images: vec![],
            active: true,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
        };
        let view = Projector::new("http://h").catalog_item(&item);
        assert_eq!(view.short_title, None);
        assert_eq!(view.main_image_url.as_deref(), Some("http://h/f.jpg"));
        assert_eq!(view.specs_short.len(), 2);
    }
}
