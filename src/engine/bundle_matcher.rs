// ==========================================
// 咖啡售货亭配置器 - 套装精确匹配
// ==========================================
// 匹配规则:
// - machine / cabinet / cabinet_color / design_color 必须相等
// - fridge / terminal: 未提供只匹配存储为 NULL 的套装；提供则只匹配相同 id
// - variation_id 提供时作为附加相等条件
// 多个套装同时命中时取 id 最小者（存储层不保证唯一）
// ==========================================

use crate::domain::bundle::{Bundle, BundleSelection};
use crate::repository::bundle_repo::BundleRepository;
use crate::repository::error::RepositoryResult;
use std::sync::Arc;
use tracing::{debug, warn};

/// 套装是否与选择完全一致
pub fn matches_selection(bundle: &Bundle, selection: &BundleSelection) -> bool {
    bundle.machine_id == selection.machine_id
        && bundle.cabinet_id == selection.cabinet_id
        && bundle.cabinet_color_id == selection.cabinet_color_id
        && bundle.design_color_id == selection.design_color_id
        && bundle.fridge_id == selection.fridge_id
        && bundle.terminal_id == selection.terminal_id
        && selection
            .variation_id
            .map_or(true, |vid| bundle.variation_id == Some(vid))
}

pub struct BundleMatcher {
    bundle_repo: Arc<BundleRepository>,
}

impl BundleMatcher {
    pub fn new(bundle_repo: Arc<BundleRepository>) -> Self {
        Self { bundle_repo }
    }

    /// 查找与选择完全一致的套装
    pub fn find_exact(&self, selection: &BundleSelection) -> RepositoryResult<Option<Bundle>> {
        let candidates = self.bundle_repo.find_candidates(
            selection.machine_id,
            selection.cabinet_id,
            selection.cabinet_color_id,
            selection.design_color_id,
        )?;

        let mut matched = candidates
            .into_iter()
            .filter(|b| matches_selection(b, selection));
        let first = matched.next();

        let extra = matched.count();
        if extra > 0 {
            warn!(
                bundle_id = first.as_ref().map(|b| b.id),
                extra,
                "多个套装匹配同一选择，取 id 最小者"
            );
        }
        debug!(?selection, found = first.is_some(), "套装匹配完成");
        Ok(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bundle(fridge_id: Option<i64>, terminal_id: Option<i64>) -> Bundle {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        Bundle {
            id: 1,
            name: "B".to_string(),
            machine_id: 1,
            fridge_id,
            cabinet_id: 2,
            cabinet_color_id: 3,
            design_color_id: 4,
            variation_id: Some(9),
            terminal_id,
            custom_price: None,
            ozon_url: None,
            is_available: true,
            show_on_site: true,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_absent_matches_only_null() {
        let b = bundle(None, None);
        let sel = BundleSelection::new(1, 2, 3, 4);
        assert!(matches_selection(&b, &sel));
        assert!(!matches_selection(&b, &sel.with_fridge(5)));
        assert!(!matches_selection(&b, &sel.with_terminal(6)));
    }

    #[test]
    fn test_present_matches_only_same_id() {
        let b = bundle(Some(5), Some(6));
        let sel = BundleSelection::new(1, 2, 3, 4);
        assert!(!matches_selection(&b, &sel));
        assert!(matches_selection(&b, &sel.with_fridge(5).with_terminal(6)));
        assert!(!matches_selection(&b, &sel.with_fridge(7).with_terminal(6)));
    }

    #[test]
    fn test_variation_filter() {
        let b = bundle(None, None);
        let sel = BundleSelection::new(1, 2, 3, 4);
        assert!(matches_selection(&b, &sel.with_variation(9)));
        assert!(!matches_selection(&b, &sel.with_variation(8)));
    }
}
