// ==========================================
// 咖啡售货亭配置器 - 公开读取 API
// ==========================================
// 职责:
// 1. 按种类列出有效记录（媒体解析为绝对 URL）
// 2. 全量目录快照（含按柜体分组的变体）
// 3. 套装列表与选择预览（精确匹配 + 计算价格）
// ==========================================

use std::sync::Arc;

use tracing::debug;

use crate::api::error::ApiResult;
use crate::domain::bundle::{Bundle, BundleSelection, PreviewResult};
use crate::domain::catalog::{CatalogItem, ColorOption};
use crate::domain::types::{CatalogKind, ColorKind};
use crate::engine::bundle_matcher::BundleMatcher;
use crate::engine::pricing::PriceCalculator;
use crate::engine::projector::{
    CabinetView, CatalogItemView, CatalogSnapshot, ColorView, Projector,
};
use crate::repository::bundle_repo::BundleRepository;
use crate::repository::catalog_repo::CatalogItemRepository;
use crate::repository::color_repo::ColorOptionRepository;
use crate::repository::snapshot_repo::SnapshotRepository;
use crate::repository::variation_repo::VariationRepository;

pub struct CatalogApi {
    catalog_repo: Arc<CatalogItemRepository>,
    color_repo: Arc<ColorOptionRepository>,
    variation_repo: Arc<VariationRepository>,
    bundle_repo: Arc<BundleRepository>,
    snapshot_repo: Arc<SnapshotRepository>,
    matcher: BundleMatcher,
    pricing: PriceCalculator,
}

impl CatalogApi {
    pub fn new(
        catalog_repo: Arc<CatalogItemRepository>,
        color_repo: Arc<ColorOptionRepository>,
        variation_repo: Arc<VariationRepository>,
        bundle_repo: Arc<BundleRepository>,
        snapshot_repo: Arc<SnapshotRepository>,
    ) -> Self {
        Self {
            matcher: BundleMatcher::new(bundle_repo.clone()),
            pricing: PriceCalculator::new(catalog_repo.clone(), color_repo.clone()),
            catalog_repo,
            color_repo,
            variation_repo,
            bundle_repo,
            snapshot_repo,
        }
    }

    /// 列出某种部件的有效记录（id 升序）
    pub fn list_active_items(&self, kind: CatalogKind, base_url: &str) -> ApiResult<Vec<CatalogItemView>> {
        let projector = Projector::new(base_url);
        Ok(self
            .catalog_repo
            .list(kind, true)?
            .iter()
            .map(|item| projector.catalog_item(item))
            .collect())
    }

    pub fn list_active_colors(&self, kind: ColorKind, base_url: &str) -> ApiResult<Vec<ColorView>> {
        let projector = Projector::new(base_url);
        Ok(self
            .color_repo
            .list(kind, true)?
            .iter()
            .map(|color| projector.color(color))
            .collect())
    }

    /// 有效柜体及其有效变体
    pub fn list_cabinets(&self, base_url: &str) -> ApiResult<Vec<CabinetView>> {
        let projector = Projector::new(base_url);
        let mut grouped = projector.group_variations(&self.variation_repo.list_details(true)?);
        Ok(self
            .catalog_repo
            .list(CatalogKind::Cabinet, true)?
            .iter()
            .map(|cabinet| CabinetView {
                cabinet: projector.catalog_item(cabinet),
                variations: grouped.remove(&cabinet.id).unwrap_or_default(),
            })
            .collect())
    }

    /// 全量目录快照（所有表在同一读事务内读取）
    pub fn snapshot(&self, base_url: &str) -> ApiResult<CatalogSnapshot> {
        let projector = Projector::new(base_url);
        let records = self.snapshot_repo.load_active()?;
        let items = |list: &[CatalogItem]| -> Vec<CatalogItemView> {
            list.iter().map(|item| projector.catalog_item(item)).collect()
        };
        let colors = |list: &[ColorOption]| -> Vec<ColorView> {
            list.iter().map(|color| projector.color(color)).collect()
        };
        let snapshot = CatalogSnapshot {
            machines: items(&records.machines),
            fridges: items(&records.fridges),
            cabinets: items(&records.cabinets),
            terminals: items(&records.terminals),
            cabinet_colors: colors(&records.cabinet_colors),
            design_colors: colors(&records.design_colors),
            variations: projector.group_variations(&records.variations),
        };
        debug!(
            machines = snapshot.machines.len(),
            cabinets = snapshot.cabinets.len(),
            "目录快照已生成"
        );
        Ok(snapshot)
    }

    /// 站点可见的套装（id 升序）
    pub fn list_bundles(&self) -> ApiResult<Vec<Bundle>> {
        Ok(self.bundle_repo.list(true)?)
    }

    pub fn find_exact(&self, selection: &BundleSelection) -> ApiResult<Option<Bundle>> {
        Ok(self.matcher.find_exact(selection)?)
    }

    /// 预览选择：命中套装时带回自定义价格与外链
    pub fn preview(&self, selection: &BundleSelection) -> ApiResult<PreviewResult> {
        let computed_price = self.pricing.compute(selection)?;
        let result = match self.matcher.find_exact(selection)? {
            Some(bundle) => PreviewResult::exact(&bundle, computed_price),
            None => PreviewResult::not_exact(computed_price),
        };
        Ok(result)
    }
}
