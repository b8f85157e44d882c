// ==========================================
// 咖啡售货亭配置器 - 计算价格
// ==========================================
// 计算价 = 咖啡机 + 柜体 + 冰箱(可选) + 终端(可选)
//        + 柜体颜色加价 + 设计颜色加价
// 引用缺失的部件按 0 计
// ==========================================

use crate::domain::bundle::BundleSelection;
use crate::domain::types::{CatalogKind, ColorKind};
use crate::repository::catalog_repo::CatalogItemRepository;
use crate::repository::color_repo::ColorOptionRepository;
use crate::repository::error::RepositoryResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 价格明细
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub machine: i64,
    pub cabinet: i64,
    pub fridge: i64,
    pub terminal: i64,
    pub cabinet_color_delta: i64,
    pub design_color_delta: i64,
}

impl PriceBreakdown {
    pub fn total(&self) -> i64 {
        self.machine
            + self.cabinet
            + self.fridge
            + self.terminal
            + self.cabinet_color_delta
            + self.design_color_delta
    }
}

pub struct PriceCalculator {
    catalog_repo: Arc<CatalogItemRepository>,
    color_repo: Arc<ColorOptionRepository>,
}

impl PriceCalculator {
    pub fn new(catalog_repo: Arc<CatalogItemRepository>, color_repo: Arc<ColorOptionRepository>) -> Self {
        Self {
            catalog_repo,
            color_repo,
        }
    }

    fn item_price(&self, kind: CatalogKind, id: Option<i64>) -> RepositoryResult<i64> {
        let Some(id) = id else {
            return Ok(0);
        };
        Ok(self
            .catalog_repo
            .find_by_id(kind, id)?
            .map_or(0, |item| item.price))
    }

    fn color_delta(&self, kind: ColorKind, id: i64) -> RepositoryResult<i64> {
        Ok(self
            .color_repo
            .find_by_id(kind, id)?
            .map_or(0, |color| color.price_delta))
    }

    pub fn breakdown(&self, selection: &BundleSelection) -> RepositoryResult<PriceBreakdown> {
        Ok(PriceBreakdown {
            machine: self.item_price(CatalogKind::Machine, Some(selection.machine_id))?,
            cabinet: self.item_price(CatalogKind::Cabinet, Some(selection.cabinet_id))?,
            fridge: self.item_price(CatalogKind::Fridge, selection.fridge_id)?,
            terminal: self.item_price(CatalogKind::Terminal, selection.terminal_id)?,
            cabinet_color_delta: self.color_delta(ColorKind::CabinetColor, selection.cabinet_color_id)?,
            design_color_delta: self.color_delta(ColorKind::DesignColor, selection.design_color_id)?,
        })
    }

    pub fn compute(&self, selection: &BundleSelection) -> RepositoryResult<i64> {
        Ok(self.breakdown(selection)?.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_sums_all_parts_with_signed_deltas() {
        let breakdown = PriceBreakdown {
            machine: 100_000,
            cabinet: 50_000,
            fridge: 0,
            terminal: 15_000,
            cabinet_color_delta: 2_000,
            design_color_delta: -500,
        };
        assert_eq!(breakdown.total(), 166_500);
        assert_eq!(PriceBreakdown::default().total(), 0);
    }
}
