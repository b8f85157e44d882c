// ==========================================
// 咖啡售货亭配置器 - 套装管理 API
// ==========================================
// 职责: 套装增删改、后台列表
// 规则: cabinet/颜色 只能通过挂接变体获得，不提供直接设置入口
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::bundle::{Bundle, BundleDraft, BundlePatch, BundleSummary};
use crate::repository::bundle_repo::BundleRepository;

fn validate_price(price: Option<i64>) -> ApiResult<()> {
    if matches!(price, Some(p) if p < 0) {
        return Err(ApiError::InvalidInput("自定义价格不能为负".to_string()));
    }
    Ok(())
}

pub struct BundleApi {
    bundle_repo: Arc<BundleRepository>,
}

impl BundleApi {
    pub fn new(bundle_repo: Arc<BundleRepository>) -> Self {
        Self { bundle_repo }
    }

    /// 新建套装
    ///
    /// # 错误
    /// - InvalidInput: 名称为空或价格为负
    /// - Consistency: 变体/咖啡机/冰箱/终端不存在
    pub fn create_bundle(&self, draft: BundleDraft) -> ApiResult<Bundle> {
        if draft.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("套装名称不能为空".to_string()));
        }
        validate_price(draft.custom_price)?;
        Ok(self.bundle_repo.create(&draft)?)
    }

    pub fn update_bundle(&self, id: i64, patch: BundlePatch) -> ApiResult<Bundle> {
        if matches!(&patch.name, Some(n) if n.trim().is_empty()) {
            return Err(ApiError::InvalidInput("套装名称不能为空".to_string()));
        }
        validate_price(patch.custom_price.flatten())?;
        Ok(self.bundle_repo.update(id, &patch)?)
    }

    pub fn delete_bundle(&self, id: i64) -> ApiResult<()> {
        Ok(self.bundle_repo.delete(id)?)
    }

    pub fn get_bundle(&self, id: i64) -> ApiResult<Bundle> {
        self.bundle_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("bundles(id={})不存在", id)))
    }

    /// 后台列表（缺失引用显示 "-"）
    pub fn list_bundles_for_admin(&self) -> ApiResult<Vec<BundleSummary>> {
        Ok(self.bundle_repo.list_summaries()?)
    }
}
