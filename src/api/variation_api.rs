// ==========================================
// 咖啡售货亭配置器 - 柜体变体 API
// ==========================================
// 职责: 变体注册 / 默认切换 / 删除 / 查询
// ==========================================

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::variation::{Variation, VariationRequest};
use crate::i18n::t;
use crate::repository::variation_repo::VariationRepository;

pub struct VariationApi {
    variation_repo: Arc<VariationRepository>,
}

impl VariationApi {
    pub fn new(variation_repo: Arc<VariationRepository>) -> Self {
        Self { variation_repo }
    }

    /// 注册变体
    ///
    /// # 错误
    /// - NotFound: 柜体不存在
    /// - Duplicate: 三元组已注册
    /// - Consistency: 颜色不存在
    pub fn register(&self, cabinet_id: i64, request: VariationRequest) -> ApiResult<Variation> {
        match self.variation_repo.register(cabinet_id, &request) {
            Ok(variation) => {
                info!(cabinet_id, variation_id = variation.id, "{}", t("variation.created"));
                Ok(variation)
            }
            Err(e) => {
                let err = ApiError::from(e);
                if matches!(err, ApiError::Duplicate(_)) {
                    warn!(cabinet_id, "{}", t("variation.duplicate"));
                }
                Err(err)
            }
        }
    }

    /// 设置默认变体（幂等）
    pub fn set_default(&self, cabinet_id: i64, variation_id: i64) -> ApiResult<()> {
        self.variation_repo.set_default(cabinet_id, variation_id)?;
        info!(cabinet_id, variation_id, "{}", t("variation.updated"));
        Ok(())
    }

    /// 删除变体，不自动选举新的默认
    pub fn delete(&self, cabinet_id: i64, variation_id: i64) -> ApiResult<()> {
        self.variation_repo.delete(cabinet_id, variation_id)?;
        info!(cabinet_id, variation_id, "{}", t("variation.deleted"));
        Ok(())
    }

    pub fn list_for_cabinet(&self, cabinet_id: i64, active_only: bool) -> ApiResult<Vec<Variation>> {
        Ok(self.variation_repo.list_for_cabinet(cabinet_id, active_only)?)
    }
}
