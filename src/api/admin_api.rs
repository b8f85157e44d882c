// ==========================================
// 咖啡售货亭配置器 - 目录管理 API
// ==========================================
// 职责: 目录部件与颜色的增删改查、媒体引用挂接
// 规则:
// - 编码为空时按名称自动生成
// - short_title 仅咖啡机可设置
// - 媒体挂接: 主图替换，图库追加；字段是否可挂接由 MediaFieldConfig 决定
// ==========================================

use std::sync::Arc;

use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::config::media_fields::{MediaFieldConfig, MediaTarget};
use crate::domain::catalog::{
    CatalogItem, CatalogItemPatch, ColorOption, ColorOptionPatch, MediaAttachment, NewCatalogItem,
    NewColorOption,
};
use crate::domain::gallery::append_gallery;
use crate::domain::types::{CatalogKind, ColorKind, EntityKind};
use crate::engine::code_gen::ensure_code;
use crate::repository::catalog_repo::CatalogItemRepository;
use crate::repository::color_repo::ColorOptionRepository;
use crate::repository::variation_repo::VariationRepository;

fn require_name(name: &str) -> ApiResult<()> {
    if name.trim().is_empty() {
        return Err(ApiError::InvalidInput("名称不能为空".to_string()));
    }
    Ok(())
}

fn require_code(code: Option<&String>) -> ApiResult<()> {
    if matches!(code, Some(c) if c.trim().is_empty()) {
        return Err(ApiError::InvalidInput("编码不能为空".to_string()));
    }
    Ok(())
}

fn require_short_title_allowed(kind: CatalogKind, present: bool) -> ApiResult<()> {
    if present && !kind.has_short_title() {
        return Err(ApiError::InvalidInput(format!(
            "{} 不支持 short_title",
            kind.table_name()
        )));
    }
    Ok(())
}

// ==========================================
// AdminApi - 目录管理 API
// ==========================================
pub struct AdminApi {
    catalog_repo: Arc<CatalogItemRepository>,
    color_repo: Arc<ColorOptionRepository>,
    variation_repo: Arc<VariationRepository>,
    media_config: MediaFieldConfig,
}

impl AdminApi {
    pub fn new(
        catalog_repo: Arc<CatalogItemRepository>,
        color_repo: Arc<ColorOptionRepository>,
        variation_repo: Arc<VariationRepository>,
        media_config: MediaFieldConfig,
    ) -> Self {
        Self {
            catalog_repo,
            color_repo,
            variation_repo,
            media_config,
        }
    }

    // ==========================================
    // 目录部件
    // ==========================================

    pub fn create_item(&self, kind: CatalogKind, item: NewCatalogItem) -> ApiResult<CatalogItem> {
        require_name(&item.name)?;
        require_short_title_allowed(kind, item.short_title.is_some())?;

        let code = ensure_code(
            item.code.as_deref(),
            &item.name,
            EntityKind::from(kind).code_prefix(),
        );
        let created = self.catalog_repo.insert(kind, &code, &item)?;
        info!(kind = %kind, id = created.id, code = %created.code, "目录部件已创建");
        Ok(created)
    }

    pub fn update_item(&self, kind: CatalogKind, id: i64, patch: CatalogItemPatch) -> ApiResult<CatalogItem> {
        if let Some(name) = &patch.name {
            require_name(name)?;
        }
        require_code(patch.code.as_ref())?;
        require_short_title_allowed(kind, matches!(patch.short_title, Some(Some(_))))?;

        let updated = self.catalog_repo.update(kind, id, &patch)?;
        info!(kind = %kind, id, "目录部件已更新");
        Ok(updated)
    }

    /// 删除部件（柜体删除级联删除其变体）
    pub fn delete_item(&self, kind: CatalogKind, id: i64) -> ApiResult<()> {
        self.catalog_repo.delete(kind, id)?;
        info!(kind = %kind, id, "目录部件已删除");
        Ok(())
    }

    pub fn get_item(&self, kind: CatalogKind, id: i64) -> ApiResult<CatalogItem> {
        self.catalog_repo
            .find_by_id(kind, id)?
            .ok_or_else(|| ApiError::NotFound(format!("{}(id={})不存在", kind, id)))
    }

    pub fn list_items(&self, kind: CatalogKind, active_only: bool) -> ApiResult<Vec<CatalogItem>> {
        Ok(self.catalog_repo.list(kind, active_only)?)
    }

    // ==========================================
    // 颜色
    // ==========================================

    pub fn create_color(&self, kind: ColorKind, color: NewColorOption) -> ApiResult<ColorOption> {
        require_name(&color.name)?;

        let code = ensure_code(
            color.code.as_deref(),
            &color.name,
            EntityKind::from(kind).code_prefix(),
        );
        let created = self.color_repo.insert(kind, &code, &color)?;
        info!(kind = %kind, id = created.id, code = %created.code, "颜色已创建");
        Ok(created)
    }

    pub fn update_color(&self, kind: ColorKind, id: i64, patch: ColorOptionPatch) -> ApiResult<ColorOption> {
        if let Some(name) = &patch.name {
            require_name(name)?;
        }
        require_code(patch.code.as_ref())?;

        let updated = self.color_repo.update(kind, id, &patch)?;
        info!(kind = %kind, id, "颜色已更新");
        Ok(updated)
    }

    /// 删除颜色（仍被变体引用时拒绝）
    pub fn delete_color(&self, kind: ColorKind, id: i64) -> ApiResult<()> {
        self.color_repo.delete(kind, id)?;
        info!(kind = %kind, id, "颜色已删除");
        Ok(())
    }

    pub fn get_color(&self, kind: ColorKind, id: i64) -> ApiResult<ColorOption> {
        self.color_repo
            .find_by_id(kind, id)?
            .ok_or_else(|| ApiError::NotFound(format!("{}(id={})不存在", kind, id)))
    }

    pub fn list_colors(&self, kind: ColorKind, active_only: bool) -> ApiResult<Vec<ColorOption>> {
        Ok(self.color_repo.list(kind, active_only)?)
    }

    // ==========================================
    // 媒体挂接
    // ==========================================

    /// 挂接外部媒体存储返回的引用
    ///
    /// # 错误
    /// - InvalidInput: 附件为空，或目标不接受该字段
    /// - NotFound: 目标记录不存在
    pub fn attach_media(&self, target: MediaTarget, id: i64, attachment: MediaAttachment) -> ApiResult<()> {
        if attachment.is_empty() {
            return Err(ApiError::InvalidInput("媒体附件为空".to_string()));
        }

        let main_image = attachment
            .main_image
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let has_gallery = attachment.gallery_append.iter().any(|s| !s.trim().is_empty());

        let fields = self.media_config.fields_for(target);
        if main_image.is_some() && !fields.main_image {
            return Err(ApiError::InvalidInput(format!("{:?} 不接受主图", target)));
        }
        if has_gallery && !fields.gallery {
            return Err(ApiError::InvalidInput(format!("{:?} 不接受图库", target)));
        }

        match target {
            MediaTarget::Variation => {
                let variation = self
                    .variation_repo
                    .find_by_id(id)?
                    .ok_or_else(|| ApiError::NotFound(format!("variations(id={})不存在", id)))?;
                let gallery = append_gallery(&variation.gallery_images, &attachment.gallery_append);
                let main = main_image.or(variation.main_image);
                self.variation_repo.set_media(id, main.as_deref(), &gallery)?;
            }
            MediaTarget::Entity(kind) => {
                if let Some(kind) = kind.as_catalog() {
                    let item = self.get_item(kind, id)?;
                    let patch = CatalogItemPatch {
                        main_image: main_image.map(Some),
                        gallery_images: Some(append_gallery(&item.gallery_images, &attachment.gallery_append)),
                        ..Default::default()
                    };
                    self.catalog_repo.update(kind, id, &patch)?;
                } else if let Some(kind) = kind.as_color() {
                    let color = self.get_color(kind, id)?;
                    let patch = ColorOptionPatch {
                        main_image: main_image.map(Some),
                        gallery_images: Some(append_gallery(&color.gallery_images, &attachment.gallery_append)),
                        ..Default::default()
                    };
                    self.color_repo.update(kind, id, &patch)?;
                }
            }
        }

        info!(?target, id, "媒体引用已挂接");
        Ok(())
    }
}
