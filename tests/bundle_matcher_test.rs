// ==========================================
// 套装匹配 / 预览 集成测试
// ==========================================
// 测试范围:
// 1. 精确匹配（NULL = 明确不含）
// 2. 预览价格（命中套装 / 未命中）
// 3. 柜体删除后的孤立套装与后台占位符
// ==========================================

mod helpers;

use coffeezone_configurator::api::ApiError;
use coffeezone_configurator::domain::bundle::{BundleDraft, BundlePatch};
use coffeezone_configurator::domain::types::CatalogKind;
use coffeezone_configurator::domain::variation::VariationRequest;
use coffeezone_configurator::repository::ABSENT_PLACEHOLDER;
use helpers::api_test_helper::*;

#[test]
fn test_bundle_copies_variation_triple() {
    let env = ApiTestEnv::new().unwrap();
    let fx = env.seed();

    let bundle = env.bundle(&fx, None, None);
    assert_eq!(bundle.cabinet_id, fx.cabinet);
    assert_eq!(bundle.cabinet_color_id, fx.white);
    assert_eq!(bundle.design_color_id, fx.oak);
    assert_eq!(bundle.variation_id, Some(fx.variation));
}

#[test]
fn test_find_exact_treats_null_as_absent() {
    let env = ApiTestEnv::new().unwrap();
    let fx = env.seed();
    let bundle = env.bundle(&fx, None, None);
    let api = &env.state.catalog_api;

    let found = api.find_exact(&fx.selection()).unwrap();
    assert_eq!(found.map(|b| b.id), Some(bundle.id));

    // 选择了冰箱 -> 不含冰箱的套装不匹配
    assert!(api.find_exact(&fx.selection().with_fridge(fx.fridge)).unwrap().is_none());
    assert!(api.find_exact(&fx.selection().with_terminal(fx.terminal)).unwrap().is_none());

    // 其它颜色 -> 不匹配
    let mut other = fx.selection();
    other.design_color_id = fx.walnut;
    assert!(api.find_exact(&other).unwrap().is_none());
}

#[test]
fn test_find_exact_with_optional_parts() {
    let env = ApiTestEnv::new().unwrap();
    let fx = env.seed();
    let full = env.bundle(&fx, Some(fx.fridge), Some(fx.terminal));
    let api = &env.state.catalog_api;

    let sel = fx.selection().with_fridge(fx.fridge).with_terminal(fx.terminal);
    assert_eq!(api.find_exact(&sel).unwrap().map(|b| b.id), Some(full.id));
    assert!(api.find_exact(&fx.selection()).unwrap().is_none());
    assert!(api.find_exact(&fx.selection().with_fridge(fx.fridge)).unwrap().is_none());
}

#[test]
fn test_preview_exact_bundle() {
    let env = ApiTestEnv::new().unwrap();
    let fx = env.seed();

    let mut draft = BundleDraft::new("Офис", fx.variation, fx.machine);
    draft.fridge_id = Some(fx.fridge);
    draft.custom_price = Some(170_000);
    draft.ozon_url = Some("https://ozon.ru/p/1".to_string());
    let bundle = env.state.bundle_api.create_bundle(draft).unwrap();

    let preview = env
        .state
        .catalog_api
        .preview(&fx.selection().with_fridge(fx.fridge))
        .unwrap();
    assert!(preview.is_exact_bundle);
    assert_eq!(preview.bundle_id, Some(bundle.id));
    assert_eq!(preview.custom_price, Some(170_000));
    assert_eq!(preview.ozon_url.as_deref(), Some("https://ozon.ru/p/1"));
    // 100000 + 50000 + 30000 + 0 + 1000
    assert_eq!(preview.computed_price, 181_000);
    assert_eq!(preview.effective_price(), 170_000);
}

#[test]
fn test_preview_without_bundle_only_computes_price() {
    let env = ApiTestEnv::new().unwrap();
    let fx = env.seed();

    let mut sel = fx.selection().with_terminal(fx.terminal);
    sel.cabinet_color_id = fx.black;
    sel.design_color_id = fx.walnut;

    let preview = env.state.catalog_api.preview(&sel).unwrap();
    assert!(!preview.is_exact_bundle);
    assert_eq!(preview.bundle_id, None);
    assert_eq!(preview.custom_price, None);
    // 100000 + 50000 + 15000 + 2000 + 3000
    assert_eq!(preview.computed_price, 170_000);
}

#[test]
fn test_preview_missing_referents_count_as_zero() {
    let env = ApiTestEnv::new().unwrap();
    let fx = env.seed();

    let mut sel = fx.selection().with_fridge(9_999);
    sel.machine_id = 9_998;
    let preview = env.state.catalog_api.preview(&sel).unwrap();
    // 50000 + 0 + 1000
    assert_eq!(preview.computed_price, 51_000);
}

#[test]
fn test_reattach_variation_updates_triple() {
    let env = ApiTestEnv::new().unwrap();
    let fx = env.seed();
    let bundle = env.bundle(&fx, None, None);

    let other = env
        .state
        .variation_api
        .register(fx.cabinet, VariationRequest::new(fx.black, fx.walnut))
        .unwrap();
    let updated = env
        .state
        .bundle_api
        .update_bundle(
            bundle.id,
            BundlePatch {
                variation_id: Some(other.id),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.cabinet_color_id, fx.black);
    assert_eq!(updated.design_color_id, fx.walnut);
    assert!(env.state.catalog_api.find_exact(&fx.selection()).unwrap().is_none());
}

#[test]
fn test_bundle_reference_checks() {
    let env = ApiTestEnv::new().unwrap();
    let fx = env.seed();

    let err = env
        .state
        .bundle_api
        .create_bundle(BundleDraft::new("X", 9_999, fx.machine))
        .unwrap_err();
    assert!(matches!(err, ApiError::Consistency(_)));

    let mut draft = BundleDraft::new("X", fx.variation, fx.machine);
    draft.terminal_id = Some(9_999);
    let err = env.state.bundle_api.create_bundle(draft).unwrap_err();
    assert!(matches!(err, ApiError::Consistency(_)));

    let err = env
        .state
        .bundle_api
        .create_bundle(BundleDraft::new("  ", fx.variation, fx.machine))
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[test]
fn test_list_bundles_only_visible() {
    let env = ApiTestEnv::new().unwrap();
    let fx = env.seed();
    let visible = env.bundle(&fx, None, None);

    let mut hidden = BundleDraft::new("Скрытый", fx.variation, fx.machine);
    hidden.fridge_id = Some(fx.fridge);
    hidden.show_on_site = false;
    env.state.bundle_api.create_bundle(hidden).unwrap();

    let listed: Vec<i64> = env
        .state
        .catalog_api
        .list_bundles()
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(listed, vec![visible.id]);
    assert_eq!(env.state.bundle_api.list_bundles_for_admin().unwrap().len(), 2);
}

#[test]
fn test_cabinet_delete_orphans_bundle() {
    let env = ApiTestEnv::new().unwrap();
    let fx = env.seed();
    let bundle = env.bundle(&fx, None, Some(fx.terminal));

    env.state.admin_api.delete_item(CatalogKind::Cabinet, fx.cabinet).unwrap();

    // 套装保留，变体引用置空
    let orphan = env.state.bundle_api.get_bundle(bundle.id).unwrap();
    assert_eq!(orphan.variation_id, None);
    assert_eq!(orphan.cabinet_id, fx.cabinet);

    // 通过变体过滤无法再命中
    let sel = fx
        .selection()
        .with_terminal(fx.terminal)
        .with_variation(fx.variation);
    assert!(env.state.catalog_api.find_exact(&sel).unwrap().is_none());

    // 后台列表显示占位符
    env.state.admin_api.delete_item(CatalogKind::Terminal, fx.terminal).unwrap();
    let summaries = env.state.bundle_api.list_bundles_for_admin().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].variation, ABSENT_PLACEHOLDER);
    assert_eq!(summaries[0].terminal, ABSENT_PLACEHOLDER);
    assert_eq!(summaries[0].fridge, ABSENT_PLACEHOLDER);
    assert_eq!(summaries[0].machine, "Jura E8");
}
