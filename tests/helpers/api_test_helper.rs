// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 基于临时 SQLite 文件装配 AppState，并准备一套标准目录数据
// ==========================================

#![allow(dead_code)]

use tempfile::NamedTempFile;

use coffeezone_configurator::app::AppState;
use coffeezone_configurator::config::AppSettings;
use coffeezone_configurator::domain::bundle::{Bundle, BundleDraft, BundleSelection};
use coffeezone_configurator::domain::catalog::{NewCatalogItem, NewColorOption};
use coffeezone_configurator::domain::types::{CatalogKind, ColorKind};
use coffeezone_configurator::domain::variation::VariationRequest;

pub const BASE_URL: &str = "https://kiosk.example.com";

// ==========================================
// API测试环境
// ==========================================

pub struct ApiTestEnv {
    pub state: AppState,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let temp_file = NamedTempFile::new()?;
        let db_path = temp_file.path().to_string_lossy().to_string();
        let state = AppState::new(AppSettings::with_db_path(db_path))?;
        Ok(Self {
            state,
            _temp_file: temp_file,
        })
    }

    pub fn count(&self, table: &str) -> i64 {
        let conn = self.state.connection();
        let guard = conn.lock().unwrap();
        guard
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
            .unwrap()
    }

    /// 准备标准目录: 1 台咖啡机、1 台冰箱、1 个柜体、1 台终端、
    /// 2 个柜体颜色、2 个设计颜色，以及柜体的默认变体（白 + 橡木）
    pub fn seed(&self) -> Fixture {
        let admin = &self.state.admin_api;

        let mut machine = NewCatalogItem::new("Jura E8", 100_000);
        machine.code = Some("jura-e8".to_string());
        machine.short_title = Some("E8".to_string());
        machine.specs = "15 бар\nКапучинатор".to_string();
        let machine = admin.create_item(CatalogKind::Machine, machine).unwrap();

        let fridge = admin
            .create_item(CatalogKind::Fridge, NewCatalogItem::new("Liebherr 20", 30_000))
            .unwrap();
        let cabinet = admin
            .create_item(CatalogKind::Cabinet, NewCatalogItem::new("Каркас L", 50_000))
            .unwrap();
        let terminal = admin
            .create_item(CatalogKind::Terminal, NewCatalogItem::new("Pax A920", 15_000))
            .unwrap();

        let white = admin
            .create_color(ColorKind::CabinetColor, NewColorOption::new("Белый", 0))
            .unwrap();
        let black = admin
            .create_color(ColorKind::CabinetColor, NewColorOption::new("Чёрный", 2_000))
            .unwrap();
        let oak = admin
            .create_color(ColorKind::DesignColor, NewColorOption::new("Дуб", 1_000))
            .unwrap();
        let walnut = admin
            .create_color(ColorKind::DesignColor, NewColorOption::new("Орех", 3_000))
            .unwrap();

        let variation = self
            .state
            .variation_api
            .register(cabinet.id, VariationRequest::new(white.id, oak.id).as_default())
            .unwrap();

        Fixture {
            machine: machine.id,
            fridge: fridge.id,
            cabinet: cabinet.id,
            terminal: terminal.id,
            white: white.id,
            black: black.id,
            oak: oak.id,
            walnut: walnut.id,
            variation: variation.id,
        }
    }

    /// 基于默认变体创建套装（可选冰箱/终端）
    pub fn bundle(&self, fx: &Fixture, fridge: Option<i64>, terminal: Option<i64>) -> Bundle {
        let mut draft = BundleDraft::new("Старт", fx.variation, fx.machine);
        draft.fridge_id = fridge;
        draft.terminal_id = terminal;
        self.state.bundle_api.create_bundle(draft).unwrap()
    }
}

/// 标准目录数据的 id
#[derive(Debug, Clone, Copy)]
pub struct Fixture {
    pub machine: i64,
    pub fridge: i64,
    pub cabinet: i64,
    pub terminal: i64,
    pub white: i64,
    pub black: i64,
    pub oak: i64,
    pub walnut: i64,
    pub variation: i64,
}

impl Fixture {
    /// 与默认变体一致的选择（不含冰箱/终端）
    pub fn selection(&self) -> BundleSelection {
        BundleSelection::new(self.machine, self.cabinet, self.white, self.oak)
    }
}
