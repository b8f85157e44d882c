// ==========================================
// 咖啡售货亭配置器 - 媒体字段配置
// ==========================================
// 声明哪些实体接受哪些媒体字段（主图 / 图库）
// 文件存储由外部完成，核心只接收存储返回的引用
// ==========================================

use crate::domain::types::EntityKind;
use serde::{Deserialize, Serialize};

/// 媒体附加目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaTarget {
    Entity(EntityKind),
    Variation,
}

/// 实体接受的媒体字段
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFields {
    pub main_image: bool,
    pub gallery: bool,
}

impl MediaFields {
    pub const NONE: MediaFields = MediaFields {
        main_image: false,
        gallery: false,
    };
    pub const FULL: MediaFields = MediaFields {
        main_image: true,
        gallery: true,
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFieldConfig {
    pub machine: MediaFields,
    pub fridge: MediaFields,
    pub cabinet: MediaFields,
    pub terminal: MediaFields,
    pub cabinet_color: MediaFields,
    pub design_color: MediaFields,
    pub variation: MediaFields,
}

impl Default for MediaFieldConfig {
    fn default() -> Self {
        Self {
            machine: MediaFields::FULL,
            fridge: MediaFields::FULL,
            cabinet: MediaFields::NONE,
            terminal: MediaFields::FULL,
            cabinet_color: MediaFields::NONE,
            design_color: MediaFields::NONE,
            variation: MediaFields::FULL,
        }
    }
}

impl MediaFieldConfig {
    pub fn fields_for(&self, target: MediaTarget) -> MediaFields {
        match target {
            MediaTarget::Entity(EntityKind::Machine) => self.machine,
            MediaTarget::Entity(EntityKind::Fridge) => self.fridge,
            MediaTarget::Entity(EntityKind::Cabinet) => self.cabinet,
            MediaTarget::Entity(EntityKind::Terminal) => self.terminal,
            MediaTarget::Entity(EntityKind::CabinetColor) => self.cabinet_color,
            MediaTarget::Entity(EntityKind::DesignColor) => self.design_color,
            MediaTarget::Variation => self.variation,
        }
    }
}
