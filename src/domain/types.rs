// ==========================================
// 咖啡售货亭配置器 - 领域类型定义
// ==========================================
// 目录种类 / 颜色种类 / 统一实体种类
// 序列化格式: snake_case (与表名一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 目录种类 (Catalog Kind)
// ==========================================
// 带价格与规格说明的部件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Machine,  // 咖啡机
    Fridge,   // 冰箱
    Cabinet,  // 柜体
    Terminal, // 支付终端
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 4] = [
        CatalogKind::Machine,
        CatalogKind::Fridge,
        CatalogKind::Cabinet,
        CatalogKind::Terminal,
    ];

    pub fn table_name(&self) -> &'static str {
        EntityKind::from(*self).table_name()
    }

    /// 仅咖啡机带短标题
    pub fn has_short_title(&self) -> bool {
        matches!(self, CatalogKind::Machine)
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table_name())
    }
}

// ==========================================
// 颜色种类 (Color Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorKind {
    CabinetColor, // 柜体颜色
    DesignColor,  // 设计颜色
}

impl ColorKind {
    pub const ALL: [ColorKind; 2] = [ColorKind::CabinetColor, ColorKind::DesignColor];

    pub fn table_name(&self) -> &'static str {
        EntityKind::from(*self).table_name()
    }
}

impl fmt::Display for ColorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table_name())
    }
}

// ==========================================
// 实体种类 (Entity Kind)
// ==========================================
// 目录 + 颜色的统一视图，供导入导出、媒体配置、编码生成使用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Machine,
    Fridge,
    Cabinet,
    Terminal,
    CabinetColor,
    DesignColor,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Machine,
        EntityKind::Fridge,
        EntityKind::Cabinet,
        EntityKind::Terminal,
        EntityKind::CabinetColor,
        EntityKind::DesignColor,
    ];

    /// 对应的数据表名
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityKind::Machine => "coffee_machines",
            EntityKind::Fridge => "fridges",
            EntityKind::Cabinet => "cabinets",
            EntityKind::Terminal => "terminals",
            EntityKind::CabinetColor => "cabinet_colors",
            EntityKind::DesignColor => "design_colors",
        }
    }

    /// 自动生成编码时的兜底前缀（名称无法转为 slug 时使用）
    pub fn code_prefix(&self) -> &'static str {
        match self {
            EntityKind::Machine => "machine",
            EntityKind::Fridge => "fridge",
            EntityKind::Cabinet => "cabinet",
            EntityKind::Terminal => "terminal",
            EntityKind::CabinetColor => "cabinet-color",
            EntityKind::DesignColor => "design-color",
        }
    }

    /// i18n 复数标签键（导出工作表名）
    pub fn plural_label_key(&self) -> String {
        format!("kind.{}.plural", self.table_name())
    }

    pub fn is_color(&self) -> bool {
        matches!(self, EntityKind::CabinetColor | EntityKind::DesignColor)
    }

    pub fn as_catalog(&self) -> Option<CatalogKind> {
        match self {
            EntityKind::Machine => Some(CatalogKind::Machine),
            EntityKind::Fridge => Some(CatalogKind::Fridge),
            EntityKind::Cabinet => Some(CatalogKind::Cabinet),
            EntityKind::Terminal => Some(CatalogKind::Terminal),
            EntityKind::CabinetColor | EntityKind::DesignColor => None,
        }
    }

    pub fn as_color(&self) -> Option<ColorKind> {
        match self {
            EntityKind::CabinetColor => Some(ColorKind::CabinetColor),
            EntityKind::DesignColor => Some(ColorKind::DesignColor),
            _ => None,
        }
    }
}

impl From<CatalogKind> for EntityKind {
    fn from(kind: CatalogKind) -> Self {
        match kind {
            CatalogKind::Machine => EntityKind::Machine,
            CatalogKind::Fridge => EntityKind::Fridge,
            CatalogKind::Cabinet => EntityKind::Cabinet,
            CatalogKind::Terminal => EntityKind::Terminal,
        }
    }
}

impl From<ColorKind> for EntityKind {
    fn from(kind: ColorKind) -> Self {
        match kind {
            ColorKind::CabinetColor => EntityKind::CabinetColor,
            ColorKind::DesignColor => EntityKind::DesignColor,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table_name())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    /// 接受表名（coffee_machines）或单数别名（machine）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "coffee_machines" | "machines" | "machine" => Ok(EntityKind::Machine),
            "fridges" | "fridge" => Ok(EntityKind::Fridge),
            "cabinets" | "cabinet" => Ok(EntityKind::Cabinet),
            "terminals" | "terminal" => Ok(EntityKind::Terminal),
            "cabinet_colors" | "cabinet_color" => Ok(EntityKind::CabinetColor),
            "design_colors" | "design_color" => Ok(EntityKind::DesignColor),
            _ => Err(format!("未知的实体种类: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_from_str_aliases() {
        assert_eq!("coffee_machines".parse::<EntityKind>(), Ok(EntityKind::Machine));
        assert_eq!("design-color".parse::<EntityKind>(), Ok(EntityKind::DesignColor));
        assert_eq!(" Cabinets ".parse::<EntityKind>(), Ok(EntityKind::Cabinet));
        assert!("bundles".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_table_names_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.table_name().parse::<EntityKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_kind_partition() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.as_catalog().is_some(), !kind.is_color());
            assert_eq!(kind.as_color().is_some(), kind.is_color());
        }
        assert_eq!(EntityKind::Cabinet.as_catalog(), Some(CatalogKind::Cabinet));
    }

    #[test]
    fn test_only_machine_has_short_title() {
        assert!(CatalogKind::Machine.has_short_title());
        assert!(!CatalogKind::Terminal.has_short_title());
    }
}
