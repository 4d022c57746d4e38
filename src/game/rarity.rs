//! 稀有度系統
//!
//! 稀有度標籤是開放集合：認得的六種對應到品質 2–6，其他一律當 Uncommon。

use super::constants::DEFAULT_QUALITY;

/// 標準稀有度
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    VeryRare,
    UltraRare,
    Legendary,
}

impl Rarity {
    /// 所有稀有度（由低到高）
    pub fn all() -> &'static [Rarity] {
        &[
            Rarity::Common,
            Rarity::Uncommon,
            Rarity::Rare,
            Rarity::VeryRare,
            Rarity::UltraRare,
            Rarity::Legendary,
        ]
    }

    /// 定義檔使用的標籤
    pub fn label(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::VeryRare => "Very Rare",
            Rarity::UltraRare => "Ultra Rare",
            Rarity::Legendary => "Legendary",
        }
    }

    /// 品質等級（2–6）
    pub fn quality(&self) -> u8 {
        match self {
            Rarity::Common => 2,
            Rarity::Uncommon => 3,
            Rarity::Rare => 4,
            Rarity::VeryRare => 5,
            Rarity::UltraRare | Rarity::Legendary => 6,
        }
    }

    /// 解析標籤（忽略大小寫與前後空白）
    pub fn from_label(label: &str) -> Option<Rarity> {
        match label.trim().to_lowercase().as_str() {
            "common" => Some(Rarity::Common),
            "uncommon" => Some(Rarity::Uncommon),
            "rare" => Some(Rarity::Rare),
            "very rare" => Some(Rarity::VeryRare),
            "ultra rare" => Some(Rarity::UltraRare),
            "legendary" => Some(Rarity::Legendary),
            _ => None,
        }
    }
}

/// 稀有度標籤 → 品質等級；未知標籤回傳預設值 3
pub fn rarity_to_quality(label: &str) -> u8 {
    Rarity::from_label(label)
        .map(|r| r.quality())
        .unwrap_or(DEFAULT_QUALITY)
}

/// 是否為六種標準稀有度之一
pub fn is_valid_rarity(label: &str) -> bool {
    Rarity::from_label(label).is_some()
}
