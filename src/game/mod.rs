//! 卡片內容核心模組
//!
//! - `constants`: 檔案格式、ID 區段、預設值
//! - `rarity`: 稀有度 → 品質等級
//! - `ids`: 確定性 ID 生成
//! - `cards`: `cards.txt` 解析與驗證
//! - `packs`: `packs.txt` 解析、驗證、預設卡包
//! - `gacha`: 加權抽取與開包
//! - `catalog`: 卡片目錄與卡組載入

pub mod constants;
pub mod rarity;
pub mod ids;
pub mod cards;
pub mod packs;
pub mod gacha;
pub mod catalog;

pub use constants::*;
pub use rarity::{Rarity, rarity_to_quality, is_valid_rarity};
pub use ids::{IdBand, CARD_ID_BAND, PACK_ID_BAND, card_type_id, pack_type_id, stable_string_hash};
pub use cards::{Card, CardIssue, parse_card_line, parse_cards, load_cards_file};
pub use packs::{
    Pack, PackIssue, Slot, SlotMode, WeightTable,
    parse_packs, parse_slot_line, parse_weight_pairs, load_packs_file, create_default_pack,
};
pub use gacha::{resolve_weighted, draw_by_rarity, draw_by_name, draw_slot, open_pack};
pub use catalog::{CardCatalog, LoadedSet, LootDrop, load_set_dir, load_content_root};
