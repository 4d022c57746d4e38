//! 領域類型 → proto 訊息

use crate::game::{Card, CardCatalog, Pack};
use crate::proto::{CardInfo, OpenPackResponse, PackInfo, SetInfo};

pub fn card_info(card: &Card) -> CardInfo {
    CardInfo {
        type_id: card.type_id(),
        name: card.name.clone(),
        set_name: card.set_name.clone(),
        set_number: card.set_number,
        image_file: card.image_file.clone(),
        rarity: card.rarity.clone(),
        quality: u32::from(card.quality()),
        weight: card.weight,
        value: card.value,
        description: card.display_description().into_owned(),
    }
}

pub fn pack_info(pack: &Pack) -> PackInfo {
    PackInfo {
        type_id: pack.type_id(),
        name: pack.name.clone(),
        set_name: pack.set_name.clone(),
        image_file: pack.image_file.clone(),
        value: pack.value,
        weight: pack.weight,
        slot_count: pack.slots.len() as u32,
        is_default: pack.is_default,
    }
}

/// 每個卡組的卡片與卡包（依卡組名稱排序）
pub fn set_infos(catalog: &CardCatalog) -> Vec<SetInfo> {
    catalog
        .set_names()
        .into_iter()
        .map(|set| SetInfo {
            name: set.to_string(),
            cards: catalog.cards_in_set(set).map(card_info).collect(),
            packs: catalog.packs_in_set(set).map(pack_info).collect(),
        })
        .collect()
}

pub fn open_pack_response(pack_id: u32, cards: &[Card]) -> OpenPackResponse {
    OpenPackResponse {
        pack_id,
        cards: cards.iter().map(card_info).collect(),
    }
}
