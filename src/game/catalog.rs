//! 卡片目錄
//!
//! 由呼叫端建立並持有的註冊表，取代全域靜態列表。
//! 內容根目錄下每個子目錄是一個卡組：
//!
//! ```text
//! content/
//!   example_set/
//!     cards.txt
//!     packs.txt      (可省略，省略時使用預設卡包)
//!     images/
//! ```

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use rand::Rng;
use rayon::prelude::*;
use tracing::{info, warn};

use super::cards::{load_cards_file, Card};
use super::constants::{CARDS_FILE, IMAGES_DIR, PACKS_FILE};
use super::gacha::resolve_weighted;
use super::packs::{create_default_pack, load_packs_file, Pack};
use crate::error::CatalogError;

/// 掉落結果
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LootDrop<'a> {
    Card(&'a Card),
    Pack(&'a Pack),
}

/// 卡片與卡包註冊表
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: Vec<Card>,
    packs: Vec<Pack>,
    card_index: HashMap<u32, usize>,
    pack_index: HashMap<u32, usize>,
}

impl CardCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 註冊卡片；ID 已被其他卡使用時回傳錯誤（不覆寫）
    pub fn register_card(&mut self, card: Card) -> Result<u32, CatalogError> {
        let id = card.type_id();
        if let Some(&existing) = self.card_index.get(&id) {
            let existing = &self.cards[existing];
            return Err(CatalogError::DuplicateCardId {
                id,
                existing: format!("{}/{}", existing.set_name, existing.name),
                incoming: format!("{}/{}", card.set_name, card.name),
            });
        }
        self.card_index.insert(id, self.cards.len());
        self.cards.push(card);
        Ok(id)
    }

    /// 註冊卡包；ID 已被使用時回傳錯誤
    pub fn register_pack(&mut self, pack: Pack) -> Result<u32, CatalogError> {
        let id = pack.type_id();
        if let Some(&existing) = self.pack_index.get(&id) {
            let existing = &self.packs[existing];
            return Err(CatalogError::DuplicatePackId {
                id,
                existing: format!("{}/{}", existing.set_name, existing.name),
                incoming: format!("{}/{}", pack.set_name, pack.name),
            });
        }
        self.pack_index.insert(id, self.packs.len());
        self.packs.push(pack);
        Ok(id)
    }

    pub fn card(&self, id: u32) -> Option<&Card> {
        self.card_index.get(&id).map(|&i| &self.cards[i])
    }

    pub fn pack(&self, id: u32) -> Option<&Pack> {
        self.pack_index.get(&id).map(|&i| &self.packs[i])
    }

    pub fn find_card(&self, set_name: &str, name: &str) -> Option<&Card> {
        self.cards
            .iter()
            .find(|c| c.set_name == set_name && c.name == name)
    }

    pub fn find_card_by_name(&self, name: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.name == name)
    }

    pub fn cards_in_set<'a, 'b>(&'a self, set_name: &'b str) -> impl Iterator<Item = &'a Card> + 'b
    where
        'a: 'b,
    {
        self.cards.iter().filter(move |c| c.set_name == set_name)
    }

    pub fn packs_in_set<'a, 'b>(&'a self, set_name: &'b str) -> impl Iterator<Item = &'a Pack> + 'b
    where
        'a: 'b,
    {
        self.packs.iter().filter(move |p| p.set_name == set_name)
    }

    /// 所有卡組名稱（排序後）
    pub fn set_names(&self) -> Vec<&str> {
        let names: BTreeSet<&str> = self
            .cards
            .iter()
            .map(|c| c.set_name.as_str())
            .chain(self.packs.iter().map(|p| p.set_name.as_str()))
            .collect();
        names.into_iter().collect()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn packs(&self) -> &[Pack] {
        &self.packs
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty() && self.packs.is_empty()
    }

    /// 依卡片與卡包的掉落權重抽一個
    pub fn draw_loot<R>(&self, rng: &mut R) -> Option<LootDrop<'_>>
    where
        R: Rng + ?Sized,
    {
        let candidates: Vec<(LootDrop<'_>, f32)> = self
            .cards
            .iter()
            .map(|c| (LootDrop::Card(c), c.weight))
            .chain(self.packs.iter().map(|p| (LootDrop::Pack(p), p.weight)))
            .collect();

        resolve_weighted(&candidates, rng).copied()
    }

    /// 註冊一個已載入的卡組；無效或衝突的項目記錄後略過
    pub fn insert_set(&mut self, set: LoadedSet) {
        let LoadedSet { dir, cards, packs } = set;
        let mut card_count = 0;
        let mut pack_count = 0;

        for card in cards {
            match self.register_card(card) {
                Ok(_) => card_count += 1,
                Err(err) => warn!(dir = %dir.display(), error = %err, "card not registered"),
            }
        }
        for pack in packs {
            match self.register_pack(pack) {
                Ok(_) => pack_count += 1,
                Err(err) => warn!(dir = %dir.display(), error = %err, "pack not registered"),
            }
        }

        info!(dir = %dir.display(), cards = card_count, packs = pack_count, "card set loaded");
    }
}

// ============================================================================
// 卡組載入
// ============================================================================

/// 單一卡組目錄的載入結果（已驗證、已綁定圖片路徑）
#[derive(Clone, Debug, Default)]
pub struct LoadedSet {
    pub dir: PathBuf,
    pub cards: Vec<Card>,
    pub packs: Vec<Pack>,
}

/// 載入卡組目錄
///
/// 卡包的卡組名稱取第一張卡的卡組，沒有卡時用目錄名稱。
/// 沒有任何有效卡包的卡組會補上預設卡包。
pub fn load_set_dir(dir: &Path) -> Result<LoadedSet, CatalogError> {
    let images = dir.join(IMAGES_DIR);

    let mut cards = Vec::new();
    for mut card in load_cards_file(&dir.join(CARDS_FILE))? {
        let issues = card.validate();
        if !issues.is_empty() {
            for issue in &issues {
                warn!(card = %card.name, set = %card.set_name, %issue, "invalid card");
            }
            continue;
        }
        card.bind_image_dir(&images);
        cards.push(card);
    }

    let primary_set = cards
        .first()
        .map(|c| c.set_name.clone())
        .or_else(|| dir.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_default();

    let mut packs = Vec::new();
    for mut pack in load_packs_file(&dir.join(PACKS_FILE), &primary_set)? {
        let issues = pack.validate();
        if !issues.is_empty() {
            for issue in &issues {
                warn!(pack = %pack.name, set = %pack.set_name, %issue, "invalid pack");
            }
            continue;
        }
        pack.bind_image_dir(&images);
        packs.push(pack);
    }

    // 每個卡組至少一個卡包
    let card_sets: BTreeSet<&str> = cards.iter().map(|c| c.set_name.as_str()).collect();
    let defaults: Vec<Pack> = card_sets
        .into_iter()
        .filter(|set| !packs.iter().any(|p| p.set_name == *set))
        .map(|set| {
            let mut pack = create_default_pack(set);
            pack.bind_image_dir(&images);
            pack
        })
        .collect();
    packs.extend(defaults);

    Ok(LoadedSet {
        dir: dir.to_path_buf(),
        cards,
        packs,
    })
}

/// 載入內容根目錄下所有卡組（平行讀取，依目錄名稱順序註冊）
///
/// 根目錄不存在時回傳空目錄；無法讀取的卡組記錄後略過。
pub fn load_content_root(root: &Path) -> Result<CardCatalog, CatalogError> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!(root = %root.display(), "content root not found");
            return Ok(CardCatalog::new());
        }
        Err(source) => {
            return Err(CatalogError::Io {
                path: root.to_path_buf(),
                source,
            })
        }
    };

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| CatalogError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();

    // 單一卡組讀取失敗只略過該卡組
    let sets: Vec<LoadedSet> = dirs
        .par_iter()
        .filter_map(|dir| match load_set_dir(dir) {
            Ok(set) => Some(set),
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "card set skipped");
                None
            }
        })
        .collect();

    let mut catalog = CardCatalog::new();
    for set in sets {
        catalog.insert_set(set);
    }
    Ok(catalog)
}

// ============================================================================
// 單元測試
// ============================================================================
