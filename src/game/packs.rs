//! 卡包系統
//!
//! `packs.txt` 是兩層、以縮排區分的格式：
//!
//! ```text
//! PackName | ImageFile | Value | Weight
//!   RARITY: Common:100, Rare:5
//!   CARDS: Duck Hero:1, Duck Sidekick:10
//! ```
//!
//! 未縮排的行開啟新卡包；以空白或 tab 開頭的行是屬於上一個卡包的欄位（slot）。

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use super::cards::{is_skippable, read_optional};
use super::constants::{
    DEFAULT_PACK_IMAGE, DEFAULT_PACK_VALUE, DEFAULT_PACK_WEIGHT, DEFAULT_SLOT_WEIGHTS,
    FIELD_SEPARATOR, PACK_HEADER_MIN_FIELDS,
};
use super::ids::pack_type_id;
use super::rarity::Rarity;
use crate::error::CatalogError;

/// 欄位抽取模式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotMode {
    /// 依稀有度加權，從整個卡組抽
    Rarity,
    /// 依卡名加權，只從列出的卡抽
    Cards,
}

/// 有序的 標籤 → 權重 對照表
///
/// 重複的標籤會在原位置覆寫權重。
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeightTable {
    entries: Vec<(String, f32)>,
}

impl WeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, weight: f32) {
        let label = label.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = weight,
            None => self.entries.push((label, weight)),
        }
    }

    pub fn get(&self, label: &str) -> Option<f32> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, w)| *w)
    }

    /// 忽略大小寫與前後空白的查詢（稀有度用）
    pub fn get_ignore_case(&self, label: &str) -> Option<f32> {
        let label = label.trim();
        self.entries
            .iter()
            .find(|(l, _)| l.eq_ignore_ascii_case(label))
            .map(|(_, w)| *w)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.entries.iter().map(|(l, w)| (l.as_str(), *w))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 至少有一個可被抽中的（正）權重
    pub fn has_positive(&self) -> bool {
        self.entries.iter().any(|(_, w)| *w > 0.0)
    }
}

impl<S: Into<String>> FromIterator<(S, f32)> for WeightTable {
    fn from_iter<I: IntoIterator<Item = (S, f32)>>(iter: I) -> Self {
        let mut table = WeightTable::new();
        for (label, weight) in iter {
            table.insert(label, weight);
        }
        table
    }
}

/// 開包時的一次抽取
#[derive(Clone, Debug, PartialEq)]
pub struct Slot {
    pub mode: SlotMode,
    pub weights: WeightTable,
}

impl Slot {
    pub fn rarity(weights: WeightTable) -> Self {
        Self { mode: SlotMode::Rarity, weights }
    }

    pub fn cards(weights: WeightTable) -> Self {
        Self { mode: SlotMode::Cards, weights }
    }
}

/// 卡包
#[derive(Clone, Debug, PartialEq)]
pub struct Pack {
    pub name: String,
    pub set_name: String,
    pub image_file: String,
    pub value: i32,
    /// 掉落權重
    pub weight: f32,
    pub slots: Vec<Slot>,
    /// 自動生成（非使用者定義）
    pub is_default: bool,
    pub image_path: Option<std::path::PathBuf>,
}

impl Pack {
    /// 確定性 ID（卡包區段）
    pub fn type_id(&self) -> u32 {
        pack_type_id(&self.set_name, &self.name)
    }

    pub fn bind_image_dir(&mut self, dir: &Path) {
        self.image_path = Some(dir.join(&self.image_file));
    }

    pub fn validate(&self) -> Vec<PackIssue> {
        let mut issues = Vec::new();

        if self.name.trim().is_empty() {
            issues.push(PackIssue::EmptyName);
        }
        if self.slots.is_empty() {
            issues.push(PackIssue::NoSlots);
        }
        for (index, slot) in self.slots.iter().enumerate() {
            if !slot.weights.has_positive() {
                issues.push(match slot.mode {
                    SlotMode::Rarity => PackIssue::EmptyRaritySlot(index),
                    SlotMode::Cards => PackIssue::EmptyCardSlot(index),
                });
            }
            for (label, weight) in slot.weights.iter() {
                if weight < 0.0 {
                    issues.push(PackIssue::NegativeSlotWeight {
                        slot: index,
                        label: label.to_string(),
                    });
                }
            }
        }
        if self.value < 0 {
            issues.push(PackIssue::NegativeValue(self.value));
        }

        issues
    }
}

/// 卡包驗證問題
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PackIssue {
    #[error("pack name cannot be empty")]
    EmptyName,
    #[error("pack must have at least one slot")]
    NoSlots,
    #[error("slot {0}: rarity slot must have at least one weight")]
    EmptyRaritySlot(usize),
    #[error("slot {0}: card slot must have at least one weight")]
    EmptyCardSlot(usize),
    #[error("slot {slot}: weight for '{label}' cannot be negative")]
    NegativeSlotWeight { slot: usize, label: String },
    #[error("value cannot be negative ({0})")]
    NegativeValue(i32),
}

// ============================================================================
// 解析
// ============================================================================

/// 解析 `Label:Number, Label:Number`；格式錯誤的 token 略過
pub fn parse_weight_pairs(text: &str) -> WeightTable {
    let mut table = WeightTable::new();

    for token in text.split(',') {
        let parts: Vec<&str> = token.split(':').map(str::trim).collect();
        // 空標籤（`:5`）同樣視為格式錯誤
        if parts.len() != 2 || parts[0].is_empty() {
            if !token.trim().is_empty() {
                debug!(token = token.trim(), "skipping malformed weight pair");
            }
            continue;
        }
        match parts[1].parse::<f32>() {
            Ok(weight) => table.insert(parts[0], weight),
            Err(_) => debug!(token = token.trim(), "skipping weight pair with bad number"),
        }
    }

    table
}

/// `prefix` 不分大小寫時，回傳剩餘部分
fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

/// 解析欄位行（`RARITY:` / `CARDS:`，沒有前綴時視為 RARITY）
pub fn parse_slot_line(line: &str) -> Slot {
    let body = line.trim();
    if let Some(rest) = strip_prefix_ignore_case(body, "RARITY:") {
        Slot::rarity(parse_weight_pairs(rest))
    } else if let Some(rest) = strip_prefix_ignore_case(body, "CARDS:") {
        Slot::cards(parse_weight_pairs(rest))
    } else {
        Slot::rarity(parse_weight_pairs(body))
    }
}

fn is_indented(line: &str) -> bool {
    line.starts_with(' ') || line.starts_with('\t')
}

/// 解析卡包標頭；欄位不足時回傳 None
fn parse_pack_header(line: &str, set_name: &str) -> Option<Pack> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).map(str::trim).collect();
    if fields.len() < PACK_HEADER_MIN_FIELDS {
        return None;
    }

    let value = fields[2].parse::<i32>().unwrap_or(DEFAULT_PACK_VALUE);
    let weight = fields
        .get(3)
        .and_then(|w| w.parse::<f32>().ok())
        .unwrap_or(DEFAULT_PACK_WEIGHT);

    Some(Pack {
        name: fields[0].to_string(),
        set_name: set_name.to_string(),
        image_file: fields[1].to_string(),
        value,
        weight,
        slots: Vec::new(),
        is_default: false,
        image_path: None,
    })
}

/// 解析 `packs.txt` 內容
pub fn parse_packs(text: &str, set_name: &str) -> Vec<Pack> {
    let mut packs = Vec::new();
    let mut current: Option<Pack> = None;

    for (index, line) in text.lines().enumerate() {
        if is_skippable(line) {
            continue;
        }

        if is_indented(line) {
            match current.as_mut() {
                Some(pack) => pack.slots.push(parse_slot_line(line)),
                None => debug!(line = index + 1, "slot line without an open pack"),
            }
            continue;
        }

        // 新標頭：先收尾目前的卡包
        packs.extend(current.take());
        current = parse_pack_header(line, set_name);
        if current.is_none() {
            debug!(line = index + 1, "skipping malformed pack header");
        }
    }

    packs.extend(current);
    packs
}

/// 讀取 `packs.txt`；檔案不存在時回傳空列表
pub fn load_packs_file(path: &Path, set_name: &str) -> Result<Vec<Pack>, CatalogError> {
    match read_optional(path)? {
        Some(text) => Ok(parse_packs(&text, set_name)),
        None => Ok(Vec::new()),
    }
}

/// 卡組的預設卡包：三個欄位，稀有度傾向逐步提高
pub fn create_default_pack(set_name: &str) -> Pack {
    let slots = DEFAULT_SLOT_WEIGHTS
        .iter()
        .map(|weights| {
            Slot::rarity(
                Rarity::all()
                    .iter()
                    .zip(weights.iter())
                    .map(|(rarity, weight)| (rarity.label(), *weight))
                    .collect(),
            )
        })
        .collect();

    Pack {
        name: format!("{set_name} Pack"),
        set_name: set_name.to_string(),
        image_file: DEFAULT_PACK_IMAGE.to_string(),
        value: DEFAULT_PACK_VALUE,
        weight: DEFAULT_PACK_WEIGHT,
        slots,
        is_default: true,
        image_path: None,
    }
}

// ============================================================================
// 單元測試
// ============================================================================
