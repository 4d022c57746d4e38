//! 卡片定義
//!
//! `cards.txt` 每行一張卡：
//!
//! ```text
//! CardName | SetName | SetNumber | ImageFile | Rarity | Weight | Value | Description
//! ```
//!
//! 描述欄可省略。空行與 `#` 開頭的行略過；格式錯誤的行直接丟棄，不影響其他行。

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::constants::{
    BYTE_ORDER_MARK, CARD_DESCRIPTION_FIELD, CARD_MIN_FIELDS, COMMENT_PREFIX, FIELD_SEPARATOR,
};
use super::ids::card_type_id;
use super::rarity::rarity_to_quality;
use crate::error::CatalogError;

/// 卡片
#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub name: String,
    pub set_name: String,
    pub set_number: i32,
    pub image_file: String,
    pub rarity: String,
    /// 掉落表權重
    pub weight: f32,
    pub value: i32,
    pub description: Option<String>,
    /// 解析後才綁定的圖片完整路徑
    pub image_path: Option<PathBuf>,
}

impl Card {
    /// 確定性 ID（卡片區段）
    pub fn type_id(&self) -> u32 {
        card_type_id(&self.set_name, &self.name)
    }

    /// 品質等級（2–6）
    pub fn quality(&self) -> u8 {
        rarity_to_quality(&self.rarity)
    }

    /// 沒有描述時自動產生的說明文字
    pub fn auto_description(&self) -> String {
        format!(
            "{} - {} card from {} (No. {:03})",
            self.name,
            self.rarity.trim(),
            self.set_name,
            self.set_number
        )
    }

    /// 顯示用描述：優先使用定義檔內的描述
    pub fn display_description(&self) -> Cow<'_, str> {
        match &self.description {
            Some(description) => Cow::Borrowed(description.as_str()),
            None => Cow::Owned(self.auto_description()),
        }
    }

    /// 綁定圖片路徑（`<dir>/<image_file>`）
    pub fn bind_image_dir(&mut self, dir: &Path) {
        self.image_path = Some(dir.join(&self.image_file));
    }

    /// 檢查欄位，回傳所有違規項目（不會提早結束）
    pub fn validate(&self) -> Vec<CardIssue> {
        let mut issues = Vec::new();

        if self.name.trim().is_empty() {
            issues.push(CardIssue::EmptyName);
        }
        if self.set_name.trim().is_empty() {
            issues.push(CardIssue::EmptySetName);
        }
        if self.set_number < 0 {
            issues.push(CardIssue::NegativeSetNumber(self.set_number));
        }
        if self.image_file.trim().is_empty() {
            issues.push(CardIssue::EmptyImageFile);
        }
        if self.rarity.trim().is_empty() {
            issues.push(CardIssue::EmptyRarity);
        }
        if !(self.weight >= 0.0 && self.weight.is_finite()) {
            issues.push(CardIssue::NegativeWeight(self.weight));
        }
        if self.value < 0 {
            issues.push(CardIssue::NegativeValue(self.value));
        }

        issues
    }
}

/// 卡片驗證問題
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CardIssue {
    #[error("card name cannot be empty")]
    EmptyName,
    #[error("set name cannot be empty")]
    EmptySetName,
    #[error("set number cannot be negative ({0})")]
    NegativeSetNumber(i32),
    #[error("image file cannot be empty")]
    EmptyImageFile,
    #[error("rarity cannot be empty")]
    EmptyRarity,
    #[error("weight must be a non-negative number ({0})")]
    NegativeWeight(f32),
    #[error("value cannot be negative ({0})")]
    NegativeValue(i32),
}

/// 註解或空白行
pub(crate) fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX)
}

/// 解析單行；略過或格式錯誤時回傳 None
pub fn parse_card_line(line: &str) -> Option<Card> {
    if is_skippable(line) {
        return None;
    }

    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).map(str::trim).collect();
    if fields.len() < CARD_MIN_FIELDS {
        return None;
    }

    let set_number = fields[2].parse::<i32>().ok()?;
    let weight = fields[5].parse::<f32>().ok()?;
    let value = fields[6].parse::<i32>().ok()?;

    let description = fields
        .get(CARD_DESCRIPTION_FIELD)
        .filter(|d| !d.is_empty())
        .map(|d| d.to_string());

    Some(Card {
        name: fields[0].to_string(),
        set_name: fields[1].to_string(),
        set_number,
        image_file: fields[3].to_string(),
        rarity: fields[4].to_string(),
        weight,
        value,
        description,
        image_path: None,
    })
}

/// 解析整個檔案內容，保持原順序
pub fn parse_cards(text: &str) -> Vec<Card> {
    let mut cards = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if is_skippable(line) {
            continue;
        }
        match parse_card_line(line) {
            Some(card) => cards.push(card),
            None => debug!(line = index + 1, "skipping malformed card line"),
        }
    }

    cards
}

/// 讀取 `cards.txt`；檔案不存在時回傳空列表
pub fn load_cards_file(path: &Path) -> Result<Vec<Card>, CatalogError> {
    match read_optional(path)? {
        Some(text) => Ok(parse_cards(&text)),
        None => Ok(Vec::new()),
    }
}

/// 讀檔；NotFound 視為 None
///
/// 非 UTF-8 位元組以 U+FFFD 取代（只影響所在的那一行），開頭的 BOM 會被移除。
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>, CatalogError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(decode_text(&bytes))),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(CatalogError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    match text.strip_prefix(BYTE_ORDER_MARK) {
        Some(rest) => rest.to_string(),
        None => text.into_owned(),
    }
}

// ============================================================================
// 單元測試
// ============================================================================
