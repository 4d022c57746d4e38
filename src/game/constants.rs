//! 內容常量定義

// ============================================================================
// 檔案格式
// ============================================================================

pub const CARDS_FILE: &str = "cards.txt";       // 卡片定義檔
pub const PACKS_FILE: &str = "packs.txt";       // 卡包定義檔
pub const IMAGES_DIR: &str = "images";          // 圖片子目錄
pub const FIELD_SEPARATOR: char = '|';
pub const COMMENT_PREFIX: char = '#';
pub const BYTE_ORDER_MARK: char = '\u{feff}';  // Windows 編輯器常見的 UTF-8 BOM

pub const CARD_MIN_FIELDS: usize = 7;           // 名稱~價值
pub const CARD_DESCRIPTION_FIELD: usize = 7;    // 第 8 欄：描述（可選）
pub const PACK_HEADER_MIN_FIELDS: usize = 3;    // PackName | ImageFile | Value

// ============================================================================
// ID 區段
// ============================================================================

pub const CARD_ID_PREFIX: &str = "Card";
pub const CARD_ID_START: u32 = 100_000;
pub const CARD_ID_WIDTH: u32 = 900_000;         // [100000, 1000000)

pub const PACK_ID_PREFIX: &str = "Pack";
pub const PACK_ID_START: u32 = 300_000;
pub const PACK_ID_WIDTH: u32 = 100_000;         // [300000, 400000)

// ============================================================================
// 卡包預設值
// ============================================================================

pub const DEFAULT_PACK_VALUE: i32 = 100;
pub const DEFAULT_PACK_WEIGHT: f32 = 0.1;
pub const DEFAULT_PACK_IMAGE: &str = "pack.png";

/// 預設卡包三個欄位的稀有度權重（Common, Uncommon, Rare, Very Rare, Ultra Rare, Legendary）
pub const DEFAULT_SLOT_WEIGHTS: [[f32; 6]; 3] = [
    [100.0, 30.0, 5.0, 1.0, 0.0, 0.0],   // 偏 Common
    [60.0, 80.0, 20.0, 5.0, 1.0, 1.0],   // 偏 Uncommon
    [30.0, 60.0, 60.0, 20.0, 5.0, 5.0],  // 偏 Rare
];

// ============================================================================
// 稀有度
// ============================================================================

pub const DEFAULT_QUALITY: u8 = 3;              // 未知稀有度視為 Uncommon
