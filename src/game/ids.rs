//! 確定性 ID 生成
//!
//! `"{Prefix}_{Set}_{Name}"` 的字串雜湊取絕對值後模區段寬度，再加上區段起點。
//! 外部存檔依賴既有 ID，演算法不可更動；碰撞不處理（由目錄註冊時偵測）。

use super::constants::{
    CARD_ID_PREFIX, CARD_ID_START, CARD_ID_WIDTH, PACK_ID_PREFIX, PACK_ID_START, PACK_ID_WIDTH,
};

/// ID 區段 `[start, start + width)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdBand {
    pub prefix: &'static str,
    pub start: u32,
    pub width: u32,
}

pub const CARD_ID_BAND: IdBand = IdBand {
    prefix: CARD_ID_PREFIX,
    start: CARD_ID_START,
    width: CARD_ID_WIDTH,
};

pub const PACK_ID_BAND: IdBand = IdBand {
    prefix: PACK_ID_PREFIX,
    start: PACK_ID_START,
    width: PACK_ID_WIDTH,
};

impl IdBand {
    pub fn contains(&self, id: u32) -> bool {
        id >= self.start && id - self.start < self.width
    }

    /// 計算 (set, name) 在此區段內的 ID
    pub fn id_for(&self, set_name: &str, name: &str) -> u32 {
        let key = format!("{}_{}_{}", self.prefix, set_name, name);
        let hash = stable_string_hash(&key).unsigned_abs();
        self.start + hash % self.width
    }
}

/// 32-bit 字串雜湊：對 UTF-16 code unit 做 `h = h * 31 + c`（wrapping）
///
/// 與遊戲執行環境的 string hash 相同，ID 才能和既有存檔對上。
pub fn stable_string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

pub fn card_type_id(set_name: &str, card_name: &str) -> u32 {
    CARD_ID_BAND.id_for(set_name, card_name)
}

pub fn pack_type_id(set_name: &str, pack_name: &str) -> u32 {
    PACK_ID_BAND.id_for(set_name, pack_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_string_hash_known_values() {
        assert_eq!(stable_string_hash(""), 0);
        assert_eq!(stable_string_hash("a"), 97);
        assert_eq!(stable_string_hash("ab"), 3105);
        assert_eq!(stable_string_hash("hello"), 99162322);
        assert_eq!(stable_string_hash("Card_Example Set_Duck Hero"), -204047585);
    }

    #[test]
    fn test_card_id_regression() {
        // 既有存檔依賴的值
        assert_eq!(card_type_id("Example Set", "Duck Hero"), 747585);
        assert_eq!(card_type_id("Example Set", "Duck Hero"), 747585);
    }

    #[test]
    fn test_pack_id_band() {
        let id = pack_type_id("Set A", "Booster Pack");
        assert_eq!(id, 303637);
        assert!(PACK_ID_BAND.contains(id));
        assert_ne!(id, card_type_id("Set A", "Booster Pack"));
        assert_eq!(pack_type_id("Example Set", "Example Set Pack"), 303686);
    }

    #[test]
    fn test_band_contains() {
        assert!(CARD_ID_BAND.contains(100_000));
        assert!(CARD_ID_BAND.contains(999_999));
        assert!(!CARD_ID_BAND.contains(1_000_000));
        assert!(!PACK_ID_BAND.contains(299_999));
        assert!(!PACK_ID_BAND.contains(400_000));
    }

    proptest! {
        #[test]
        fn prop_card_ids_are_stable_and_in_band(set in ".{0,24}", name in ".{0,24}") {
            let id = card_type_id(&set, &name);
            prop_assert_eq!(id, card_type_id(&set, &name));
            prop_assert!((100_000..1_000_000).contains(&id));
        }

        #[test]
        fn prop_pack_ids_are_stable_and_in_band(set in ".{0,24}", name in ".{0,24}") {
            let id = pack_type_id(&set, &name);
            prop_assert_eq!(id, pack_type_id(&set, &name));
            prop_assert!((300_000..400_000).contains(&id));
        }
    }
}
