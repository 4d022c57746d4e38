//! 加權抽取（開包）
//!
//! 每個卡包欄位（slot）開包時做一次加權抽取：
//! - 稀有度模式：卡組內每張卡依其稀有度在表中的權重參與抽取
//! - 卡名模式：只從表中列出的卡抽取
//!
//! 候選為空時回傳 None，呼叫端略過該欄位。

use rand::Rng;
use tracing::warn;

use super::cards::Card;
use super::catalog::CardCatalog;
use super::packs::{Pack, Slot, SlotMode, WeightTable};

/// 可被抽中的權重（非正值、NaN、無限大都不參與）
fn effective_weight(weight: f32) -> Option<f64> {
    (weight.is_finite() && weight > 0.0).then_some(f64::from(weight))
}

/// 加權隨機選一個候選
///
/// 在 `[0, total]` 取亂數，依原順序累加權重，回傳第一個累計值 ≥ 亂數的候選；
/// 浮點誤差導致沒有命中時，回傳最後一個可抽中的候選。
pub fn resolve_weighted<'a, T, R>(candidates: &'a [(T, f32)], rng: &mut R) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    let total: f64 = candidates
        .iter()
        .filter_map(|(_, w)| effective_weight(*w))
        .sum();
    if total <= 0.0 {
        return None;
    }

    let roll = rng.gen_range(0.0..=total);
    let mut cumulative = 0.0;
    let mut last = None;

    for (candidate, weight) in candidates {
        let Some(weight) = effective_weight(*weight) else {
            continue;
        };
        cumulative += weight;
        last = Some(candidate);
        if cumulative >= roll {
            return Some(candidate);
        }
    }

    last
}

/// 稀有度模式：卡組所有卡依稀有度權重抽取
pub fn draw_by_rarity<'c, R>(
    catalog: &'c CardCatalog,
    set_name: &str,
    weights: &WeightTable,
    rng: &mut R,
) -> Option<&'c Card>
where
    R: Rng + ?Sized,
{
    let candidates: Vec<(&Card, f32)> = catalog
        .cards_in_set(set_name)
        .filter_map(|card| {
            weights
                .get_ignore_case(&card.rarity)
                .filter(|w| *w > 0.0)
                .map(|w| (card, w))
        })
        .collect();

    resolve_weighted(&candidates, rng).copied()
}

/// 卡名模式：從表中列出的卡抽取；找不到的卡名記錄後略過
pub fn draw_by_name<'c, R>(
    catalog: &'c CardCatalog,
    set_name: &str,
    weights: &WeightTable,
    rng: &mut R,
) -> Option<&'c Card>
where
    R: Rng + ?Sized,
{
    let candidates: Vec<(&Card, f32)> = weights
        .iter()
        .filter(|(_, w)| *w > 0.0)
        .filter_map(|(name, w)| {
            let card = catalog
                .find_card(set_name, name)
                .or_else(|| catalog.find_card_by_name(name));
            if card.is_none() {
                warn!(set = set_name, card = name, "pack slot references unknown card");
            }
            card.map(|card| (card, w))
        })
        .collect();

    resolve_weighted(&candidates, rng).copied()
}

/// 依欄位模式抽一張
pub fn draw_slot<'c, R>(
    catalog: &'c CardCatalog,
    set_name: &str,
    slot: &Slot,
    rng: &mut R,
) -> Option<&'c Card>
where
    R: Rng + ?Sized,
{
    match slot.mode {
        SlotMode::Rarity => draw_by_rarity(catalog, set_name, &slot.weights, rng),
        SlotMode::Cards => draw_by_name(catalog, set_name, &slot.weights, rng),
    }
}

/// 開包：每個欄位抽一次，沒抽到的欄位略過
pub fn open_pack<'c, R>(catalog: &'c CardCatalog, pack: &Pack, rng: &mut R) -> Vec<&'c Card>
where
    R: Rng + ?Sized,
{
    pack.slots
        .iter()
        .filter_map(|slot| draw_slot(catalog, &pack.set_name, slot, rng))
        .collect()
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::cards::parse_cards;
    use crate::game::packs::{create_default_pack, parse_weight_pairs};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const CARDS: &str = "\
Duck Hero | Example Set | 1 | hero.png | Legendary | 0.01 | 1000
Duck Sidekick | Example Set | 2 | sidekick.png | Common | 1 | 10
Duck Scout | Example Set | 3 | scout.png | uncommon | 0.5 | 30
Goose | Other Set | 1 | goose.png | Common | 1 | 5
";

    fn catalog() -> CardCatalog {
        let mut catalog = CardCatalog::new();
        for card in parse_cards(CARDS) {
            catalog.register_card(card).unwrap();
        }
        catalog
    }

    #[test]
    fn test_single_candidate_always_selected() {
        let mut rng = StdRng::seed_from_u64(1);
        let candidates = [("only", 1.0)];
        for _ in 0..100 {
            assert_eq!(resolve_weighted(&candidates, &mut rng), Some(&"only"));
        }
    }

    #[test]
    fn test_empty_candidates() {
        let mut rng = StdRng::seed_from_u64(2);
        let candidates: [(&str, f32); 0] = [];
        for _ in 0..10 {
            assert_eq!(resolve_weighted(&candidates, &mut rng), None);
        }
        assert_eq!(resolve_weighted(&[("a", 0.0), ("b", -1.0)], &mut rng), None);
    }

    #[test]
    fn test_zero_weight_never_selected() {
        let mut rng = StdRng::seed_from_u64(3);
        let forward = [("heavy", 100.0), ("zero", 0.0)];
        let reversed = [("zero", 0.0), ("heavy", 100.0)];
        for _ in 0..10_000 {
            assert_eq!(resolve_weighted(&forward, &mut rng), Some(&"heavy"));
            assert_eq!(resolve_weighted(&reversed, &mut rng), Some(&"heavy"));
        }
    }

    #[test]
    fn test_distribution_follows_weights() {
        let mut rng = StdRng::seed_from_u64(4);
        let candidates = [("a", 1.0), ("b", 3.0)];
        let trials = 20_000;
        let b_hits = (0..trials)
            .filter(|_| resolve_weighted(&candidates, &mut rng) == Some(&"b"))
            .count();
        let ratio = b_hits as f64 / trials as f64;
        assert!((ratio - 0.75).abs() < 0.03, "ratio {ratio}");
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let candidates = [("a", 1.0), ("b", 1.0), ("c", 1.0)];
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            assert_eq!(
                resolve_weighted(&candidates, &mut rng1),
                resolve_weighted(&candidates, &mut rng2)
            );
        }
    }

    #[test]
    fn test_draw_by_rarity_stays_in_set() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(5);
        let weights = parse_weight_pairs("Common:1");
        for _ in 0..100 {
            let card = draw_by_rarity(&catalog, "Example Set", &weights, &mut rng).unwrap();
            assert_eq!(card.name, "Duck Sidekick");
        }
    }

    #[test]
    fn test_draw_by_rarity_is_case_insensitive() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(6);
        let weights = parse_weight_pairs("Uncommon:5, Legendary:0");
        let card = draw_by_rarity(&catalog, "Example Set", &weights, &mut rng).unwrap();
        assert_eq!(card.name, "Duck Scout");
    }

    #[test]
    fn test_draw_by_rarity_no_selection() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(7);
        let weights = parse_weight_pairs("Rare:10, Legendary:0");
        assert!(draw_by_rarity(&catalog, "Example Set", &weights, &mut rng).is_none());
        assert!(draw_by_rarity(&catalog, "Empty Set", &parse_weight_pairs("Common:1"), &mut rng).is_none());
    }

    #[test]
    fn test_draw_by_name() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(8);
        let weights = parse_weight_pairs("Missing Duck:100, Duck Hero:1");
        for _ in 0..20 {
            let card = draw_by_name(&catalog, "Example Set", &weights, &mut rng).unwrap();
            assert_eq!(card.name, "Duck Hero");
        }

        // 其他卡組的卡名也找得到
        let weights = parse_weight_pairs("Goose:1");
        let card = draw_by_name(&catalog, "Example Set", &weights, &mut rng).unwrap();
        assert_eq!(card.set_name, "Other Set");

        let weights = parse_weight_pairs("Nobody:1");
        assert!(draw_by_name(&catalog, "Example Set", &weights, &mut rng).is_none());
    }

    #[test]
    fn test_open_default_pack() {
        let catalog = catalog();
        let pack = create_default_pack("Example Set");
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            let cards = open_pack(&catalog, &pack, &mut rng);
            assert_eq!(cards.len(), 3);
            assert!(cards.iter().all(|c| c.set_name == "Example Set"));
        }
    }

    #[test]
    fn test_open_pack_skips_empty_slots() {
        let catalog = catalog();
        let mut pack = create_default_pack("Example Set");
        pack.slots.push(Slot::cards(parse_weight_pairs("Nobody:1")));
        let mut rng = StdRng::seed_from_u64(10);
        assert_eq!(open_pack(&catalog, &pack, &mut rng).len(), 3);

        let empty = create_default_pack("Empty Set");
        assert!(open_pack(&catalog, &empty, &mut rng).is_empty());
    }
}
