//! Service-layer integration tests (catalog + sessions + conversions)

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::game::{create_default_pack, parse_cards, parse_packs, CardCatalog};
    use crate::service::{open_pack_response, set_infos, ServiceError, ServiceState};

    const CARDS: &str = "\
Duck Hero | Example Set | 1 | hero.png | Legendary | 0.01 | 1000 | The hero of the pond
Duck Sidekick | Example Set | 2 | sidekick.png | Common | 1 | 10
Duck Scout | Example Set | 3 | scout.png | Uncommon | 0.5 | 30
Duck Medic | Example Set | 4 | medic.png | Rare | 0.2 | 80
";

    const PACKS: &str = "\
Hero Pack | hero_pack.png | 500 | 0.02
  CARDS: Duck Hero:1
  RARITY: Common:10, Rare:1
";

    fn state(seed: u64) -> ServiceState {
        ServiceState::new(Arc::new(catalog()), seed)
    }

    fn catalog() -> CardCatalog {
        let mut catalog = CardCatalog::new();
        for card in parse_cards(CARDS) {
            catalog.register_card(card).unwrap();
        }
        for pack in parse_packs(PACKS, "Example Set") {
            catalog.register_pack(pack).unwrap();
        }
        catalog.register_pack(create_default_pack("Example Set")).unwrap();
        catalog
    }

    fn pack_id(state: &ServiceState, name: &str) -> u32 {
        state
            .catalog()
            .packs()
            .iter()
            .find(|p| p.name == name)
            .expect("pack")
            .type_id()
    }

    fn names(cards: &[crate::game::Card]) -> Vec<String> {
        cards.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn test_same_seed_same_openings() {
        let a = state(99);
        let b = state(99);
        let id = pack_id(&a, "Example Set Pack");

        for _ in 0..20 {
            let left = a.open_pack("alice", id).unwrap();
            let right = b.open_pack("alice", id).unwrap();
            assert_eq!(names(&left), names(&right));
            assert_eq!(left.len(), 3);
        }
    }

    #[test]
    fn test_reset_restarts_sequence() {
        let state = state(1);
        let id = pack_id(&state, "Example Set Pack");

        state.reset("bob", 7);
        let first = state.open_packs("bob", id, 5).unwrap();
        state.reset("bob", 7);
        let second = state.open_packs("bob", id, 5).unwrap();

        let first: Vec<_> = first.iter().map(|c| names(c)).collect();
        let second: Vec<_> = second.iter().map(|c| names(c)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_card_slot_always_hits_named_card() {
        let state = state(3);
        let id = pack_id(&state, "Hero Pack");
        for cards in state.open_packs("carol", id, 50).unwrap() {
            assert_eq!(cards.len(), 2);
            assert_eq!(cards[0].name, "Duck Hero");
            assert!(cards[1].name == "Duck Sidekick" || cards[1].name == "Duck Medic");
        }
    }

    #[test]
    fn test_unknown_ids() {
        let state = state(0);
        assert_eq!(
            state.open_pack("dave", 1).unwrap_err(),
            ServiceError::UnknownPack(1)
        );
        assert_eq!(state.card(42).unwrap_err(), ServiceError::UnknownCard(42));
        assert!(state.open_packs("dave", 1, 0).unwrap().is_empty());
    }

    #[test]
    fn test_session_seed_depends_on_player() {
        let state = state(5);
        assert_eq!(state.session_seed("alice"), state.session_seed("alice"));
        assert_ne!(state.session_seed("alice"), state.session_seed("bob"));
    }

    #[test]
    fn test_session_count_is_bounded() {
        let state = ServiceState::with_session_limit(Arc::new(catalog()), 0, 3);
        let id = pack_id(&state, "Example Set Pack");

        for player in 0..50 {
            state.open_pack(&format!("player-{player}"), id).unwrap();
            state.reset(&format!("reset-{player}"), player);
            assert!(state.session_count() <= 3);
        }
        assert_eq!(state.session_count(), 3);
    }

    #[test]
    fn test_least_recently_used_session_is_evicted() {
        let state = ServiceState::with_session_limit(Arc::new(catalog()), 0, 2);
        let id = pack_id(&state, "Example Set Pack");

        state.open_pack("alice", id).unwrap();
        state.open_pack("bob", id).unwrap();
        state.open_pack("alice", id).unwrap();
        state.open_pack("carol", id).unwrap();

        assert!(state.has_session("alice"));
        assert!(!state.has_session("bob"));
        assert!(state.has_session("carol"));
    }

    #[test]
    fn test_evicted_player_restarts_from_session_seed() {
        let state = ServiceState::with_session_limit(Arc::new(catalog()), 8, 1);
        let id = pack_id(&state, "Example Set Pack");

        let first = state.open_pack("alice", id).unwrap();
        state.open_pack("bob", id).unwrap();
        let again = state.open_pack("alice", id).unwrap();
        assert_eq!(names(&first), names(&again));
    }

    #[test]
    fn test_conversions() {
        let state = state(0);
        let sets = set_infos(state.catalog());
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].name, "Example Set");
        assert_eq!(sets[0].cards.len(), 4);
        assert_eq!(sets[0].packs.len(), 2);

        let hero = &sets[0].cards[0];
        assert_eq!(hero.quality, 6);
        assert_eq!(hero.description, "The hero of the pond");
        assert_eq!(state.card(hero.type_id).unwrap().name, "Duck Hero");

        let scout = &sets[0].cards[2];
        assert_eq!(scout.description, "Duck Scout - Uncommon card from Example Set (No. 003)");

        let default_pack = sets[0].packs.iter().find(|p| p.is_default).expect("default");
        assert_eq!(default_pack.slot_count, 3);

        let cards = state.open_pack("erin", default_pack.type_id).unwrap();
        let response = open_pack_response(default_pack.type_id, &cards);
        assert_eq!(response.pack_id, default_pack.type_id);
        assert_eq!(response.cards.len(), cards.len());
    }
}
