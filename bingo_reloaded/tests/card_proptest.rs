/// Property-based tests for card generation and win detection using proptest
///
/// These tests verify line detection on every card size and that generated
/// cards are always full, whatever the pools look like.
use bingo_reloaded::{
    card::{Card, CardDefinition, CardSize, Task, card_rng, generate_card},
    entities::{GameTime, TeamColor},
};
use proptest::prelude::*;
use std::collections::HashMap;

// Card with a distinct item in every slot
fn distinct_card(side: usize) -> Card {
    let size = CardSize::new(side).unwrap();
    let tasks = (0..size.full_size())
        .map(|i| Task::item(format!("item_{i}"), 1))
        .collect();
    Card::from_tasks(size, tasks).unwrap()
}

// Strategy to generate one line of a card: (side, kind, index)
// kind 0 = row, 1 = column, 2 = main diagonal, 3 = anti-diagonal
fn line_strategy() -> impl Strategy<Value = (usize, u8, usize)> {
    (2usize..=8).prop_flat_map(|side| (Just(side), 0u8..4, 0..side))
}

fn line_indices(side: usize, kind: u8, index: usize) -> Vec<usize> {
    match kind {
        0 => (0..side).map(|x| index * side + x).collect(),
        1 => (0..side).map(|y| y * side + index).collect(),
        2 => (0..side).map(|i| i * side + i).collect(),
        _ => (0..side).map(|i| i * side + (side - 1 - i)).collect(),
    }
}

// Strategy to generate a pool layout: per-pool sizes and requested counts
fn pools_strategy() -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0usize..12, 0usize..20), 0..5)
}

proptest! {
    #[test]
    fn test_completed_line_is_bingo((side, kind, index) in line_strategy()) {
        let mut card = distinct_card(side);
        for slot in line_indices(side, kind, index) {
            let completed = card.complete_item(&format!("item_{slot}"), 1, TeamColor::Red, GameTime::ZERO);
            prop_assert_eq!(completed, Some(slot));
        }

        prop_assert!(card.has_bingo(TeamColor::Red));
        prop_assert!(!card.has_bingo(TeamColor::Blue));
    }

    #[test]
    fn test_line_minus_one_slot_is_not_bingo(
        (side, kind, index) in line_strategy(),
        skip in 0usize..8,
    ) {
        let line = line_indices(side, kind, index);
        let skipped = line[skip % line.len()];

        let mut card = distinct_card(side);
        for &slot in line.iter().filter(|&&slot| slot != skipped) {
            card.complete_item(&format!("item_{slot}"), 1, TeamColor::Red, GameTime::ZERO);
        }

        prop_assert!(!card.has_bingo(TeamColor::Red));
        prop_assert_eq!(card.complete_count(TeamColor::Red), side - 1);
    }

    #[test]
    fn test_generated_card_is_always_full(
        side in 2usize..=7,
        layout in pools_strategy(),
        seed in any::<u64>(),
    ) {
        let mut pools = HashMap::new();
        let mut definition = CardDefinition::new("generated");
        for (i, (pool_size, count)) in layout.iter().enumerate() {
            let name = format!("pool_{i}");
            pools.insert(
                name.clone(),
                (0..*pool_size).map(|t| Task::item(format!("{name}_{t}"), 1)).collect::<Vec<_>>(),
            );
            definition = definition.with_pool(name, *count);
        }

        let size = CardSize::new(side).unwrap();
        let card = generate_card(size, &definition, &pools, &mut card_rng(seed));

        prop_assert_eq!(card.slots().len(), size.full_size());
        prop_assert_eq!(card.completed_total(), 0);
    }

    #[test]
    fn test_same_seed_same_card(seed in 1u64.., side in 2usize..=6) {
        let mut pools = HashMap::new();
        pools.insert(
            "items".to_string(),
            (0..40).map(|t| Task::item(format!("item_{t}"), 1)).collect::<Vec<_>>(),
        );
        let definition = CardDefinition::new("seeded").with_pool("items", 40);
        let size = CardSize::new(side).unwrap();

        let first = generate_card(size, &definition, &pools, &mut card_rng(seed));
        let second = generate_card(size, &definition, &pools, &mut card_rng(seed));

        prop_assert_eq!(first, second);
    }
}
