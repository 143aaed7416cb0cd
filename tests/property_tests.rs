//! Property-based tests for dice, sections and the turn engine.

use proptest::prelude::*;

use roll_and_rake::core::{Color, DiceMask, Die, MASK_COUNT};
use roll_and_rake::sections::{SectionCatalog, SectionLayout, SectionState};
use roll_and_rake::{EngineConfig, GameRng, RollAndRake};

/// Strategy: a die of any colour with a live face.
fn die_strategy() -> impl Strategy<Value = Die> {
    (prop::sample::select(Color::ALL.to_vec()), 1..=6u8)
        .prop_map(|(color, value)| Die::new(color, value))
}

/// Strategy: one to three dice, the sizes sections accept.
fn dice_strategy() -> impl Strategy<Value = Vec<Die>> {
    prop::collection::vec(die_strategy(), 1..=3)
}

fn bundled_sections() -> Vec<SectionState> {
    SectionCatalog::bundled().unwrap().instantiate()
}

/// Play a section forward with a sequence of placements.
fn played(index: usize, history: &[Vec<Die>]) -> SectionState {
    let mut section = bundled_sections().swap_remove(index);
    let slot_count = section.definition().slot_count();
    for (turn, dice) in history.iter().enumerate() {
        let slots = if slot_count > 0 { vec![turn % slot_count] } else { Vec::new() };
        section.make_use_of(dice, &slots);
    }
    section
}

proptest! {
    // 1. Mask decode and re-encode is the identity
    #[test]
    fn mask_roundtrip(bits in 1..=MASK_COUNT as u8) {
        let mask = DiceMask::new(bits).unwrap();
        let positions: Vec<usize> = mask.positions().collect();
        prop_assert_eq!(DiceMask::from_positions(&positions).unwrap(), mask);
        prop_assert_eq!(positions.len() as u32, mask.count());
    }

    // 2. A grid placement only touches one row and never more cells than dice
    #[test]
    fn grid_placement_stays_in_one_row(
        index in 0..9usize,
        history in prop::collection::vec(dice_strategy(), 0..12),
        dice in dice_strategy(),
    ) {
        let mut section = played(index, &history);
        let SectionLayout::Grid(grid) = section.definition().layout.clone() else {
            return Ok(());
        };
        let before = section.ticks().to_vec();
        section.make_use_of(&dice, &[]);

        let changed: Vec<usize> = before
            .iter()
            .zip(section.ticks())
            .enumerate()
            .filter_map(|(cell, (a, b))| (a != b).then_some(cell))
            .collect();
        prop_assert!(changed.len() <= dice.len());
        if let Some(&first) = changed.first() {
            let row = grid.row_of(first);
            prop_assert!(changed.iter().all(|&cell| grid.row_of(cell) == row));
        }
    }

    // 3. A refused placement changes nothing, and full sections refuse everything
    #[test]
    fn refused_placement_is_noop(
        index in 0..9usize,
        history in prop::collection::vec(dice_strategy(), 0..40),
        dice in dice_strategy(),
        slot in 0..6usize,
    ) {
        let mut section = played(index, &history);
        let slots = if section.definition().is_slot() { vec![slot] } else { Vec::new() };
        let before = section.ticks().to_vec();
        let was_full = section.is_full();

        if !section.make_use_of(&dice, &slots) {
            prop_assert_eq!(section.ticks(), before.as_slice());
        }
        if was_full {
            prop_assert_eq!(section.ticks(), before.as_slice());
        }
    }

    // 4. Scores stay within [0, max_score]
    #[test]
    fn score_bounded(
        index in 0..9usize,
        history in prop::collection::vec(dice_strategy(), 0..40),
    ) {
        let section = played(index, &history);
        let score = section.score();
        prop_assert!(score >= 0);
        prop_assert!(score <= section.max_score(), "{} scored {score}", section.name());
    }
}

/// Strategy: either preset, phased or simplified.
fn config_strategy() -> impl Strategy<Value = EngineConfig> {
    prop::sample::select(vec![EngineConfig::phased(), EngineConfig::simplified()])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    // 5. Pace never increases and the episode ends exactly when it hits 0
    #[test]
    fn pace_monotonic_until_terminal(
        config in config_strategy(),
        seed in any::<u64>(),
        policy_seed in any::<u64>(),
    ) {
        let mut engine = RollAndRake::new(config.with_seed(seed)).unwrap();
        let mut policy = GameRng::new(policy_seed);
        let mut pace = engine.state().pace;

        while let Some(id) = engine.random_legal_action(&mut policy) {
            let outcome = engine.step(id).unwrap();
            prop_assert!(outcome.info.pace <= pace);
            prop_assert_eq!(outcome.done, outcome.info.pace == 0);
            pace = outcome.info.pace;
        }
        prop_assert!(engine.is_done());
        prop_assert_eq!(engine.state().pace, 0);
        prop_assert!(engine.legal_actions().is_empty());
    }

    // 6. Observations keep their length and carry the legal mask
    #[test]
    fn observation_carries_legal_mask(
        config in config_strategy(),
        seed in any::<u64>(),
        steps in 0..30usize,
    ) {
        let mut engine = RollAndRake::new(config.with_seed(seed)).unwrap();
        let mut policy = GameRng::new(seed ^ 0x5eed);
        for _ in 0..steps {
            match engine.random_legal_action(&mut policy) {
                Some(id) => { engine.step(id).unwrap(); }
                None => break,
            }
        }

        let obs = engine.observation();
        prop_assert_eq!(obs.len(), engine.observation_size());
        let legal = engine.legal_action_mask();
        prop_assert_eq!(legal.len(), engine.action_space_size());
        let mask_block = obs.slice(engine.encoder().layout().legal_mask.clone());
        prop_assert_eq!(mask_block.len(), legal.len());
        for (flag, &legal) in mask_block.iter().zip(&legal) {
            prop_assert_eq!(*flag == 1.0, legal);
        }
    }
}
