//! Action legality.
//!
//! ## Phased rules
//!
//! - `Reroll`: phase Reroll, a reroll left, mask touches only live dice
//! - `TakeCombination`: phase Reroll or DiceChoice, a pick left, and some
//!   section would accept the combination
//! - `ChooseSection`: phase SectionChoice and the section accepts the held dice
//! - `ChooseSlot`: phase InnerSectionChoice and the pending Slot section admits
//!   the held dice in that slot
//! - `Pass`: always
//!
//! ## Simplified rules
//!
//! A section choice is legal when the combination table yields a combination
//! the section accepts. `Pass` is always legal.
//!
//! Once the episode is over nothing is legal.

use smallvec::SmallVec;

use super::action::{Action, ActionCodec};
use super::combinations::CombinationTable;
use crate::core::{DiceCombination, DiceMask, EngineConfig, GameState, Phase, Variant};
use crate::sections::{SectionCatalog, SectionState};

/// Codec plus the lookup tables the legality checks need.
#[derive(Clone, Debug)]
pub struct Ruleset {
    codec: ActionCodec,
    combinations: CombinationTable,
}

impl Ruleset {
    /// Build the rules for a catalogue and config.
    #[must_use]
    pub fn new(config: &EngineConfig, catalog: &SectionCatalog) -> Self {
        let codec = ActionCodec::for_variant(config.variant, catalog.len(), catalog.max_slot_count());
        let combinations = match config.variant {
            Variant::Simplified => CombinationTable::build(catalog, &config.dice_colors),
            Variant::Phased => CombinationTable::default(),
        };
        Self {
            codec,
            combinations,
        }
    }

    #[must_use]
    pub const fn codec(&self) -> &ActionCodec {
        &self.codec
    }

    #[must_use]
    pub const fn combinations(&self) -> &CombinationTable {
        &self.combinations
    }

    /// Check a decoded action.
    #[must_use]
    pub fn is_legal(&self, state: &GameState, action: Action) -> bool {
        if state.done {
            return false;
        }
        match self.codec.variant() {
            Variant::Phased => phased_legal(state, action),
            Variant::Simplified => match action {
                Action::Pass => true,
                Action::ChooseSection(k) => self.simplified_choice(state, k).is_some(),
                _ => false,
            },
        }
    }

    /// One flag per action id.
    #[must_use]
    pub fn legal_mask(&self, state: &GameState) -> Vec<bool> {
        (0..self.codec.action_space_size())
            .map(|id| {
                self.codec
                    .decode(id)
                    .is_ok_and(|action| self.is_legal(state, action))
            })
            .collect()
    }

    /// Legal action ids in ascending order.
    #[must_use]
    pub fn legal_action_ids(&self, state: &GameState) -> Vec<usize> {
        self.legal_mask(state)
            .into_iter()
            .enumerate()
            .filter_map(|(id, legal)| legal.then_some(id))
            .collect()
    }

    /// Combination and slots a simplified section choice would use.
    #[must_use]
    pub fn simplified_choice(
        &self,
        state: &GameState,
        section_index: usize,
    ) -> Option<(DiceMask, DiceCombination, SmallVec<[usize; 1]>)> {
        let section = state.sections.get(section_index)?;
        let slots = simplified_slots(state, section);
        self.combinations
            .first_applicable(section_index, section, &state.roster, &slots)
            .map(|(mask, combination)| (mask, combination, slots))
    }
}

/// Slot sections use the slot named by the pace die; grids take no slot.
///
/// The choice is never widened to other admissible slots: a Slot section whose
/// pace-die slot is taken or refuses the dice is not legal this turn, even when
/// another slot would accept them.
fn simplified_slots(state: &GameState, section: &SectionState) -> SmallVec<[usize; 1]> {
    let mut slots = SmallVec::new();
    if section.definition().is_slot() {
        if let Some(slot) = usize::from(state.pace_die_value).checked_sub(1) {
            slots.push(slot);
        }
    }
    slots
}

fn phased_legal(state: &GameState, action: Action) -> bool {
    match action {
        Action::Pass => true,
        Action::Reroll(mask) => {
            state.phase == Phase::Reroll
                && state.rerolls_left > 0
                && !state.roster.combination(mask).is_empty()
        }
        Action::TakeCombination(mask) => {
            if !matches!(state.phase, Phase::Reroll | Phase::DiceChoice) || state.picks_left == 0 {
                return false;
            }
            let combination = state.roster.combination(mask);
            !combination.is_empty() && state.sections.iter().any(|s| s.accepts(&combination))
        }
        Action::ChooseSection(k) => {
            state.phase == Phase::SectionChoice
                && state
                    .sections
                    .get(k)
                    .is_some_and(|section| section.accepts(&state.held))
        }
        Action::ChooseSlot(slot) => {
            state.phase == Phase::InnerSectionChoice
                && state
                    .pending_section
                    .and_then(|k| state.sections.get(k))
                    .is_some_and(|section| section.check(&state.held, &[slot]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Color, DiceRoster, Die};
    use crate::sections::{BonusType, DiceCondition, SectionDefinition};

    fn setup(config: &EngineConfig) -> (Ruleset, GameState) {
        let catalog = SectionCatalog::bundled().unwrap();
        let catalog = match &config.sections {
            Some(names) => catalog.subset(names.as_slice()).unwrap(),
            None => catalog,
        };
        (
            Ruleset::new(config, &catalog),
            GameState::new(config, catalog.instantiate()).unwrap(),
        )
    }

    #[test]
    fn test_initial_rerolls_all_legal() {
        let (rules, state) = setup(&EngineConfig::phased());
        let legal = rules.legal_action_ids(&state);
        for id in 0..63 {
            assert!(legal.contains(&id));
        }
        assert!(legal.contains(&rules.codec().pass_id()));
    }

    #[test]
    fn test_nothing_legal_when_done() {
        let (rules, mut state) = setup(&EngineConfig::phased());
        state.done = true;
        assert!(rules.legal_action_ids(&state).is_empty());
        assert!(!rules.is_legal(&state, Action::Pass));
    }

    #[test]
    fn test_choose_section_needs_section_phase() {
        let (rules, mut state) = setup(&EngineConfig::phased());
        state.held = [Die::new(Color::Green, 4)].into_iter().collect();
        // Newman accepts a green four, but not before a take
        assert!(!rules.is_legal(&state, Action::ChooseSection(3)));
        state.phase = Phase::SectionChoice;
        assert!(rules.is_legal(&state, Action::ChooseSection(3)));
        assert!(!rules.is_legal(&state, Action::ChooseSection(0)));
    }

    #[test]
    fn test_choose_slot_follows_tick_condition() {
        let (rules, mut state) = setup(&EngineConfig::phased());
        state.held = [Die::new(Color::Green, 4)].into_iter().collect();
        state.phase = Phase::InnerSectionChoice;
        state.pending_section = Some(3);
        assert!(rules.is_legal(&state, Action::ChooseSlot(3)));
        assert!(!rules.is_legal(&state, Action::ChooseSlot(2)));
    }

    #[test]
    fn test_simplified_choice_uses_pace_die_slot() {
        let (rules, mut state) = setup(&EngineConfig::simplified());
        state.roster = DiceRoster::from_dice([
            Die::new(Color::Orange, 1),
            Die::new(Color::Orange, 2),
            Die::new(Color::Orange, 3),
            Die::new(Color::Brown, 5),
            Die::new(Color::Brown, 6),
            Die::new(Color::Green, 4),
        ]);
        state.pace_die_value = 4;

        // Newman is index 2 in the simplified line-up
        let (mask, combination, slots) = rules.simplified_choice(&state, 2).unwrap();
        assert_eq!(mask.bits(), 32);
        assert_eq!(combination.len(), 1);
        assert_eq!(slots.as_slice(), &[3]);

        // Harvick takes the orange run
        assert!(rules.is_legal(&state, Action::ChooseSection(0)));
        // No brown pair of equal value for Earnhardt
        assert!(!rules.is_legal(&state, Action::ChooseSection(5)));
        assert!(rules.is_legal(&state, Action::Pass));
        assert!(!rules.is_legal(&state, Action::Reroll(DiceMask::ALL)));
    }

    #[test]
    fn test_simplified_slot_is_only_the_pace_die_slot() {
        let mut open_slots =
            SectionDefinition::slot("Open", vec![DiceCondition::NoCondition; 6])
                .with_requirement(&[Color::Green], DiceCondition::NoCondition)
                .with_bonus(BonusType::SetCollection, vec![0, 1, 2, 3, 4, 5, 6], 0);
        for location in 1..6 {
            open_slots = open_slots.with_bonus(BonusType::SetCollection, vec![], location);
        }
        let mut catalog = SectionCatalog::new();
        catalog.register(open_slots).unwrap();

        let config = EngineConfig::simplified().with_all_sections();
        let rules = Ruleset::new(&config, &catalog);
        let mut state = GameState::new(&config, catalog.instantiate()).unwrap();
        state.roster = DiceRoster::from_dice([
            Die::new(Color::Orange, 1),
            Die::new(Color::Orange, 1),
            Die::new(Color::Orange, 1),
            Die::new(Color::Brown, 1),
            Die::new(Color::Brown, 1),
            Die::new(Color::Green, 3),
        ]);
        state.pace_die_value = 3;

        let (_, _, slots) = rules.simplified_choice(&state, 0).unwrap();
        assert_eq!(slots.as_slice(), &[2]);

        // Five empty slots would take the green die, but not slot 2
        state.sections[0].ticks_mut()[2] = 9;
        assert!(rules.simplified_choice(&state, 0).is_none());
        assert!(!rules.is_legal(&state, Action::ChooseSection(0)));
    }
}
