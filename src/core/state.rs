//! Game state: turn counters, dice, sections and the owned RNG.
//!
//! ## GameState
//!
//! Everything one episode needs:
//! - Turn, pace and phase counters
//! - The current roster and the combination held between take and placement
//! - One `SectionState` per catalogue entry
//! - The RNG that rolls every die
//!
//! Fields are public so scenarios can be staged directly; the engine is the
//! only thing that advances them during play.

use serde::{Deserialize, Serialize};

use super::config::EngineConfig;
use super::dice::{DiceCombination, DiceRoster, DICE_COUNT};
use super::error::EngineError;
use super::rng::GameRng;
use crate::sections::SectionState;

/// Turn phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Dice may be rerolled or taken.
    #[default]
    Reroll,
    /// Dice may be taken.
    DiceChoice,
    /// The held combination must be placed into a section.
    SectionChoice,
    /// The held combination must be placed into a slot of the pending section.
    InnerSectionChoice,
}

impl Phase {
    /// Number of phases.
    pub const COUNT: usize = 4;

    /// Ordinal index in declaration order.
    #[must_use]
    pub const fn ordinal(self) -> usize {
        match self {
            Phase::Reroll => 0,
            Phase::DiceChoice => 1,
            Phase::SectionChoice => 2,
            Phase::InnerSectionChoice => 3,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Reroll => "Reroll",
            Phase::DiceChoice => "DiceChoice",
            Phase::SectionChoice => "SectionChoice",
            Phase::InnerSectionChoice => "InnerSectionChoice",
        };
        f.write_str(name)
    }
}

/// Complete state of one episode.
#[derive(Clone, Debug)]
pub struct GameState {
    /// Turns completed so far (starts at 0).
    pub turn: u32,

    /// Remaining pace. Never negative.
    pub pace: u32,

    pub phase: Phase,

    pub rerolls_left: u8,

    pub picks_left: u8,

    pub roster: DiceRoster,

    /// Combination taken but not yet placed.
    pub held: DiceCombination,

    /// Slot section chosen in `SectionChoice`, awaiting a slot.
    pub pending_section: Option<usize>,

    /// Pace-die face captured when the roster was rolled or the die rerolled.
    pub pace_die_value: u8,

    pub sections: Vec<SectionState>,

    pub rng: GameRng,

    /// Set once pace reaches 0; only a reset clears it.
    pub done: bool,

    /// Roster position of the pace die, checked at construction.
    pace_die: usize,
}

impl GameState {
    /// Create the initial state for an episode.
    ///
    /// Fails when `config.pace_die` is not a roster position.
    pub fn new(config: &EngineConfig, sections: Vec<SectionState>) -> Result<Self, EngineError> {
        let mut rng = GameRng::new(config.seed);
        let roster = DiceRoster::roll(&config.dice_colors, &mut rng);
        let pace_die_value = roster
            .dice()
            .get(config.pace_die)
            .map(|die| die.value)
            .ok_or_else(|| {
                EngineError::InvalidConfig(format!(
                    "pace_die {} is not a roster position (0..{DICE_COUNT})",
                    config.pace_die
                ))
            })?;

        Ok(Self {
            turn: 0,
            pace: config.max_pace,
            phase: Phase::Reroll,
            rerolls_left: config.rerolls_per_turn,
            picks_left: config.picks_per_turn,
            roster,
            held: DiceCombination::new(),
            pending_section: None,
            pace_die_value,
            sections,
            rng,
            done: false,
            pace_die: config.pace_die,
        })
    }

    /// Roster position of the pace die.
    #[must_use]
    pub const fn pace_die(&self) -> usize {
        self.pace_die
    }

    /// Re-read the pace die after the roster changed under it.
    pub fn capture_pace_die(&mut self) {
        self.pace_die_value = self.roster.dice()[self.pace_die].value;
    }

    /// Return to the initial state for `seed`, reusing the section storage.
    pub fn reset(&mut self, config: &EngineConfig, seed: u64) {
        for section in &mut self.sections {
            section.reset();
        }
        self.rng = GameRng::new(seed);
        self.turn = 0;
        self.pace = config.max_pace;
        self.done = false;
        self.begin_turn(config);
    }

    /// Restore per-turn allowances and roll a fresh roster.
    pub fn begin_turn(&mut self, config: &EngineConfig) {
        self.phase = Phase::Reroll;
        self.rerolls_left = config.rerolls_per_turn;
        self.picks_left = config.picks_per_turn;
        self.held.clear();
        self.pending_section = None;
        self.roster = DiceRoster::roll(&config.dice_colors, &mut self.rng);
        self.capture_pace_die();
    }

    /// Sum of all section scores.
    #[must_use]
    pub fn total_score(&self) -> i32 {
        self.sections.iter().map(SectionState::score).sum()
    }

    /// Get a section by index.
    #[must_use]
    pub fn section(&self, index: usize) -> Option<&SectionState> {
        self.sections.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::SectionCatalog;

    fn state() -> GameState {
        let catalog = SectionCatalog::bundled().unwrap();
        GameState::new(&EngineConfig::phased(), catalog.instantiate()).unwrap()
    }

    #[test]
    fn test_phase_ordinals() {
        assert_eq!(Phase::Reroll.ordinal(), 0);
        assert_eq!(Phase::InnerSectionChoice.ordinal(), Phase::COUNT - 1);
        assert_eq!(Phase::default(), Phase::Reroll);
    }

    #[test]
    fn test_new_state() {
        let state = state();
        assert_eq!(state.turn, 0);
        assert_eq!(state.pace, 40);
        assert_eq!(state.phase, Phase::Reroll);
        assert_eq!(state.rerolls_left, 1);
        assert_eq!(state.picks_left, 2);
        assert_eq!(state.roster.live_count(), 6);
        assert_eq!(state.pace_die_value, state.roster.dice()[5].value);
        assert_eq!(state.total_score(), 0);
        assert!(!state.done);
    }

    #[test]
    fn test_same_seed_same_roster() {
        let a = state();
        let b = state();
        assert_eq!(a.roster, b.roster);
    }

    #[test]
    fn test_reset_clears_sections() {
        let config = EngineConfig::phased();
        let mut state = state();
        let initial = state.roster.clone();

        state.sections[0].ticks_mut()[0] = 9;
        state.pace = 3;
        state.turn = 5;
        state.done = true;
        state.roster.set_value(0, 0).unwrap();

        state.reset(&config, config.seed);

        assert!(state.sections[0].ticks().iter().all(|&c| c == 0));
        assert_eq!(state.pace, 40);
        assert_eq!(state.turn, 0);
        assert!(!state.done);
        assert_eq!(state.roster, initial);
    }

    #[test]
    fn test_pace_die_outside_roster() {
        let catalog = SectionCatalog::bundled().unwrap();
        let config = EngineConfig {
            pace_die: DICE_COUNT,
            ..EngineConfig::phased()
        };
        assert!(matches!(
            GameState::new(&config, catalog.instantiate()),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_pace_die_position_kept() {
        let config = EngineConfig::phased().with_dice(crate::core::DEFAULT_COLORS, 2);
        let mut state =
            GameState::new(&config, SectionCatalog::bundled().unwrap().instantiate()).unwrap();
        assert_eq!(state.pace_die(), 2);
        assert_eq!(state.pace_die_value, state.roster.dice()[2].value);

        state.begin_turn(&config);
        assert_eq!(state.pace_die_value, state.roster.dice()[2].value);
    }
}
