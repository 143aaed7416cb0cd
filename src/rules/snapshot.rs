//! Engine snapshots.
//!
//! A snapshot captures everything needed to resume an episode exactly,
//! including the RNG position, so replaying the same actions after a restore
//! produces the same dice. Section definitions are not part of it; a snapshot
//! only fits an engine built from the same catalogue and variant.

use serde::{Deserialize, Serialize};

use crate::core::{
    DiceCombination, DiceRoster, Die, EngineError, GameRng, GameRngState, GameState, Phase,
    Variant, DICE_COUNT,
};

/// Serializable episode state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub variant: Variant,
    pub turn: u32,
    pub pace: u32,
    pub phase: Phase,
    pub rerolls_left: u8,
    pub picks_left: u8,
    pub roster: DiceRoster,
    pub held: Vec<Die>,
    pub pending_section: Option<usize>,
    pub pace_die_value: u8,
    pub ticks: Vec<Vec<u8>>,
    pub rng: GameRngState,
    pub done: bool,
}

impl EngineSnapshot {
    /// Capture a state.
    #[must_use]
    pub fn capture(state: &GameState, variant: Variant) -> Self {
        Self {
            variant,
            turn: state.turn,
            pace: state.pace,
            phase: state.phase,
            rerolls_left: state.rerolls_left,
            picks_left: state.picks_left,
            roster: state.roster.clone(),
            held: state.held.to_vec(),
            pending_section: state.pending_section,
            pace_die_value: state.pace_die_value,
            ticks: state.sections.iter().map(|s| s.ticks().to_vec()).collect(),
            rng: state.rng.state(),
            done: state.done,
        }
    }

    /// Write this snapshot into a state.
    ///
    /// Everything is checked before anything is written, so a mismatch
    /// leaves the state untouched.
    pub fn apply_to(&self, state: &mut GameState) -> Result<(), EngineError> {
        if self.ticks.len() != state.sections.len() {
            return Err(EngineError::SnapshotMismatch(format!(
                "snapshot has {} sections, engine has {}",
                self.ticks.len(),
                state.sections.len()
            )));
        }
        for (section, ticks) in state.sections.iter().zip(&self.ticks) {
            if section.ticks().len() != ticks.len() {
                return Err(EngineError::SnapshotMismatch(format!(
                    "section {} has {} cells, snapshot has {}",
                    section.name(),
                    section.ticks().len(),
                    ticks.len()
                )));
            }
        }
        if let Some(pending) = self.pending_section {
            if pending >= state.sections.len() {
                return Err(EngineError::SnapshotMismatch(format!(
                    "pending section {pending} does not exist"
                )));
            }
        }
        if self.phase == Phase::InnerSectionChoice {
            let pending_is_slot = self
                .pending_section
                .and_then(|k| state.sections.get(k))
                .is_some_and(|section| section.definition().is_slot());
            if !pending_is_slot {
                return Err(EngineError::SnapshotMismatch(format!(
                    "{} needs a pending Slot section, got {:?}",
                    self.phase, self.pending_section
                )));
            }
        }
        if self.held.len() > DICE_COUNT {
            return Err(EngineError::SnapshotMismatch(format!(
                "{} held dice",
                self.held.len()
            )));
        }

        for (section, ticks) in state.sections.iter_mut().zip(&self.ticks) {
            section.set_ticks(ticks)?;
        }
        state.turn = self.turn;
        state.pace = self.pace;
        state.phase = self.phase;
        state.rerolls_left = self.rerolls_left;
        state.picks_left = self.picks_left;
        state.roster = self.roster.clone();
        state.held = DiceCombination::from_slice(&self.held);
        state.pending_section = self.pending_section;
        state.pace_die_value = self.pace_die_value;
        state.rng = GameRng::from_state(&self.rng);
        state.done = self.done;
        Ok(())
    }

    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EngineError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bincode.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EngineError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
