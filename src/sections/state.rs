//! Mutable per-episode state of one section.
//!
//! The tick array is sized once from the definition and only ever written in
//! place. Cell values: 0 empty, 9 sentinel, 1..=6 face value.

use std::sync::Arc;

use super::definition::{SectionDefinition, SectionLayout, EMPTY_CELL};
use crate::core::{Die, EngineError};

/// A section definition plus its current ticks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionState {
    definition: Arc<SectionDefinition>,
    ticks: Vec<u8>,
}

impl SectionState {
    /// Create an empty section.
    #[must_use]
    pub fn new(definition: Arc<SectionDefinition>) -> Self {
        let ticks = vec![EMPTY_CELL; definition.cell_count()];
        Self { definition, ticks }
    }

    #[must_use]
    pub fn definition(&self) -> &SectionDefinition {
        &self.definition
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    #[must_use]
    pub fn ticks(&self) -> &[u8] {
        &self.ticks
    }

    /// Direct cell access for staging positions. The length is fixed.
    pub fn ticks_mut(&mut self) -> &mut [u8] {
        &mut self.ticks
    }

    /// Replace every cell, e.g. when restoring a snapshot.
    pub fn set_ticks(&mut self, ticks: &[u8]) -> Result<(), EngineError> {
        if ticks.len() != self.ticks.len() {
            return Err(EngineError::SnapshotMismatch(format!(
                "section {} has {} cells, got {}",
                self.definition.name,
                self.ticks.len(),
                ticks.len()
            )));
        }
        self.ticks.copy_from_slice(ticks);
        Ok(())
    }

    /// Zero every cell.
    pub fn reset(&mut self) {
        self.ticks.fill(EMPTY_CELL);
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.definition.layout.placer().is_full(&self.ticks)
    }

    /// Some requirement accepts the combination.
    #[must_use]
    pub fn requirements_met(&self, dice: &[Die]) -> bool {
        self.definition.requirement_met(dice)
    }

    /// A slot is empty and its tick condition holds for the combination.
    #[must_use]
    pub fn slot_admits(&self, dice: &[Die], slot: usize) -> bool {
        let SectionLayout::Slot(slots) = &self.definition.layout else {
            return false;
        };
        match slots.tick_condition(slot) {
            Some(condition) => self.ticks[slot] == EMPTY_CELL && condition.holds(dice),
            None => false,
        }
    }

    /// Full placement check for `make_use_of`.
    ///
    /// Grid sections ignore `slots`. Slot sections need at least one slot and
    /// every requested slot must admit the combination.
    #[must_use]
    pub fn check(&self, dice: &[Die], slots: &[usize]) -> bool {
        if !self.requirements_met(dice) {
            return false;
        }
        if self.definition.is_slot() {
            !slots.is_empty() && slots.iter().all(|&slot| self.slot_admits(dice, slot))
        } else {
            true
        }
    }

    /// The combination could be placed here with some slot choice.
    #[must_use]
    pub fn accepts(&self, dice: &[Die]) -> bool {
        if self.is_full() || !self.requirements_met(dice) {
            return false;
        }
        if self.definition.is_slot() {
            (0..self.definition.slot_count()).any(|slot| self.slot_admits(dice, slot))
        } else {
            true
        }
    }

    /// Place a combination.
    ///
    /// Returns false without touching any cell when the section is full or
    /// the combination fails the check.
    pub fn make_use_of(&mut self, dice: &[Die], slots: &[usize]) -> bool {
        if self.is_full() || !self.check(dice, slots) {
            return false;
        }
        let run = self.definition.converter.convert(dice);
        self.definition
            .layout
            .placer()
            .place(&mut self.ticks, &run, slots);
        true
    }

    /// Current score.
    #[must_use]
    pub fn score(&self) -> i32 {
        self.definition
            .scoring
            .formula()
            .score(&self.definition, &self.ticks)
    }

    #[must_use]
    pub fn max_score(&self) -> i32 {
        self.definition.max_score()
    }
}
