//! Precomputed dice combinations for the simplified variant.
//!
//! For each section the table lists, in ascending order, every roster mask
//! whose colour multiset matches one of the section's requirements. A section
//! choice walks its list and uses the first combination the section accepts.

use serde::{Deserialize, Serialize};

use crate::core::{Color, DiceCombination, DiceMask, DiceRoster, DICE_COUNT};
use crate::sections::{SectionCatalog, SectionState};

/// Candidate masks per section.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationTable {
    masks: Vec<Vec<DiceMask>>,
}

impl CombinationTable {
    /// Build the table for a roster colour layout.
    #[must_use]
    pub fn build(catalog: &SectionCatalog, colors: &[Color; DICE_COUNT]) -> Self {
        let masks = catalog
            .iter()
            .map(|definition| {
                let targets: Vec<[u8; 3]> = definition
                    .requirements
                    .iter()
                    .map(|req| Color::histogram(req.colors.iter().copied()))
                    .collect();
                DiceMask::all_nonempty()
                    .filter(|mask| {
                        let counts = Color::histogram(mask.positions().map(|pos| colors[pos]));
                        targets.contains(&counts)
                    })
                    .collect()
            })
            .collect();
        Self { masks }
    }

    /// Candidate masks of a section.
    #[must_use]
    pub fn masks(&self, section: usize) -> &[DiceMask] {
        self.masks.get(section).map_or(&[][..], Vec::as_slice)
    }

    /// First candidate the section would accept right now.
    #[must_use]
    pub fn first_applicable(
        &self,
        section_index: usize,
        section: &SectionState,
        roster: &DiceRoster,
        slots: &[usize],
    ) -> Option<(DiceMask, DiceCombination)> {
        if section.is_full() {
            return None;
        }
        self.masks(section_index).iter().find_map(|&mask| {
            let combination = roster.combination(mask);
            (!combination.is_empty() && section.check(&combination, slots))
                .then_some((mask, combination))
        })
    }
}
