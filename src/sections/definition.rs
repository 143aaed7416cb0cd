//! Section definitions: immutable rules for one scoring section.
//!
//! A section is either a **Grid** (ticks fill rows left to right, one run at
//! a time) or a **Slot** section (each cell is addressed individually and has
//! its own tick condition).
//!
//! Definitions are built once, validated, and shared between section states
//! behind an `Arc`.
//!
//! ## Example
//!
//! ```
//! use roll_and_rake::core::Color;
//! use roll_and_rake::sections::{BonusType, DiceCondition, SectionDefinition};
//!
//! let busch = SectionDefinition::grid("Busch", vec![2; 6], 2)
//!     .with_requirement(&[Color::Orange, Color::Brown], DiceCondition::SameValue)
//!     .with_bonus(BonusType::Points, vec![8], 5)
//!     .with_bonus(BonusType::Points, vec![8], 11);
//!
//! assert!(busch.validate().is_ok());
//! assert_eq!(busch.cell_count(), 12);
//! assert_eq!(busch.max_score(), 16);
//! ```

use std::ops::Range;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::condition::DiceCondition;
use super::metadata::MetadataError;
use crate::core::{Color, Die, DICE_COUNT};

/// Cell value of an empty cell.
pub const EMPTY_CELL: u8 = 0;

/// Cell value of a tick that carries no face value.
pub const SENTINEL: u8 = 9;

/// How a placed combination turns into cell values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickConverter {
    /// One sentinel per die.
    #[default]
    #[serde(alias = "OneTickPerDie")]
    ConstantPerDie,
    /// Each die's face value.
    #[serde(alias = "EachValuePerDie")]
    FaceValuePerDie,
}

impl TickConverter {
    /// Convert dice into a tick run.
    #[must_use]
    pub fn convert(self, dice: &[Die]) -> SmallVec<[u8; DICE_COUNT]> {
        match self {
            TickConverter::ConstantPerDie => dice.iter().map(|_| SENTINEL).collect(),
            TickConverter::FaceValuePerDie => dice.iter().map(|d| d.value).collect(),
        }
    }
}

/// Kind of a bonus attached to a cell.
///
/// Only `Points` and `SetCollection` affect scoring; the rest are carried
/// as data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusType {
    Points,
    SmallExtraPoints,
    MediumExtraPoints,
    LargeExtraPoints,
    PlusOneOrange,
    PlusOneBrown,
    PlusOneGreen,
    HazelnutOrange,
    HazelnutBrown,
    HazelnutGreen,
    SetCollection,
}

/// A bonus attached to one cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonus {
    #[serde(rename = "type")]
    pub kind: BonusType,

    /// Point value(s). For the first `SetCollection` bonus this is the
    /// payout table indexed by the number of collected cells.
    #[serde(rename = "value", default)]
    pub values: Vec<i32>,

    /// Cell index the bonus is attached to.
    pub location: usize,
}

/// Scoring formula selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoringType {
    Basic,
    SetCollection,
    HighestRowSum,
}

/// Rendering hint. Stored, never interpreted by the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderType {
    #[default]
    Vertical,
    Horizontal,
    HorizontalShared,
    Irregular,
}

/// One admissible colour multiset plus the value condition it must meet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRequirement {
    pub colors: Vec<Color>,
    pub condition: DiceCondition,
}

impl DiceRequirement {
    #[must_use]
    pub fn new(colors: &[Color], condition: DiceCondition) -> Self {
        Self {
            colors: colors.to_vec(),
            condition,
        }
    }

    /// Colour multiset matches exactly.
    #[must_use]
    pub fn matches_colors(&self, dice: &[Die]) -> bool {
        Color::histogram(self.colors.iter().copied())
            == Color::histogram(dice.iter().map(|d| d.color))
    }

    /// Colours match and the condition holds.
    #[must_use]
    pub fn is_met_by(&self, dice: &[Die]) -> bool {
        self.matches_colors(dice) && self.condition.holds(dice)
    }
}

/// Row structure of a Grid section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridLayout {
    row_lengths: Vec<usize>,
    row_starts: Vec<usize>,
    min_ticks_to_fill_row: usize,
}

impl GridLayout {
    #[must_use]
    pub fn new(row_lengths: Vec<usize>, min_ticks_to_fill_row: usize) -> Self {
        let row_starts = row_lengths
            .iter()
            .scan(0, |start, &len| {
                let row_start = *start;
                *start += len;
                Some(row_start)
            })
            .collect();
        Self {
            row_lengths,
            row_starts,
            min_ticks_to_fill_row,
        }
    }

    #[must_use]
    pub fn row_lengths(&self) -> &[usize] {
        &self.row_lengths
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_lengths.len()
    }

    /// Ticks a row needs before it counts as filled.
    #[must_use]
    pub const fn min_ticks_to_fill_row(&self) -> usize {
        self.min_ticks_to_fill_row
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.row_lengths.iter().sum()
    }

    /// Cell indices of a row.
    #[must_use]
    pub fn row_range(&self, row: usize) -> Range<usize> {
        let start = self.row_starts[row];
        start..start + self.row_lengths[row]
    }

    /// Row containing a cell.
    #[must_use]
    pub fn row_of(&self, cell: usize) -> Option<usize> {
        (0..self.row_count()).find(|&row| self.row_range(row).contains(&cell))
    }

    /// Index of the cell that marks a row as filled.
    #[must_use]
    pub fn advantage_cell(&self, row: usize) -> usize {
        self.row_starts[row] + self.min_ticks_to_fill_row - 1
    }
}

/// Per-slot conditions of a Slot section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotLayout {
    tick_conditions: Vec<DiceCondition>,
}

impl SlotLayout {
    #[must_use]
    pub fn new(tick_conditions: Vec<DiceCondition>) -> Self {
        Self { tick_conditions }
    }

    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.tick_conditions.len()
    }

    #[must_use]
    pub fn tick_condition(&self, slot: usize) -> Option<DiceCondition> {
        self.tick_conditions.get(slot).copied()
    }

    #[must_use]
    pub fn tick_conditions(&self) -> &[DiceCondition] {
        &self.tick_conditions
    }
}

/// Placement strategy plus its geometry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SectionLayout {
    Grid(GridLayout),
    Slot(SlotLayout),
}

impl SectionLayout {
    #[must_use]
    pub fn cell_count(&self) -> usize {
        match self {
            SectionLayout::Grid(grid) => grid.cell_count(),
            SectionLayout::Slot(slots) => slots.slot_count(),
        }
    }
}

/// Immutable rules of one section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionDefinition {
    pub name: String,
    pub layout: SectionLayout,
    pub converter: TickConverter,
    pub requirements: Vec<DiceRequirement>,
    pub bonuses: Vec<Bonus>,
    pub scoring: ScoringType,
    pub render: RenderType,
}

impl SectionDefinition {
    /// Start a Grid section with `Basic` scoring and one sentinel per die.
    #[must_use]
    pub fn grid(
        name: impl Into<String>,
        row_lengths: Vec<usize>,
        min_ticks_to_fill_row: usize,
    ) -> Self {
        Self {
            name: name.into(),
            layout: SectionLayout::Grid(GridLayout::new(row_lengths, min_ticks_to_fill_row)),
            converter: TickConverter::ConstantPerDie,
            requirements: Vec::new(),
            bonuses: Vec::new(),
            scoring: ScoringType::Basic,
            render: RenderType::Vertical,
        }
    }

    /// Start a Slot section with `SetCollection` scoring.
    #[must_use]
    pub fn slot(name: impl Into<String>, tick_conditions: Vec<DiceCondition>) -> Self {
        Self {
            name: name.into(),
            layout: SectionLayout::Slot(SlotLayout::new(tick_conditions)),
            converter: TickConverter::ConstantPerDie,
            requirements: Vec::new(),
            bonuses: Vec::new(),
            scoring: ScoringType::SetCollection,
            render: RenderType::Irregular,
        }
    }

    #[must_use]
    pub fn with_converter(mut self, converter: TickConverter) -> Self {
        self.converter = converter;
        self
    }

    #[must_use]
    pub fn with_requirement(mut self, colors: &[Color], condition: DiceCondition) -> Self {
        self.requirements.push(DiceRequirement::new(colors, condition));
        self
    }

    #[must_use]
    pub fn with_bonus(mut self, kind: BonusType, values: Vec<i32>, location: usize) -> Self {
        self.bonuses.push(Bonus {
            kind,
            values,
            location,
        });
        self
    }

    #[must_use]
    pub fn with_scoring(mut self, scoring: ScoringType) -> Self {
        self.scoring = scoring;
        self
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.layout.cell_count()
    }

    #[must_use]
    pub fn is_slot(&self) -> bool {
        matches!(self.layout, SectionLayout::Slot(_))
    }

    /// Number of addressable slots (0 for Grid sections).
    #[must_use]
    pub fn slot_count(&self) -> usize {
        match &self.layout {
            SectionLayout::Slot(slots) => slots.slot_count(),
            SectionLayout::Grid(_) => 0,
        }
    }

    /// Some requirement accepts the combination.
    #[must_use]
    pub fn requirement_met(&self, dice: &[Die]) -> bool {
        self.requirements.iter().any(|req| req.is_met_by(dice))
    }

    /// Best score this section can reach.
    #[must_use]
    pub fn max_score(&self) -> i32 {
        self.scoring.formula().max_score(self)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), MetadataError> {
        let invalid = |reason: String| MetadataError::Invalid {
            section: self.name.clone(),
            reason,
        };

        if self.name.is_empty() {
            return Err(invalid("name is empty".into()));
        }
        if self.requirements.is_empty() {
            return Err(invalid("no dice requirements".into()));
        }
        for req in &self.requirements {
            if req.colors.is_empty() || req.colors.len() > DICE_COUNT {
                return Err(invalid(format!(
                    "requirement needs 1..={DICE_COUNT} colours, got {}",
                    req.colors.len()
                )));
            }
        }

        match &self.layout {
            SectionLayout::Grid(grid) => {
                if grid.row_count() == 0 || grid.row_lengths().contains(&0) {
                    return Err(invalid("grid rows must be non-empty".into()));
                }
                let min = grid.min_ticks_to_fill_row();
                if min == 0 || grid.row_lengths().iter().any(|&len| len < min) {
                    return Err(invalid(format!(
                        "min_ticks_to_fill_row {min} does not fit every row"
                    )));
                }
            }
            SectionLayout::Slot(slots) => {
                if slots.slot_count() == 0 {
                    return Err(invalid("slot section has no tick conditions".into()));
                }
                if self.scoring == ScoringType::HighestRowSum {
                    return Err(invalid("HighestRowSum needs a grid".into()));
                }
            }
        }

        let cells = self.cell_count();
        for bonus in &self.bonuses {
            if bonus.location >= cells {
                return Err(invalid(format!(
                    "bonus location {} outside {cells} cells",
                    bonus.location
                )));
            }
            if bonus.kind == BonusType::Points && bonus.values.is_empty() {
                return Err(invalid(format!(
                    "Points bonus at {} has no value",
                    bonus.location
                )));
            }
        }

        if self.scoring == ScoringType::SetCollection {
            let collected = self
                .bonuses
                .iter()
                .filter(|b| b.kind == BonusType::SetCollection)
                .count();
            match self.bonuses.first() {
                Some(first) if first.kind == BonusType::SetCollection => {
                    if first.values.len() <= collected {
                        return Err(invalid(format!(
                            "set collection table has {} entries for {collected} cells",
                            first.values.len()
                        )));
                    }
                }
                _ => return Err(invalid("first bonus must hold the set collection table".into())),
            }
        }

        Ok(())
    }
}
