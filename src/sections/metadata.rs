//! Section metadata documents (JSON).
//!
//! ## Schema
//!
//! ```json
//! { "sections": [ {
//!     "name": "Busch",
//!     "tick_strategy": "Grid",
//!     "dice_to_tick_converter": "ConstantPerDie",
//!     "ticks_number": 12,
//!     "dice_requirements": [ { "colors": ["Orange", "Brown"], "condition": "SameValue" } ],
//!     "bonuses": [ { "type": "Points", "value": [8], "location": 5 } ],
//!     "scoring_type": "Basic",
//!     "render_type": "Vertical",
//!     "row_lengths": [2, 2, 2, 2, 2, 2],
//!     "min_ticks_to_fill_row": 2
//! } ] }
//! ```
//!
//! Slot sections replace `row_lengths`/`min_ticks_to_fill_row` with
//! `tick_conditions`. Older documents spell some values differently; the
//! aliases `ContinuosTick`, `IrregularTick`, `OneTickPerDie`,
//! `EachValuePerDie` and the key `min_ticks_to_fullfill_row` are accepted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::condition::DiceCondition;
use super::definition::{
    Bonus, DiceRequirement, GridLayout, RenderType, ScoringType, SectionDefinition,
    SectionLayout, SlotLayout, TickConverter,
};

/// Problems with a section metadata document.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to read section metadata: {0}")]
    Io(#[from] std::io::Error),

    #[error("section metadata is not valid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("section metadata defines no sections")]
    Empty,

    #[error("duplicate section name {0:?}")]
    DuplicateName(String),

    #[error("no section named {0:?}")]
    UnknownSection(String),

    #[error("section {section:?}: {reason}")]
    Invalid { section: String, reason: String },
}

/// Placement strategy tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickStrategy {
    #[serde(alias = "ContinuosTick")]
    Grid,
    #[serde(alias = "IrregularTick")]
    Slot,
}

/// Top-level document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionDocument {
    pub sections: Vec<SectionEntry>,
}

/// One section as written in a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionEntry {
    pub name: String,
    pub tick_strategy: TickStrategy,
    #[serde(default)]
    pub dice_to_tick_converter: TickConverter,
    pub ticks_number: usize,
    pub dice_requirements: Vec<DiceRequirement>,
    #[serde(default)]
    pub bonuses: Vec<Bonus>,
    pub scoring_type: ScoringType,
    #[serde(default)]
    pub render_type: RenderType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub row_lengths: Vec<usize>,
    #[serde(
        default,
        alias = "min_ticks_to_fullfill_row",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_ticks_to_fill_row: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tick_conditions: Vec<DiceCondition>,
}

impl SectionEntry {
    /// Build and validate the definition.
    pub fn into_definition(self) -> Result<SectionDefinition, MetadataError> {
        let invalid = |reason: &str| MetadataError::Invalid {
            section: self.name.clone(),
            reason: reason.to_string(),
        };

        let layout = match self.tick_strategy {
            TickStrategy::Grid => {
                if !self.tick_conditions.is_empty() {
                    return Err(invalid("grid sections take no tick_conditions"));
                }
                let min = self
                    .min_ticks_to_fill_row
                    .ok_or_else(|| invalid("grid section needs min_ticks_to_fill_row"))?;
                SectionLayout::Grid(GridLayout::new(self.row_lengths.clone(), min))
            }
            TickStrategy::Slot => {
                if !self.row_lengths.is_empty() || self.min_ticks_to_fill_row.is_some() {
                    return Err(invalid("slot sections take no row layout"));
                }
                SectionLayout::Slot(SlotLayout::new(self.tick_conditions.clone()))
            }
        };

        if layout.cell_count() != self.ticks_number {
            return Err(MetadataError::Invalid {
                section: self.name.clone(),
                reason: format!(
                    "ticks_number {} does not match layout with {} cells",
                    self.ticks_number,
                    layout.cell_count()
                ),
            });
        }

        let definition = SectionDefinition {
            name: self.name,
            layout,
            converter: self.dice_to_tick_converter,
            requirements: self.dice_requirements,
            bonuses: self.bonuses,
            scoring: self.scoring_type,
            render: self.render_type,
        };
        definition.validate()?;
        Ok(definition)
    }

    /// Document form of a definition.
    #[must_use]
    pub fn from_definition(definition: &SectionDefinition) -> Self {
        let (tick_strategy, row_lengths, min_ticks, tick_conditions) = match &definition.layout {
            SectionLayout::Grid(grid) => (
                TickStrategy::Grid,
                grid.row_lengths().to_vec(),
                Some(grid.min_ticks_to_fill_row()),
                Vec::new(),
            ),
            SectionLayout::Slot(slots) => (
                TickStrategy::Slot,
                Vec::new(),
                None,
                slots.tick_conditions().to_vec(),
            ),
        };
        Self {
            name: definition.name.clone(),
            tick_strategy,
            dice_to_tick_converter: definition.converter,
            ticks_number: definition.cell_count(),
            dice_requirements: definition.requirements.clone(),
            bonuses: definition.bonuses.clone(),
            scoring_type: definition.scoring,
            render_type: definition.render,
            row_lengths,
            min_ticks_to_fill_row: min_ticks,
            tick_conditions,
        }
    }
}

impl SectionDocument {
    /// Parse a document without validating its sections.
    pub fn from_json_str(json: &str) -> Result<Self, MetadataError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> Result<String, MetadataError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
