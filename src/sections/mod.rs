//! Scoring sections: definitions, metadata loading, tick placement and
//! scoring.
//!
//! ## Overview
//!
//! - `SectionDefinition`: immutable rules (layout, requirements, bonuses)
//! - `SectionCatalog`: ordered definitions loaded from a metadata document
//! - `SectionState`: per-episode tick array plus `make_use_of` / `score`
//! - `TickPlacer`, `ScoreFormula`: the strategies behind placement and scoring

pub mod condition;
pub mod definition;
pub mod metadata;
pub mod catalog;
pub mod placement;
pub mod scoring;
pub mod state;

pub use condition::DiceCondition;
pub use definition::{
    Bonus, BonusType, DiceRequirement, GridLayout, RenderType, ScoringType, SectionDefinition,
    SectionLayout, SlotLayout, TickConverter, EMPTY_CELL, SENTINEL,
};
pub use metadata::{MetadataError, SectionDocument, SectionEntry, TickStrategy};
pub use catalog::SectionCatalog;
pub use placement::TickPlacer;
pub use scoring::{BasicScore, HighestRowSumScore, ScoreFormula, SetCollectionScore};
pub use state::SectionState;
