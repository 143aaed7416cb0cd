//! # roll-and-rake
//!
//! A deterministic single-agent dice-scoring engine built for reinforcement
//! learning.
//!
//! ## Design Principles
//!
//! 1. **Data-Driven Sections**: Scoring sections are loaded from a JSON
//!    metadata document. Nothing about a particular section is hardcoded.
//!
//! 2. **Integer Actions**: Every decision is an id in a fixed action space,
//!    and every observation carries the legal-action mask.
//!
//! 3. **Deterministic**: The engine owns a seeded ChaCha RNG. Equal seeds and
//!    equal action sequences give identical episodes.
//!
//! ## Variants
//!
//! - **Phased**: reroll, take and place up to twice per turn
//! - **Simplified**: one section choice per turn, the engine picks the dice
//!
//! ## Modules
//!
//! - `core`: Dice, RNG, errors, configuration and game state
//! - `sections`: Section definitions, metadata, placement and scoring
//! - `rules`: Action codec, legality, the turn engine and snapshots
//! - `observation`: Flat tensor encoding for agents
//! - `events`: Structured engine events and NDJSON logging
//! - `python`: PyO3 bindings (feature `python`)

pub mod core;
pub mod sections;
pub mod rules;
pub mod observation;
pub mod events;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    Color, Die, DiceCombination, DiceMask, DiceRoster,
    GameRng, GameRngState,
    EngineConfig, Variant, EngineError,
    GameState, Phase,
};

pub use crate::sections::{
    SectionCatalog, SectionDefinition, SectionState, MetadataError,
};

pub use crate::rules::{
    Action, ActionCodec, Ruleset, RollAndRake, StepInfo, StepOutcome, EngineSnapshot,
};

pub use crate::observation::{EncodedState, ObservationEncoder, ObservationLayout, StateEncoder};

pub use crate::events::{EngineEvent, NdjsonWriter};
