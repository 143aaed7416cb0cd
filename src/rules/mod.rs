//! Game rules: the action space, legality and the turn engine.
//!
//! Agents only ever see integer action ids. `ActionCodec` maps them to
//! `Action`s, `Ruleset` decides which are legal in a state, and `RollAndRake`
//! applies them.

pub mod action;
pub mod combinations;
pub mod ruleset;
pub mod engine;
pub mod snapshot;

pub use action::{Action, ActionCodec, REROLL_OFFSET, SECTION_OFFSET, TAKE_OFFSET};
pub use combinations::CombinationTable;
pub use ruleset::Ruleset;
pub use engine::{RollAndRake, StepInfo, StepOutcome};
pub use snapshot::EngineSnapshot;
