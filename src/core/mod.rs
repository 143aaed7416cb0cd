//! Core engine types: dice, RNG, errors, configuration and game state.

pub mod dice;
pub mod rng;
pub mod error;
pub mod config;
pub mod state;

pub use dice::{
    Color, DiceCombination, DiceMask, DiceRoster, Die, DEFAULT_COLORS, DICE_COUNT, FACE_COUNT,
    MASK_COUNT,
};
pub use rng::{GameRng, GameRngState};
pub use error::EngineError;
pub use config::{EngineConfig, Variant, SIMPLIFIED_SECTIONS};
pub use state::{GameState, Phase};
