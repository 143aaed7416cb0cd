//! Observation encoding for learning agents.

pub mod tensor;
pub mod encoder;

pub use tensor::EncodedState;
pub use encoder::{ObservationEncoder, ObservationLayout, StateEncoder, DIE_ENCODING_WIDTH};
