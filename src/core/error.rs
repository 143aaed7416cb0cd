//! Engine error type.

use thiserror::Error;

use super::state::Phase;
use crate::sections::MetadataError;

/// Errors returned by the engine.
///
/// Only [`EngineError::IllegalActionAttempted`] leaves the caller free to
/// carry on with the same episode; everything else is a misuse or a bad
/// input document.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("action id {action_id} is outside the action space (pass id is {pass_id})")]
    ActionOutOfRange { action_id: usize, pass_id: usize },

    #[error("action id {action_id} is not legal in phase {phase}")]
    IllegalActionAttempted { action_id: usize, phase: Phase },

    #[error("malformed section metadata: {0}")]
    MalformedSectionMetadata(#[from] MetadataError),

    #[error("index {index} out of bounds (limit {limit})")]
    IndexOutOfBounds { index: usize, limit: usize },

    #[error("invalid engine config: {0}")]
    InvalidConfig(String),

    #[error("snapshot does not fit this engine: {0}")]
    SnapshotMismatch(String),

    #[error("snapshot encoding failed: {0}")]
    SnapshotEncoding(#[from] bincode::Error),
}

impl EngineError {
    /// Whether the episode should be abandoned after this error.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, EngineError::IllegalActionAttempted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_illegal_action_is_recoverable() {
        let illegal = EngineError::IllegalActionAttempted {
            action_id: 3,
            phase: Phase::SectionChoice,
        };
        assert!(!illegal.is_fatal());

        let out_of_range = EngineError::ActionOutOfRange {
            action_id: 500,
            pass_id: 141,
        };
        assert!(out_of_range.is_fatal());
        assert!(EngineError::InvalidConfig("x".into()).is_fatal());
    }

    #[test]
    fn test_messages() {
        let err = EngineError::ActionOutOfRange {
            action_id: 142,
            pass_id: 141,
        };
        assert_eq!(
            err.to_string(),
            "action id 142 is outside the action space (pass id is 141)"
        );

        let err = EngineError::IllegalActionAttempted {
            action_id: 0,
            phase: Phase::DiceChoice,
        };
        assert_eq!(err.to_string(), "action id 0 is not legal in phase DiceChoice");
    }
}
