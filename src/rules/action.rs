//! Packed integer action space.
//!
//! ## Phased layout
//!
//! With `K` sections and `W` slots in the widest Slot section:
//!
//! | Ids | Action |
//! |---|---|
//! | `0..63` | `Reroll(mask)`, mask = id + 1 |
//! | `63..126` | `TakeCombination(mask)`, mask = id - 62 |
//! | `126..126+K` | `ChooseSection(k)` |
//! | `126+K..126+K+W` | `ChooseSlot(j)` |
//! | `126+K+W` | `Pass` |
//!
//! ## Simplified layout
//!
//! `0..K` choose a section, `K` passes.
//!
//! ```
//! use roll_and_rake::rules::{Action, ActionCodec};
//!
//! let codec = ActionCodec::phased(9, 6);
//! assert_eq!(codec.pass_id(), 141);
//! assert_eq!(codec.action_space_size(), 142);
//! assert_eq!(codec.decode(141).unwrap(), Action::Pass);
//! assert!(codec.decode(142).is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{DiceMask, EngineError, Variant, MASK_COUNT};

/// First reroll id.
pub const REROLL_OFFSET: usize = 0;

/// First take id.
pub const TAKE_OFFSET: usize = REROLL_OFFSET + MASK_COUNT;

/// First section id in the phased layout.
pub const SECTION_OFFSET: usize = TAKE_OFFSET + MASK_COUNT;

/// A decoded action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Reroll(DiceMask),
    TakeCombination(DiceMask),
    ChooseSection(usize),
    ChooseSlot(usize),
    Pass,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Reroll(mask) => write!(f, "Reroll({mask})"),
            Action::TakeCombination(mask) => write!(f, "Take({mask})"),
            Action::ChooseSection(k) => write!(f, "Section({k})"),
            Action::ChooseSlot(j) => write!(f, "Slot({j})"),
            Action::Pass => f.write_str("Pass"),
        }
    }
}

/// Maps action ids to actions and back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCodec {
    variant: Variant,
    section_count: usize,
    slot_count: usize,
}

impl ActionCodec {
    /// Phased codec for `section_count` sections and `slot_count` slots.
    #[must_use]
    pub const fn phased(section_count: usize, slot_count: usize) -> Self {
        Self {
            variant: Variant::Phased,
            section_count,
            slot_count,
        }
    }

    /// Simplified codec for `section_count` sections.
    #[must_use]
    pub const fn simplified(section_count: usize) -> Self {
        Self {
            variant: Variant::Simplified,
            section_count,
            slot_count: 0,
        }
    }

    /// Codec for a variant.
    #[must_use]
    pub const fn for_variant(variant: Variant, section_count: usize, slot_count: usize) -> Self {
        match variant {
            Variant::Phased => Self::phased(section_count, slot_count),
            Variant::Simplified => Self::simplified(section_count),
        }
    }

    #[must_use]
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    #[must_use]
    pub const fn section_count(&self) -> usize {
        self.section_count
    }

    #[must_use]
    pub const fn slot_count(&self) -> usize {
        self.slot_count
    }

    const fn slot_offset(&self) -> usize {
        SECTION_OFFSET + self.section_count
    }

    /// Id of `Pass`, the largest valid id.
    #[must_use]
    pub const fn pass_id(&self) -> usize {
        match self.variant {
            Variant::Phased => self.slot_offset() + self.slot_count,
            Variant::Simplified => self.section_count,
        }
    }

    /// Number of action ids (`pass_id + 1`).
    #[must_use]
    pub const fn action_space_size(&self) -> usize {
        self.pass_id() + 1
    }

    /// Decode an id.
    pub fn decode(&self, action_id: usize) -> Result<Action, EngineError> {
        let pass_id = self.pass_id();
        if action_id > pass_id {
            return Err(EngineError::ActionOutOfRange { action_id, pass_id });
        }
        if action_id == pass_id {
            return Ok(Action::Pass);
        }

        let action = match self.variant {
            Variant::Simplified => Action::ChooseSection(action_id),
            Variant::Phased => {
                if action_id < TAKE_OFFSET {
                    Action::Reroll(mask_at(action_id - REROLL_OFFSET)?)
                } else if action_id < SECTION_OFFSET {
                    Action::TakeCombination(mask_at(action_id - TAKE_OFFSET)?)
                } else if action_id < self.slot_offset() {
                    Action::ChooseSection(action_id - SECTION_OFFSET)
                } else {
                    Action::ChooseSlot(action_id - self.slot_offset())
                }
            }
        };
        Ok(action)
    }

    /// Encode an action. `None` when the action has no id in this layout.
    #[must_use]
    pub fn encode(&self, action: Action) -> Option<usize> {
        match (self.variant, action) {
            (_, Action::Pass) => Some(self.pass_id()),
            (Variant::Phased, Action::Reroll(mask)) if !mask.is_empty() => {
                Some(REROLL_OFFSET + usize::from(mask.bits()) - 1)
            }
            (Variant::Phased, Action::TakeCombination(mask)) if !mask.is_empty() => {
                Some(TAKE_OFFSET + usize::from(mask.bits()) - 1)
            }
            (Variant::Phased, Action::ChooseSection(k)) if k < self.section_count => {
                Some(SECTION_OFFSET + k)
            }
            (Variant::Phased, Action::ChooseSlot(j)) if j < self.slot_count => {
                Some(self.slot_offset() + j)
            }
            (Variant::Simplified, Action::ChooseSection(k)) if k < self.section_count => Some(k),
            _ => None,
        }
    }
}

fn mask_at(index: usize) -> Result<DiceMask, EngineError> {
    let bits = u8::try_from(index + 1).map_err(|_| EngineError::IndexOutOfBounds {
        index,
        limit: MASK_COUNT,
    })?;
    DiceMask::new(bits)
}
