//! Observation encoding.
//!
//! ## Layout
//!
//! Blocks appear in this order:
//!
//! 1. Dice: per roster position, a one-hot over face values 0..=6
//!    (0 = spent)
//! 2. Cells: per section in catalogue order, per cell, 1.0 when ticked
//! 3. Phase: one-hot over the four phases (phased variant only)
//! 4. Metrics: rerolls and picks left as fractions of the per-turn maximum
//!    (phased only), pace as a fraction of the starting pace, then the
//!    benchmark section's score as a fraction of its best score when one is
//!    configured
//! 5. Legal mask: one entry per action id
//!
//! The layout is fixed when the encoder is built.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::tensor::EncodedState;
use crate::core::{EngineConfig, EngineError, GameState, Phase, Variant, DICE_COUNT, FACE_COUNT};
use crate::sections::{SectionCatalog, EMPTY_CELL};

/// Positions per die in the dice block.
pub const DIE_ENCODING_WIDTH: usize = FACE_COUNT as usize + 1;

/// Encodes game state into tensors for agent input.
pub trait StateEncoder {
    /// Encode the state together with its legal-action mask.
    fn encode(&self, state: &GameState, legal_mask: &[bool]) -> EncodedState;

    /// Get the shape of encoded states.
    fn output_shape(&self) -> Vec<usize>;

    /// Get the total number of possible actions.
    fn action_space_size(&self) -> usize;
}

/// Offsets of each block in the flat observation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationLayout {
    pub dice: Range<usize>,
    pub cells: Range<usize>,
    pub phase: Range<usize>,
    pub metrics: Range<usize>,
    pub legal_mask: Range<usize>,
}

impl ObservationLayout {
    /// Total feature count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.legal_mask.end
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Benchmark {
    section: usize,
    max_score: i32,
}

/// Observation encoder for one engine configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObservationEncoder {
    variant: Variant,
    layout: ObservationLayout,
    max_pace: u32,
    rerolls_per_turn: u8,
    picks_per_turn: u8,
    benchmark: Option<Benchmark>,
}

impl ObservationEncoder {
    /// Build the encoder. Fails when the benchmark section is not in the
    /// catalogue.
    pub fn new(
        config: &EngineConfig,
        catalog: &SectionCatalog,
        action_space_size: usize,
    ) -> Result<Self, EngineError> {
        let benchmark = match &config.benchmark_section {
            Some(name) => {
                let section = catalog.index_of(name).ok_or_else(|| {
                    EngineError::InvalidConfig(format!(
                        "benchmark section {name:?} is not being played"
                    ))
                })?;
                let max_score = catalog.get(section).map_or(0, |def| def.max_score());
                Some(Benchmark { section, max_score })
            }
            None => None,
        };

        let phased = config.variant == Variant::Phased;
        let dice = 0..DICE_COUNT * DIE_ENCODING_WIDTH;
        let cells = dice.end..dice.end + catalog.total_cells();
        let phase_len = if phased { Phase::COUNT } else { 0 };
        let phase = cells.end..cells.end + phase_len;
        let metric_len = (if phased { 3 } else { 1 }) + usize::from(benchmark.is_some());
        let metrics = phase.end..phase.end + metric_len;
        let legal_mask = metrics.end..metrics.end + action_space_size;

        Ok(Self {
            variant: config.variant,
            layout: ObservationLayout {
                dice,
                cells,
                phase,
                metrics,
                legal_mask,
            },
            max_pace: config.max_pace,
            rerolls_per_turn: config.rerolls_per_turn,
            picks_per_turn: config.picks_per_turn,
            benchmark,
        })
    }

    #[must_use]
    pub fn layout(&self) -> &ObservationLayout {
        &self.layout
    }

    fn metrics(&self, state: &GameState) -> Vec<f32> {
        let mut metrics = Vec::with_capacity(self.layout.metrics.len());
        if self.variant == Variant::Phased {
            metrics.push(ratio(
                f32::from(state.rerolls_left),
                f32::from(self.rerolls_per_turn),
            ));
            metrics.push(ratio(f32::from(state.picks_left), f32::from(self.picks_per_turn)));
        }
        metrics.push(ratio(state.pace as f32, self.max_pace as f32));
        if let Some(benchmark) = &self.benchmark {
            let score = state.section(benchmark.section).map_or(0, |s| s.score());
            metrics.push(ratio(score as f32, benchmark.max_score as f32));
        }
        metrics
    }
}

fn ratio(value: f32, max: f32) -> f32 {
    if max > 0.0 {
        value / max
    } else {
        0.0
    }
}

impl StateEncoder for ObservationEncoder {
    fn encode(&self, state: &GameState, legal_mask: &[bool]) -> EncodedState {
        let layout = &self.layout;
        let mut tensor = vec![0.0f32; layout.len()];

        for (pos, die) in state.roster.iter().enumerate() {
            let face = usize::from(die.value).min(DIE_ENCODING_WIDTH - 1);
            tensor[layout.dice.start + pos * DIE_ENCODING_WIDTH + face] = 1.0;
        }

        let cells = state.sections.iter().flat_map(|s| s.ticks().iter());
        for (slot, &cell) in tensor[layout.cells.clone()].iter_mut().zip(cells) {
            if cell != EMPTY_CELL {
                *slot = 1.0;
            }
        }

        if !layout.phase.is_empty() {
            tensor[layout.phase.start + state.phase.ordinal()] = 1.0;
        }

        for (slot, value) in tensor[layout.metrics.clone()]
            .iter_mut()
            .zip(self.metrics(state))
        {
            *slot = value;
        }

        for (slot, &legal) in tensor[layout.legal_mask.clone()].iter_mut().zip(legal_mask) {
            if legal {
                *slot = 1.0;
            }
        }

        EncodedState::new(tensor, self.output_shape())
    }

    fn output_shape(&self) -> Vec<usize> {
        vec![self.layout.len()]
    }

    fn action_space_size(&self) -> usize {
        self.layout.legal_mask.len()
    }
}
