//! The Roll and Rake turn engine.
//!
//! `RollAndRake` owns everything an episode needs: the configuration, the
//! section catalogue, the rules, the observation encoder and the game state.
//! Agents drive it through integer action ids.
//!
//! ## Phased turn
//!
//! - Reroll: any subset of live dice may be rerolled while rerolls remain
//! - Take: a combination leaves the roster and is held
//! - Section: Grid sections apply the held dice at once, Slot sections wait
//!   for a slot choice
//! - After a placement the turn continues with another take while picks
//!   remain, otherwise it ends
//! - Pass ends the turn at any point, discarding held dice
//!
//! ## Simplified turn
//!
//! One section choice per turn. The engine picks the first applicable
//! combination for that section from the combination table, applies it and
//! ends the turn.
//!
//! ## End of turn
//!
//! Pace drops by the pace-die value, the turn counter advances and a fresh
//! roster is rolled. The episode is over once pace reaches 0.
//!
//! ```
//! use roll_and_rake::{EngineConfig, RollAndRake};
//!
//! let mut engine = RollAndRake::new(EngineConfig::phased()).unwrap();
//! let pass = engine.codec().pass_id();
//! while !engine.is_done() {
//!     engine.step(pass).unwrap();
//! }
//! assert_eq!(engine.score(), 0);
//! ```

use super::action::{Action, ActionCodec};
use super::ruleset::Ruleset;
use super::snapshot::EngineSnapshot;
use crate::core::{EngineConfig, EngineError, GameRng, GameState, Phase, Variant};
use crate::events::EngineEvent;
use crate::observation::{EncodedState, ObservationEncoder, StateEncoder};
use crate::sections::{SectionCatalog, SectionState};

/// Bookkeeping returned with every step.
#[derive(Clone, Debug, PartialEq)]
pub struct StepInfo {
    /// The decoded action that was applied.
    pub action: Action,
    /// Turn counter after the step.
    pub turn: u32,
    /// Phase after the step.
    pub phase: Phase,
    /// Pace after the step.
    pub pace: u32,
    /// Total score after the step.
    pub score: i32,
    /// Whether this step ended a turn.
    pub turn_ended: bool,
}

/// Result of a legal step.
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutcome {
    pub observation: EncodedState,
    /// Score after the step minus score before it.
    pub reward: f32,
    pub done: bool,
    pub info: StepInfo,
}

/// Deterministic single-agent dice-scoring engine.
#[derive(Clone, Debug)]
pub struct RollAndRake {
    config: EngineConfig,
    catalog: SectionCatalog,
    rules: Ruleset,
    encoder: ObservationEncoder,
    state: GameState,
    events: Vec<EngineEvent>,
}

impl RollAndRake {
    /// Build an engine over the bundled section catalogue.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_catalog(config, SectionCatalog::bundled()?)
    }

    /// Build an engine over a custom catalogue.
    ///
    /// When the config names a section list, only those sections are played,
    /// in that order.
    pub fn with_catalog(config: EngineConfig, catalog: SectionCatalog) -> Result<Self, EngineError> {
        config.validate()?;
        let catalog = match &config.sections {
            Some(names) => catalog
                .subset(names.as_slice())
                .map_err(|e| EngineError::InvalidConfig(e.to_string()))?,
            None => catalog,
        };

        let rules = Ruleset::new(&config, &catalog);
        let encoder = ObservationEncoder::new(&config, &catalog, rules.codec().action_space_size())?;
        let state = GameState::new(&config, catalog.instantiate())?;

        let mut engine = Self {
            config,
            catalog,
            rules,
            encoder,
            state,
            events: Vec::new(),
        };
        engine.record(EngineEvent::EpisodeStarted {
            seed: engine.config.seed,
            variant: engine.config.variant,
        });
        Ok(engine)
    }

    /// Start a new episode from the configured seed.
    pub fn reset(&mut self) -> EncodedState {
        self.reset_with_seed(self.config.seed)
    }

    /// Start a new episode from an explicit seed.
    pub fn reset_with_seed(&mut self, seed: u64) -> EncodedState {
        self.state.reset(&self.config, seed);
        self.record(EngineEvent::EpisodeStarted {
            seed,
            variant: self.config.variant,
        });
        self.observation()
    }

    /// Apply one action.
    ///
    /// Ids outside the action space are fatal. Illegal actions leave the
    /// state untouched and may be retried with another id.
    pub fn step(&mut self, action_id: usize) -> Result<StepOutcome, EngineError> {
        let action = self.rules.codec().decode(action_id)?;
        let turn = self.state.turn;

        if !self.rules.is_legal(&self.state, action) {
            let phase = self.state.phase;
            self.record(EngineEvent::IllegalAction {
                turn,
                action_id,
                phase,
            });
            return Err(EngineError::IllegalActionAttempted { action_id, phase });
        }

        let before = self.state.total_score();
        let spent_pace = match self.config.variant {
            Variant::Phased => self.apply_phased(action),
            Variant::Simplified => self.apply_simplified(action),
        };
        let score = self.state.total_score();
        let reward = score - before;

        self.record(EngineEvent::ActionApplied {
            turn,
            action_id,
            action,
            reward,
        });
        if let Some(pace_die_value) = spent_pace {
            self.record(EngineEvent::TurnEnded {
                turn: self.state.turn,
                pace: self.state.pace,
                pace_die_value,
                score,
            });
            if self.state.done {
                self.record(EngineEvent::EpisodeFinished {
                    turns: self.state.turn,
                    score,
                });
            }
        }

        Ok(StepOutcome {
            observation: self.observation(),
            reward: reward as f32,
            done: self.state.done,
            info: StepInfo {
                action,
                turn: self.state.turn,
                phase: self.state.phase,
                pace: self.state.pace,
                score,
                turn_ended: spent_pace.is_some(),
            },
        })
    }

    /// Returns the pace-die value spent when the action ended the turn.
    fn apply_phased(&mut self, action: Action) -> Option<u8> {
        let state = &mut self.state;
        match action {
            Action::Reroll(mask) => {
                state.roster.reroll(mask, &mut state.rng);
                state.rerolls_left = state.rerolls_left.saturating_sub(1);
                if mask.contains(state.pace_die()) {
                    state.capture_pace_die();
                }
                None
            }
            Action::TakeCombination(mask) => {
                state.held = state.roster.take(mask);
                state.picks_left = state.picks_left.saturating_sub(1);
                state.phase = Phase::SectionChoice;
                None
            }
            Action::ChooseSection(k) => {
                let is_slot = state
                    .sections
                    .get(k)
                    .is_some_and(|s| s.definition().is_slot());
                if is_slot {
                    state.pending_section = Some(k);
                    state.phase = Phase::InnerSectionChoice;
                    None
                } else {
                    let held = std::mem::take(&mut state.held);
                    if let Some(section) = state.sections.get_mut(k) {
                        section.make_use_of(&held, &[]);
                    }
                    self.after_placement()
                }
            }
            Action::ChooseSlot(slot) => {
                let held = std::mem::take(&mut state.held);
                if let Some(section) = state
                    .pending_section
                    .take()
                    .and_then(|k| state.sections.get_mut(k))
                {
                    section.make_use_of(&held, &[slot]);
                }
                self.after_placement()
            }
            Action::Pass => Some(self.end_turn()),
        }
    }

    fn apply_simplified(&mut self, action: Action) -> Option<u8> {
        if let Action::ChooseSection(k) = action {
            if let Some((mask, combination, slots)) = self.rules.simplified_choice(&self.state, k) {
                self.state.roster.take(mask);
                if let Some(section) = self.state.sections.get_mut(k) {
                    section.make_use_of(&combination, &slots);
                }
            }
        }
        Some(self.end_turn())
    }

    fn after_placement(&mut self) -> Option<u8> {
        if self.state.picks_left > 0 {
            self.state.phase = Phase::DiceChoice;
            None
        } else {
            Some(self.end_turn())
        }
    }

    fn end_turn(&mut self) -> u8 {
        let spent = self.state.pace_die_value;
        self.state.pace = self.state.pace.saturating_sub(u32::from(spent));
        self.state.turn += 1;
        self.state.begin_turn(&self.config);
        if self.state.pace == 0 {
            self.state.done = true;
        }
        spent
    }

    fn record(&mut self, event: EngineEvent) {
        if self.config.record_events {
            self.events.push(event);
        }
    }

    /// Legal action ids in ascending order. Empty once the episode is over.
    #[must_use]
    pub fn legal_actions(&self) -> Vec<usize> {
        self.rules.legal_action_ids(&self.state)
    }

    /// One flag per action id.
    #[must_use]
    pub fn legal_action_mask(&self) -> Vec<bool> {
        self.rules.legal_mask(&self.state)
    }

    /// Check a single id. Fails only when the id is out of range.
    pub fn is_legal(&self, action_id: usize) -> Result<bool, EngineError> {
        let action = self.rules.codec().decode(action_id)?;
        Ok(self.rules.is_legal(&self.state, action))
    }

    /// Pick a uniformly random legal action.
    pub fn random_legal_action(&self, rng: &mut GameRng) -> Option<usize> {
        let legal = self.legal_actions();
        if legal.is_empty() {
            return None;
        }
        Some(legal[rng.gen_range_usize(0..legal.len())])
    }

    /// Total score across all sections.
    #[must_use]
    pub fn score(&self) -> i32 {
        self.state.total_score()
    }

    /// Encode the current state.
    #[must_use]
    pub fn observation(&self) -> EncodedState {
        self.encoder.encode(&self.state, &self.legal_action_mask())
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state.done
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable state access for staging scenarios.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    #[must_use]
    pub fn sections(&self) -> &[SectionState] {
        &self.state.sections
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The catalogue actually played, after any section selection.
    #[must_use]
    pub fn catalog(&self) -> &SectionCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn ruleset(&self) -> &Ruleset {
        &self.rules
    }

    #[must_use]
    pub fn codec(&self) -> &ActionCodec {
        self.rules.codec()
    }

    #[must_use]
    pub fn encoder(&self) -> &ObservationEncoder {
        &self.encoder
    }

    #[must_use]
    pub fn observation_size(&self) -> usize {
        self.encoder.layout().len()
    }

    #[must_use]
    pub fn action_space_size(&self) -> usize {
        self.rules.codec().action_space_size()
    }

    /// Drain buffered events.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Capture the current episode.
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot::capture(&self.state, self.config.variant)
    }

    /// Resume from a snapshot taken on an engine with the same variant and
    /// sections.
    pub fn restore(&mut self, snapshot: &EngineSnapshot) -> Result<(), EngineError> {
        if snapshot.variant != self.config.variant {
            return Err(EngineError::SnapshotMismatch(format!(
                "snapshot is {}, engine is {}",
                snapshot.variant, self.config.variant
            )));
        }
        snapshot.apply_to(&mut self.state)
    }
}
