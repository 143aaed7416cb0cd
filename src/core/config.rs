//! Engine configuration.
//!
//! `EngineConfig` fixes everything about an episode that is not section
//! metadata: which rule variant runs, the seed, the pace budget, per-turn
//! reroll/pick allowances and the roster colour layout.
//!
//! ## Presets
//!
//! - [`EngineConfig::phased`]: four-phase turns, pace 40, one reroll and two
//!   picks per turn, Elliott as the benchmark metric.
//! - [`EngineConfig::simplified`]: one decision per turn, pace 60, eight
//!   sections (Elliott is not played).
//!
//! Configs deserialize from JSON with every field optional. Missing fields
//! come from the preset of the named `variant` (phased when absent):
//!
//! ```
//! use roll_and_rake::core::{EngineConfig, Variant};
//!
//! let config = EngineConfig::from_json_str(r#"{ "seed": 7, "max_pace": 20 }"#).unwrap();
//! assert_eq!(config.variant, Variant::Phased);
//! assert_eq!(config.seed, 7);
//! assert_eq!(config.max_pace, 20);
//!
//! let config = EngineConfig::from_json_str(r#"{ "variant": "Simplified" }"#).unwrap();
//! assert_eq!(config, EngineConfig::simplified());
//! ```

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use super::dice::{Color, DEFAULT_COLORS, DICE_COUNT};
use super::error::EngineError;

/// Sections played by the simplified preset.
pub const SIMPLIFIED_SECTIONS: [&str; 8] = [
    "Harvick",
    "Busch",
    "Newman",
    "Johnson",
    "Suarez",
    "Earnhardt",
    "Patrick",
    "Hamlin",
];

/// Rule variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// Reroll, take, choose section, choose slot.
    #[default]
    Phased,
    /// Choosing a section picks the dice and ends the turn.
    Simplified,
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::Phased => f.write_str("Phased"),
            Variant::Simplified => f.write_str("Simplified"),
        }
    }
}

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ConfigDocument")]
pub struct EngineConfig {
    /// Rule variant.
    pub variant: Variant,

    /// Seed used by `reset`.
    pub seed: u64,

    /// Starting pace. The episode ends when pace reaches 0.
    pub max_pace: u32,

    /// Rerolls granted at the start of each turn (phased only).
    pub rerolls_per_turn: u8,

    /// Combinations that may be taken each turn (phased only).
    pub picks_per_turn: u8,

    /// Colour of each roster position.
    pub dice_colors: [Color; DICE_COUNT],

    /// Roster position of the die whose value is subtracted from pace.
    pub pace_die: usize,

    /// Catalogue sections to play, in order. `None` plays all of them.
    pub sections: Option<Vec<String>>,

    /// Section whose normalised score is appended to observations.
    pub benchmark_section: Option<String>,

    /// Buffer structured events on the engine.
    pub record_events: bool,
}

/// Config as written in a document: every field optional.
///
/// `sections` and `benchmark_section` distinguish a missing key (take the
/// preset's value) from an explicit `null` (clear it).
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigDocument {
    #[serde(default)]
    variant: Variant,
    seed: Option<u64>,
    max_pace: Option<u32>,
    rerolls_per_turn: Option<u8>,
    picks_per_turn: Option<u8>,
    dice_colors: Option<[Color; DICE_COUNT]>,
    pace_die: Option<usize>,
    #[serde(default, deserialize_with = "present")]
    sections: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "present")]
    benchmark_section: Option<Option<String>>,
    record_events: Option<bool>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl From<ConfigDocument> for EngineConfig {
    fn from(doc: ConfigDocument) -> Self {
        let preset = match doc.variant {
            Variant::Phased => Self::phased(),
            Variant::Simplified => Self::simplified(),
        };
        Self {
            variant: doc.variant,
            seed: doc.seed.unwrap_or(preset.seed),
            max_pace: doc.max_pace.unwrap_or(preset.max_pace),
            rerolls_per_turn: doc.rerolls_per_turn.unwrap_or(preset.rerolls_per_turn),
            picks_per_turn: doc.picks_per_turn.unwrap_or(preset.picks_per_turn),
            dice_colors: doc.dice_colors.unwrap_or(preset.dice_colors),
            pace_die: doc.pace_die.unwrap_or(preset.pace_die),
            sections: doc.sections.unwrap_or(preset.sections),
            benchmark_section: doc.benchmark_section.unwrap_or(preset.benchmark_section),
            record_events: doc.record_events.unwrap_or(preset.record_events),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::phased()
    }
}

impl EngineConfig {
    /// Four-phase preset.
    #[must_use]
    pub fn phased() -> Self {
        Self {
            variant: Variant::Phased,
            seed: 10,
            max_pace: 40,
            rerolls_per_turn: 1,
            picks_per_turn: 2,
            dice_colors: DEFAULT_COLORS,
            pace_die: DICE_COUNT - 1,
            sections: None,
            benchmark_section: Some("Elliott".to_string()),
            record_events: false,
        }
    }

    /// Single-decision preset.
    #[must_use]
    pub fn simplified() -> Self {
        Self {
            variant: Variant::Simplified,
            max_pace: 60,
            rerolls_per_turn: 0,
            picks_per_turn: 1,
            sections: Some(
                SIMPLIFIED_SECTIONS
                    .iter()
                    .map(|name| name.to_string())
                    .collect(),
            ),
            benchmark_section: None,
            ..Self::phased()
        }
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the starting pace.
    #[must_use]
    pub fn with_max_pace(mut self, max_pace: u32) -> Self {
        self.max_pace = max_pace;
        self
    }

    /// Set rerolls per turn.
    #[must_use]
    pub fn with_rerolls(mut self, rerolls: u8) -> Self {
        self.rerolls_per_turn = rerolls;
        self
    }

    /// Set picks per turn.
    #[must_use]
    pub fn with_picks(mut self, picks: u8) -> Self {
        self.picks_per_turn = picks;
        self
    }

    /// Set the roster colour layout and the pace die position.
    #[must_use]
    pub fn with_dice(mut self, colors: [Color; DICE_COUNT], pace_die: usize) -> Self {
        self.dice_colors = colors;
        self.pace_die = pace_die;
        self
    }

    /// Play only the named sections, in this order.
    #[must_use]
    pub fn with_sections(mut self, names: &[&str]) -> Self {
        self.sections = Some(names.iter().map(|name| name.to_string()).collect());
        self
    }

    /// Play the whole catalogue.
    #[must_use]
    pub fn with_all_sections(mut self) -> Self {
        self.sections = None;
        self
    }

    /// Set or clear the benchmark section.
    #[must_use]
    pub fn with_benchmark(mut self, section: Option<&str>) -> Self {
        self.benchmark_section = section.map(str::to_string);
        self
    }

    /// Enable or disable event recording.
    #[must_use]
    pub fn with_events(mut self, record: bool) -> Self {
        self.record_events = record;
        self
    }

    /// Parse a config from JSON and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| EngineError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Check the values that do not depend on section metadata.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_pace == 0 {
            return Err(EngineError::InvalidConfig("max_pace must be positive".into()));
        }
        if self.pace_die >= DICE_COUNT {
            return Err(EngineError::InvalidConfig(format!(
                "pace_die {} is not a roster position (0..{DICE_COUNT})",
                self.pace_die
            )));
        }
        if self.sections.as_ref().is_some_and(Vec::is_empty) {
            return Err(EngineError::InvalidConfig("section list is empty".into()));
        }
        if self.variant == Variant::Phased && self.picks_per_turn == 0 {
            return Err(EngineError::InvalidConfig(
                "phased turns need at least one pick".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let phased = EngineConfig::phased();
        assert_eq!(phased.max_pace, 40);
        assert_eq!(phased.rerolls_per_turn, 1);
        assert_eq!(phased.picks_per_turn, 2);
        assert_eq!(phased.pace_die, 5);
        assert_eq!(phased.dice_colors[5], Color::Green);

        let simplified = EngineConfig::simplified();
        assert_eq!(simplified.variant, Variant::Simplified);
        assert_eq!(simplified.max_pace, 60);
        assert!(simplified.benchmark_section.is_none());
        assert_eq!(simplified.sections.as_ref().map(Vec::len), Some(8));
        assert!(phased.sections.is_none());

        assert_eq!(EngineConfig::default(), phased);
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::phased()
            .with_seed(99)
            .with_max_pace(12)
            .with_rerolls(2)
            .with_picks(3)
            .with_benchmark(None)
            .with_sections(&["Busch", "Newman"])
            .with_events(true);

        assert_eq!(config.seed, 99);
        assert_eq!(config.max_pace, 12);
        assert_eq!(config.rerolls_per_turn, 2);
        assert_eq!(config.picks_per_turn, 3);
        assert!(config.benchmark_section.is_none());
        assert!(config.record_events);
        assert_eq!(
            config.sections,
            Some(vec!["Busch".to_string(), "Newman".to_string()])
        );
        assert!(config.with_all_sections().sections.is_none());
    }

    #[test]
    fn test_validate() {
        assert!(EngineConfig::phased().validate().is_ok());
        assert!(EngineConfig::simplified().validate().is_ok());
        assert!(EngineConfig::phased().with_max_pace(0).validate().is_err());
        assert!(EngineConfig::phased().with_picks(0).validate().is_err());
        assert!(EngineConfig::simplified().with_picks(0).validate().is_ok());
        assert!(EngineConfig::phased()
            .with_dice(DEFAULT_COLORS, 6)
            .validate()
            .is_err());
        assert!(EngineConfig::phased().with_sections(&[]).validate().is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EngineConfig::simplified().with_seed(3);
        let json = serde_json::to_string(&config).unwrap();
        let parsed = EngineConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_json_rejects_unknown_and_invalid() {
        assert!(EngineConfig::from_json_str(r#"{ "pace": 3 }"#).is_err());
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "max_pace": 0 }"#),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_json_variant_fills_from_its_preset() {
        let config = EngineConfig::from_json_str(r#"{ "variant": "Simplified" }"#).unwrap();
        assert_eq!(config, EngineConfig::simplified());
        assert_eq!(config.max_pace, 60);
        assert_eq!(config.rerolls_per_turn, 0);
        assert!(config.benchmark_section.is_none());
        assert_eq!(config.sections.as_ref().map(Vec::len), Some(8));

        let config = EngineConfig::from_json_str(r#"{ "variant": "Simplified", "seed": 4 }"#)
            .unwrap();
        assert_eq!(config, EngineConfig::simplified().with_seed(4));

        assert_eq!(EngineConfig::from_json_str("{}").unwrap(), EngineConfig::phased());
    }

    #[test]
    fn test_json_null_clears_preset_value() {
        let config = EngineConfig::from_json_str(
            r#"{ "variant": "Simplified", "sections": null, "benchmark_section": "Busch" }"#,
        )
        .unwrap();
        assert!(config.sections.is_none());
        assert_eq!(config.benchmark_section.as_deref(), Some("Busch"));

        let config = EngineConfig::from_json_str(r#"{ "benchmark_section": null }"#).unwrap();
        assert!(config.benchmark_section.is_none());
        assert_eq!(config.max_pace, 40);
    }
}
