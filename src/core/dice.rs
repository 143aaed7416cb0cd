//! Dice vocabulary: colours, dice, the six-die roster and position masks.
//!
//! ## Positions and masks
//!
//! The roster always holds exactly [`DICE_COUNT`] dice. A [`DiceMask`] selects
//! roster positions with one bit per position (bit `i` = position `i`), so the
//! selectable masks are `1..=63`.
//!
//! A die whose value is 0 has been spent this turn. Any mask that touches a
//! spent die decodes to an empty combination, which callers treat as a no-op.
//!
//! ```
//! use roll_and_rake::core::{Color, DiceMask, DiceRoster, Die};
//!
//! let roster = DiceRoster::from_dice([
//!     Die::new(Color::Orange, 4),
//!     Die::new(Color::Orange, 5),
//!     Die::new(Color::Orange, 6),
//!     Die::new(Color::Brown, 1),
//!     Die::spent(Color::Brown),
//!     Die::new(Color::Green, 3),
//! ]);
//!
//! let mask = DiceMask::from_positions(&[0, 2]).unwrap();
//! assert_eq!(roster.combination(mask).len(), 2);
//!
//! // Touching the spent brown die yields nothing.
//! let mask = DiceMask::from_positions(&[3, 4]).unwrap();
//! assert!(roster.combination(mask).is_empty());
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::error::EngineError;
use super::rng::GameRng;

/// Number of dice in a roster.
pub const DICE_COUNT: usize = 6;

/// Number of faces on a die.
pub const FACE_COUNT: u8 = 6;

/// Number of non-empty position masks (`2^DICE_COUNT - 1`).
pub const MASK_COUNT: usize = (1 << DICE_COUNT) - 1;

/// Default roster colours: three orange, two brown, one green.
pub const DEFAULT_COLORS: [Color; DICE_COUNT] = [
    Color::Orange,
    Color::Orange,
    Color::Orange,
    Color::Brown,
    Color::Brown,
    Color::Green,
];

/// Die colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Orange,
    Brown,
    Green,
}

impl Color {
    /// All colours in ordinal order.
    pub const ALL: [Color; 3] = [Color::Orange, Color::Brown, Color::Green];

    /// Ordinal index (Orange = 0, Brown = 1, Green = 2).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Color::Orange => 0,
            Color::Brown => 1,
            Color::Green => 2,
        }
    }

    /// Count colours into a per-colour histogram.
    #[must_use]
    pub fn histogram(colors: impl IntoIterator<Item = Color>) -> [u8; 3] {
        let mut counts = [0u8; 3];
        for color in colors {
            counts[color.index()] += 1;
        }
        counts
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Color::Orange => "Orange",
            Color::Brown => "Brown",
            Color::Green => "Green",
        };
        f.write_str(name)
    }
}

/// A single die: colour plus face value (1..=6, or 0 once spent).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Die {
    pub color: Color,
    pub value: u8,
}

impl Die {
    /// Create a die showing `value`.
    #[must_use]
    pub const fn new(color: Color, value: u8) -> Self {
        Self { color, value }
    }

    /// Create a spent die.
    #[must_use]
    pub const fn spent(color: Color) -> Self {
        Self { color, value: 0 }
    }

    /// Check if the die has been spent this turn.
    #[must_use]
    pub const fn is_spent(self) -> bool {
        self.value == 0
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.color, self.value)
    }
}

/// Dice picked out of a roster. Never longer than the roster itself.
pub type DiceCombination = SmallVec<[Die; DICE_COUNT]>;

/// Bitmask over roster positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DiceMask(u8);

impl DiceMask {
    /// Mask selecting every position.
    pub const ALL: DiceMask = DiceMask(MASK_COUNT as u8);

    /// Create a mask from raw bits.
    ///
    /// Bits above the roster size are rejected with `IndexOutOfBounds`.
    pub fn new(bits: u8) -> Result<Self, EngineError> {
        if usize::from(bits) > MASK_COUNT {
            return Err(EngineError::IndexOutOfBounds {
                index: usize::from(bits),
                limit: MASK_COUNT + 1,
            });
        }
        Ok(Self(bits))
    }

    /// Create a mask from roster positions.
    pub fn from_positions(positions: &[usize]) -> Result<Self, EngineError> {
        let mut bits = 0u8;
        for &pos in positions {
            if pos >= DICE_COUNT {
                return Err(EngineError::IndexOutOfBounds {
                    index: pos,
                    limit: DICE_COUNT,
                });
            }
            bits |= 1 << pos;
        }
        Ok(Self(bits))
    }

    /// Iterate over every non-empty mask in ascending order.
    pub fn all_nonempty() -> impl Iterator<Item = DiceMask> {
        (1..=MASK_COUNT as u8).map(DiceMask)
    }

    /// Get the raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Check if a position is selected.
    #[must_use]
    pub const fn contains(self, pos: usize) -> bool {
        pos < DICE_COUNT && self.0 & (1 << pos) != 0
    }

    /// Number of selected positions.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Check if no position is selected.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Selected positions in ascending order.
    pub fn positions(self) -> impl Iterator<Item = usize> {
        (0..DICE_COUNT).filter(move |&pos| self.contains(pos))
    }
}

impl std::fmt::Display for DiceMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mask({:06b})", self.0)
    }
}

/// The six dice rolled for a turn.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceRoster {
    dice: [Die; DICE_COUNT],
}

impl DiceRoster {
    /// Roll a fresh roster with the given colour layout.
    #[must_use]
    pub fn roll(colors: &[Color; DICE_COUNT], rng: &mut GameRng) -> Self {
        let dice = colors.map(|color| Die::new(color, rng.roll_die()));
        Self { dice }
    }

    /// Build a roster from explicit dice.
    #[must_use]
    pub const fn from_dice(dice: [Die; DICE_COUNT]) -> Self {
        Self { dice }
    }

    /// All dice by position.
    #[must_use]
    pub const fn dice(&self) -> &[Die; DICE_COUNT] {
        &self.dice
    }

    /// Get the die at a position.
    pub fn get(&self, pos: usize) -> Result<Die, EngineError> {
        self.dice
            .get(pos)
            .copied()
            .ok_or(EngineError::IndexOutOfBounds {
                index: pos,
                limit: DICE_COUNT,
            })
    }

    /// Overwrite the face value at a position.
    pub fn set_value(&mut self, pos: usize, value: u8) -> Result<(), EngineError> {
        if value > FACE_COUNT {
            return Err(EngineError::IndexOutOfBounds {
                index: usize::from(value),
                limit: usize::from(FACE_COUNT) + 1,
            });
        }
        let limit = DICE_COUNT;
        let die = self
            .dice
            .get_mut(pos)
            .ok_or(EngineError::IndexOutOfBounds { index: pos, limit })?;
        die.value = value;
        Ok(())
    }

    /// Dice selected by `mask`, or an empty combination when any selected die
    /// is spent.
    #[must_use]
    pub fn combination(&self, mask: DiceMask) -> DiceCombination {
        let mut combination = DiceCombination::new();
        for pos in mask.positions() {
            let die = self.dice[pos];
            if die.is_spent() {
                return DiceCombination::new();
            }
            combination.push(die);
        }
        combination
    }

    /// Remove the dice selected by `mask`, marking their positions spent.
    ///
    /// Returns the removed dice; nothing changes when the combination is empty.
    pub fn take(&mut self, mask: DiceMask) -> DiceCombination {
        let combination = self.combination(mask);
        if !combination.is_empty() {
            for pos in mask.positions() {
                self.dice[pos].value = 0;
            }
        }
        combination
    }

    /// Give the dice selected by `mask` fresh faces.
    ///
    /// Returns false (and rolls nothing) when the mask touches a spent die.
    pub fn reroll(&mut self, mask: DiceMask, rng: &mut GameRng) -> bool {
        if mask.is_empty() || self.combination(mask).is_empty() {
            return false;
        }
        for pos in mask.positions() {
            self.dice[pos].value = rng.roll_die();
        }
        true
    }

    /// Number of dice not yet spent.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.dice.iter().filter(|d| !d.is_spent()).count()
    }

    /// Iterate over dice by position.
    pub fn iter(&self) -> impl Iterator<Item = &Die> {
        self.dice.iter()
    }
}
