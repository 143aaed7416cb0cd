//! Value conditions a dice combination must satisfy.

use serde::{Deserialize, Serialize};

use crate::core::{Color, Die};

/// Predicate over the face values of a combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiceCondition {
    /// Sorted values form a run with step 1.
    Consecutive,
    /// One die of each colour with brown, green, orange ascending by 1.
    ConsecutiveBrownGreenOrange,
    /// Values sum to more than nine.
    SumGreaterThanNine,
    /// All values are equal.
    SameValue,
    IsEqualToOne,
    IsEqualToTwo,
    IsEqualToThree,
    IsEqualToFour,
    IsEqualToFive,
    IsEqualToSix,
    /// Always holds.
    NoCondition,
}

impl DiceCondition {
    /// Face value required by the `IsEqualTo*` family.
    #[must_use]
    pub const fn target_value(self) -> Option<u8> {
        match self {
            DiceCondition::IsEqualToOne => Some(1),
            DiceCondition::IsEqualToTwo => Some(2),
            DiceCondition::IsEqualToThree => Some(3),
            DiceCondition::IsEqualToFour => Some(4),
            DiceCondition::IsEqualToFive => Some(5),
            DiceCondition::IsEqualToSix => Some(6),
            _ => None,
        }
    }

    /// Evaluate the condition. Empty combinations only satisfy
    /// `NoCondition`.
    #[must_use]
    pub fn holds(self, dice: &[Die]) -> bool {
        if let Some(target) = self.target_value() {
            return !dice.is_empty() && dice.iter().all(|d| d.value == target);
        }

        match self {
            DiceCondition::Consecutive => {
                if dice.is_empty() {
                    return false;
                }
                let mut values: Vec<u8> = dice.iter().map(|d| d.value).collect();
                values.sort_unstable();
                values.windows(2).all(|w| w[1] == w[0] + 1)
            }
            DiceCondition::ConsecutiveBrownGreenOrange => brown_green_orange_run(dice),
            DiceCondition::SumGreaterThanNine => {
                dice.iter().map(|d| u32::from(d.value)).sum::<u32>() > 9
            }
            DiceCondition::SameValue => match dice.split_first() {
                Some((first, rest)) => rest.iter().all(|d| d.value == first.value),
                None => false,
            },
            DiceCondition::NoCondition => true,
            _ => false,
        }
    }
}

fn brown_green_orange_run(dice: &[Die]) -> bool {
    if Color::histogram(dice.iter().map(|d| d.color)) != [1, 1, 1] {
        return false;
    }
    let value_of = |color: Color| dice.iter().find(|d| d.color == color).map(|d| d.value);
    match (
        value_of(Color::Brown),
        value_of(Color::Green),
        value_of(Color::Orange),
    ) {
        (Some(brown), Some(green), Some(orange)) => green == brown + 1 && orange == green + 1,
        _ => false,
    }
}
