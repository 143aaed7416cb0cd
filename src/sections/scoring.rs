//! Section scoring formulas.

use super::definition::{
    BonusType, ScoringType, SectionDefinition, SectionLayout, EMPTY_CELL, SENTINEL,
};
use crate::core::FACE_COUNT;

/// Turns a section's cells into points.
pub trait ScoreFormula {
    /// Score for the given cell array.
    fn score(&self, definition: &SectionDefinition, ticks: &[u8]) -> i32;

    /// Highest score the formula can produce for this section.
    fn max_score(&self, definition: &SectionDefinition) -> i32;
}

/// Sum of `Points` bonuses on ticked cells.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicScore;

/// Payout table indexed by the number of ticked collection cells.
#[derive(Clone, Copy, Debug, Default)]
pub struct SetCollectionScore;

/// Largest per-row sum of face values. Sentinels count as nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct HighestRowSumScore;

impl ScoringType {
    /// Formula implementing this scoring type.
    #[must_use]
    pub fn formula(self) -> &'static dyn ScoreFormula {
        match self {
            ScoringType::Basic => &BasicScore,
            ScoringType::SetCollection => &SetCollectionScore,
            ScoringType::HighestRowSum => &HighestRowSumScore,
        }
    }
}

fn ticked(ticks: &[u8], location: usize) -> bool {
    ticks.get(location).is_some_and(|&cell| cell != EMPTY_CELL)
}

fn points(definition: &SectionDefinition) -> impl Iterator<Item = (usize, i32)> + '_ {
    definition
        .bonuses
        .iter()
        .filter(|b| b.kind == BonusType::Points)
        .map(|b| (b.location, b.values.first().copied().unwrap_or(0)))
}

impl ScoreFormula for BasicScore {
    fn score(&self, definition: &SectionDefinition, ticks: &[u8]) -> i32 {
        points(definition)
            .filter(|&(location, _)| ticked(ticks, location))
            .map(|(_, value)| value)
            .sum()
    }

    fn max_score(&self, definition: &SectionDefinition) -> i32 {
        points(definition).map(|(_, value)| value).sum()
    }
}

impl SetCollectionScore {
    fn table(definition: &SectionDefinition) -> &[i32] {
        definition
            .bonuses
            .first()
            .map_or(&[][..], |first| first.values.as_slice())
    }
}

impl ScoreFormula for SetCollectionScore {
    fn score(&self, definition: &SectionDefinition, ticks: &[u8]) -> i32 {
        let collected = definition
            .bonuses
            .iter()
            .filter(|b| b.kind == BonusType::SetCollection && ticked(ticks, b.location))
            .count();
        let table = Self::table(definition);
        table
            .get(collected)
            .or_else(|| table.last())
            .copied()
            .unwrap_or(0)
    }

    fn max_score(&self, definition: &SectionDefinition) -> i32 {
        Self::table(definition).iter().copied().max().unwrap_or(0)
    }
}

impl ScoreFormula for HighestRowSumScore {
    fn score(&self, definition: &SectionDefinition, ticks: &[u8]) -> i32 {
        let row_sum = |cells: &[u8]| -> i32 {
            cells
                .iter()
                .filter(|&&cell| cell != SENTINEL)
                .map(|&cell| i32::from(cell))
                .sum()
        };
        match &definition.layout {
            SectionLayout::Grid(grid) => (0..grid.row_count())
                .map(|row| row_sum(&ticks[grid.row_range(row)]))
                .max()
                .unwrap_or(0),
            SectionLayout::Slot(_) => row_sum(ticks),
        }
    }

    fn max_score(&self, definition: &SectionDefinition) -> i32 {
        let widest = match &definition.layout {
            SectionLayout::Grid(grid) => grid.row_lengths().iter().copied().max().unwrap_or(0),
            SectionLayout::Slot(slots) => slots.slot_count(),
        };
        widest as i32 * i32::from(FACE_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Color;
    use crate::sections::{DiceCondition, TickConverter};

    fn elliott() -> SectionDefinition {
        SectionDefinition::grid("Elliott", vec![3, 3, 3], 2)
            .with_converter(TickConverter::FaceValuePerDie)
            .with_requirement(&[Color::Orange, Color::Orange], DiceCondition::SumGreaterThanNine)
            .with_scoring(ScoringType::HighestRowSum)
    }

    fn newman() -> SectionDefinition {
        let mut def = SectionDefinition::slot("Newman", vec![DiceCondition::NoCondition; 6])
            .with_requirement(&[Color::Green], DiceCondition::NoCondition)
            .with_bonus(BonusType::SetCollection, vec![0, 1, 3, 6, 10, 15, 25], 0);
        for location in 1..6 {
            def = def.with_bonus(BonusType::SetCollection, vec![], location);
        }
        def
    }

    #[test]
    fn test_basic_counts_only_points_on_ticked_cells() {
        let def = SectionDefinition::grid("Harvick", vec![3; 4], 2)
            .with_requirement(&[Color::Orange; 3], DiceCondition::Consecutive)
            .with_bonus(BonusType::Points, vec![4], 2)
            .with_bonus(BonusType::PlusOneBrown, vec![], 2)
            .with_bonus(BonusType::Points, vec![6], 5);

        let mut ticks = vec![0; 12];
        assert_eq!(BasicScore.score(&def, &ticks), 0);
        ticks[..3].fill(9);
        assert_eq!(BasicScore.score(&def, &ticks), 4);
        ticks[..6].fill(9);
        assert_eq!(BasicScore.score(&def, &ticks), 10);
        assert_eq!(BasicScore.max_score(&def), 10);
    }

    #[test]
    fn test_set_collection() {
        let def = newman();
        let mut ticks = vec![0; 6];
        assert_eq!(SetCollectionScore.score(&def, &ticks), 0);
        ticks[1] = 9;
        ticks[4] = 9;
        assert_eq!(SetCollectionScore.score(&def, &ticks), 3);
        ticks.fill(9);
        assert_eq!(SetCollectionScore.score(&def, &ticks), 25);
        assert_eq!(SetCollectionScore.max_score(&def), 25);
    }

    #[test]
    fn test_highest_row_sum_ignores_sentinels() {
        let def = elliott();
        let ticks = vec![9, 5, 5, 6, 6, 0, 0, 0, 0];
        assert_eq!(HighestRowSumScore.score(&def, &ticks), 12);
        assert_eq!(HighestRowSumScore.max_score(&def), 18);
    }

    #[test]
    fn test_formula_dispatch() {
        let def = elliott();
        let ticks = vec![5, 6, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(def.scoring.formula().score(&def, &ticks), 11);
    }
}
