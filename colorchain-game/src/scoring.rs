//! Points awarded for clearing a level.
use serde::{Deserialize, Serialize};

use crate::constants::{
    DIFFICULTY_LEVEL, DIFFICULTY_POINTS, LEVEL_POINTS, PERFECT_LEVEL, PERFECT_POINTS,
    SEQUENCE_POINTS, SPEED_POINTS,
};

/// Itemized award. `total` is authoritative for score accumulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub level_bonus: u64,
    pub sequence_bonus: u64,
    pub speed_bonus: u64,
    pub difficulty_bonus: u64,
    pub perfect_bonus: u64,
    pub total: u64,
}

impl ScoreBreakdown {
    /// Non-zero terms with their display labels, in formula order.
    #[must_use]
    pub fn items(&self) -> Vec<(&'static str, u64)> {
        [
            ("Level", self.level_bonus),
            ("Sequence", self.sequence_bonus),
            ("Speed Bonus", self.speed_bonus),
            ("Difficulty", self.difficulty_bonus),
            ("Perfect", self.perfect_bonus),
        ]
        .into_iter()
        .filter(|(_, points)| *points > 0)
        .collect()
    }

    /// Short banner such as `+230 points! (Perfect: +50)`; only the
    /// conditional bonuses are called out.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut text = format!("+{} points!", self.total);
        if self.speed_bonus > 0 {
            text.push_str(&format!(" (Speed Bonus: +{})", self.speed_bonus));
        }
        if self.difficulty_bonus > 0 {
            text.push_str(&format!(" (Difficulty: +{})", self.difficulty_bonus));
        }
        if self.perfect_bonus > 0 {
            text.push_str(&format!(" (Perfect: +{})", self.perfect_bonus));
        }
        text
    }
}

/// Compute the award for clearing `level` with a sequence of `sequence_len`.
#[must_use]
pub fn award(level: u32, sequence_len: usize, speed_boost: bool) -> ScoreBreakdown {
    let lvl = u64::from(level);
    let level_bonus = lvl * LEVEL_POINTS;
    let sequence_bonus = u64::try_from(sequence_len).unwrap_or(u64::MAX) * SEQUENCE_POINTS;
    let speed_bonus = if speed_boost { lvl * SPEED_POINTS } else { 0 };
    let difficulty_bonus = if level > DIFFICULTY_LEVEL {
        u64::from(level - DIFFICULTY_LEVEL) * DIFFICULTY_POINTS
    } else {
        0
    };
    let perfect_bonus = if level >= PERFECT_LEVEL {
        PERFECT_POINTS
    } else {
        0
    };
    ScoreBreakdown {
        level_bonus,
        sequence_bonus,
        speed_bonus,
        difficulty_bonus,
        perfect_bonus,
        total: level_bonus
            .saturating_add(sequence_bonus)
            .saturating_add(speed_bonus)
            .saturating_add(difficulty_bonus)
            .saturating_add(perfect_bonus),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_twelve_without_boost() {
        let award = award(12, 12, false);
        assert_eq!(award.total, 230);
        assert_eq!(
            award.items(),
            vec![("Level", 120), ("Sequence", 60), ("Perfect", 50)]
        );
        assert_eq!(award.summary(), "+230 points! (Perfect: +50)");
    }

    #[test]
    fn first_level_is_fifteen() {
        let award = award(1, 1, false);
        assert_eq!(award.total, 15);
        assert_eq!(award.perfect_bonus, 0);
        assert_eq!(award.summary(), "+15 points!");
    }

    #[test]
    fn late_levels_stack_every_bonus() {
        let award = award(40, 40, true);
        assert_eq!(award.level_bonus, 400);
        assert_eq!(award.sequence_bonus, 200);
        assert_eq!(award.speed_bonus, 200);
        assert_eq!(award.difficulty_bonus, 200);
        assert_eq!(award.perfect_bonus, 50);
        assert_eq!(award.total, 1_050);
        assert_eq!(award.items().len(), 5);
    }
}
