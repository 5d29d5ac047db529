//! Static achievement catalog and unlock evaluation.
//!
//! Ids are persisted in player profiles, so they must stay stable across
//! releases. The catalog is the single source for both unlock checks and
//! display lookups.
use serde::Serialize;

/// Condition that unlocks an achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unlock {
    /// Current level at or above the threshold.
    Level(u32),
    /// Current score at or above the threshold.
    Score(u64),
}

impl Unlock {
    #[must_use]
    pub const fn is_met(self, level: u32, score: u64) -> bool {
        match self {
            Self::Level(threshold) => level >= threshold,
            Self::Score(threshold) => score >= threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub unlock: Unlock,
    pub name: &'static str,
    pub description: &'static str,
}

pub static CATALOG: [Achievement; 13] = [
    Achievement {
        id: "first_twist",
        unlock: Unlock::Level(5),
        name: "Mind Bender",
        description: "Survive your first color twist",
    },
    Achievement {
        id: "level_10",
        unlock: Unlock::Level(10),
        name: "Rising Star",
        description: "Reach level 10",
    },
    Achievement {
        id: "level_15",
        unlock: Unlock::Level(15),
        name: "Memory Master",
        description: "Reach level 15",
    },
    Achievement {
        id: "level_20",
        unlock: Unlock::Level(20),
        name: "Legendary",
        description: "Reach level 20",
    },
    Achievement {
        id: "level_25",
        unlock: Unlock::Level(25),
        name: "Unstoppable",
        description: "Reach level 25",
    },
    Achievement {
        id: "level_30",
        unlock: Unlock::Level(30),
        name: "Elite Player",
        description: "Reach level 30",
    },
    Achievement {
        id: "level_35",
        unlock: Unlock::Level(35),
        name: "Hyperspeed Hero",
        description: "Survive hyperspeed mode",
    },
    Achievement {
        id: "level_40",
        unlock: Unlock::Level(40),
        name: "Vision Master",
        description: "Conquer color blind mode",
    },
    Achievement {
        id: "level_45",
        unlock: Unlock::Level(45),
        name: "Almost Impossible",
        description: "Reach level 45",
    },
    Achievement {
        id: "level_50",
        unlock: Unlock::Level(50),
        name: "COLOR MEMORY CHAMPION",
        description: "Complete all 50 levels!",
    },
    Achievement {
        id: "score_1000",
        unlock: Unlock::Score(1_000),
        name: "Point Collector",
        description: "Score 1000+ points",
    },
    Achievement {
        id: "score_5000",
        unlock: Unlock::Score(5_000),
        name: "High Scorer",
        description: "Score 5000+ points",
    },
    Achievement {
        id: "score_10000",
        unlock: Unlock::Score(10_000),
        name: "Score Legend",
        description: "Score 10000+ points",
    },
];

/// Catalog entries not yet in `earned` whose condition now holds.
#[must_use]
pub fn evaluate<S: AsRef<str>>(level: u32, score: u64, earned: &[S]) -> Vec<&'static Achievement> {
    CATALOG
        .iter()
        .filter(|entry| !earned.iter().any(|id| id.as_ref() == entry.id))
        .filter(|entry| entry.unlock.is_met(level, score))
        .collect()
}

#[must_use]
pub fn achievement_by_id(id: &str) -> Option<&'static Achievement> {
    CATALOG.iter().find(|entry| entry.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    #[test]
    fn catalog_shape() {
        let level_entries = CATALOG
            .iter()
            .filter(|a| matches!(a.unlock, Unlock::Level(_)))
            .count();
        assert_eq!(level_entries, 10);
        assert_eq!(CATALOG.len() - level_entries, 3);
        for entry in &CATALOG {
            assert_eq!(achievement_by_id(entry.id), Some(entry));
        }
        assert!(achievement_by_id("level_99").is_none());
    }

    #[test]
    fn nothing_before_first_thresholds() {
        assert!(evaluate(4, 999, &NONE).is_empty());
        let early = evaluate(5, 0, &NONE);
        assert_eq!(early.len(), 1);
        assert_eq!(early[0].id, "first_twist");
    }

    #[test]
    fn level_fifty_with_zero_score() {
        let ids: Vec<&str> = evaluate(50, 0, &NONE).iter().map(|a| a.id).collect();
        assert!(ids.contains(&"level_50"));
        assert!(!ids.contains(&"score_1000"));
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn idempotent_against_updated_earned_set() {
        let first: Vec<String> = evaluate(20, 5_000, &NONE)
            .iter()
            .map(|a| a.id.to_string())
            .collect();
        assert_eq!(first.len(), 6);
        assert!(evaluate(20, 5_000, &first).is_empty());
        let next = evaluate(25, 5_000, &first);
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].id, "level_25");
    }
}
