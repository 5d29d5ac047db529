//! Player profiles kept by the external key-value store.
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::rc::Rc;
use thiserror::Error;

use crate::ProfileStore;
use crate::achievements::{Achievement, achievement_by_id};
use crate::constants::{MIN_PLAYER_NAME_CHARS, RECENT_ACHIEVEMENTS};

/// Reasons a player name is refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("please enter your name")]
    EmptyName,
    #[error("name must be at least {min} characters (got {got})")]
    NameTooShort { min: usize, got: usize },
}

/// Trim a raw name and check it is long enough to key a profile.
///
/// # Errors
///
/// Returns [`ProfileError`] when the trimmed name is empty or too short.
pub fn validate_player_name(raw: &str) -> Result<String, ProfileError> {
    let name = raw.trim();
    let chars = name.chars().count();
    if chars == 0 {
        return Err(ProfileError::EmptyName);
    }
    if chars < MIN_PLAYER_NAME_CHARS {
        return Err(ProfileError::NameTooShort {
            min: MIN_PLAYER_NAME_CHARS,
            got: chars,
        });
    }
    Ok(name.to_string())
}

/// Cumulative stats for one player. Every field defaults so a partially
/// written record still loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub best_level: u32,
    #[serde(default)]
    pub high_score: u64,
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub total_play_time_ms: u64,
    /// Earned achievement ids in the order they were unlocked.
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub created_at_ms: u64,
    #[serde(default)]
    pub last_played_at_ms: u64,
}

/// Stats a finished session contributes to its player's profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTotals {
    pub level: u32,
    pub score: u64,
    pub duration_ms: u64,
    pub ended_at_ms: u64,
}

impl PlayerProfile {
    /// Fresh zeroed profile.
    #[must_use]
    pub fn new(name: impl Into<String>, now_ms: u64) -> Self {
        Self {
            name: name.into(),
            created_at_ms: now_ms,
            last_played_at_ms: now_ms,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|earned| earned == id)
    }

    /// Append ids not already present, keeping unlock order.
    pub fn merge_achievements<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        for id in ids {
            if !self.has_achievement(id) {
                self.achievements.push(id.to_string());
            }
        }
    }

    /// Checkpoint after a cleared level: newly earned ids and a raised
    /// high score persist even if the session is later abandoned.
    pub fn record_level(&mut self, score: u64, earned: &[String]) {
        self.high_score = self.high_score.max(score);
        self.merge_achievements(earned.iter().map(String::as_str));
    }

    /// End-of-session checkpoint for both game over and completion.
    pub fn record_session(&mut self, totals: SessionTotals, earned: &[String]) {
        self.games_played = self.games_played.saturating_add(1);
        self.best_level = self.best_level.max(totals.level);
        self.high_score = self.high_score.max(totals.score);
        self.total_play_time_ms = self.total_play_time_ms.saturating_add(totals.duration_ms);
        self.last_played_at_ms = totals.ended_at_ms;
        self.merge_achievements(earned.iter().map(String::as_str));
    }

    /// True when the run beats this profile's stored records.
    #[must_use]
    pub const fn is_personal_best(&self, level: u32, score: u64) -> bool {
        score > self.high_score || level > self.best_level
    }

    /// Most recently earned achievements, oldest first.
    #[must_use]
    pub fn recent_achievements(&self) -> Vec<&'static Achievement> {
        let skip = self.achievements.len().saturating_sub(RECENT_ACHIEVEMENTS);
        self.achievements
            .iter()
            .skip(skip)
            .filter_map(|id| achievement_by_id(id))
            .collect()
    }
}

/// In-process store keyed by player name. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryProfiles {
    profiles: Rc<RefCell<BTreeMap<String, PlayerProfile>>>,
}

impl MemoryProfiles {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.borrow().is_empty()
    }
}

impl ProfileStore for MemoryProfiles {
    type Error = Infallible;

    fn load(&self, name: &str) -> Result<Option<PlayerProfile>, Self::Error> {
        Ok(self.profiles.borrow().get(name).cloned())
    }

    fn save(&self, profile: &PlayerProfile) -> Result<(), Self::Error> {
        self.profiles
            .borrow_mut()
            .insert(profile.name.clone(), profile.clone());
        Ok(())
    }

    fn names(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.profiles.borrow().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_validation_trims_and_enforces_length() {
        assert_eq!(validate_player_name("  Ada "), Ok("Ada".to_string()));
        assert_eq!(validate_player_name("   "), Err(ProfileError::EmptyName));
        assert_eq!(
            validate_player_name(" x "),
            Err(ProfileError::NameTooShort { min: 2, got: 1 })
        );
    }

    #[test]
    fn partial_records_fill_defaults() {
        let profile: PlayerProfile =
            serde_json::from_str(r#"{"name":"Mo","highScore":420}"#).unwrap();
        assert_eq!(profile.high_score, 420);
        assert_eq!(profile.games_played, 0);
        assert!(profile.achievements.is_empty());
    }

    #[test]
    fn session_checkpoint_takes_maxima_and_accumulates() {
        let mut profile = PlayerProfile::new("Kai", 1_000);
        profile.best_level = 12;
        profile.high_score = 900;
        profile.record_session(
            SessionTotals {
                level: 7,
                score: 1_200,
                duration_ms: 60_000,
                ended_at_ms: 61_000,
            },
            &["first_twist".to_string()],
        );
        assert_eq!(profile.games_played, 1);
        assert_eq!(profile.best_level, 12);
        assert_eq!(profile.high_score, 1_200);
        assert_eq!(profile.total_play_time_ms, 60_000);
        assert_eq!(profile.last_played_at_ms, 61_000);
        assert_eq!(profile.achievements, vec!["first_twist".to_string()]);
    }

    #[test]
    fn merge_keeps_order_without_duplicates() {
        let mut profile = PlayerProfile::new("Kai", 0);
        profile.merge_achievements(["level_10", "first_twist"]);
        profile.merge_achievements(["first_twist", "level_15", "level_20"]);
        assert_eq!(
            profile.achievements,
            vec!["level_10", "first_twist", "level_15", "level_20"]
        );
        let recent: Vec<&str> = profile.recent_achievements().iter().map(|a| a.id).collect();
        assert_eq!(recent, vec!["first_twist", "level_15", "level_20"]);
    }

    #[test]
    fn memory_store_clones_share_state() {
        let store = MemoryProfiles::new();
        let handle = store.clone();
        handle.save(&PlayerProfile::new("Zed", 5)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.load("Zed").unwrap().unwrap().created_at_ms, 5);
        assert_eq!(store.names().unwrap(), vec!["Zed".to_string()]);
        assert!(store.load("Nobody").unwrap().is_none());
    }
}
