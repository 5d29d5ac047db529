//! Color Memory Chain game engine
//!
//! Platform-agnostic core for a sequence-memory game with shifting color
//! meanings. This crate owns the session state machine, difficulty curve,
//! twists, scoring and achievements; rendering, audio and persistence
//! backends live with the host.

pub mod achievements;
pub mod clock;
pub mod config;
pub mod constants;
#[cfg(feature = "async")]
pub mod driver;
pub mod difficulty;
pub mod events;
pub mod input;
pub mod meaning;
pub mod numbers;
pub mod palette;
pub mod profile;
pub mod rng;
pub mod scoring;
pub mod sequence;
pub mod session;
pub mod timeline;
pub mod twist;

// Re-export commonly used types
pub use achievements::{Achievement, CATALOG, Unlock, achievement_by_id};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, GameConfig};
pub use difficulty::{LevelParams, Modifiers, flash_ms_for_level, params_for_level};
pub use events::{GameEvent, SessionOutcome};
pub use input::Command;
pub use meaning::ColorMeaningMap;
pub use palette::{Color, PALETTE, PALETTE_SIZE};
pub use profile::{MemoryProfiles, PlayerProfile, ProfileError, validate_player_name};
pub use rng::RngBundle;
pub use scoring::ScoreBreakdown;
pub use session::{GameSession, InputProgress, Phase, SessionView};
pub use timeline::{Cue, Ticket};
pub use twist::{TwistReport, TwistStrategy};

use constants::{AUTO_SELECT_WINDOW_MS, ROSTER_DISPLAY_LIMIT};

/// Trait for abstracting player profile persistence
/// Platform-specific implementations should provide this
pub trait ProfileStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the profile stored under `name`, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read or decoded.
    fn load(&self, name: &str) -> Result<Option<PlayerProfile>, Self::Error>;

    /// Insert or replace the profile keyed by its name
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be written.
    fn save(&self, profile: &PlayerProfile) -> Result<(), Self::Error>;

    /// Every stored player name
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn names(&self) -> Result<Vec<String>, Self::Error>;
}

/// Entry point for hosts: player selection plus session construction
pub struct GameEngine<S>
where
    S: ProfileStore + Clone,
{
    store: S,
    config: GameConfig,
}

impl<S> GameEngine<S>
where
    S: ProfileStore + Clone,
{
    /// Create a new engine over `store` with the default configuration
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: GameConfig::default(),
        }
    }

    /// Replace the configuration used for new sessions
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration violates its bounds.
    pub fn with_config(mut self, config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Validate `raw_name`, then load or create its profile and mark it played
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or the store fails.
    pub fn select_player(&self, raw_name: &str, now_ms: u64) -> Result<PlayerProfile, anyhow::Error> {
        let name = validate_player_name(raw_name)?;
        let mut profile = self
            .store
            .load(&name)?
            .unwrap_or_else(|| PlayerProfile::new(name.clone(), now_ms));
        profile.last_played_at_ms = now_ms;
        self.store.save(&profile)?;
        Ok(profile)
    }

    /// Stored profiles for the player picker, capped at the display limit
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot list its players.
    pub fn roster(&self) -> Result<Vec<PlayerProfile>, S::Error> {
        let mut profiles = Vec::new();
        for name in self.store.names()? {
            if profiles.len() == ROSTER_DISPLAY_LIMIT {
                break;
            }
            if let Some(profile) = self.store.load(&name)? {
                profiles.push(profile);
            }
        }
        Ok(profiles)
    }

    /// The sole stored player, when they played within the last day
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn auto_select(&self, now_ms: u64) -> Result<Option<PlayerProfile>, S::Error> {
        let names = self.store.names()?;
        let [name] = names.as_slice() else {
            return Ok(None);
        };
        Ok(self.store.load(name)?.filter(|profile| {
            now_ms.saturating_sub(profile.last_played_at_ms) < AUTO_SELECT_WINDOW_MS
        }))
    }

    /// Construct an idle session for `player`, sharing this engine's store
    #[must_use]
    pub fn create_session(&self, player: &str, seed: u64) -> GameSession<S> {
        self.guest_session(seed).with_player(player)
    }

    /// Construct an idle session that never touches the store
    #[must_use]
    pub fn guest_session(&self, seed: u64) -> GameSession<S> {
        GameSession::new(self.store.clone(), seed).with_config(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR_MS: u64 = 60 * 60 * 1_000;

    fn engine() -> GameEngine<MemoryProfiles> {
        GameEngine::new(MemoryProfiles::new())
    }

    #[test]
    fn select_player_creates_then_reuses() {
        let engine = engine();
        let created = engine.select_player("  Ada ", 1_000).unwrap();
        assert_eq!(created.name, "Ada");
        assert_eq!(created.created_at_ms, 1_000);

        let again = engine.select_player("Ada", 5_000).unwrap();
        assert_eq!(again.created_at_ms, 1_000);
        assert_eq!(again.last_played_at_ms, 5_000);
        assert_eq!(engine.store().len(), 1);
    }

    #[test]
    fn select_player_rejects_short_names() {
        let engine = engine();
        let err = engine.select_player("x", 0).unwrap_err();
        assert!(err.to_string().contains("at least 2"));
        assert!(engine.store().is_empty());
    }

    #[test]
    fn roster_caps_at_display_limit() {
        let engine = engine();
        for name in ["Ann", "Bo", "Cy", "Di", "Ed", "Flo", "Gus"] {
            engine.select_player(name, 0).unwrap();
        }
        assert_eq!(engine.roster().unwrap().len(), 5);
    }

    #[test]
    fn auto_select_requires_single_recent_player() {
        let engine = engine();
        assert!(engine.auto_select(0).unwrap().is_none());

        engine.select_player("Ada", HOUR_MS).unwrap();
        let picked = engine.auto_select(2 * HOUR_MS).unwrap();
        assert_eq!(picked.map(|p| p.name), Some("Ada".to_string()));
        assert!(engine.auto_select(30 * HOUR_MS).unwrap().is_none());

        engine.select_player("Bo", 2 * HOUR_MS).unwrap();
        assert!(engine.auto_select(2 * HOUR_MS).unwrap().is_none());
    }

    #[test]
    fn with_config_validates() {
        let bad = GameConfig {
            max_level: 0,
            ..GameConfig::default()
        };
        assert!(engine().with_config(bad).is_err());
    }

    #[test]
    fn sessions_share_the_engine_store() {
        let engine = engine();
        let clock = ManualClock::starting_at(0);
        let mut session = engine.create_session("Kai", 7).with_clock(clock);
        session.start_game();
        assert!(engine.store().load("Kai").unwrap().is_some());

        let mut guest = engine.guest_session(7);
        guest.start_game();
        assert_eq!(engine.store().len(), 1);
    }
}
