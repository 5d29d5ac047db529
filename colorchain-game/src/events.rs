//! One-shot notifications a session hands to the presentation layer.
//!
//! Events are not queryable state: each is returned once from the call that
//! produced it. Anything a UI needs to re-render lives on the session itself.
use serde::Serialize;

use crate::achievements::Achievement;
use crate::difficulty::LevelParams;
use crate::palette::Color;
use crate::scoring::ScoreBreakdown;
use crate::twist::TwistReport;

/// Terminal record of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionOutcome {
    /// Level the player failed on, or the last level when completed.
    pub final_level: u32,
    pub final_score: u64,
    pub completed: bool,
    /// Beat the stored high score or best level of the active profile.
    pub new_personal_best: bool,
    pub duration_ms: u64,
    /// Achievement ids unlocked during this session.
    pub achievements_earned: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum GameEvent {
    LevelStarted {
        level: u32,
        sequence_len: usize,
        params: LevelParams,
    },
    /// Milestone banner for landmark levels (5, 10, …).
    Milestone { level: u32, message: &'static str },
    TwistApplied(TwistReport),
    PresentationStarted { epoch: u64, replay: bool },
    FlashOn { index: usize, color: Color },
    FlashOff { index: usize, color: Color },
    InputOpened { expected_len: usize },
    InputAccepted {
        visual: Color,
        logical: Color,
        entered: usize,
        total: usize,
    },
    LevelSucceeded {
        /// Level that was just cleared.
        level: u32,
        breakdown: ScoreBreakdown,
        score: u64,
        cheer: &'static str,
    },
    LevelFailed {
        level: u32,
        position: usize,
        expected: Color,
        got: Color,
    },
    AchievementsUnlocked(Vec<&'static Achievement>),
    SessionComplete(SessionOutcome),
    SessionFailed(SessionOutcome),
}

impl GameEvent {
    /// Stable snake_case name for logs and reports.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LevelStarted { .. } => "level_started",
            Self::Milestone { .. } => "milestone",
            Self::TwistApplied(_) => "twist_applied",
            Self::PresentationStarted { .. } => "presentation_started",
            Self::FlashOn { .. } => "flash_on",
            Self::FlashOff { .. } => "flash_off",
            Self::InputOpened { .. } => "input_opened",
            Self::InputAccepted { .. } => "input_accepted",
            Self::LevelSucceeded { .. } => "level_succeeded",
            Self::LevelFailed { .. } => "level_failed",
            Self::AchievementsUnlocked(_) => "achievements_unlocked",
            Self::SessionComplete(_) => "session_complete",
            Self::SessionFailed(_) => "session_failed",
        }
    }

    /// Outcome carried by a terminal event.
    #[must_use]
    pub const fn outcome(&self) -> Option<&SessionOutcome> {
        match self {
            Self::SessionComplete(outcome) | Self::SessionFailed(outcome) => Some(outcome),
            _ => None,
        }
    }
}
