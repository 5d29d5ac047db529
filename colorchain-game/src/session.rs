//! Turn-based session state machine: generate → present → collect → judge.
use log::{debug, info, warn};
use rand::Rng;
use serde::Serialize;
use std::fmt;

use crate::ProfileStore;
use crate::achievements;
use crate::clock::{Clock, SystemClock};
use crate::config::GameConfig;
use crate::constants::{CHEERS, MILESTONES};
use crate::difficulty::{LevelParams, Modifiers, params_for_level};
use crate::events::{GameEvent, SessionOutcome};
use crate::meaning::ColorMeaningMap;
use crate::numbers::percent;
use crate::palette::{Color, PALETTE_SIZE};
use crate::profile::{MemoryProfiles, PlayerProfile, SessionTotals};
use crate::rng::RngBundle;
use crate::sequence;
use crate::timeline::{Cue, Ticket, Timeline};
use crate::twist;

/// Where the session sits in the turn protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No game started yet.
    Idle,
    /// Level generated; waiting out the pre-roll before playback.
    LevelSetup,
    /// Flashing the target sequence.
    Presenting,
    /// Collecting player input.
    AwaitingInput,
    /// Level cleared and scored; waiting for the player to advance.
    LevelCleared,
    /// Every level cleared.
    Complete,
    /// Wrong color entered.
    Failed,
}

impl Phase {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::LevelSetup => "level_setup",
            Self::Presenting => "presenting",
            Self::AwaitingInput => "awaiting_input",
            Self::LevelCleared => "level_cleared",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How far the player is through the current sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InputProgress {
    pub entered: usize,
    pub total: usize,
    pub percent: f64,
}

/// Serializable snapshot of everything a UI renders between events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub phase: Phase,
    pub player: Option<String>,
    pub level: u32,
    pub score: u64,
    pub high_score: u64,
    pub sequence_len: usize,
    pub progress: InputProgress,
    pub modifiers: Modifiers,
    pub params: LevelParams,
    pub meanings: [Color; PALETTE_SIZE],
    pub meaning_hint: String,
}

/// One player's run through the levels.
///
/// Owns all mutable game state. Every operation returns the events it
/// produced; operations invalid in the current phase are silent no-ops.
pub struct GameSession<S: ProfileStore = MemoryProfiles> {
    config: GameConfig,
    store: S,
    clock: Box<dyn Clock>,
    rng: RngBundle,
    timeline: Timeline,
    player: Option<String>,
    profile: Option<PlayerProfile>,
    phase: Phase,
    level: u32,
    score: u64,
    high_score: u64,
    best_level: u32,
    /// Profile records to beat, captured at start; `None` for guests.
    baseline: Option<PlayerProfile>,
    baseline_score: u64,
    sequence: Vec<Color>,
    input: Vec<Color>,
    meanings: ColorMeaningMap,
    modifiers: Modifiers,
    params: LevelParams,
    lit: Option<(usize, Color)>,
    earned: Vec<String>,
    session_earned: Vec<String>,
    started_at_ms: u64,
    outcome: Option<SessionOutcome>,
}

impl GameSession<MemoryProfiles> {
    /// Session with no player profile attached.
    #[must_use]
    pub fn guest(seed: u64) -> Self {
        Self::new(MemoryProfiles::new(), seed)
    }
}

impl<S: ProfileStore> GameSession<S> {
    /// Construct an idle guest session over `store` with default config.
    #[must_use]
    pub fn new(store: S, seed: u64) -> Self {
        Self {
            config: GameConfig::default(),
            store,
            clock: Box::new(SystemClock),
            rng: RngBundle::from_user_seed(seed),
            timeline: Timeline::new(),
            player: None,
            profile: None,
            phase: Phase::Idle,
            level: 1,
            score: 0,
            high_score: 0,
            best_level: 0,
            baseline: None,
            baseline_score: 0,
            sequence: Vec::new(),
            input: Vec::new(),
            meanings: ColorMeaningMap::identity(),
            modifiers: Modifiers::default(),
            params: params_for_level(1),
            lit: None,
            earned: Vec::new(),
            session_earned: Vec::new(),
            started_at_ms: 0,
            outcome: None,
        }
    }

    /// Attach the player whose profile is read at start and written at
    /// checkpoints.
    #[must_use]
    pub fn with_player(mut self, name: impl Into<String>) -> Self {
        self.player = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.params = self.params.with_gap(config.inter_flash_gap_ms);
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Begin a new session from `Idle` or either terminal phase.
    pub fn start_game(&mut self) -> Vec<GameEvent> {
        if !matches!(self.phase, Phase::Idle | Phase::Complete | Phase::Failed) {
            debug!("start_game ignored while {}", self.phase);
            return Vec::new();
        }
        let now = self.clock.now_ms();
        self.timeline.cancel_all();
        self.lit = None;
        self.level = 1;
        self.score = 0;
        self.sequence.clear();
        self.input.clear();
        self.meanings.reset();
        self.modifiers = Modifiers::default();
        self.session_earned.clear();
        self.outcome = None;
        self.started_at_ms = now;

        if let Some(name) = self.player.clone() {
            let profile = self.load_profile(&name, now);
            self.earned = profile.achievements.clone();
            self.high_score = profile.high_score;
            self.best_level = profile.best_level;
            self.profile = Some(profile);
        }
        self.baseline_score = self.high_score;
        self.baseline = self.profile.as_ref().map(|profile| {
            let mut record = profile.clone();
            record.best_level = record.best_level.max(1);
            record
        });
        info!(
            "session start: player={} seed={}",
            self.player.as_deref().unwrap_or("guest"),
            self.rng.seed()
        );

        let mut events = Vec::new();
        self.setup_level(now, &mut events);
        events
    }

    /// Fire every ticket due at the clock's current time, in order.
    pub fn advance(&mut self) -> Vec<GameEvent> {
        let now = self.clock.now_ms();
        let mut events = Vec::new();
        while let Some(ticket) = self.timeline.pop_due(now) {
            self.run_cue(ticket, &mut events);
        }
        events
    }

    /// Host-timer callback for `ticket`. Stale tickets from a cancelled
    /// presentation are ignored; earlier pending tickets fire first.
    pub fn fire(&mut self, ticket: Ticket) -> Vec<GameEvent> {
        if !self.timeline.is_live(&ticket) {
            debug!(
                "stale ticket ignored: epoch {} (current {})",
                ticket.epoch,
                self.timeline.epoch()
            );
            return Vec::new();
        }
        let mut events = Vec::new();
        while let Some(due) = self.timeline.pop_through(&ticket) {
            self.run_cue(due, &mut events);
        }
        events
    }

    /// Player pressed the button showing `visual`.
    pub fn submit_color(&mut self, visual: Color) -> Vec<GameEvent> {
        if self.phase != Phase::AwaitingInput {
            debug!("input {visual} ignored while {}", self.phase);
            return Vec::new();
        }
        let logical = self.meanings.resolve(visual);
        let position = self.input.len();
        let Some(&expected) = self.sequence.get(position) else {
            return Vec::new();
        };
        self.input.push(logical);

        let mut events = Vec::new();
        if logical != expected {
            self.fail(position, expected, logical, &mut events);
            return events;
        }
        events.push(GameEvent::InputAccepted {
            visual,
            logical,
            entered: self.input.len(),
            total: self.sequence.len(),
        });
        if self.input.len() == self.sequence.len() {
            self.succeed(&mut events);
        }
        events
    }

    /// Restart playback from the first element. Entered input is kept.
    pub fn replay(&mut self) -> Vec<GameEvent> {
        if !matches!(self.phase, Phase::Presenting | Phase::AwaitingInput) {
            debug!("replay ignored while {}", self.phase);
            return Vec::new();
        }
        let now = self.clock.now_ms();
        let mut events = Vec::new();
        self.timeline.cancel_all();
        if let Some((index, color)) = self.lit.take() {
            events.push(GameEvent::FlashOff { index, color });
        }
        self.begin_presentation(now, true, &mut events);
        events
    }

    /// Player chose to continue after a cleared level.
    pub fn next_level(&mut self) -> Vec<GameEvent> {
        if self.phase != Phase::LevelCleared {
            debug!("next_level ignored while {}", self.phase);
            return Vec::new();
        }
        let now = self.clock.now_ms();
        let mut events = Vec::new();
        self.setup_level(now, &mut events);
        events
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    fn setup_level(&mut self, now: u64, events: &mut Vec<GameEvent>) {
        self.phase = Phase::LevelSetup;
        self.input.clear();
        sequence::extend(&mut self.sequence, self.rng.sequence());

        let scheduled = params_for_level(self.level).with_gap(self.config.inter_flash_gap_ms);
        self.modifiers = self.modifiers.merge(scheduled.modifiers);
        self.params = LevelParams {
            modifiers: self.modifiers,
            ..scheduled
        };
        debug!(
            "level {} setup: len={} flash={}ms modifiers={:?}",
            self.level,
            self.sequence.len(),
            self.params.flash_ms,
            self.modifiers
        );
        events.push(GameEvent::LevelStarted {
            level: self.level,
            sequence_len: self.sequence.len(),
            params: self.params,
        });

        if let Some(report) = twist::maybe_twist(
            &mut self.meanings,
            self.level,
            self.config.twist_threshold,
            self.rng.twist(),
        ) {
            debug!("twist at level {}: {}", self.level, report.message);
            events.push(GameEvent::TwistApplied(report));
        }

        if let Some((level, message)) = MILESTONES.iter().find(|(level, _)| *level == self.level)
        {
            events.push(GameEvent::Milestone {
                level: *level,
                message,
            });
        }

        self.timeline
            .schedule(now.saturating_add(self.config.pre_roll_ms), Cue::BeginPresentation);
    }

    fn begin_presentation(&mut self, start_ms: u64, replay: bool, events: &mut Vec<GameEvent>) {
        self.phase = Phase::Presenting;
        events.push(GameEvent::PresentationStarted {
            epoch: self.timeline.epoch(),
            replay,
        });
        let on_ms = self.params.flash_on_ms();
        let mut at = start_ms;
        for (index, color) in self.sequence.iter().copied().enumerate() {
            if index > 0 {
                at = at.saturating_add(self.params.gap_ms);
            }
            self.timeline.schedule(at, Cue::FlashOn { index, color });
            at = at.saturating_add(on_ms);
            self.timeline.schedule(at, Cue::FlashOff { index, color });
        }
        self.timeline.schedule(at, Cue::OpenInput);
    }

    fn run_cue(&mut self, ticket: Ticket, events: &mut Vec<GameEvent>) {
        match ticket.cue {
            Cue::BeginPresentation => {
                if self.phase == Phase::LevelSetup {
                    self.begin_presentation(ticket.due_ms, false, events);
                }
            }
            Cue::FlashOn { index, color } => {
                self.lit = Some((index, color));
                events.push(GameEvent::FlashOn { index, color });
            }
            Cue::FlashOff { index, color } => {
                self.lit = None;
                events.push(GameEvent::FlashOff { index, color });
            }
            Cue::OpenInput => {
                self.phase = Phase::AwaitingInput;
                events.push(GameEvent::InputOpened {
                    expected_len: self.sequence.len(),
                });
            }
        }
    }

    fn succeed(&mut self, events: &mut Vec<GameEvent>) {
        let cleared = self.level;
        let breakdown =
            crate::scoring::award(cleared, self.sequence.len(), self.modifiers.speed_boost);
        self.score = self.score.saturating_add(breakdown.total);
        self.level = self.level.saturating_add(1);
        let cheer = CHEERS[self.rng.cheer().gen_range(0..CHEERS.len())];
        info!(
            "level {cleared} cleared: +{} (score {})",
            breakdown.total, self.score
        );
        events.push(GameEvent::LevelSucceeded {
            level: cleared,
            breakdown,
            score: self.score,
            cheer,
        });

        if self.level > self.config.max_level {
            self.phase = Phase::Complete;
            let outcome = self.finish(true);
            events.push(GameEvent::SessionComplete(outcome));
            return;
        }

        let unlocked = achievements::evaluate(self.level, self.score, &self.earned);
        if !unlocked.is_empty() {
            for entry in &unlocked {
                self.earned.push(entry.id.to_string());
                self.session_earned.push(entry.id.to_string());
            }
            events.push(GameEvent::AchievementsUnlocked(unlocked));
        }

        self.high_score = self.high_score.max(self.score);
        if let Some(profile) = self.profile.as_mut() {
            profile.record_level(self.score, &self.session_earned);
        }
        self.persist_profile();
        self.phase = Phase::LevelCleared;
    }

    fn fail(&mut self, position: usize, expected: Color, got: Color, events: &mut Vec<GameEvent>) {
        self.phase = Phase::Failed;
        info!(
            "level {} failed at step {}: expected {expected}, got {got}",
            self.level,
            position + 1
        );
        events.push(GameEvent::LevelFailed {
            level: self.level,
            position,
            expected,
            got,
        });
        let outcome = self.finish(false);
        events.push(GameEvent::SessionFailed(outcome));
    }

    fn finish(&mut self, completed: bool) -> SessionOutcome {
        self.timeline.cancel_all();
        let now = self.clock.now_ms();
        let final_level = if completed {
            self.config.max_level
        } else {
            self.level
        };
        let new_personal_best = match self.baseline.as_ref() {
            Some(record) => record.is_personal_best(final_level, self.score),
            None => self.score > self.baseline_score,
        };
        let outcome = SessionOutcome {
            final_level,
            final_score: self.score,
            completed,
            new_personal_best,
            duration_ms: now.saturating_sub(self.started_at_ms),
            achievements_earned: self.session_earned.clone(),
        };
        self.high_score = self.high_score.max(self.score);
        self.best_level = self.best_level.max(final_level);
        if let Some(profile) = self.profile.as_mut() {
            profile.record_session(
                SessionTotals {
                    level: final_level,
                    score: self.score,
                    duration_ms: outcome.duration_ms,
                    ended_at_ms: now,
                },
                &self.session_earned,
            );
        }
        self.persist_profile();
        self.outcome = Some(outcome.clone());
        outcome
    }

    // ------------------------------------------------------------------
    // Profile checkpoints
    // ------------------------------------------------------------------

    fn load_profile(&self, name: &str, now: u64) -> PlayerProfile {
        match self.store.load(name) {
            Ok(Some(mut profile)) => {
                if profile.name.is_empty() {
                    profile.name = name.to_string();
                }
                profile
            }
            Ok(None) => {
                let profile = PlayerProfile::new(name, now);
                if let Err(err) = self.store.save(&profile) {
                    warn!("could not create profile for {name}: {err}");
                }
                profile
            }
            Err(err) => {
                warn!("profile for {name} unreadable, starting fresh: {err}");
                PlayerProfile::new(name, now)
            }
        }
    }

    fn persist_profile(&self) {
        if let Some(profile) = self.profile.as_ref()
            && let Err(err) = self.store.save(profile)
        {
            warn!("could not save profile for {}: {err}", profile.name);
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Best score known for this player, including the running session.
    #[must_use]
    pub const fn high_score(&self) -> u64 {
        if self.score > self.high_score {
            self.score
        } else {
            self.high_score
        }
    }

    #[must_use]
    pub fn sequence_len(&self) -> usize {
        self.sequence.len()
    }

    /// Logical colors the player must reproduce this level.
    #[must_use]
    pub fn target_sequence(&self) -> &[Color] {
        &self.sequence
    }

    #[must_use]
    pub fn progress(&self) -> InputProgress {
        InputProgress {
            entered: self.input.len(),
            total: self.sequence.len(),
            percent: percent(self.input.len(), self.sequence.len()),
        }
    }

    #[must_use]
    pub const fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    #[must_use]
    pub const fn params(&self) -> LevelParams {
        self.params
    }

    #[must_use]
    pub const fn meanings(&self) -> &ColorMeaningMap {
        &self.meanings
    }

    /// Banner describing the active color meanings.
    #[must_use]
    pub fn meaning_hint(&self) -> String {
        if self.level < self.config.twist_threshold {
            format!(
                "Color twists unlock at level {}!",
                self.config.twist_threshold
            )
        } else if self.meanings.is_identity() {
            "No color twists active".to_string()
        } else {
            format!("Color Meanings: {}", self.meanings.describe())
        }
    }

    #[must_use]
    pub const fn outcome(&self) -> Option<&SessionOutcome> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub fn player(&self) -> Option<&str> {
        self.player.as_deref()
    }

    /// Active player's profile as of the last checkpoint.
    #[must_use]
    pub const fn profile(&self) -> Option<&PlayerProfile> {
        self.profile.as_ref()
    }

    /// Every achievement id known to be earned, oldest first.
    #[must_use]
    pub fn earned_achievements(&self) -> &[String] {
        &self.earned
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Pending presentation tickets, earliest first, for hosts that drive
    /// their own timers.
    #[must_use]
    pub fn scheduled(&self) -> &[Ticket] {
        self.timeline.pending()
    }

    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.timeline.next_due()
    }

    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.timeline.epoch()
    }

    #[must_use]
    pub const fn rng(&self) -> &RngBundle {
        &self.rng
    }

    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView {
            phase: self.phase,
            player: self.player.clone(),
            level: self.level,
            score: self.score,
            high_score: self.high_score(),
            sequence_len: self.sequence.len(),
            progress: self.progress(),
            modifiers: self.modifiers,
            params: self.params,
            meanings: *self.meanings.meanings(),
            meaning_hint: self.meaning_hint(),
        }
    }
}

impl<S: ProfileStore> fmt::Debug for GameSession<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("phase", &self.phase)
            .field("player", &self.player)
            .field("level", &self.level)
            .field("score", &self.score)
            .field("sequence_len", &self.sequence.len())
            .field("entered", &self.input.len())
            .field("epoch", &self.timeline.epoch())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn session(seed: u64) -> (GameSession, ManualClock) {
        let clock = ManualClock::starting_at(10_000);
        let session = GameSession::guest(seed).with_clock(clock.clone());
        (session, clock)
    }

    fn run_until_input(session: &mut GameSession, clock: &ManualClock) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while session.phase() != Phase::AwaitingInput {
            let Some(due) = session.next_due() else { break };
            clock.set(due.max(clock.now_ms()));
            events.extend(session.advance());
        }
        events
    }

    fn visual_for(session: &GameSession, logical: Color) -> Color {
        session.meanings().visual_for(logical).unwrap()
    }

    #[test]
    fn start_resets_and_enters_setup() {
        let (mut session, _clock) = session(1);
        assert_eq!(session.phase(), Phase::Idle);
        let events = session.start_game();
        assert_eq!(session.phase(), Phase::LevelSetup);
        assert_eq!(session.level(), 1);
        assert_eq!(session.sequence_len(), 1);
        assert!(matches!(
            events.first(),
            Some(GameEvent::LevelStarted {
                level: 1,
                sequence_len: 1,
                ..
            })
        ));
        assert_eq!(session.next_due(), Some(11_000));
        assert!(session.start_game().is_empty(), "mid-session start is a no-op");
    }

    #[test]
    fn presentation_is_ordered_and_opens_input() {
        let (mut session, clock) = session(2);
        session.start_game();
        let events = run_until_input(&mut session, &clock);
        let names: Vec<&str> = events.iter().map(GameEvent::name).collect();
        assert_eq!(
            names,
            vec!["presentation_started", "flash_on", "flash_off", "input_opened"]
        );
        // 1000 ms pre-roll + 480 ms lit at level 1.
        assert_eq!(clock.now_ms(), 11_480);
    }

    #[test]
    fn input_outside_awaiting_is_ignored() {
        let (mut session, _clock) = session(3);
        assert!(session.submit_color(Color::Red).is_empty());
        session.start_game();
        assert!(session.submit_color(Color::Red).is_empty());
        assert!(session.replay().is_empty());
        assert!(session.next_level().is_empty());
        assert_eq!(session.progress().entered, 0);
    }

    #[test]
    fn correct_first_level_scores_fifteen() {
        let (mut session, clock) = session(4);
        session.start_game();
        run_until_input(&mut session, &clock);
        let target = session.target_sequence()[0];
        let events = session.submit_color(visual_for(&session, target));
        assert_eq!(session.phase(), Phase::LevelCleared);
        assert_eq!(session.level(), 2);
        assert_eq!(session.score(), 15);
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, GameEvent::AchievementsUnlocked(_)))
        );
        let next = session.next_level();
        assert_eq!(session.phase(), Phase::LevelSetup);
        assert_eq!(session.sequence_len(), 2);
        assert!(!next.is_empty());
    }

    #[test]
    fn replay_cancels_stale_tickets_and_restarts() {
        let (mut session, clock) = session(5);
        session.start_game();
        let stale = session.scheduled()[0];
        clock.set(stale.due_ms);
        let events = session.advance();
        assert!(events.iter().any(|e| matches!(e, GameEvent::FlashOn { .. })));
        assert_eq!(session.phase(), Phase::Presenting);
        let lit_ticket = *session.scheduled().first().unwrap();

        let replay_events = session.replay();
        assert_eq!(replay_events[0].name(), "flash_off");
        assert!(matches!(
            replay_events[1],
            GameEvent::PresentationStarted { replay: true, .. }
        ));
        assert!(session.fire(lit_ticket).is_empty(), "stale ticket fired");
        assert!(session.scheduled().iter().all(|t| t.epoch == session.epoch()));
    }

    #[test]
    fn replay_from_input_keeps_progress() {
        let (mut session, clock) = session(6);
        session.start_game();
        run_until_input(&mut session, &clock);
        let target = session.target_sequence()[0];
        session.submit_color(visual_for(&session, target));
        session.next_level();
        run_until_input(&mut session, &clock);

        let first = session.target_sequence()[0];
        session.submit_color(visual_for(&session, first));
        assert_eq!(session.progress().entered, 1);
        let score = session.score();
        session.replay();
        assert_eq!(session.phase(), Phase::Presenting);
        assert_eq!(session.progress().entered, 1);
        run_until_input(&mut session, &clock);
        assert_eq!(session.progress().entered, 1);

        let second = session.target_sequence()[1];
        session.submit_color(visual_for(&session, second));
        assert_eq!(session.phase(), Phase::LevelCleared);
        assert_eq!(session.score(), score + crate::scoring::award(2, 2, false).total);
    }

    #[test]
    fn wrong_color_fails_immediately() {
        let (mut session, clock) = session(7);
        session.start_game();
        run_until_input(&mut session, &clock);
        let target = session.target_sequence()[0];
        let wrong = crate::palette::PALETTE
            .into_iter()
            .find(|c| *c != target)
            .unwrap();
        let events = session.submit_color(visual_for(&session, wrong));
        assert_eq!(session.phase(), Phase::Failed);
        assert_eq!(session.level(), 1);
        assert_eq!(session.score(), 0);
        assert!(matches!(events.last(), Some(GameEvent::SessionFailed(_))));
        assert!(session.submit_color(target).is_empty());
        let outcome = session.outcome().unwrap();
        assert!(!outcome.completed);
        assert!(!outcome.new_personal_best);
    }

    #[test]
    fn fresh_profile_failing_first_level_is_not_a_personal_best() {
        let clock = ManualClock::starting_at(10_000);
        let store = MemoryProfiles::new();
        let mut session = GameSession::new(store.clone(), 7)
            .with_player("Ada")
            .with_clock(clock.clone());
        session.start_game();
        run_until_input(&mut session, &clock);
        let target = session.target_sequence()[0];
        let wrong = crate::palette::PALETTE
            .into_iter()
            .find(|c| *c != target)
            .unwrap();
        session.submit_color(visual_for(&session, wrong));
        assert!(!session.outcome().unwrap().new_personal_best);

        session.start_game();
        run_until_input(&mut session, &clock);
        let target = session.target_sequence()[0];
        session.submit_color(visual_for(&session, target));
        session.next_level();
        run_until_input(&mut session, &clock);
        let target = session.target_sequence()[0];
        let wrong = crate::palette::PALETTE
            .into_iter()
            .find(|c| *c != target)
            .unwrap();
        session.submit_color(visual_for(&session, wrong));
        let outcome = session.outcome().unwrap();
        assert_eq!(outcome.final_level, 2);
        assert!(outcome.new_personal_best);
        assert_eq!(store.load("Ada").unwrap().unwrap().best_level, 2);
    }

    #[test]
    fn meaning_hint_tracks_level() {
        let (session, _clock) = session(8);
        assert_eq!(session.meaning_hint(), "Color twists unlock at level 5!");
    }

    #[test]
    fn view_serializes() {
        let (mut session, _clock) = session(9);
        session.start_game();
        let json = serde_json::to_value(session.view()).unwrap();
        assert_eq!(json["phase"], "level_setup");
        assert_eq!(json["level"], 1);
        assert_eq!(json["meanings"][0], "red");
    }
}
