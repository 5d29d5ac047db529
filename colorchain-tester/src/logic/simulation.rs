use std::hash::Hasher;

use anyhow::Result;
use colorchain_game::{
    Clock, GameEngine, GameEvent, GameSession, ManualClock, Phase, PlayerProfile, ProfileStore,
};
use log::debug;
use serde::Serialize;
use twox_hash::XxHash64;

use crate::logic::policy::{GameplayStrategy, PlayerPolicy};

/// Wall-clock origin for simulated sessions (2024-01-01T00:00:00Z).
const SIM_EPOCH_MS: u64 = 1_704_067_200_000;
/// Simulated pause between button presses.
const THINK_MS: u64 = 350;
/// Simulated pause on the level-cleared screen.
const CELEBRATE_MS: u64 = 1_500;

pub type Expectation = fn(&SimulationSummary) -> Result<()>;

/// What to play and what must hold afterwards.
#[derive(Clone)]
pub struct SimulationPlan {
    pub strategy: GameplayStrategy,
    /// Stop after clearing this level instead of playing to the end.
    pub level_cap: Option<u32>,
    /// Profile to play as; guests leave the store untouched.
    pub player: Option<&'static str>,
    /// Replay the seed a second time and require an identical event stream.
    pub verify_determinism: bool,
    pub expectations: Vec<Expectation>,
}

impl SimulationPlan {
    #[must_use]
    pub const fn new(strategy: GameplayStrategy) -> Self {
        Self {
            strategy,
            level_cap: None,
            player: None,
            verify_determinism: false,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_level_cap(mut self, level: u32) -> Self {
        self.level_cap = Some(level);
        self
    }

    #[must_use]
    pub const fn with_player(mut self, name: &'static str) -> Self {
        self.player = Some(name);
        self
    }

    #[must_use]
    pub const fn verifying_determinism(mut self) -> Self {
        self.verify_determinism = true;
        self
    }

    #[must_use]
    pub fn expect(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }
}

/// Everything observed during one simulated session.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    pub final_level: u32,
    pub levels_cleared: u32,
    pub score: u64,
    pub completed: bool,
    pub failed: bool,
    pub new_personal_best: bool,
    pub twists: Vec<&'static str>,
    pub milestones: usize,
    pub replays: u32,
    pub achievements: Vec<String>,
    pub events: usize,
    pub duration_ms: u64,
    /// Random draws consumed across every session stream.
    pub rng_draws: u64,
    pub fingerprint: u64,
    pub profile: Option<PlayerProfile>,
}

/// Drives a [`GameSession`] on a hand-advanced clock with a scripted player.
pub struct SimulationSession<S: ProfileStore> {
    session: GameSession<S>,
    clock: ManualClock,
    policy: Box<dyn PlayerPolicy>,
    level_cap: Option<u32>,
    hasher: XxHash64,
    summary: SimulationSummary,
}

impl<S: ProfileStore + Clone> SimulationSession<S> {
    pub fn new(engine: &GameEngine<S>, plan: &SimulationPlan, seed: u64) -> Self {
        let clock = ManualClock::starting_at(SIM_EPOCH_MS);
        let session = match plan.player {
            Some(name) => engine.create_session(name, seed),
            None => engine.guest_session(seed),
        }
        .with_clock(clock.clone());
        Self {
            session,
            clock,
            policy: plan.strategy.create_policy(seed),
            level_cap: plan.level_cap,
            hasher: XxHash64::with_seed(seed),
            summary: SimulationSummary {
                seed,
                strategy: plan.strategy,
                final_level: 1,
                levels_cleared: 0,
                score: 0,
                completed: false,
                failed: false,
                new_personal_best: false,
                twists: Vec::new(),
                milestones: 0,
                replays: 0,
                achievements: Vec::new(),
                events: 0,
                duration_ms: 0,
                rng_draws: 0,
                fingerprint: 0,
                profile: None,
            },
        }
    }
}

impl<S: ProfileStore> SimulationSession<S> {
    /// Play until the session ends or the level cap is reached.
    pub fn run(mut self) -> SimulationSummary {
        let events = self.session.start_game();
        self.record(events);

        loop {
            let events = match self.session.phase() {
                Phase::LevelSetup | Phase::Presenting => {
                    let Some(due) = self.session.next_due() else {
                        break;
                    };
                    self.clock.set(due.max(self.clock.now_ms()));
                    self.session.advance()
                }
                Phase::AwaitingInput => {
                    let position = self.session.progress().entered;
                    if self.policy.wants_replay(position) {
                        self.summary.replays += 1;
                        self.session.replay()
                    } else {
                        self.clock.advance(THINK_MS);
                        let visual = self.policy.press(position, self.session.meanings());
                        self.session.submit_color(visual)
                    }
                }
                Phase::LevelCleared => {
                    if self
                        .level_cap
                        .is_some_and(|cap| self.session.level() > cap)
                    {
                        break;
                    }
                    self.clock.advance(CELEBRATE_MS);
                    self.session.next_level()
                }
                Phase::Idle | Phase::Complete | Phase::Failed => break,
            };
            self.record(events);
        }

        self.finish()
    }

    fn record(&mut self, events: Vec<GameEvent>) {
        for event in events {
            self.policy.observe(&event);
            self.hasher
                .write(&serde_json::to_vec(&event).unwrap_or_default());
            self.summary.events += 1;
            match &event {
                GameEvent::TwistApplied(report) => {
                    self.summary.twists.push(report.strategy.as_str());
                }
                GameEvent::Milestone { .. } => self.summary.milestones += 1,
                GameEvent::LevelSucceeded { .. } => self.summary.levels_cleared += 1,
                GameEvent::AchievementsUnlocked(entries) => {
                    self.summary
                        .achievements
                        .extend(entries.iter().map(|entry| entry.id.to_string()));
                }
                GameEvent::LevelFailed {
                    level,
                    position,
                    expected,
                    got,
                } => {
                    debug!(
                        "{} failed level {level} at step {}: wanted {expected}, pressed {got}",
                        self.policy.name(),
                        position + 1
                    );
                }
                _ => {}
            }
            if let Some(outcome) = event.outcome() {
                self.summary.final_level = outcome.final_level;
                self.summary.completed = outcome.completed;
                self.summary.new_personal_best = outcome.new_personal_best;
                self.summary.duration_ms = outcome.duration_ms;
            }
        }
    }

    fn finish(mut self) -> SimulationSummary {
        self.summary.failed = self.session.phase() == Phase::Failed;
        self.summary.score = self.session.score();
        if self.session.outcome().is_none() {
            self.summary.final_level = self.session.level();
        }
        self.summary.rng_draws = self.session.rng().total_draws();
        self.summary.fingerprint = self.hasher.finish();
        self.summary.profile = self.session.profile().cloned();
        self.summary
    }
}

/// Play `plan` once with `seed`.
pub fn run_plan<S: ProfileStore + Clone>(
    engine: &GameEngine<S>,
    plan: &SimulationPlan,
    seed: u64,
) -> SimulationSummary {
    SimulationSession::new(engine, plan, seed).run()
}
