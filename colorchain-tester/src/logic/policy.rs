use std::fmt;

use colorchain_game::{Color, ColorMeaningMap, GameEvent, PALETTE};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;

/// Policy interface for automated play.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Watch an event from the session.
    fn observe(&mut self, event: &GameEvent);

    /// Button to press for sequence step `position` under `meanings`.
    fn press(&mut self, position: usize, meanings: &ColorMeaningMap) -> Color;

    /// Ask for a replay before pressing step `position`.
    fn wants_replay(&mut self, _position: usize) -> bool {
        false
    }
}

/// Built-in player behaviors for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum GameplayStrategy {
    /// Remembers everything and decodes twists.
    Perfect,
    /// Remembers everything but ignores twists.
    Literal,
    /// Decodes twists but only remembers the first few flashes.
    Forgetful,
    /// Perfect, but replays every level once midway through input and
    /// resumes from the step it had reached.
    Replayer,
}

impl GameplayStrategy {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Perfect => "Perfect",
            Self::Literal => "Literal",
            Self::Forgetful => "Forgetful",
            Self::Replayer => "Replayer",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy> {
        match self {
            Self::Perfect => Box::new(PerfectPolicy::default()),
            Self::Literal => Box::new(LiteralPolicy::default()),
            Self::Forgetful => Box::new(ForgetfulPolicy::new(seed, FORGETFUL_SPAN)),
            Self::Replayer => Box::new(ReplayPolicy::default()),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub const FORGETFUL_SPAN: usize = 7;

/// Flashed colors of the current presentation.
#[derive(Debug, Default)]
struct Recall {
    seen: Vec<Color>,
}

impl Recall {
    fn observe(&mut self, event: &GameEvent) {
        match event {
            GameEvent::PresentationStarted { .. } => self.seen.clear(),
            GameEvent::FlashOn { index, color } if *index == self.seen.len() => {
                self.seen.push(*color);
            }
            _ => {}
        }
    }

    fn get(&self, position: usize) -> Option<Color> {
        self.seen.get(position).copied()
    }
}

fn decode(meanings: &ColorMeaningMap, logical: Color) -> Color {
    meanings.visual_for(logical).unwrap_or(logical)
}

#[derive(Debug, Default)]
struct PerfectPolicy {
    recall: Recall,
}

impl PlayerPolicy for PerfectPolicy {
    fn name(&self) -> &'static str {
        "Perfect"
    }

    fn observe(&mut self, event: &GameEvent) {
        self.recall.observe(event);
    }

    fn press(&mut self, position: usize, meanings: &ColorMeaningMap) -> Color {
        let logical = self.recall.get(position).unwrap_or(Color::Red);
        decode(meanings, logical)
    }
}

#[derive(Debug, Default)]
struct LiteralPolicy {
    recall: Recall,
}

impl PlayerPolicy for LiteralPolicy {
    fn name(&self) -> &'static str {
        "Literal"
    }

    fn observe(&mut self, event: &GameEvent) {
        self.recall.observe(event);
    }

    fn press(&mut self, position: usize, _meanings: &ColorMeaningMap) -> Color {
        self.recall.get(position).unwrap_or(Color::Red)
    }
}

struct ForgetfulPolicy {
    recall: Recall,
    span: usize,
    rng: ChaCha20Rng,
}

impl ForgetfulPolicy {
    fn new(seed: u64, span: usize) -> Self {
        Self {
            recall: Recall::default(),
            span,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl PlayerPolicy for ForgetfulPolicy {
    fn name(&self) -> &'static str {
        "Forgetful"
    }

    fn observe(&mut self, event: &GameEvent) {
        self.recall.observe(event);
    }

    fn press(&mut self, position: usize, meanings: &ColorMeaningMap) -> Color {
        match self.recall.get(position) {
            Some(logical) if position < self.span => decode(meanings, logical),
            _ => PALETTE[self.rng.gen_range(0..PALETTE.len())],
        }
    }
}

#[derive(Debug, Default)]
struct ReplayPolicy {
    recall: Recall,
    replayed_this_level: bool,
}

impl PlayerPolicy for ReplayPolicy {
    fn name(&self) -> &'static str {
        "Replayer"
    }

    fn observe(&mut self, event: &GameEvent) {
        if matches!(event, GameEvent::LevelStarted { .. }) {
            self.replayed_this_level = false;
        }
        self.recall.observe(event);
    }

    fn press(&mut self, position: usize, meanings: &ColorMeaningMap) -> Color {
        let logical = self.recall.get(position).unwrap_or(Color::Red);
        decode(meanings, logical)
    }

    fn wants_replay(&mut self, position: usize) -> bool {
        if self.replayed_this_level || position == 0 {
            return false;
        }
        self.replayed_this_level = true;
        true
    }
}
