//! Color-meaning twists applied on even levels once the threshold is reached.
use rand::Rng;
use rand::seq::SliceRandom;
use rand::seq::index::sample;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::constants::{CHAIN_SWAP_LEVEL, REVERSE_LEVEL, SHUFFLE_LEVEL};
use crate::meaning::ColorMeaningMap;
use crate::palette::{Color, PALETTE, PALETTE_SIZE};

/// Colors named by a twist report, stored inline.
pub type TwistColors = SmallVec<[Color; PALETTE_SIZE]>;

/// Remapping strategy, selected by level band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TwistStrategy {
    /// Exchange the meanings of two random buttons.
    SimpleSwap,
    /// Rotate the meanings of three random buttons.
    ChainSwap,
    /// Replace every meaning with a fresh uniform permutation.
    Shuffle,
    /// Replace each meaning with the meaning of its meaning.
    ReverseCompose,
}

impl TwistStrategy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SimpleSwap => "simple_swap",
            Self::ChainSwap => "chain_swap",
            Self::Shuffle => "shuffle",
            Self::ReverseCompose => "reverse_compose",
        }
    }
}

impl fmt::Display for TwistStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a twist did, for the presentation layer's notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwistReport {
    pub level: u32,
    pub strategy: TwistStrategy,
    /// Visual colors the strategy picked (swap/chain) or whose meaning moved.
    pub colors: TwistColors,
    pub message: String,
}

/// Twists fire on even levels at or above `threshold`.
#[must_use]
pub const fn should_twist(level: u32, threshold: u32) -> bool {
    level >= threshold && level % 2 == 0
}

#[must_use]
pub const fn strategy_for_level(level: u32) -> TwistStrategy {
    if level < CHAIN_SWAP_LEVEL {
        TwistStrategy::SimpleSwap
    } else if level < SHUFFLE_LEVEL {
        TwistStrategy::ChainSwap
    } else if level < REVERSE_LEVEL {
        TwistStrategy::Shuffle
    } else {
        TwistStrategy::ReverseCompose
    }
}

/// Apply the band's twist if `level` qualifies, returning what changed.
pub fn maybe_twist<R: Rng + ?Sized>(
    map: &mut ColorMeaningMap,
    level: u32,
    threshold: u32,
    rng: &mut R,
) -> Option<TwistReport> {
    if !should_twist(level, threshold) {
        return None;
    }
    Some(apply(map, level, strategy_for_level(level), rng))
}

/// Apply a specific strategy unconditionally.
pub fn apply<R: Rng + ?Sized>(
    map: &mut ColorMeaningMap,
    level: u32,
    strategy: TwistStrategy,
    rng: &mut R,
) -> TwistReport {
    let (colors, message) = match strategy {
        TwistStrategy::SimpleSwap => simple_swap(map, rng),
        TwistStrategy::ChainSwap => chain_swap(map, rng),
        TwistStrategy::Shuffle => shuffle(map, rng),
        TwistStrategy::ReverseCompose => reverse_compose(map),
    };
    TwistReport {
        level,
        strategy,
        colors,
        message,
    }
}

fn pick_distinct<R: Rng + ?Sized>(rng: &mut R, amount: usize) -> TwistColors {
    sample(rng, PALETTE_SIZE, amount)
        .into_iter()
        .map(|index| PALETTE[index])
        .collect()
}

fn simple_swap<R: Rng + ?Sized>(map: &mut ColorMeaningMap, rng: &mut R) -> (TwistColors, String) {
    let picked = pick_distinct(rng, 2);
    let (a, b) = (picked[0], picked[1]);
    let meaning_a = map.resolve(a);
    map.set(a, map.resolve(b));
    map.set(b, meaning_a);
    let message = format!("Color Twist! {} ↔ {}", a.label(), b.label());
    (picked, message)
}

fn chain_swap<R: Rng + ?Sized>(map: &mut ColorMeaningMap, rng: &mut R) -> (TwistColors, String) {
    let picked = pick_distinct(rng, 3);
    let (a, b, c) = (picked[0], picked[1], picked[2]);
    let meaning_a = map.resolve(a);
    map.set(a, map.resolve(b));
    map.set(b, map.resolve(c));
    map.set(c, meaning_a);
    let message = format!("Chain Twist! {}→{}→{}", a.label(), b.label(), c.label());
    (picked, message)
}

fn shuffle<R: Rng + ?Sized>(map: &mut ColorMeaningMap, rng: &mut R) -> (TwistColors, String) {
    let mut fresh = PALETTE;
    fresh.shuffle(rng);
    *map = ColorMeaningMap::from_meanings(fresh);
    (
        PALETTE.iter().copied().collect(),
        "MEGA SHUFFLE! All colors randomized!".to_string(),
    )
}

fn reverse_compose(map: &mut ColorMeaningMap) -> (TwistColors, String) {
    let before = *map;
    let mut changed = TwistColors::new();
    for visual in PALETTE {
        let second = PALETTE
            .get(before.resolve(visual).index())
            .map_or(visual, |meaning| before.resolve(*meaning));
        if second != before.resolve(visual) {
            changed.push(visual);
        }
        map.set(visual, second);
    }
    (changed, "REVERSE REALITY! Everything backwards!".to_string())
}
