//! Level → timing and modifier schedule.
use serde::{Deserialize, Serialize};

use crate::constants::{
    COLOR_BLIND_LEVEL, EARLY_BAND_END, EARLY_FLASH_BASE_MS, EARLY_FLASH_FLOOR_MS,
    EARLY_FLASH_STEP_MS, HYPERSPEED_FLASH_MS, INTER_FLASH_GAP_MS, LATE_BAND_END,
    LATE_FLASH_FLOOR_MS, LATE_FLASH_STEP_MS, MID_BAND_END, MID_FLASH_FLOOR_MS, MID_FLASH_STEP_MS,
};

/// Boolean difficulty flags. Once set during a session they stay set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub speed_boost: bool,
    pub color_blind: bool,
}

impl Modifiers {
    /// Sticky union: a flag already on is never turned off.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            speed_boost: self.speed_boost || other.speed_boost,
            color_blind: self.color_blind || other.color_blind,
        }
    }

    #[must_use]
    pub const fn any(self) -> bool {
        self.speed_boost || self.color_blind
    }
}

/// Presentation timing and modifiers for one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelParams {
    pub level: u32,
    /// Full flash period; the button stays lit for half of it.
    pub flash_ms: u64,
    /// Pause between consecutive flashes.
    pub gap_ms: u64,
    pub modifiers: Modifiers,
}

impl LevelParams {
    /// Time a single element stays lit.
    #[must_use]
    pub const fn flash_on_ms(&self) -> u64 {
        self.flash_ms / 2
    }

    #[must_use]
    pub const fn with_gap(mut self, gap_ms: u64) -> Self {
        self.gap_ms = gap_ms;
        self
    }

    /// Total playback time for a sequence of `len` elements.
    #[must_use]
    pub const fn playback_ms(&self, len: usize) -> u64 {
        if len == 0 {
            return 0;
        }
        let len = len as u64;
        len * self.flash_on_ms() + (len - 1) * self.gap_ms
    }
}

/// Flash period for a level, clamped at each band's floor.
#[must_use]
pub fn flash_ms_for_level(level: u32) -> u64 {
    let level = u64::from(level);
    if level <= u64::from(EARLY_BAND_END) {
        EARLY_FLASH_BASE_MS
            .saturating_sub(level * EARLY_FLASH_STEP_MS)
            .max(EARLY_FLASH_FLOOR_MS)
    } else if level <= u64::from(MID_BAND_END) {
        EARLY_FLASH_FLOOR_MS
            .saturating_sub((level - u64::from(EARLY_BAND_END)) * MID_FLASH_STEP_MS)
            .max(MID_FLASH_FLOOR_MS)
    } else if level <= u64::from(LATE_BAND_END) {
        MID_FLASH_FLOOR_MS
            .saturating_sub((level - u64::from(MID_BAND_END)) * LATE_FLASH_STEP_MS)
            .max(LATE_FLASH_FLOOR_MS)
    } else {
        HYPERSPEED_FLASH_MS
    }
}

/// Modifiers a level switches on by itself.
#[must_use]
pub const fn modifiers_for_level(level: u32) -> Modifiers {
    Modifiers {
        speed_boost: level > LATE_BAND_END,
        color_blind: level >= COLOR_BLIND_LEVEL,
    }
}

/// Pure schedule: flash timing, default gap and modifiers for `level`.
#[must_use]
pub fn params_for_level(level: u32) -> LevelParams {
    LevelParams {
        level,
        flash_ms: flash_ms_for_level(level),
        gap_ms: INTER_FLASH_GAP_MS,
        modifiers: modifiers_for_level(level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries_hit_floors() {
        assert_eq!(flash_ms_for_level(1), 960);
        assert_eq!(flash_ms_for_level(10), 600);
        assert_eq!(flash_ms_for_level(11), 570);
        assert_eq!(flash_ms_for_level(20), 300);
        assert_eq!(flash_ms_for_level(21), 290);
        assert_eq!(flash_ms_for_level(35), 150);
        assert_eq!(flash_ms_for_level(36), 150);
    }

    #[test]
    fn modifiers_switch_on_at_their_levels() {
        assert!(!params_for_level(35).modifiers.speed_boost);
        let hyper = params_for_level(36);
        assert_eq!(hyper.flash_ms, 150);
        assert!(hyper.modifiers.speed_boost);
        assert!(!hyper.modifiers.color_blind);
        assert!(params_for_level(40).modifiers.color_blind);
    }

    #[test]
    fn merge_is_sticky() {
        let on = Modifiers {
            speed_boost: true,
            color_blind: false,
        };
        let merged = on.merge(Modifiers::default());
        assert!(merged.speed_boost);
        assert!(merged.any());
        assert!(!Modifiers::default().any());
    }

    #[test]
    fn playback_counts_gaps_between_elements_only() {
        let params = params_for_level(1);
        assert_eq!(params.flash_on_ms(), 480);
        assert_eq!(params.playback_ms(0), 0);
        assert_eq!(params.playback_ms(1), 480);
        assert_eq!(params.playback_ms(3), 3 * 480 + 2 * 200);
        assert_eq!(params.with_gap(0).playback_ms(2), 960);
    }
}
