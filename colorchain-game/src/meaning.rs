//! Visual → logical color relabeling consulted on every player input.
use serde::{Deserialize, Serialize};

use crate::palette::{Color, PALETTE, PALETTE_SIZE};

/// Mapping from the button a player sees to the color it currently means.
///
/// Indexed by [`Color::index`] of the visual color. Twists mutate it; every
/// strategy the twist engine uses keeps it a permutation of the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorMeaningMap {
    meanings: [Color; PALETTE_SIZE],
}

impl Default for ColorMeaningMap {
    fn default() -> Self {
        Self::identity()
    }
}

impl ColorMeaningMap {
    /// Map where every visual color means itself.
    #[must_use]
    pub const fn identity() -> Self {
        Self { meanings: PALETTE }
    }

    /// Build a map from an explicit meaning table indexed by visual color.
    #[must_use]
    pub const fn from_meanings(meanings: [Color; PALETTE_SIZE]) -> Self {
        Self { meanings }
    }

    pub fn reset(&mut self) {
        self.meanings = PALETTE;
    }

    /// Logical color the given visual button stands for.
    #[must_use]
    pub const fn resolve(&self, visual: Color) -> Color {
        self.meanings[visual.index()]
    }

    /// Visual button that currently means `logical`, if any.
    #[must_use]
    pub fn visual_for(&self, logical: Color) -> Option<Color> {
        PALETTE
            .iter()
            .copied()
            .find(|visual| self.resolve(*visual) == logical)
    }

    pub(crate) fn set(&mut self, visual: Color, logical: Color) {
        self.meanings[visual.index()] = logical;
    }

    /// Full meaning table indexed by visual color.
    #[must_use]
    pub const fn meanings(&self) -> &[Color; PALETTE_SIZE] {
        &self.meanings
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.meanings == PALETTE
    }

    /// True when every logical color is reachable from exactly one button.
    #[must_use]
    pub fn is_permutation(&self) -> bool {
        let mut seen = [false; PALETTE_SIZE];
        for logical in self.meanings {
            if seen[logical.index()] {
                return false;
            }
            seen[logical.index()] = true;
        }
        true
    }

    /// Visual colors whose meaning differs from their own identity.
    #[must_use]
    pub fn twisted_pairs(&self) -> Vec<(Color, Color)> {
        PALETTE
            .iter()
            .map(|visual| (*visual, self.resolve(*visual)))
            .filter(|(visual, logical)| visual != logical)
            .collect()
    }

    /// Human-readable list such as `RED → BLUE, BLUE → RED`.
    #[must_use]
    pub fn describe(&self) -> String {
        self.twisted_pairs()
            .iter()
            .map(|(visual, logical)| format!("{} → {}", visual.label(), logical.label()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_restores_identity() {
        let mut map = ColorMeaningMap::identity();
        map.set(Color::Red, Color::Blue);
        map.set(Color::Blue, Color::Red);
        assert!(!map.is_identity());

        map.reset();
        for color in PALETTE {
            assert_eq!(map.resolve(color), color);
        }
        assert!(map.is_identity());
    }

    #[test]
    fn inverse_lookup_follows_twists() {
        let mut map = ColorMeaningMap::identity();
        map.set(Color::Green, Color::Yellow);
        map.set(Color::Yellow, Color::Green);
        assert_eq!(map.visual_for(Color::Yellow), Some(Color::Green));
        assert_eq!(map.visual_for(Color::Red), Some(Color::Red));
        assert_eq!(map.describe(), "GREEN → YELLOW, YELLOW → GREEN");
    }

    #[test]
    fn detects_non_permutation() {
        let mut map = ColorMeaningMap::identity();
        assert!(map.is_permutation());
        map.set(Color::Orange, Color::Red);
        assert!(!map.is_permutation());
        assert_eq!(map.visual_for(Color::Orange), None);
    }
}
