//! The fixed six-color palette shared by every session.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of colors in the palette; constant for the lifetime of a session.
pub const PALETTE_SIZE: usize = 6;

/// One of the six palette colors. The same type names both the visual
/// button a player presses and the logical color a sequence step means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

/// Palette in its canonical button order.
pub const PALETTE: [Color; PALETTE_SIZE] = [
    Color::Red,
    Color::Blue,
    Color::Green,
    Color::Yellow,
    Color::Purple,
    Color::Orange,
];

impl Color {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Purple => "purple",
            Self::Orange => "orange",
        }
    }

    /// Upper-case label used in twist notifications and meaning hints.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Blue => "BLUE",
            Self::Green => "GREEN",
            Self::Yellow => "YELLOW",
            Self::Purple => "PURPLE",
            Self::Orange => "ORANGE",
        }
    }

    /// Position of the color within [`PALETTE`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Blue => 1,
            Self::Green => 2,
            Self::Yellow => 3,
            Self::Purple => 4,
            Self::Orange => 5,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        PALETTE.get(index).copied()
    }

    /// Button swatch as a CSS hex string.
    ///
    /// With `color_blind` set, red/orange and blue/purple are pulled close
    /// together so the player has to rely on position instead of hue.
    #[must_use]
    pub const fn swatch(self, color_blind: bool) -> &'static str {
        match (self, color_blind) {
            (Self::Red, false) => "#ff4757",
            (Self::Red, true) => "#ff5757",
            (Self::Blue, false) => "#3742fa",
            (Self::Blue, true) => "#4752fa",
            (Self::Green, _) => "#2ed573",
            (Self::Yellow, _) => "#ffa502",
            (Self::Purple, false) => "#a55eea",
            (Self::Purple, true) => "#9555ea",
            (Self::Orange, false) => "#ff6348",
            (Self::Orange, true) => "#ff5348",
        }
    }

    /// Keyboard shortcut digit (`'1'` for red through `'6'` for orange).
    #[must_use]
    pub const fn key(self) -> char {
        match self {
            Self::Red => '1',
            Self::Blue => '2',
            Self::Green => '3',
            Self::Yellow => '4',
            Self::Purple => '5',
            Self::Orange => '6',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(Self::Red),
            "blue" => Ok(Self::Blue),
            "green" => Ok(Self::Green),
            "yellow" => Ok(Self::Yellow),
            "purple" => Ok(Self::Purple),
            "orange" => Ok(Self::Orange),
            _ => Err(()),
        }
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_indices_match_positions() {
        for (position, color) in PALETTE.iter().enumerate() {
            assert_eq!(color.index(), position);
            assert_eq!(Color::from_index(position), Some(*color));
        }
        assert_eq!(Color::from_index(PALETTE_SIZE), None);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Purple".parse::<Color>(), Ok(Color::Purple));
        assert_eq!(" orange ".parse::<Color>(), Ok(Color::Orange));
        assert!("teal".parse::<Color>().is_err());
    }

    #[test]
    fn color_blind_swatches_collapse_similar_hues() {
        assert_ne!(Color::Red.swatch(false), Color::Red.swatch(true));
        assert_eq!(Color::Green.swatch(false), Color::Green.swatch(true));
        assert_eq!(Color::Yellow.swatch(true), "#ffa502");
    }
}
