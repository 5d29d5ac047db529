//! Keyboard shortcuts for the two player actions.
use crate::palette::{Color, PALETTE};

/// Abstract player action, independent of how it was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Press(Color),
    Replay,
}

impl Command {
    /// Keys `1`-`6` press the palette buttons in order; `r`/`R` replays.
    #[must_use]
    pub fn from_key(key: char) -> Option<Self> {
        if key.eq_ignore_ascii_case(&'r') {
            return Some(Self::Replay);
        }
        PALETTE
            .iter()
            .find(|color| color.key() == key)
            .map(|color| Self::Press(*color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_map_to_palette_order() {
        assert_eq!(Command::from_key('1'), Some(Command::Press(Color::Red)));
        assert_eq!(Command::from_key('6'), Some(Command::Press(Color::Orange)));
        assert_eq!(Command::from_key('7'), None);
    }

    #[test]
    fn r_replays_in_either_case() {
        assert_eq!(Command::from_key('r'), Some(Command::Replay));
        assert_eq!(Command::from_key('R'), Some(Command::Replay));
        assert_eq!(Command::from_key('x'), None);
    }
}
