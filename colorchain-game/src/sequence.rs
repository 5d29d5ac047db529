//! Target sequence growth.
use rand::Rng;

use crate::palette::{Color, PALETTE};

/// Uniformly pick one palette color.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    PALETTE[rng.gen_range(0..PALETTE.len())]
}

/// Append one uniformly random color. Immediate repeats are allowed.
pub fn extend<R: Rng + ?Sized>(sequence: &mut Vec<Color>, rng: &mut R) -> Color {
    let color = random_color(rng);
    sequence.push(color);
    color
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::collections::HashSet;

    #[test]
    fn grows_by_exactly_one() {
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let mut sequence = Vec::new();
        for expected in 1..=20 {
            let pushed = extend(&mut sequence, &mut rng);
            assert_eq!(sequence.len(), expected);
            assert_eq!(sequence.last(), Some(&pushed));
        }
    }

    #[test]
    fn covers_whole_palette() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let seen: HashSet<Color> = (0..500).map(|_| random_color(&mut rng)).collect();
        assert_eq!(seen.len(), PALETTE.len());
    }
}
