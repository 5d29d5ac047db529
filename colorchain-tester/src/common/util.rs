use colored::{ColoredString, Colorize};
use colorchain_game::Color;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse a `#rrggbb` swatch into its channels.
pub fn swatch_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|part| u8::from_str_radix(part, 16).ok())
    };
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Terminal block painted with the button's swatch.
pub fn paint_button(color: Color, color_blind: bool) -> ColoredString {
    let label = format!(" {} ", color.label());
    match swatch_rgb(color.swatch(color_blind)) {
        Some((r, g, b)) => label.on_truecolor(r, g, b).black().bold(),
        None => label.normal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" alpha, ,beta,  gamma ");
        assert_eq!(parts, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn swatches_parse() {
        assert_eq!(swatch_rgb("#ff4757"), Some((0xff, 0x47, 0x57)));
        assert_eq!(swatch_rgb("ff4757"), None);
        assert_eq!(swatch_rgb("#ff47"), None);
        assert_eq!(swatch_rgb("#gg4757"), None);
    }

    #[test]
    fn every_button_has_a_parseable_swatch() {
        for color in colorchain_game::PALETTE {
            assert!(swatch_rgb(color.swatch(false)).is_some());
            assert!(swatch_rgb(color.swatch(true)).is_some());
        }
    }
}
