use colorchain_game::{flash_ms_for_level, params_for_level, scoring};

#[test]
fn flash_duration_never_increases() {
    let mut previous = u64::MAX;
    for level in 1..=50 {
        let flash = flash_ms_for_level(level);
        assert!(flash <= previous, "level {level} slowed down: {flash} > {previous}");
        assert!(flash >= 150, "level {level} below the hyperspeed floor");
        previous = flash;
    }
}

#[test]
fn band_boundaries() {
    let expected = [
        (1, 960),
        (10, 600),
        (11, 570),
        (20, 300),
        (21, 290),
        (35, 150),
        (36, 150),
        (50, 150),
    ];
    for (level, flash) in expected {
        assert_eq!(flash_ms_for_level(level), flash, "level {level}");
    }
}

#[test]
fn playback_time_for_a_full_sequence() {
    // Ten flashes lit 300 ms each, nine 200 ms gaps.
    let params = params_for_level(10);
    assert_eq!(params.flash_on_ms(), 300);
    assert_eq!(params.playback_ms(10), 10 * 300 + 9 * 200);
    assert_eq!(params.playback_ms(1), 300);
}

#[test]
fn hyperspeed_levels_pay_speed_bonus() {
    let boosted = params_for_level(36);
    assert!(boosted.modifiers.speed_boost);
    let award = scoring::award(36, 36, boosted.modifiers.speed_boost);
    assert_eq!(award.speed_bonus, 180);
    assert_eq!(award.difficulty_bonus, 160);
    assert_eq!(award.perfect_bonus, 50);
}
