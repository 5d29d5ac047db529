//! Centralized balance and tuning constants for Color Memory Chain.
//!
//! These values define the deterministic math for the core game. Keeping
//! them together ensures that difficulty and scoring can only be adjusted
//! via code changes reviewed in version control. Runtime overrides go
//! through [`crate::config::GameConfig`], which defaults to these values.

// Session shape ------------------------------------------------------------
pub const MAX_LEVEL: u32 = 50;
pub const TWIST_THRESHOLD: u32 = 5;
pub const PRE_ROLL_MS: u64 = 1_000;
pub const INTER_FLASH_GAP_MS: u64 = 200;

// Flash timing bands -------------------------------------------------------
pub(crate) const EARLY_BAND_END: u32 = 10;
pub(crate) const MID_BAND_END: u32 = 20;
pub(crate) const LATE_BAND_END: u32 = 35;
pub(crate) const EARLY_FLASH_BASE_MS: u64 = 1_000;
pub(crate) const EARLY_FLASH_STEP_MS: u64 = 40;
pub(crate) const EARLY_FLASH_FLOOR_MS: u64 = 600;
pub(crate) const MID_FLASH_STEP_MS: u64 = 30;
pub(crate) const MID_FLASH_FLOOR_MS: u64 = 300;
pub(crate) const LATE_FLASH_STEP_MS: u64 = 10;
pub(crate) const LATE_FLASH_FLOOR_MS: u64 = 150;
pub(crate) const HYPERSPEED_FLASH_MS: u64 = 150;
pub(crate) const COLOR_BLIND_LEVEL: u32 = 40;

// Twist bands --------------------------------------------------------------
pub(crate) const CHAIN_SWAP_LEVEL: u32 = 15;
pub(crate) const SHUFFLE_LEVEL: u32 = 25;
pub(crate) const REVERSE_LEVEL: u32 = 35;

// Scoring ------------------------------------------------------------------
pub(crate) const LEVEL_POINTS: u64 = 10;
pub(crate) const SEQUENCE_POINTS: u64 = 5;
pub(crate) const SPEED_POINTS: u64 = 5;
pub(crate) const DIFFICULTY_LEVEL: u32 = 20;
pub(crate) const DIFFICULTY_POINTS: u64 = 10;
pub(crate) const PERFECT_LEVEL: u32 = 10;
pub(crate) const PERFECT_POINTS: u64 = 50;

// Profiles -----------------------------------------------------------------
pub(crate) const MIN_PLAYER_NAME_CHARS: usize = 2;
pub(crate) const ROSTER_DISPLAY_LIMIT: usize = 5;
pub(crate) const AUTO_SELECT_WINDOW_MS: u64 = 24 * 60 * 60 * 1_000;
pub(crate) const RECENT_ACHIEVEMENTS: usize = 3;

// Presentation copy --------------------------------------------------------
pub(crate) const MILESTONES: [(u32, &str); 10] = [
    (5, "Color Twists Begin!"),
    (10, "Speed Boost Activated!"),
    (15, "Precision Mode!"),
    (20, "You're on Fire!"),
    (25, "Mind-Bending Level!"),
    (30, "Legendary Status!"),
    (35, "Hyperspeed Mode!"),
    (40, "Color Vision Test!"),
    (45, "Almost Impossible!"),
    (50, "COLOR MEMORY MASTER!"),
];

pub(crate) const CHEERS: [&str; 10] = [
    "Perfect!",
    "Amazing!",
    "On Fire!",
    "Incredible!",
    "Unstoppable!",
    "Legendary!",
    "Flawless!",
    "Superb!",
    "Bullseye!",
    "Masterful!",
];
