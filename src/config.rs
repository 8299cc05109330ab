//! Application-level configuration constants.

// Persistence
pub const STORAGE_KEY: &str = "misbahaState";

// Counter defaults
pub const DEFAULT_TARGET: u32 = 33;
/// Reserved target value meaning "no cycle": the ring stays full and the
/// target is never reported as reached.
pub const OPEN_TARGET: u32 = 9999;
pub const DEFAULT_PHRASE: &str = "سبحان الله";
pub const DEFAULT_HAPTIC_ENABLED: bool = true;

// Choices offered by the settings dialog
pub const PHRASES: [&str; 7] = [
    "سبحان الله",
    "الحمد لله",
    "الله أكبر",
    "لا إله إلا الله",
    "أستغفر الله",
    "لا حول ولا قوة إلا بالله",
    "اللهم صل على محمد",
];
pub const TARGET_PRESETS: [u32; 4] = [33, 100, 1000, OPEN_TARGET];

// Haptic patterns (milliseconds, alternating vibrate/pause)
pub const TAP_PULSE: [u32; 1] = [15];
pub const TARGET_REACHED_PULSE: [u32; 3] = [50, 50, 50];
pub const CONFIRM_PULSE: [u32; 1] = [50];

// UI timing
pub const FLASH_MS: u32 = 300;
pub const MODAL_ENTER_DELAY_MS: u32 = 10;
pub const MODAL_EXIT_MS: u32 = 300;

// UI constants
pub const RING_RADIUS: f64 = 136.0;
pub const RESET_CONFIRM_MESSAGE: &str = "هل أنت متأكد من تصفير العداد؟";
pub const TARGET_LABEL_PREFIX: &str = "الهدف";
pub const OPEN_TARGET_LABEL: &str = "مفتوح";
