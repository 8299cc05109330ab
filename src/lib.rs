//! Core of the Misbaha prayer counter.
//!
//! [`CounterState`] is a flat value holding the four fields that make up a
//! counting session and the operations on them. [`Tasbih`] owns one state
//! together with its [`Persistence`] and saves a full snapshot after every
//! mutation. Nothing here touches the DOM; the Yew front end in `main.rs`
//! renders the state and turns gestures into calls on [`Tasbih`].

use log::{debug, info};
use serde::Serialize;
use std::fmt;
use std::num::NonZeroU32;

pub mod config;
pub mod storage;
pub mod utils;

use config::{
    CONFIRM_PULSE, DEFAULT_HAPTIC_ENABLED, DEFAULT_PHRASE, DEFAULT_TARGET, OPEN_TARGET,
    TAP_PULSE, TARGET_REACHED_PULSE,
};
pub use storage::{BrowserStorage, KeyValueStore, MemoryStore, Persistence, StorageError};

/// Cycle length of the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u32")]
pub enum Target {
    /// Completes a cycle every `n` increments.
    Cycle(NonZeroU32),
    /// No cycle; stored as [`OPEN_TARGET`].
    Open,
}

impl Target {
    /// Interpret a stored or preset value. `0` has no meaning and yields `None`.
    pub fn from_raw(raw: u32) -> Option<Self> {
        if raw == OPEN_TARGET {
            Some(Target::Open)
        } else {
            NonZeroU32::new(raw).map(Target::Cycle)
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            Target::Cycle(n) => n.get(),
            Target::Open => OPEN_TARGET,
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, Target::Open)
    }
}

impl Default for Target {
    fn default() -> Self {
        NonZeroU32::new(DEFAULT_TARGET).map_or(Target::Open, Target::Cycle)
    }
}

impl From<Target> for u32 {
    fn from(target: Target) -> Self {
        target.raw()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw())
    }
}

/// Vibration requested by an operation. The front end decides whether the
/// device can honour it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticPattern {
    /// Short single pulse on every increment.
    Tap,
    /// Triple pulse when a cycle completes.
    TargetReached,
    /// Single pulse confirming haptics were switched back on.
    Confirm,
}

impl HapticPattern {
    /// Alternating vibrate/pause durations in milliseconds.
    pub fn durations(self) -> &'static [u32] {
        match self {
            HapticPattern::Tap => &TAP_PULSE,
            HapticPattern::TargetReached => &TARGET_REACHED_PULSE,
            HapticPattern::Confirm => &CONFIRM_PULSE,
        }
    }
}

/// Result of a single increment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncrementOutcome {
    pub count: u64,
    pub target_reached: bool,
    /// Patterns to play, in order. Empty when haptics are disabled.
    pub haptics: Vec<HapticPattern>,
}

/// Snapshot of a counting session. Serializes to the persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterState {
    pub count: u64,
    pub target: Target,
    #[serde(rename = "currentDhikr")]
    pub selected_phrase: String,
    #[serde(rename = "vibrationEnabled")]
    pub haptic_enabled: bool,
}

impl Default for CounterState {
    fn default() -> Self {
        Self {
            count: 0,
            target: Target::default(),
            selected_phrase: DEFAULT_PHRASE.to_string(),
            haptic_enabled: DEFAULT_HAPTIC_ENABLED,
        }
    }
}

impl CounterState {
    /// Add one and report whether that completed a cycle.
    ///
    /// The count saturates at `u64::MAX` instead of wrapping.
    pub fn increment(&mut self) -> bool {
        self.count = self.count.saturating_add(1);
        self.target_reached()
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    /// Replace phrase and target together. The count is kept so that
    /// switching phrase mid-session does not lose progress. An empty phrase
    /// is replaced by [`DEFAULT_PHRASE`].
    pub fn configure(&mut self, phrase: &str, target: Target) {
        self.selected_phrase = if phrase.is_empty() {
            DEFAULT_PHRASE.to_string()
        } else {
            phrase.to_string()
        };
        self.target = target;
    }

    /// Flip haptics and return the new setting.
    pub fn toggle_haptic(&mut self) -> bool {
        self.haptic_enabled = !self.haptic_enabled;
        self.haptic_enabled
    }

    /// `true` when the count sits on a non-zero multiple of a bounded target.
    pub fn target_reached(&self) -> bool {
        match self.target {
            Target::Open => false,
            Target::Cycle(n) => self.count > 0 && self.count % u64::from(n.get()) == 0,
        }
    }

    /// Completion of the progress ring, in `[0.0, 1.0]`.
    ///
    /// Open targets always read as full. On an exact non-zero multiple of
    /// the target the ring is full rather than empty; the next increment
    /// starts the following cycle at `1 / target`.
    pub fn progress_fraction(&self) -> f64 {
        match self.target {
            Target::Open => 1.0,
            Target::Cycle(n) => {
                let n = u64::from(n.get());
                let remainder = self.count % n;
                if self.count > 0 && remainder == 0 {
                    1.0
                } else {
                    remainder as f64 / n as f64
                }
            }
        }
    }
}

/// A counting session: the live state plus where it is saved.
///
/// Every mutating call writes a full snapshot. Write failures are absorbed
/// by [`Persistence::save`]; the in-memory state stays authoritative and
/// [`Tasbih::last_save_succeeded`] reports the outcome.
#[derive(Debug)]
pub struct Tasbih<S> {
    state: CounterState,
    persistence: Persistence<S>,
    last_save_succeeded: bool,
}

impl<S: KeyValueStore> Tasbih<S> {
    /// Start a session from whatever `persistence` holds.
    pub fn restore(persistence: Persistence<S>) -> Self {
        let state = persistence.load();
        Self::new(state, persistence)
    }

    pub fn new(state: CounterState, persistence: Persistence<S>) -> Self {
        Self {
            state,
            persistence,
            last_save_succeeded: true,
        }
    }

    pub fn state(&self) -> &CounterState {
        &self.state
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn last_save_succeeded(&self) -> bool {
        self.last_save_succeeded
    }

    pub fn progress_fraction(&self) -> f64 {
        self.state.progress_fraction()
    }

    pub fn increment(&mut self) -> IncrementOutcome {
        let target_reached = self.state.increment();
        let mut haptics = Vec::new();
        if self.state.haptic_enabled {
            haptics.push(HapticPattern::Tap);
            if target_reached {
                haptics.push(HapticPattern::TargetReached);
            }
        }
        if target_reached {
            info!(
                "Target {} reached at count {}",
                self.state.target, self.state.count
            );
        }
        self.persist();
        IncrementOutcome {
            count: self.state.count,
            target_reached,
            haptics,
        }
    }

    /// Zero the count. Confirmation is the caller's job.
    pub fn reset(&mut self) {
        debug!("Resetting count from {}", self.state.count);
        self.state.reset();
        self.persist();
    }

    pub fn configure(&mut self, phrase: &str, target: Target) {
        self.state.configure(phrase, target);
        debug!(
            "Configured phrase '{}' with target {}",
            self.state.selected_phrase, self.state.target
        );
        self.persist();
    }

    /// Flip haptics; returns the confirmation pulse to play when they were
    /// switched on.
    pub fn toggle_haptic(&mut self) -> Option<HapticPattern> {
        let enabled = self.state.toggle_haptic();
        self.persist();
        enabled.then_some(HapticPattern::Confirm)
    }

    fn persist(&mut self) {
        self.last_save_succeeded = self.persistence.save(&self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(n: u32) -> Target {
        Target::from_raw(n).unwrap()
    }

    fn state(count: u64, target: Target) -> CounterState {
        CounterState {
            count,
            target,
            ..CounterState::default()
        }
    }

    #[test]
    fn target_from_raw() {
        assert_eq!(Target::from_raw(0), None);
        assert_eq!(Target::from_raw(9999), Some(Target::Open));
        assert_eq!(Target::from_raw(33).map(Target::raw), Some(33));
        assert_eq!(Target::default(), cycle(33));
        assert_eq!(Target::Open.to_string(), "9999");
    }

    #[test]
    fn progress_is_zero_before_first_increment() {
        assert_eq!(state(0, cycle(33)).progress_fraction(), 0.0);
        assert!(!state(0, cycle(33)).target_reached());
    }

    #[test]
    fn exact_multiple_shows_full_ring() {
        assert_eq!(state(33, cycle(33)).progress_fraction(), 1.0);
        assert_eq!(state(66, cycle(33)).progress_fraction(), 1.0);
        assert_eq!(state(34, cycle(33)).progress_fraction(), 1.0 / 33.0);
    }

    #[test]
    fn open_target_is_always_full_and_never_reached() {
        for count in [0, 1, 33, 9999, 19998] {
            let s = state(count, Target::Open);
            assert_eq!(s.progress_fraction(), 1.0);
            assert!(!s.target_reached());
        }
    }

    #[test]
    fn target_of_one_completes_every_increment() {
        let mut s = state(0, cycle(1));
        for _ in 0..5 {
            assert!(s.increment());
            assert_eq!(s.progress_fraction(), 1.0);
        }
    }

    #[test]
    fn increment_saturates() {
        let mut s = state(u64::MAX, Target::Open);
        s.increment();
        assert_eq!(s.count, u64::MAX);
    }

    #[test]
    fn configure_keeps_count_and_defaults_empty_phrase() {
        let mut s = state(12, cycle(33));
        s.configure("", cycle(100));
        assert_eq!(s.count, 12);
        assert_eq!(s.target, cycle(100));
        assert_eq!(s.selected_phrase, DEFAULT_PHRASE);
    }

    #[test]
    fn haptics_follow_setting() {
        let mut tasbih = Tasbih::new(state(32, cycle(33)), Persistence::new(MemoryStore::new()));
        let outcome = tasbih.increment();
        assert!(outcome.target_reached);
        assert_eq!(
            outcome.haptics,
            vec![HapticPattern::Tap, HapticPattern::TargetReached]
        );

        assert_eq!(tasbih.toggle_haptic(), None);
        let outcome = tasbih.increment();
        assert_eq!(outcome.count, 34);
        assert!(outcome.haptics.is_empty());

        assert_eq!(tasbih.toggle_haptic(), Some(HapticPattern::Confirm));
    }

    #[test]
    fn reset_plays_nothing_and_persists() {
        let mut tasbih = Tasbih::new(state(40, cycle(33)), Persistence::new(MemoryStore::new()));
        tasbih.reset();
        assert_eq!(tasbih.state().count, 0);
        assert!(tasbih.last_save_succeeded());
        let saved = tasbih.persistence().load();
        assert_eq!(saved.count, 0);
    }

    #[test]
    fn haptic_durations() {
        assert_eq!(HapticPattern::Tap.durations(), &[15]);
        assert_eq!(HapticPattern::TargetReached.durations(), &[50, 50, 50]);
        assert_eq!(HapticPattern::Confirm.durations(), &[50]);
    }
}
