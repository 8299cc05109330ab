//! Best-effort persistence of the counter snapshot.
//!
//! The snapshot lives under a single key in a [`KeyValueStore`]. In the
//! browser that is `window.localStorage`; tests and storage-less hosts use
//! [`MemoryStore`]. Nothing in this module ever surfaces an error to the
//! caller: a failed read yields the default state and a failed write is
//! logged and reported as `false`, leaving the in-memory state authoritative.
//!
//! # Record layout
//! ```json
//! { "count": 12, "target": 33, "currentDhikr": "سبحان الله", "vibrationEnabled": true }
//! ```
//! `selectedPhrase` is accepted in place of `currentDhikr` when reading.

use crate::config::STORAGE_KEY;
use crate::{CounterState, Target};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use wasm_bindgen::JsValue;

/// Failure talking to the underlying key-value facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No storage facility exists (no window, storage disabled, private mode).
    Unavailable,
    /// The facility threw, e.g. quota exceeded or a security error.
    Backend(String),
    /// The snapshot could not be serialized.
    Encode(String),
}

impl StorageError {
    fn from_js(value: JsValue) -> Self {
        StorageError::Backend(format!("{:?}", value))
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable => write!(f, "Storage facility is unavailable"),
            StorageError::Backend(msg) => write!(f, "Storage facility rejected the request: {}", msg),
            StorageError::Encode(msg) => write!(f, "Failed to encode counter snapshot: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// Minimal string key-value facility, shaped after the Web Storage API.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
}

/// `window.localStorage`, looked up on every call so that a storage facility
/// disabled mid-session degrades to [`StorageError::Unavailable`].
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn local_storage() -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        window
            .local_storage()
            .map_err(StorageError::from_js)?
            .ok_or(StorageError::Unavailable)
    }
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::local_storage()?
            .get_item(key)
            .map_err(StorageError::from_js)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::local_storage()?
            .set_item(key, value)
            .map_err(StorageError::from_js)
    }
}

/// In-memory store. Lives only as long as the value itself.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one raw entry.
    pub fn with_item(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Raw contents of `key`, bypassing the trait.
    pub fn item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.item(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Loads and saves the counter snapshot under one key of a [`KeyValueStore`].
#[derive(Debug)]
pub struct Persistence<S> {
    store: S,
    key: String,
    // Set once a write failure has been logged at warn level.
    failure_reported: Cell<bool>,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            failure_reported: Cell::new(false),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the saved snapshot, falling back to [`CounterState::default`]
    /// when the record is absent, malformed, or the store fails.
    pub fn load(&self) -> CounterState {
        match self.store.get_item(&self.key) {
            Ok(Some(raw)) => {
                let state = decode_record(&raw);
                info!(
                    "Restored counter: count {}, target {}",
                    state.count, state.target
                );
                state
            }
            Ok(None) => {
                debug!("No saved counter under '{}', using defaults", self.key);
                CounterState::default()
            }
            Err(e) => {
                warn!("{}; starting from defaults", e);
                CounterState::default()
            }
        }
    }

    /// Write a full snapshot. Returns `false` if the write failed; the
    /// failure is logged and otherwise ignored.
    pub fn save(&self, state: &CounterState) -> bool {
        match self.write(state) {
            Ok(()) => true,
            Err(e) => {
                if self.failure_reported.replace(true) {
                    debug!("Counter not persisted: {}", e);
                } else {
                    warn!("{}; continuing without persistence", e);
                }
                false
            }
        }
    }

    fn write(&self, state: &CounterState) -> Result<(), StorageError> {
        let raw =
            serde_json::to_string(state).map_err(|e| StorageError::Encode(e.to_string()))?;
        self.store.set_item(&self.key, &raw)
    }
}

/// Decode a raw record field by field.
///
/// Anything that is not a JSON object yields the defaults. Inside an object,
/// each field that is missing or of the wrong shape falls back on its own,
/// as do a zero `target` and an empty phrase.
pub fn decode_record(raw: &str) -> CounterState {
    let defaults = CounterState::default();
    let record = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            warn!("Saved counter is not an object ({}), using defaults", other);
            return defaults;
        }
        Err(e) => {
            warn!("Saved counter is not valid JSON ({}), using defaults", e);
            return defaults;
        }
    };

    CounterState {
        count: field::<u64>(&record, &["count"]).unwrap_or(defaults.count),
        target: field::<u32>(&record, &["target"])
            .and_then(Target::from_raw)
            .unwrap_or(defaults.target),
        selected_phrase: field::<String>(&record, &["currentDhikr", "selectedPhrase"])
            .filter(|phrase| !phrase.is_empty())
            .unwrap_or(defaults.selected_phrase),
        haptic_enabled: field::<bool>(&record, &["vibrationEnabled"])
            .unwrap_or(defaults.haptic_enabled),
    }
}

/// First of `keys` present in `record` that decodes as `T`.
fn field<T: DeserializeOwned>(record: &Map<String, Value>, keys: &[&str]) -> Option<T> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find_map(|value| T::deserialize(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_PHRASE, OPEN_TARGET};

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Backend("SecurityError".into()))
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend("QuotaExceededError".into()))
        }
    }

    fn target(raw: u32) -> Target {
        Target::from_raw(raw).unwrap()
    }

    #[test]
    fn absent_record_loads_defaults() {
        let state = Persistence::new(MemoryStore::new()).load();
        assert_eq!(state.count, 0);
        assert_eq!(state.target, target(33));
        assert_eq!(state.selected_phrase, "سبحان الله");
        assert!(state.haptic_enabled);
    }

    #[test]
    fn failing_store_loads_defaults() {
        assert_eq!(
            Persistence::new(BrokenStore).load(),
            CounterState::default()
        );
    }

    #[test]
    fn failing_store_reports_save_failure() {
        let persistence = Persistence::new(BrokenStore);
        assert!(!persistence.save(&CounterState::default()));
        // Second failure takes the quiet path but still reports false.
        assert!(!persistence.save(&CounterState::default()));
    }

    #[test]
    fn count_only_record_fills_remaining_fields() {
        let state = decode_record(r#"{"count":5}"#);
        assert_eq!(state.count, 5);
        assert_eq!(state.target, target(33));
        assert_eq!(state.selected_phrase, DEFAULT_PHRASE);
        assert!(state.haptic_enabled);
    }

    #[test]
    fn wrong_shapes_fall_back_per_field() {
        let state = decode_record(
            r#"{"count":"seven","target":100,"currentDhikr":42,"vibrationEnabled":false}"#,
        );
        assert_eq!(state.count, 0);
        assert_eq!(state.target, target(100));
        assert_eq!(state.selected_phrase, DEFAULT_PHRASE);
        assert!(!state.haptic_enabled);
    }

    #[test]
    fn negative_and_fractional_counts_are_rejected() {
        assert_eq!(decode_record(r#"{"count":-3}"#).count, 0);
        assert_eq!(decode_record(r#"{"count":2.5}"#).count, 0);
    }

    #[test]
    fn zero_target_and_empty_phrase_use_defaults() {
        let state = decode_record(r#"{"target":0,"currentDhikr":""}"#);
        assert_eq!(state.target, target(33));
        assert_eq!(state.selected_phrase, DEFAULT_PHRASE);
    }

    #[test]
    fn open_target_and_arbitrary_positive_target_load() {
        assert_eq!(decode_record(r#"{"target":9999}"#).target, Target::Open);
        assert_eq!(decode_record(r#"{"target":7}"#).target, target(7));
    }

    #[test]
    fn selected_phrase_alias_is_accepted() {
        let state = decode_record(r#"{"selectedPhrase":"الله أكبر"}"#);
        assert_eq!(state.selected_phrase, "الله أكبر");
    }

    #[test]
    fn malformed_and_non_object_records_load_defaults() {
        for raw in ["{not json", "null", "[1,2,3]", "17", r#""text""#] {
            assert_eq!(decode_record(raw), CounterState::default(), "{raw}");
        }
    }

    #[test]
    fn save_writes_the_full_record_under_the_key() {
        let persistence = Persistence::new(MemoryStore::new());
        let state = CounterState {
            count: 12,
            target: Target::Open,
            selected_phrase: "الحمد لله".into(),
            haptic_enabled: false,
        };
        assert!(persistence.save(&state));

        let raw = persistence.store().item(STORAGE_KEY).unwrap();
        let json: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["count"], 12);
        assert_eq!(json["target"], OPEN_TARGET);
        assert_eq!(json["currentDhikr"], "الحمد لله");
        assert_eq!(json["vibrationEnabled"], false);
        assert_eq!(json.as_object().unwrap().len(), 4);
    }

    #[test]
    fn custom_key_is_respected() {
        let persistence = Persistence::with_key(MemoryStore::new(), "other");
        persistence.save(&CounterState::default());
        assert!(persistence.store().item("other").is_some());
        assert!(persistence.store().item(STORAGE_KEY).is_none());
    }
}
