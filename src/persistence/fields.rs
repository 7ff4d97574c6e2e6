//! Saving values typed in as text
//!
//! Text that does not parse is rejected here: the save is skipped, the old
//! value stays, and a warning is logged. Nothing propagates to the session.

use thiserror::Error;

use super::{KeyValueStore, clear_data, load_data, save_data};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("`{text}` is not a valid integer for {key}")]
    InvalidInt { key: String, text: String },
    #[error("`{text}` is not a valid number for {key}")]
    InvalidFloat { key: String, text: String },
}

/// Parse `text` as an integer and save it under `key`
pub fn save_int_text(store: &mut dyn KeyValueStore, key: &str, text: &str) -> Result<i32, FieldError> {
    let value: i32 = text.trim().parse().map_err(|_| FieldError::InvalidInt {
        key: key.to_string(),
        text: text.to_string(),
    })?;
    save_data(store, key, value);
    Ok(value)
}

/// Parse `text` as a float and save it under `key`
pub fn save_float_text(store: &mut dyn KeyValueStore, key: &str, text: &str) -> Result<f32, FieldError> {
    let value: f32 = text
        .trim()
        .parse()
        .ok()
        .filter(|v: &f32| v.is_finite())
        .ok_or_else(|| FieldError::InvalidFloat {
            key: key.to_string(),
            text: text.to_string(),
        })?;
    save_data(store, key, value);
    Ok(value)
}

/// Values read back by `SaveProbe::load`
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeValues {
    pub text: String,
    pub int: i32,
    pub float: f32,
    pub flag: bool,
}

/// Save-system smoke test: one value of every stored type
#[derive(Debug, Clone)]
pub struct SaveProbe {
    pub string_key: &'static str,
    pub int_key: &'static str,
    pub float_key: &'static str,
    pub bool_key: &'static str,
}

impl Default for SaveProbe {
    fn default() -> Self {
        Self {
            string_key: "TestStringKey",
            int_key: "TestIntKey",
            float_key: "TestFloatKey",
            bool_key: "TestBoolKey",
        }
    }
}

impl SaveProbe {
    /// Save all four fields. Numeric fields that fail to parse are skipped
    /// (and returned); the others are still saved.
    pub fn save(
        &self,
        store: &mut dyn KeyValueStore,
        text: &str,
        int_text: &str,
        float_text: &str,
        flag: bool,
    ) -> Vec<FieldError> {
        let mut rejected = Vec::new();

        save_data(store, self.string_key, text.to_string());
        if let Err(e) = save_int_text(store, self.int_key, int_text) {
            log::warn!("{}", e);
            rejected.push(e);
        }
        if let Err(e) = save_float_text(store, self.float_key, float_text) {
            log::warn!("{}", e);
            rejected.push(e);
        }
        save_data(store, self.bool_key, flag);

        rejected
    }

    pub fn load(&self, store: &dyn KeyValueStore) -> ProbeValues {
        ProbeValues {
            text: load_data(store, self.string_key, String::new()),
            int: load_data(store, self.int_key, 0),
            float: load_data(store, self.float_key, 0.0),
            flag: load_data(store, self.bool_key, true),
        }
    }

    pub fn clear(&self, store: &mut dyn KeyValueStore) {
        for key in [self.string_key, self.int_key, self.float_key, self.bool_key] {
            clear_data(store, key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_invalid_int_keeps_prior_value() {
        let mut store = MemoryStore::default();
        assert_eq!(save_int_text(&mut store, "Lives", " 3 "), Ok(3));
        assert!(matches!(
            save_int_text(&mut store, "Lives", "three"),
            Err(FieldError::InvalidInt { .. })
        ));
        assert_eq!(load_data(&store, "Lives", 0i32), 3);
    }

    #[test]
    fn test_non_finite_float_rejected() {
        let mut store = MemoryStore::default();
        assert!(save_float_text(&mut store, "Speed", "NaN").is_err());
        assert!(save_float_text(&mut store, "Speed", "inf").is_err());
        assert!(store.get("Speed").is_none());
    }

    #[test]
    fn test_probe_round_trip_and_partial_failure() {
        let mut store = MemoryStore::default();
        let probe = SaveProbe::default();

        assert!(probe.save(&mut store, "hello", "42", "1.5", false).is_empty());
        let rejected = probe.save(&mut store, "again", "x", "2.25", true);
        assert_eq!(rejected.len(), 1);

        let values = probe.load(&store);
        assert_eq!(values.text, "again");
        assert_eq!(values.int, 42);
        assert_eq!(values.float, 2.25);
        assert!(values.flag);
    }

    #[test]
    fn test_probe_clear_restores_defaults() {
        let mut store = MemoryStore::default();
        let probe = SaveProbe::default();
        probe.save(&mut store, "hello", "1", "1.0", false);
        probe.clear(&mut store);
        assert_eq!(
            probe.load(&store),
            ProbeValues {
                text: String::new(),
                int: 0,
                float: 0.0,
                flag: true,
            }
        );
    }
}
