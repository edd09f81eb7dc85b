//! Extracted location parameters and the shared slot they are published to.

use std::fmt;
use std::sync::{Arc, RwLock};

/// Ordered mapping from parameter name to extracted value.
///
/// Keys keep the position of their first insertion; re-inserting a key
/// overwrites its value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocationParams {
    entries: Vec<(String, Option<String>)>,
}

impl LocationParams {
    /// Construct an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or overwrite `key`.
    pub fn insert(&mut self, key: String, value: Option<String>) {
        if let Some(slot) = self.entries.iter_mut().find(|(name, _)| *name == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Extracted value for `key`; `None` when absent or captured as null.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Returns `true` when `key` was declared by the matched pattern.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == key)
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no key is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for LocationParams {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("{")?;
        for (index, (name, value)) in self.iter().enumerate() {
            if index > 0 {
                formatter.write_str(", ")?;
            }
            match value {
                Some(value) => write!(formatter, "{name}: {value:?}")?,
                None => write!(formatter, "{name}: null")?,
            }
        }
        formatter.write_str("}")
    }
}

/// Shared location-parameters slot, overwritten on every successful match.
#[derive(Clone, Debug, Default)]
pub struct ParamsSlot {
    inner: Arc<RwLock<LocationParams>>,
}

impl ParamsSlot {
    /// Construct an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the published parameters.
    pub fn replace(&self, params: LocationParams) {
        *self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = params;
    }

    /// Clone the published parameters.
    #[must_use]
    pub fn get(&self) -> LocationParams {
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Published value for `key`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_keeps_position_and_last_value() {
        let mut params = LocationParams::new();
        params.insert("id".into(), Some("1".into()));
        params.insert("tab".into(), None);
        params.insert("id".into(), Some("2".into()));

        let collected: Vec<_> = params.iter().collect();
        assert_eq!(collected, vec![("id", Some("2")), ("tab", None)]);
        assert_eq!(params.to_string(), r#"{id: "2", tab: null}"#);
    }

    #[test]
    fn slot_is_shared_between_clones() {
        let slot = ParamsSlot::new();
        let reader = slot.clone();
        let mut params = LocationParams::new();
        params.insert("id".into(), Some("42".into()));

        slot.replace(params.clone());

        assert_eq!(reader.get(), params);
        assert_eq!(reader.value("id").as_deref(), Some("42"));
        assert_eq!(reader.value("missing"), None);
    }
}
