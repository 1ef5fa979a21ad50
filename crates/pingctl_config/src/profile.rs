//! Named profiles and profile-name validation.

use std::collections::BTreeMap;

use regex::Regex;
use serde_yaml::Value as YamlValue;

use crate::error::{ConfigError, ConfigResult};
use crate::value::TypedValue;

/// Top-level document key holding the active profile name.
pub const ACTIVE_PROFILE_KEY: &str = "activeProfile";

/// Profile key holding the free-text description.
pub const DESCRIPTION_KEY: &str = "description";

/// The profile bootstrapped on first run.
pub const DEFAULT_PROFILE_NAME: &str = "default";

const NAME_PATTERN: &str = r"^[A-Za-z0-9_-]+$";

/// Check a candidate profile name.
pub fn validate_profile_name(name: &str) -> ConfigResult<()> {
    let matches = Regex::new(NAME_PATTERN)
        .map(|re| re.is_match(name))
        .unwrap_or(false);

    if !matches {
        return Err(ConfigError::InvalidName {
            name: name.to_string(),
            reason: "name must contain only alphanumeric characters, underscores, and dashes"
                .to_string(),
        });
    }

    if name.eq_ignore_ascii_case(ACTIVE_PROFILE_KEY) {
        return Err(ConfigError::InvalidName {
            name: name.to_string(),
            reason: format!("'{ACTIVE_PROFILE_KEY}' is a reserved name"),
        });
    }

    Ok(())
}

/// A named bundle of stored setting values.
///
/// Values are kept in their persisted YAML form, keyed by dot-path. Keys the
/// registry does not know are kept as-is so a save never drops data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Profile {
    name: String,
    description: String,
    values: BTreeMap<String, YamlValue>,
}

impl Profile {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// The stored key matching `key` case-insensitively.
    fn stored_key(&self, key: &str) -> Option<&String> {
        self.values
            .keys()
            .find(|stored| stored.eq_ignore_ascii_case(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.stored_key(key).is_some()
    }

    /// The persisted value for `key`.
    pub fn get(&self, key: &str) -> Option<&YamlValue> {
        self.stored_key(key).and_then(|stored| self.values.get(stored))
    }

    /// The stored value for `key` flattened back to a raw string for parsing.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.get(key).and_then(leaf_to_raw)
    }

    /// Store a typed value under `key`, replacing any differently-cased entry.
    pub fn set(&mut self, key: &str, value: &TypedValue) {
        self.insert_persisted(key, value.to_persisted());
    }

    pub(crate) fn insert_persisted(&mut self, key: &str, value: YamlValue) {
        if let Some(stored) = self.stored_key(key).cloned() {
            self.values.remove(&stored);
        }
        self.values.insert(key.to_string(), value);
    }

    /// Stored keys with their persisted values, sorted by key.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &YamlValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Flatten a stored leaf to the raw string the value kinds parse.
///
/// Sequences join with commas; null reads as empty. Mappings are not leaves.
pub fn leaf_to_raw(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::Null => Some(String::new()),
        YamlValue::Bool(b) => Some(b.to_string()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Sequence(items) => Some(
            items
                .iter()
                .filter_map(leaf_to_raw)
                .collect::<Vec<_>>()
                .join(","),
        ),
        YamlValue::Mapping(_) => None,
        YamlValue::Tagged(tagged) => leaf_to_raw(&tagged.value),
    }
}
