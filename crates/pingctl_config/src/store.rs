//! In-memory profile store.
//!
//! Holds every profile plus the active-profile pointer and enforces the store
//! invariants: at least one profile exists, the active name refers to an
//! existing profile, and names are unique ignoring ASCII case.

use std::collections::BTreeMap;

use serde_yaml::{Mapping, Value as YamlValue};
use tracing::{debug, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::profile::{
    validate_profile_name, Profile, ACTIVE_PROFILE_KEY, DEFAULT_PROFILE_NAME, DESCRIPTION_KEY,
};

/// Description given to the bootstrapped profile.
pub const DEFAULT_PROFILE_DESCRIPTION: &str = "Default profile created by pingctl";

/// All profiles plus the active pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileStore {
    active: String,
    profiles: BTreeMap<String, Profile>,
}

impl ProfileStore {
    /// A store holding only the `default` profile, active.
    pub fn bootstrap() -> Self {
        let profile = Profile::new(DEFAULT_PROFILE_NAME, DEFAULT_PROFILE_DESCRIPTION);
        let mut profiles = BTreeMap::new();
        profiles.insert(DEFAULT_PROFILE_NAME.to_string(), profile);
        Self {
            active: DEFAULT_PROFILE_NAME.to_string(),
            profiles,
        }
    }

    /// The stored name matching `name` ignoring ASCII case.
    fn stored_name(&self, name: &str) -> Option<&String> {
        self.profiles
            .keys()
            .find(|stored| stored.eq_ignore_ascii_case(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.stored_name(name).is_some()
    }

    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.stored_name(name).and_then(|n| self.profiles.get(n))
    }

    /// Look up a profile, failing with `ProfileNotFound`.
    pub fn profile_required(&self, name: &str) -> ConfigResult<&Profile> {
        self.profile(name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))
    }

    pub fn active_name(&self) -> &str {
        &self.active
    }

    pub fn active_profile(&self) -> &Profile {
        // The active pointer always names a stored profile.
        &self.profiles[&self.active]
    }

    pub fn active_profile_mut(&mut self) -> &mut Profile {
        self.profiles
            .get_mut(&self.active)
            .unwrap_or_else(|| unreachable!("active profile '{}' missing", self.active))
    }

    /// Profile names in lexicographic order.
    pub fn names(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    /// Add a new, inactive profile.
    pub fn insert(&mut self, profile: Profile) -> ConfigResult<()> {
        if let Some(existing) = self.stored_name(profile.name()) {
            return Err(ConfigError::AlreadyExists(existing.clone()));
        }
        debug!("Adding profile {}", profile.name());
        self.profiles.insert(profile.name().to_string(), profile);
        Ok(())
    }

    /// Remove a profile that is not active.
    pub fn remove(&mut self, name: &str) -> ConfigResult<Profile> {
        let stored = self
            .stored_name(name)
            .cloned()
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))?;

        if stored == self.active {
            return Err(ConfigError::ActiveProfileConflict(stored));
        }

        debug!("Removing profile {}", stored);
        self.profiles
            .remove(&stored)
            .ok_or(ConfigError::ProfileNotFound(stored))
    }

    /// Point the active pointer at an existing profile.
    pub fn set_active(&mut self, name: &str) -> ConfigResult<()> {
        let stored = self
            .stored_name(name)
            .cloned()
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))?;
        debug!("Active profile {} -> {}", self.active, stored);
        self.active = stored;
        Ok(())
    }

    /// Build a store from a parsed YAML document.
    ///
    /// Errors are plain messages; the reader attaches the file path.
    pub fn from_document(document: YamlValue) -> Result<Self, String> {
        let mapping = match document {
            YamlValue::Mapping(mapping) => mapping,
            YamlValue::Null => return Err("document is empty".to_string()),
            _ => return Err("document root must be a mapping".to_string()),
        };

        let mut active = None;
        let mut profiles = BTreeMap::new();

        for (key, value) in mapping {
            let name = key
                .as_str()
                .ok_or_else(|| format!("top-level key {key:?} is not a string"))?
                .to_string();

            if name == ACTIVE_PROFILE_KEY {
                let pointer = value
                    .as_str()
                    .ok_or_else(|| format!("'{ACTIVE_PROFILE_KEY}' must be a string"))?;
                active = Some(pointer.to_string());
                continue;
            }

            validate_profile_name(&name).map_err(|e| e.to_string())?;
            let profile = profile_from_mapping(&name, value)?;
            if profiles
                .keys()
                .any(|existing: &String| existing.eq_ignore_ascii_case(&name))
            {
                return Err(format!("profile '{name}' is defined more than once"));
            }
            profiles.insert(name, profile);
        }

        let active = active.ok_or_else(|| format!("'{ACTIVE_PROFILE_KEY}' is missing"))?;
        let active = profiles
            .keys()
            .find(|stored| stored.eq_ignore_ascii_case(&active))
            .cloned()
            .ok_or_else(|| format!("active profile '{active}' does not exist"))?;

        Ok(Self { active, profiles })
    }

    /// Serialise into the persisted document layout.
    pub fn to_document(&self) -> YamlValue {
        let mut root = Mapping::new();
        root.insert(
            YamlValue::String(ACTIVE_PROFILE_KEY.to_string()),
            YamlValue::String(self.active.clone()),
        );

        for (name, profile) in &self.profiles {
            let mut body = Mapping::new();
            body.insert(
                YamlValue::String(DESCRIPTION_KEY.to_string()),
                YamlValue::String(profile.description().to_string()),
            );
            for (key, value) in profile.entries() {
                let segments: Vec<&str> = key.split('.').collect();
                insert_nested(&mut body, &segments, value.clone());
            }
            root.insert(YamlValue::String(name.clone()), YamlValue::Mapping(body));
        }

        YamlValue::Mapping(root)
    }
}

fn profile_from_mapping(name: &str, value: YamlValue) -> Result<Profile, String> {
    let body = match value {
        YamlValue::Mapping(body) => body,
        YamlValue::Null => Mapping::new(),
        _ => return Err(format!("profile '{name}' must be a mapping")),
    };

    let mut profile = Profile::new(name, "");
    for (key, value) in body {
        let segment = key
            .as_str()
            .ok_or_else(|| format!("profile '{name}' has a non-string key {key:?}"))?
            .to_string();

        if segment == DESCRIPTION_KEY {
            if let Some(description) = value.as_str() {
                profile.set_description(description);
                continue;
            }
        }
        flatten_into(&mut profile, segment, value);
    }
    Ok(profile)
}

fn flatten_into(profile: &mut Profile, path: String, value: YamlValue) {
    match value {
        YamlValue::Mapping(children) => {
            for (key, child) in children {
                match key.as_str() {
                    Some(segment) => flatten_into(profile, format!("{path}.{segment}"), child),
                    None => warn!("Skipping non-string key under '{}' in profile {}", path, profile.name()),
                }
            }
        }
        leaf => profile.insert_persisted(&path, leaf),
    }
}

fn insert_nested(mapping: &mut Mapping, segments: &[&str], value: YamlValue) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };
    let key = YamlValue::String((*first).to_string());

    if rest.is_empty() {
        mapping.insert(key, value);
        return;
    }

    if !matches!(mapping.get(&key), Some(YamlValue::Mapping(_))) {
        mapping.insert(key.clone(), YamlValue::Mapping(Mapping::new()));
    }
    if let Some(YamlValue::Mapping(child)) = mapping.get_mut(&key) {
        insert_nested(child, rest, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::value::TypedValue;

    const DOCUMENT: &str = r#"activeProfile: default
default:
    description: "default description"
    pingctl:
        color: true
        outputFormat: text
    export:
        pingone:
            region: EU
            worker:
                environmentid: 8c7c8c9e-2e1a-4e0f-b8f4-6d1b1e5c2a10
production:
    description: "test profile description"
    export:
        pingfederate:
            insecureTrustAllTLS: false
"#;

    fn parse(content: &str) -> Result<ProfileStore, String> {
        let document: YamlValue = serde_yaml::from_str(content).unwrap();
        ProfileStore::from_document(document)
    }

    #[test]
    fn test_bootstrap_has_active_default() {
        let store = ProfileStore::bootstrap();
        assert_eq!(store.active_name(), "default");
        assert_eq!(store.names(), vec!["default"]);
        assert_eq!(store.active_profile().description(), DEFAULT_PROFILE_DESCRIPTION);
    }

    #[test]
    fn test_from_document_flattens_nested_keys() {
        let store = parse(DOCUMENT).unwrap();
        assert_eq!(store.active_name(), "default");
        assert_eq!(store.names(), vec!["default", "production"]);

        let default = store.active_profile();
        assert_eq!(default.description(), "default description");
        assert_eq!(default.get_raw("export.pingone.region"), Some("EU".to_string()));
        assert_eq!(default.get_raw("pingctl.color"), Some("true".to_string()));
        assert!(default.contains_key("export.pingone.worker.environmentID"));
    }

    #[test]
    fn test_document_round_trip() {
        let store = parse(DOCUMENT).unwrap();
        let rendered = serde_yaml::to_string(&store.to_document()).unwrap();
        assert_eq!(parse(&rendered).unwrap(), store);
    }

    #[test]
    fn test_to_document_nests_dot_paths() {
        let mut store = ProfileStore::bootstrap();
        store
            .active_profile_mut()
            .set("export.overwrite", &TypedValue::Bool(true));

        let document = store.to_document();
        assert_eq!(document["activeProfile"], YamlValue::String("default".into()));
        assert_eq!(document["default"]["export"]["overwrite"], YamlValue::Bool(true));
    }

    #[test]
    fn test_from_document_rejects_dangling_active() {
        let err = parse("activeProfile: missing\ndefault:\n    description: x\n").unwrap_err();
        assert!(err.contains("missing"));
        assert!(parse("default:\n    description: x\n").is_err());
        assert!(parse("").is_err());
        assert!(parse("activeProfile: bad name\nbad name: {}\n").is_err());
    }

    #[test]
    fn test_insert_rejects_case_insensitive_duplicate() {
        let mut store = ProfileStore::bootstrap();
        let err = store.insert(Profile::new("DEFAULT", "")).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::AlreadyExists);
    }

    #[test]
    fn test_remove_active_conflicts() {
        let mut store = ProfileStore::bootstrap();
        store.insert(Profile::new("production", "")).unwrap();

        let err = store.remove("default").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::ActiveProfileConflict);

        assert!(store.remove("production").is_ok());
        assert_eq!(
            store.remove("production").unwrap_err().category(),
            ErrorCategory::NotFound
        );
    }

    #[test]
    fn test_set_active_uses_stored_name() {
        let mut store = ProfileStore::bootstrap();
        store.insert(Profile::new("Production", "")).unwrap();
        store.set_active("production").unwrap();
        assert_eq!(store.active_name(), "Production");
        assert!(store.set_active("nope").is_err());
    }
}
