//! Value resolution across flags, environment, profile and defaults.

use serde::Serialize;
use serde_yaml::Value as YamlValue;
use tracing::debug;

use crate::error::ConfigResult;
use crate::options::{ConfigOption, OptionRegistry};
use crate::profile::{leaf_to_raw, Profile};
use crate::sources::{Environment, ExplicitFlags, ValueSource};
use crate::value::TypedValue;

/// Placeholder shown instead of sensitive values.
pub const MASK: &str = "********";

/// A resolved setting and the layer that supplied it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolved {
    /// Canonical logical key as registered.
    pub key: &'static str,
    pub value: TypedValue,
    pub source: ValueSource,
    #[serde(skip)]
    pub sensitive: bool,
}

impl Resolved {
    /// The rendered value, masked when the option is sensitive and non-empty.
    pub fn display_value(&self) -> String {
        mask_if(self.sensitive, self.value.render())
    }
}

/// Replace a non-empty rendered value with [`MASK`] when `sensitive`.
pub fn mask_if(sensitive: bool, rendered: String) -> String {
    if sensitive && !rendered.is_empty() {
        MASK.to_string()
    } else {
        rendered
    }
}

/// Read-only view over every layer consulted by resolution.
///
/// Precedence is flag, then environment variable, then the profile's stored
/// value, then the registered default.
pub struct Resolver<'a> {
    registry: &'a OptionRegistry,
    flags: &'a ExplicitFlags,
    env: &'a Environment,
    profile: &'a Profile,
}

impl<'a> Resolver<'a> {
    pub fn new(
        registry: &'a OptionRegistry,
        flags: &'a ExplicitFlags,
        env: &'a Environment,
        profile: &'a Profile,
    ) -> Self {
        Self {
            registry,
            flags,
            env,
            profile,
        }
    }

    /// Resolve one setting.
    pub fn resolve(&self, key: &str) -> ConfigResult<Resolved> {
        let option = self.registry.get_required(key)?;
        let (value, source) = self.lookup(option)?;

        debug!(
            "Resolved {} from {}: {}",
            option.key,
            source,
            mask_if(option.sensitive, value.render())
        );

        Ok(Resolved {
            key: option.key,
            value,
            source,
            sensitive: option.sensitive,
        })
    }

    fn lookup(&self, option: &ConfigOption) -> ConfigResult<(TypedValue, ValueSource)> {
        let parse = |raw: &str, source: ValueSource| {
            option
                .kind
                .parse(raw)
                .map(|value| (value, source))
                .map_err(|e| e.at(option.key, source))
        };

        if let Some(raw) = self.flags.get(option.key) {
            return parse(raw, ValueSource::Flag);
        }
        if let Some(raw) = self.env.get(option.env_var) {
            return parse(raw, ValueSource::Env);
        }
        match self.profile.get(option.key) {
            // `key:` with no value stores null, read as the kind's empty value.
            Some(YamlValue::Null) => return Ok((option.kind.zero(), ValueSource::Profile)),
            Some(stored) => {
                if let Some(raw) = leaf_to_raw(stored) {
                    return parse(&raw, ValueSource::Profile);
                }
            }
            None => {}
        }
        Ok((option.default.clone(), ValueSource::Default))
    }

    /// Resolve every registered setting, in key order.
    pub fn resolve_all(&self) -> ConfigResult<Vec<Resolved>> {
        self.registry
            .all_keys()
            .into_iter()
            .map(|key| self.resolve(key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::catalog::{keys, standard_registry, StartupDefaults};
    use crate::error::{ConfigError, ErrorCategory};
    use crate::value::PingOneRegion;

    fn registry() -> OptionRegistry {
        standard_registry(&StartupDefaults::new("/work/export")).unwrap()
    }

    fn flags(registry: &OptionRegistry, pairs: &[(&str, &str)]) -> ExplicitFlags {
        let given: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        registry.bind(&given)
    }

    #[test]
    fn test_precedence_ladder() {
        let registry = registry();
        let mut profile = Profile::new("default", "");
        profile.set(keys::PINGONE_REGION, &TypedValue::Region(Some(PingOneRegion::Canada)));

        let flag = flags(&registry, &[("pingone-region", "AP")]);
        let env = Environment::from_vars([("PINGCTL_PINGONE_REGION", "EU")]);
        let none = ExplicitFlags::new();
        let no_env = Environment::empty();

        let resolved = Resolver::new(&registry, &flag, &env, &profile)
            .resolve(keys::PINGONE_REGION)
            .unwrap();
        assert_eq!(resolved.value.as_region(), Some(PingOneRegion::AsiaPacific));
        assert_eq!(resolved.source, ValueSource::Flag);

        let resolved = Resolver::new(&registry, &none, &env, &profile)
            .resolve(keys::PINGONE_REGION)
            .unwrap();
        assert_eq!(resolved.value.as_region(), Some(PingOneRegion::Europe));
        assert_eq!(resolved.source, ValueSource::Env);

        let resolved = Resolver::new(&registry, &none, &no_env, &profile)
            .resolve(keys::PINGONE_REGION)
            .unwrap();
        assert_eq!(resolved.value.as_region(), Some(PingOneRegion::Canada));
        assert_eq!(resolved.source, ValueSource::Profile);

        let empty = Profile::new("default", "");
        let resolved = Resolver::new(&registry, &none, &no_env, &empty)
            .resolve(keys::PINGONE_REGION)
            .unwrap();
        assert_eq!(resolved.value, TypedValue::Region(None));
        assert_eq!(resolved.source, ValueSource::Default);
    }

    #[test]
    fn test_bad_env_value_is_hard_error() {
        let registry = registry();
        let profile = Profile::new("default", "");
        let none = ExplicitFlags::new();
        let env = Environment::from_vars([("PINGCTL_EXPORT_OVERWRITE", "maybe")]);

        let err = Resolver::new(&registry, &none, &env, &profile)
            .resolve(keys::EXPORT_OVERWRITE)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { origin: ValueSource::Env, .. }
        ));
    }

    #[test]
    fn test_bad_flag_value_is_tagged_with_flag() {
        let registry = registry();
        let profile = Profile::new("default", "");
        let flag = flags(&registry, &[("overwrite", "maybe")]);
        let env = Environment::empty();

        let err = Resolver::new(&registry, &flag, &env, &profile)
            .resolve(keys::EXPORT_OVERWRITE)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { origin: ValueSource::Flag, ref value, .. } if value == "maybe"
        ));
        assert_eq!(err.category(), ErrorCategory::InvalidValue);
    }

    #[test]
    fn test_null_profile_value_reads_as_zero() {
        let registry = registry();
        let mut profile = Profile::new("default", "");
        profile.insert_persisted(keys::EXPORT_OVERWRITE, YamlValue::Null);
        profile.insert_persisted(keys::PINGONE_REGION, YamlValue::Null);
        let none = ExplicitFlags::new();
        let env = Environment::empty();
        let resolver = Resolver::new(&registry, &none, &env, &profile);

        let resolved = resolver.resolve(keys::EXPORT_OVERWRITE).unwrap();
        assert_eq!(resolved.value, TypedValue::Bool(false));
        assert_eq!(resolved.source, ValueSource::Profile);

        let resolved = resolver.resolve(keys::PINGONE_REGION).unwrap();
        assert_eq!(resolved.value, TypedValue::Region(None));
    }

    #[test]
    fn test_bad_profile_value_is_tagged_with_profile() {
        let registry = registry();
        let mut profile = Profile::new("default", "");
        profile.set(
            keys::PINGONE_WORKER_ENVIRONMENT_ID,
            &TypedValue::String("not-a-uuid".to_string()),
        );
        let none = ExplicitFlags::new();
        let env = Environment::empty();

        let err = Resolver::new(&registry, &none, &env, &profile)
            .resolve(keys::PINGONE_WORKER_ENVIRONMENT_ID)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidFormat { origin: ValueSource::Profile, .. }
        ));
    }

    #[test]
    fn test_unknown_key() {
        let registry = registry();
        let profile = Profile::new("default", "");
        let none = ExplicitFlags::new();
        let env = Environment::empty();

        let err = Resolver::new(&registry, &none, &env, &profile)
            .resolve("export.pingone.nope")
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::UnknownKey);
    }

    #[test]
    fn test_resolve_uses_canonical_key_and_masks_secrets() {
        let registry = registry();
        let mut profile = Profile::new("default", "");
        profile.set(
            keys::PINGFEDERATE_PASSWORD,
            &TypedValue::String("hunter2".to_string()),
        );
        let none = ExplicitFlags::new();
        let env = Environment::empty();
        let resolver = Resolver::new(&registry, &none, &env, &profile);

        let resolved = resolver
            .resolve("EXPORT.PINGFEDERATE.BASICAUTH.PASSWORD")
            .unwrap();
        assert_eq!(resolved.key, keys::PINGFEDERATE_PASSWORD);
        assert_eq!(resolved.value.as_str(), Some("hunter2"));
        assert_eq!(resolved.display_value(), MASK);

        let all = resolver.resolve_all().unwrap();
        assert_eq!(all.len(), registry.len());
    }
}
