//! Configuration context built once per invocation.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::ConfigResult;
use crate::lifecycle::ProfileManager;
use crate::options::OptionRegistry;
use crate::profile::Profile;
use crate::reader::StoreReader;
use crate::resolver::{Resolved, Resolver};
use crate::sources::{Environment, ExplicitFlags};
use crate::store::ProfileStore;

/// Everything a command needs to read or change configuration.
///
/// Holds the registry, the captured flag and environment layers, and the
/// loaded store. Command handlers receive it explicitly; nothing is global.
#[derive(Debug)]
pub struct ConfigContext {
    registry: OptionRegistry,
    flags: ExplicitFlags,
    env: Environment,
    store: ProfileStore,
    store_path: PathBuf,
    profile_override: Option<String>,
}

impl ConfigContext {
    /// Load (or bootstrap) the store at `store_path` and assemble a context.
    pub fn load(
        registry: OptionRegistry,
        flags: ExplicitFlags,
        env: Environment,
        store_path: impl Into<PathBuf>,
    ) -> ConfigResult<Self> {
        let store_path = store_path.into();
        let store = StoreReader::load_or_bootstrap(&store_path)?;
        Ok(Self::new(registry, flags, env, store, store_path))
    }

    /// Assemble a context around an already loaded store.
    pub fn new(
        registry: OptionRegistry,
        flags: ExplicitFlags,
        env: Environment,
        store: ProfileStore,
        store_path: impl Into<PathBuf>,
    ) -> Self {
        let context = Self {
            registry,
            flags,
            env,
            store,
            store_path: store_path.into(),
            profile_override: None,
        };
        context.warn_unknown_keys();
        context
    }

    fn warn_unknown_keys(&self) {
        for name in self.store.names() {
            let Some(profile) = self.store.profile(name) else {
                continue;
            };
            for (key, _) in profile.entries() {
                if self.registry.get(key).is_none() {
                    warn!("Profile {} contains unrecognized key '{}'; it will be kept", name, key);
                }
            }
        }
    }

    /// Resolve against `name` instead of the active profile on this invocation.
    ///
    /// The persisted active pointer is not changed.
    pub fn with_profile_override(mut self, name: Option<&str>) -> ConfigResult<Self> {
        if let Some(name) = name {
            let profile = self.store.profile_required(name)?;
            debug!("Resolving against profile {} for this invocation", profile.name());
            self.profile_override = Some(profile.name().to_string());
        }
        Ok(self)
    }

    pub fn registry(&self) -> &OptionRegistry {
        &self.registry
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// The profile resolution reads from: the override if given, else the active one.
    pub fn selected_profile(&self) -> &Profile {
        self.profile_override
            .as_deref()
            .and_then(|name| self.store.profile(name))
            .unwrap_or_else(|| self.store.active_profile())
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.registry, &self.flags, &self.env, self.selected_profile())
    }

    pub fn resolve(&self, key: &str) -> ConfigResult<Resolved> {
        self.resolver().resolve(key)
    }

    /// A manager for mutating the store. Mutations target the persisted active profile.
    pub fn profiles(&mut self) -> ProfileManager<'_> {
        ProfileManager::new(&self.registry, &mut self.store, &self.store_path)
    }

    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> ConfigResult<&Profile> {
        self.store.profile_required(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{keys, standard_registry, StartupDefaults};
    use crate::error::{ConfigError, ErrorCategory};
    use crate::sources::ValueSource;

    fn context(dir: &Path) -> ConfigContext {
        let registry = standard_registry(&StartupDefaults::new("/work/export")).unwrap();
        ConfigContext::load(
            registry,
            ExplicitFlags::new(),
            Environment::empty(),
            dir.join("config.yaml"),
        )
        .unwrap()
    }

    #[test]
    fn test_load_bootstraps_missing_store() {
        let dir = tempfile::tempdir().unwrap();
        let context = context(dir.path());
        assert_eq!(context.store().active_name(), "default");
        assert!(context.store_path().exists());
    }

    #[test]
    fn test_profile_override_changes_resolution_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut context = context(dir.path());
        {
            let mut profiles = context.profiles();
            profiles.create("production", "").unwrap();
            profiles.set_active("production").unwrap();
            profiles.set_value(keys::EXPORT_OVERWRITE, "true").unwrap();
            profiles.set_active("default").unwrap();
        }

        let resolved = context.resolve(keys::EXPORT_OVERWRITE).unwrap();
        assert_eq!(resolved.source, ValueSource::Default);

        let context = context.with_profile_override(Some("PRODUCTION")).unwrap();
        assert_eq!(context.selected_profile().name(), "production");
        let resolved = context.resolve(keys::EXPORT_OVERWRITE).unwrap();
        assert_eq!(resolved.value.as_bool(), Some(true));
        assert_eq!(resolved.source, ValueSource::Profile);
        assert_eq!(context.store().active_name(), "default");
    }

    #[test]
    fn test_profile_override_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = context(dir.path())
            .with_profile_override(Some("ghost"))
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(matches!(err, ConfigError::ProfileNotFound(ref name) if name == "ghost"));
    }
}
