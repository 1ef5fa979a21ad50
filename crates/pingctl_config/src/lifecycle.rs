//! Profile lifecycle and profile-key mutations.
//!
//! Every successful mutation is committed to the persisted store before it
//! returns. A failed commit fails the operation even though the in-memory
//! store has already changed.

use std::path::Path;

use tracing::info;

use crate::error::ConfigResult;
use crate::options::OptionRegistry;
use crate::profile::{validate_profile_name, Profile};
use crate::sources::ValueSource;
use crate::store::ProfileStore;
use crate::value::TypedValue;
use crate::writer::StoreWriter;

/// Mutating operations over a [`ProfileStore`].
pub struct ProfileManager<'a> {
    registry: &'a OptionRegistry,
    store: &'a mut ProfileStore,
    path: &'a Path,
}

impl<'a> ProfileManager<'a> {
    pub fn new(registry: &'a OptionRegistry, store: &'a mut ProfileStore, path: &'a Path) -> Self {
        Self {
            registry,
            store,
            path,
        }
    }

    /// Create an empty, inactive profile.
    pub fn create(&mut self, name: &str, description: &str) -> ConfigResult<()> {
        self.insert_new(name, description)?;
        self.commit()?;
        info!("Created profile {}", name);
        Ok(())
    }

    /// Create a profile and make it active with a single commit.
    pub fn create_and_activate(&mut self, name: &str, description: &str) -> ConfigResult<()> {
        self.insert_new(name, description)?;
        self.store.set_active(name)?;
        self.commit()?;
        info!("Created profile {} and set it active", name);
        Ok(())
    }

    fn insert_new(&mut self, name: &str, description: &str) -> ConfigResult<()> {
        validate_profile_name(name)?;
        self.store.insert(Profile::new(name, description))
    }

    /// Delete a profile that is not active.
    pub fn delete(&mut self, name: &str) -> ConfigResult<()> {
        let removed = self.store.remove(name)?;
        self.commit()?;
        info!("Deleted profile {}", removed.name());
        Ok(())
    }

    /// Make an existing profile active.
    pub fn set_active(&mut self, name: &str) -> ConfigResult<()> {
        self.store.set_active(name)?;
        self.commit()?;
        info!("Active profile is now {}", self.store.active_name());
        Ok(())
    }

    /// Profile names, sorted.
    pub fn list(&self) -> Vec<String> {
        self.store.names().into_iter().map(str::to_string).collect()
    }

    /// Parse `raw` for `key` and store its canonical form in the active profile.
    pub fn set_value(&mut self, key: &str, raw: &str) -> ConfigResult<TypedValue> {
        let option = self.registry.get_required(key)?;
        let value = option
            .kind
            .parse(raw)
            .map_err(|e| e.at(option.key, ValueSource::Argument))?;

        self.store.active_profile_mut().set(option.key, &value);
        self.commit()?;
        info!(
            "Set {} in profile {}",
            option.key,
            self.store.active_name()
        );
        Ok(value)
    }

    /// Overwrite `key` in the active profile with its kind's zero value.
    ///
    /// The key stays in the profile, so later resolution finds the zero value
    /// rather than falling through to the default.
    pub fn unset_value(&mut self, key: &str) -> ConfigResult<TypedValue> {
        let option = self.registry.get_required(key)?;
        let zero = option.kind.zero();

        self.store.active_profile_mut().set(option.key, &zero);
        self.commit()?;
        info!(
            "Unset {} in profile {}",
            option.key,
            self.store.active_name()
        );
        Ok(zero)
    }

    /// Persist the store.
    pub fn commit(&self) -> ConfigResult<()> {
        StoreWriter::write(self.path, self.store)
    }
}
