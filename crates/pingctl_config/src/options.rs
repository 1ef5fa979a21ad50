//! Option descriptors and the registry that catalogs them.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::sources::{ExplicitFlags, FlagSource};
use crate::value::{TypedValue, ValueKind};

/// Static description of one setting.
#[derive(Debug, Clone)]
pub struct ConfigOption {
    /// Dot-path logical key, e.g. `export.pingone.region`.
    pub key: &'static str,
    /// Long flag name, without dashes.
    pub flag: &'static str,
    pub shorthand: Option<char>,
    pub env_var: &'static str,
    pub kind: ValueKind,
    pub default: TypedValue,
    pub usage: String,
    /// Values are masked in listings and never logged.
    pub sensitive: bool,
}

impl ConfigOption {
    /// A new option whose default is the kind's zero value.
    pub fn new(
        key: &'static str,
        flag: &'static str,
        env_var: &'static str,
        kind: ValueKind,
    ) -> Self {
        Self {
            key,
            flag,
            shorthand: None,
            env_var,
            kind,
            default: kind.zero(),
            usage: String::new(),
            sensitive: false,
        }
    }

    pub fn shorthand(mut self, short: char) -> Self {
        self.shorthand = Some(short);
        self
    }

    pub fn default_value(mut self, value: TypedValue) -> Self {
        self.default = value;
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

/// The catalog of every setting the tool understands.
///
/// Populated once at startup and read-only afterward. Keys are compared
/// case-insensitively.
#[derive(Default)]
pub struct OptionRegistry {
    options: Vec<ConfigOption>,
    by_key: HashMap<String, usize>,
    by_flag: HashMap<&'static str, usize>,
}

impl OptionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an option.
    ///
    /// Fails if the key or flag is already taken, or if the default does not
    /// match the declared kind. Callers treat any failure here as fatal.
    pub fn register(&mut self, option: ConfigOption) -> ConfigResult<()> {
        let normalized = option.key.to_ascii_lowercase();
        if self.by_key.contains_key(&normalized) {
            return Err(ConfigError::DuplicateOption(option.key.to_string()));
        }
        if self.by_flag.contains_key(option.flag) {
            return Err(ConfigError::InvalidOption {
                key: option.key.to_string(),
                reason: format!("flag '--{}' is already bound to another option", option.flag),
            });
        }
        if option.default.kind() != option.kind {
            return Err(ConfigError::InvalidOption {
                key: option.key.to_string(),
                reason: format!(
                    "default is a {} but the option is declared as a {}",
                    option.default.kind(),
                    option.kind
                ),
            });
        }

        debug!("Registering option: {}", option.key);
        let index = self.options.len();
        self.by_key.insert(normalized, index);
        self.by_flag.insert(option.flag, index);
        self.options.push(option);
        Ok(())
    }

    /// Register several options, stopping at the first failure.
    pub fn register_all(
        &mut self,
        options: impl IntoIterator<Item = ConfigOption>,
    ) -> ConfigResult<()> {
        options.into_iter().try_for_each(|option| self.register(option))
    }

    /// Get an option by logical key.
    pub fn get(&self, key: &str) -> Option<&ConfigOption> {
        self.by_key
            .get(&key.to_ascii_lowercase())
            .map(|&index| &self.options[index])
    }

    /// Get an option by logical key, returning `UnknownKey` if it is not registered.
    pub fn get_required(&self, key: &str) -> ConfigResult<&ConfigOption> {
        self.get(key).ok_or_else(|| ConfigError::UnknownKey {
            key: key.to_string(),
            valid_keys: self.all_keys().into_iter().map(str::to_string).collect(),
        })
    }

    /// Get an option by its long flag name.
    pub fn by_flag(&self, flag: &str) -> Option<&ConfigOption> {
        self.by_flag.get(flag).map(|&index| &self.options[index])
    }

    /// The value kind registered for `key`.
    pub fn kind_of(&self, key: &str) -> Option<ValueKind> {
        self.get(key).map(|option| option.kind)
    }

    /// All logical keys, sorted.
    pub fn all_keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<_> = self.options.iter().map(|option| option.key).collect();
        keys.sort_unstable();
        keys
    }

    /// Options in registration order.
    pub fn options(&self) -> impl Iterator<Item = &ConfigOption> {
        self.options.iter()
    }

    /// Collect the flags that were set explicitly on this invocation.
    pub fn bind(&self, source: &dyn FlagSource) -> ExplicitFlags {
        let mut flags = ExplicitFlags::new();
        for option in &self.options {
            if let Some(raw) = source.explicit_value(option.flag) {
                debug!("Flag --{} set explicitly for {}", option.flag, option.key);
                flags.insert(option.key, raw);
            }
        }
        flags
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl std::fmt::Debug for OptionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionRegistry")
            .field("options", &self.all_keys())
            .finish()
    }
}
