//! Raw value layers consulted during resolution.
//!
//! Everything the engine reads from the outside world (command-line flags and
//! process environment) is captured here once at startup. The rest of the crate
//! only sees these snapshots, so it can be exercised without a real process
//! environment.

use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;

use serde::Serialize;
use tracing::debug;

use crate::options::OptionRegistry;

/// The layer that supplied a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    /// An explicitly given command-line flag.
    Flag,
    /// A process environment variable.
    Env,
    /// The selected profile in the persisted store.
    Profile,
    /// The option's registered default.
    Default,
    /// A positional argument, e.g. the value in `config set <key> <value>`.
    Argument,
}

impl ValueSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flag => "flag",
            Self::Env => "environment variable",
            Self::Profile => "profile",
            Self::Default => "default",
            Self::Argument => "command argument",
        }
    }
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can report whether a flag was given explicitly on this invocation.
///
/// The CLI implements this over its parsed arguments; tests use a plain map.
pub trait FlagSource {
    /// The raw value of `flag` (long name, without dashes) if it was set explicitly.
    fn explicit_value(&self, flag: &str) -> Option<String>;
}

impl<S: BuildHasher> FlagSource for HashMap<String, String, S> {
    fn explicit_value(&self, flag: &str) -> Option<String> {
        self.get(flag).cloned()
    }
}

impl FlagSource for () {
    fn explicit_value(&self, _flag: &str) -> Option<String> {
        None
    }
}

/// Explicitly set flags, keyed by logical key.
///
/// Produced by [`OptionRegistry::bind`].
#[derive(Debug, Clone, Default)]
pub struct ExplicitFlags {
    values: HashMap<String, String>,
}

impl ExplicitFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: &str, raw: String) {
        self.values.insert(key.to_ascii_lowercase(), raw);
    }

    /// Raw value of the flag bound to `key`, if it was set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Snapshot of the environment variables the registry knows about.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// An empty environment.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read every registered option's variable from the process environment.
    ///
    /// This is the only place the engine touches `std::env`.
    pub fn capture(registry: &OptionRegistry) -> Self {
        let vars: HashMap<String, String> = registry
            .options()
            .filter_map(|option| {
                std::env::var(option.env_var)
                    .ok()
                    .map(|value| (option.env_var.to_string(), value))
            })
            .collect();

        debug!("Captured {} configuration environment variables", vars.len());
        Self { vars }
    }

    /// Build a snapshot from explicit pairs.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The value of `name`. A variable that is present but empty counts as unset.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}
