//! # pingctl_config
//!
//! Multi-profile configuration engine for pingctl.
//!
//! Decides, for every setting pingctl understands, which value to use and
//! where it came from, and persists named profiles across invocations.
//!
//! ## Components
//!
//! - **Typed values**: closed set of value kinds with parse and render
//! - **Option registry**: static catalog of settings, built once at startup
//! - **Profile store**: YAML document of named profiles plus the active pointer
//! - **Resolver**: flag, then environment variable, then profile, then default
//! - **Profile manager**: create, delete, switch and set/unset with commit
//!
//! ## Example
//!
//! ```rust,no_run
//! use pingctl_config::{
//!     keys, standard_registry, ConfigContext, Environment, ExplicitFlags, StartupDefaults,
//! };
//!
//! let registry = standard_registry(&StartupDefaults::new("./export")).unwrap();
//! let env = Environment::capture(&registry);
//! let mut context =
//!     ConfigContext::load(registry, ExplicitFlags::new(), env, "config.yaml").unwrap();
//!
//! context.profiles().create("production", "Production tenant").unwrap();
//! context.profiles().set_active("production").unwrap();
//! context.profiles().set_value(keys::PINGONE_REGION, "EU").unwrap();
//!
//! let region = context.resolve(keys::PINGONE_REGION).unwrap();
//! println!("{} = {} ({})", region.key, region.value, region.source);
//! ```

pub mod catalog;
pub mod context;
pub mod error;
pub mod lifecycle;
pub mod options;
pub mod profile;
pub mod reader;
pub mod resolver;
pub mod sources;
pub mod store;
pub mod value;
pub mod writer;

pub use catalog::{keys, standard_registry, StartupDefaults};
pub use context::ConfigContext;
pub use error::{ConfigError, ConfigResult, ErrorCategory, ParseError};
pub use lifecycle::ProfileManager;
pub use options::{ConfigOption, OptionRegistry};
pub use profile::{validate_profile_name, Profile, DEFAULT_PROFILE_NAME};
pub use reader::StoreReader;
pub use resolver::{mask_if, Resolved, Resolver, MASK};
pub use sources::{Environment, ExplicitFlags, FlagSource, ValueSource};
pub use store::ProfileStore;
pub use value::{OutputFormat, PingOneRegion, Service, TypedValue, ValueKind};
pub use writer::StoreWriter;
