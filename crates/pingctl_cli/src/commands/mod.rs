//! CLI command definitions.
//!
//! The derive structs below cover the command tree and the flags that control
//! the CLI itself. Every registered configuration option is added on top as a
//! global flag at startup, see [`crate::flags`].

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod config;
pub mod profile;

/// pingctl - export identity platform configuration as code
#[derive(Parser)]
#[command(name = "pingctl")]
#[command(version, about = "pingctl - export identity platform configuration as code")]
#[command(long_about = r#"
pingctl exports identity platform configuration into infrastructure-as-code.
Settings come from command-line flags, PINGCTL_* environment variables, the
active configuration profile, or built-in defaults, in that order.

COMMANDS:
  config get <key>                Show a resolved value and where it came from
  config set <key> <value>        Store a value in the active profile
  config unset <key>              Reset a value in the active profile
  config view                     Show the selected profile's stored values
  config list-keys                List every configuration key
  config profile ...              Create, delete, list, view and switch profiles

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Validation failure
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file [default: ~/.pingctl/config.yaml]
    #[arg(long, global = true, env = "PINGCTL_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Use this profile's values for this invocation without changing the active profile
    #[arg(short = 'P', long, global = true, env = "PINGCTL_PROFILE", value_name = "NAME")]
    pub profile: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage pingctl configuration and profiles
    Config(config::ConfigArgs),
}
