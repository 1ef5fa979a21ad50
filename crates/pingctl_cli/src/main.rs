//! pingctl CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error (including configuration file read/write failures)
//! - 2: Invalid arguments (unknown key, invalid profile name, profile not found)
//! - 3: Validation failure (bad value, active profile conflict, profile already exists)

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pingctl_config::{
    standard_registry, ConfigContext, ConfigError, Environment, ErrorCategory, StartupDefaults,
};

mod commands;
mod flags;
mod output;
mod paths;

use commands::{Cli, Commands};
use flags::{with_registry_flags, MatchedFlags};
use output::Printer;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

fn run() -> Result<()> {
    // Everything read from the process environment is read here, once.
    let defaults = StartupDefaults::from_current_dir()
        .context("Failed to determine the current working directory")?;
    let registry = standard_registry(&defaults).context("Failed to register configuration options")?;

    let matches = with_registry_flags(Cli::command(), &registry).get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    init_logging(cli.verbose, cli.quiet);

    let flags = registry.bind(&MatchedFlags::new(&matches));
    let env = Environment::capture(&registry);
    let store_path = match cli.config {
        Some(path) => path,
        None => paths::default_config_path()?,
    };
    debug!("Using configuration file {:?}", store_path);

    let profile_override = cli.profile.as_deref().filter(|name| !name.is_empty());
    let mut context = ConfigContext::load(registry, flags, env, store_path)?
        .with_profile_override(profile_override)?;
    let printer = Printer::from_context(&context);

    match cli.command {
        Commands::Config(args) => commands::config::execute(args, &mut context, &printer),
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    };

    let mut filter = EnvFilter::from_default_env();
    for directive in [format!("pingctl={level}"), "warn".to_string()] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    let category = e
        .chain()
        .find_map(|cause| cause.downcast_ref::<ConfigError>())
        .map(ConfigError::category);

    match category {
        Some(ErrorCategory::UnknownKey | ErrorCategory::InvalidName | ErrorCategory::NotFound) => {
            ExitCodes::INVALID_ARGS
        }
        Some(
            ErrorCategory::InvalidValue
            | ErrorCategory::ActiveProfileConflict
            | ErrorCategory::AlreadyExists,
        ) => ExitCodes::VALIDATION_FAILURE,
        _ => ExitCodes::GENERAL_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_config_errors() {
        let not_found = anyhow::Error::new(ConfigError::ProfileNotFound("ghost".to_string()));
        assert_eq!(categorize_error(&not_found), ExitCodes::INVALID_ARGS);

        let conflict = anyhow::Error::new(ConfigError::ActiveProfileConflict("default".to_string()))
            .context("Failed to delete profile");
        assert_eq!(categorize_error(&conflict), ExitCodes::VALIDATION_FAILURE);

        let other = anyhow::anyhow!("something else");
        assert_eq!(categorize_error(&other), ExitCodes::GENERAL_ERROR);
    }
}
