//! Registry options exposed as global command-line flags.

use clap::parser::ValueSource as ClapValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};

use pingctl_config::{FlagSource, OptionRegistry, ValueKind};

const HELP_HEADING: &str = "Configuration Options";

/// Add one global flag per registered option.
///
/// No flag carries a clap default, so a value is present only when the user
/// typed it. Boolean flags accept a bare `--flag` (true) or `--flag=false`.
pub fn with_registry_flags(command: Command, registry: &OptionRegistry) -> Command {
    registry.options().fold(command, |command, option| {
        let mut arg = Arg::new(option.flag)
            .long(option.flag)
            .help(option.usage.clone())
            .value_name(value_name(option.kind))
            .action(ArgAction::Set)
            .global(true)
            .help_heading(HELP_HEADING);

        if let Some(short) = option.shorthand {
            arg = arg.short(short);
        }
        if option.kind == ValueKind::Bool {
            arg = arg
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true");
        }

        command.arg(arg)
    })
}

fn value_name(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Bool => "BOOL",
        ValueKind::String => "VALUE",
        ValueKind::StringList => "LIST",
        ValueKind::Uuid => "UUID",
        ValueKind::Region => "REGION",
        ValueKind::OutputFormat => "FORMAT",
        ValueKind::Services => "SERVICES",
    }
}

/// Parsed arguments viewed as a [`FlagSource`].
///
/// Global flags may be given at any subcommand level; the deepest explicit
/// occurrence wins.
pub struct MatchedFlags<'a> {
    matches: &'a ArgMatches,
}

impl<'a> MatchedFlags<'a> {
    pub fn new(matches: &'a ArgMatches) -> Self {
        Self { matches }
    }
}

impl FlagSource for MatchedFlags<'_> {
    fn explicit_value(&self, flag: &str) -> Option<String> {
        let mut current = Some(self.matches);
        let mut found = None;

        while let Some(matches) = current {
            if matches.value_source(flag) == Some(ClapValueSource::CommandLine) {
                if let Ok(Some(value)) = matches.try_get_one::<String>(flag) {
                    found = Some(value.clone());
                }
            }
            current = matches.subcommand().map(|(_, sub)| sub);
        }

        found
    }
}
