//! Profile command - Manage configuration profiles.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::json;

use pingctl_config::profile::leaf_to_raw;
use pingctl_config::{mask_if, ConfigContext, OptionRegistry, Profile};

use crate::output::Printer;

#[derive(Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    command: ProfileCommands,
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Create a new, empty profile
    Create(CreateArgs),

    /// Delete a profile that is not active
    Delete(NameArgs),

    /// List all profiles
    List,

    /// Make a profile the active profile
    #[command(name = "set-active")]
    SetActive(NameArgs),

    /// Show a profile's description and stored values
    View(ViewArgs),
}

#[derive(Args)]
struct CreateArgs {
    /// Profile name (letters, digits, underscores and dashes)
    name: String,

    /// Free-text description of the profile
    #[arg(long, default_value = "")]
    description: String,

    /// Make the new profile active
    #[arg(long)]
    set_active: bool,
}

#[derive(Args)]
struct NameArgs {
    /// Profile name
    name: String,
}

#[derive(Args)]
struct ViewArgs {
    /// Profile name [default: the active profile]
    name: Option<String>,
}

pub fn execute(args: ProfileArgs, context: &mut ConfigContext, printer: &Printer) -> Result<()> {
    match args.command {
        ProfileCommands::Create(args) => create(args, context, printer),
        ProfileCommands::Delete(args) => {
            context
                .profiles()
                .delete(&args.name)
                .with_context(|| format!("Failed to delete profile '{}'", args.name))?;
            let text = format!("Profile '{}' deleted", args.name);
            printer.emit(&json!({ "deleted": args.name }), &text)
        }
        ProfileCommands::List => list(context, printer),
        ProfileCommands::SetActive(args) => {
            context
                .profiles()
                .set_active(&args.name)
                .with_context(|| format!("Failed to set active profile '{}'", args.name))?;
            let active = context.store().active_name();
            let text = format!("Active profile is now '{}'", active);
            printer.emit(&json!({ "active": active }), &text)
        }
        ProfileCommands::View(args) => {
            let profile = match args.name.as_deref() {
                Some(name) => context.profile(name)?,
                None => context.store().active_profile(),
            };
            print_profile(context.registry(), profile, printer)
        }
    }
}

fn create(args: CreateArgs, context: &mut ConfigContext, printer: &Printer) -> Result<()> {
    let mut profiles = context.profiles();
    let result = if args.set_active {
        profiles.create_and_activate(&args.name, &args.description)
    } else {
        profiles.create(&args.name, &args.description)
    };
    result.with_context(|| format!("Failed to create profile '{}'", args.name))?;

    let mut text = format!("Profile '{}' created", args.name);
    if args.set_active {
        text.push_str(" and set active");
    }
    printer.emit(
        &json!({ "created": args.name, "active": context.store().active_name() }),
        &text,
    )
}

fn list(context: &mut ConfigContext, printer: &Printer) -> Result<()> {
    let names = context.profiles().list();
    let active = context.store().active_name();

    let text = names
        .iter()
        .map(|name| {
            let marker = if name == active { "*" } else { " " };
            format!("{} {}", marker, name)
        })
        .collect::<Vec<_>>()
        .join("\n");

    printer.emit(&json!({ "active": active, "profiles": names }), &text)
}

/// Print a profile's stored values, masking secrets.
pub(crate) fn print_profile(
    registry: &OptionRegistry,
    profile: &Profile,
    printer: &Printer,
) -> Result<()> {
    let values: BTreeMap<&str, String> = profile
        .entries()
        .map(|(key, value)| {
            let sensitive = registry.get(key).map_or(false, |option| option.sensitive);
            let raw = leaf_to_raw(value).unwrap_or_default();
            (key, mask_if(sensitive, raw))
        })
        .collect();

    let mut lines = vec![
        format!("Profile: {}", profile.name()),
        format!("Description: {}", profile.description()),
    ];
    lines.extend(values.iter().map(|(key, value)| format!("{}={}", key, value)));

    printer.emit(
        &json!({
            "name": profile.name(),
            "description": profile.description(),
            "values": values,
        }),
        &lines.join("\n"),
    )
}
