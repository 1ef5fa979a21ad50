//! Config command - Read and change configuration values.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use pingctl_config::{mask_if, ConfigContext, OptionRegistry, Resolved, TypedValue};

use super::profile::{self, ProfileArgs};
use crate::output::Printer;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the resolved value of a configuration key and its source
    Get(GetArgs),

    /// Store a value for a configuration key in the active profile
    Set(SetArgs),

    /// Reset a configuration key in the active profile to its empty value
    Unset(UnsetArgs),

    /// Show the values stored in the selected profile
    View(ViewArgs),

    /// List every configuration key with its type, flag and environment variable
    #[command(name = "list-keys")]
    ListKeys,

    /// Manage configuration profiles
    Profile(ProfileArgs),
}

#[derive(Args)]
struct GetArgs {
    /// Configuration key, e.g. export.pingone.region
    key: String,
}

#[derive(Args)]
struct SetArgs {
    /// Configuration key, e.g. export.pingone.region
    key: String,

    /// Value to store
    #[arg(allow_hyphen_values = true)]
    value: String,
}

#[derive(Args)]
struct UnsetArgs {
    /// Configuration key, e.g. export.pingone.region
    key: String,

    /// Ignored; only one key is unset per command
    #[arg(hide = true)]
    extra: Vec<String>,
}

#[derive(Args)]
struct ViewArgs {
    /// Show the resolved value of every key instead of the stored values
    #[arg(long)]
    resolved: bool,
}

pub fn execute(args: ConfigArgs, context: &mut ConfigContext, printer: &Printer) -> Result<()> {
    match args.command {
        ConfigCommands::Get(args) => get(args, context, printer),
        ConfigCommands::Set(args) => set(args, context, printer),
        ConfigCommands::Unset(args) => unset(args, context, printer),
        ConfigCommands::View(args) => view(args, context, printer),
        ConfigCommands::ListKeys => list_keys(context.registry(), printer),
        ConfigCommands::Profile(args) => profile::execute(args, context, printer),
    }
}

fn get(args: GetArgs, context: &ConfigContext, printer: &Printer) -> Result<()> {
    let resolved = context
        .resolve(&args.key)
        .with_context(|| format!("Failed to get '{}'", args.key))?;

    let text = format!("{}={} ({})", resolved.key, resolved.value, resolved.source);
    printer.emit(&resolved, &text)
}

fn set(args: SetArgs, context: &mut ConfigContext, printer: &Printer) -> Result<()> {
    let value = context
        .profiles()
        .set_value(&args.key, &args.value)
        .with_context(|| format!("Failed to set '{}'", args.key))?;

    report_change(context, printer, &args.key, &value, "set")
}

fn unset(args: UnsetArgs, context: &mut ConfigContext, printer: &Printer) -> Result<()> {
    if !args.extra.is_empty() {
        warn!(
            "'pingctl config unset' can only unset one key per command. Ignoring extra arguments: {}",
            args.extra.join(" ")
        );
    }

    let value = context
        .profiles()
        .unset_value(&args.key)
        .with_context(|| format!("Failed to unset '{}'", args.key))?;

    report_change(context, printer, &args.key, &value, "unset")
}

fn report_change(
    context: &ConfigContext,
    printer: &Printer,
    key: &str,
    value: &TypedValue,
    action: &str,
) -> Result<()> {
    let option = context.registry().get_required(key)?;
    let profile = context.store().active_name();
    let display = mask_if(option.sensitive, value.render());

    let text = format!(
        "Configuration key '{}' {} to '{}' in profile '{}'",
        option.key, action, display, profile
    );
    printer.emit(
        &json!({ "key": option.key, "value": display, "profile": profile }),
        &text,
    )
}

fn view(args: ViewArgs, context: &ConfigContext, printer: &Printer) -> Result<()> {
    if !args.resolved {
        let profile = context.selected_profile();
        return profile::print_profile(context.registry(), profile, printer);
    }

    let resolved = context
        .resolver()
        .resolve_all()
        .context("Failed to resolve configuration")?;

    #[derive(Serialize)]
    struct Row<'a> {
        key: &'a str,
        value: String,
        source: &'a str,
    }

    let rows: Vec<Row> = resolved
        .iter()
        .map(|r: &Resolved| Row {
            key: r.key,
            value: r.display_value(),
            source: r.source.as_str(),
        })
        .collect();

    let text = rows
        .iter()
        .map(|row| format!("{}={} ({})", row.key, row.value, row.source))
        .collect::<Vec<_>>()
        .join("\n");
    printer.emit(&rows, &text)
}

fn list_keys(registry: &OptionRegistry, printer: &Printer) -> Result<()> {
    #[derive(Serialize)]
    struct KeyInfo {
        key: &'static str,
        kind: &'static str,
        flag: String,
        env_var: &'static str,
        default: String,
    }

    let mut infos: Vec<KeyInfo> = registry
        .options()
        .map(|option| KeyInfo {
            key: option.key,
            kind: option.kind.as_str(),
            flag: format!("--{}", option.flag),
            env_var: option.env_var,
            default: mask_if(option.sensitive, option.default.render()),
        })
        .collect();
    infos.sort_by_key(|info| info.key);

    let width = infos.iter().map(|info| info.key.len()).max().unwrap_or(0);
    let text = infos
        .iter()
        .map(|info| {
            format!(
                "{:width$}  {} ({}, {})",
                info.key,
                info.kind,
                info.flag,
                info.env_var,
                width = width
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let by_key: BTreeMap<&str, &KeyInfo> = infos.iter().map(|info| (info.key, info)).collect();
    printer.emit(&by_key, &text)
}
