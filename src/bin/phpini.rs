//! Command-line interface for phpini
//! Loads a php.ini file, applies edits given on the command line, and writes the result.
//!
//! Usage:
//!   phpini `<path>` [--set KEY=VALUE]... [--unset KEY]... [--enable NAME]... [--disable NAME]...
//!                   [--get KEY [--default VALUE]] [--list-extensions] [--changes]
//!                   [--output `<path>` | --in-place] [--format text|json] [--config `<toml>`]
//!
//! Formatting configuration is layered: built-in defaults, then the per-user file
//! (`$XDG_CONFIG_HOME/phpini/config.toml` or the platform equivalent) if present, then
//! `--config`.
//!
//! Edits are applied in the order set, unset, enable, disable. Without `--output`,
//! `--in-place` or a query flag, the edited document is printed to stdout.

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use std::io::{self, Write};

use phpini::config::{user_config_path, Loader};
use phpini::ini::{ChangeKind, Document};

fn main() {
    // Logs go to stderr so stdout stays usable for the rendered document.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let matches = command().get_matches();
    if let Err(err) = run(&matches) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn command() -> Command {
    Command::new("phpini")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Edit php.ini files while preserving comments and layout")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the ini file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("set")
                .long("set")
                .value_name("KEY=VALUE")
                .help("Set a setting, uncommenting or appending it when needed")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("unset")
                .long("unset")
                .value_name("KEY")
                .help("Comment out a setting")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("enable")
                .long("enable")
                .value_name("NAME")
                .help("Enable an extension")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("disable")
                .long("disable")
                .value_name("NAME")
                .help("Disable an extension")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("get")
                .long("get")
                .value_name("KEY")
                .help("Print the value of a setting"),
        )
        .arg(
            Arg::new("default")
                .long("default")
                .value_name("VALUE")
                .help("Value printed by --get when the setting is not active")
                .requires("get"),
        )
        .arg(
            Arg::new("list-extensions")
                .long("list-extensions")
                .help("Print the enabled extensions")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("changes")
                .long("changes")
                .help("Print the lines that differ from the source")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("PATH")
                .help("Write the result to this file"),
        )
        .arg(
            Arg::new("in-place")
                .long("in-place")
                .short('i')
                .help("Write the result back to the source file")
                .conflicts_with("output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format for queries")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("TOML")
                .help("Formatting configuration layered over the defaults"),
        )
}

fn run(matches: &ArgMatches) -> Result<()> {
    let path = matches
        .get_one::<String>("path")
        .context("missing ini file path")?;
    let json = matches.get_one::<String>("format").map(String::as_str) == Some("json");

    let mut loader = Loader::new();
    if let Some(user_config) = user_config_path() {
        loader = loader.with_optional_file(user_config);
    }
    if let Some(config) = matches.get_one::<String>("config") {
        loader = loader.with_file(config);
    }
    let config = loader.build().context("failed to load configuration")?;

    let mut doc = Document::load_with(path, config.format)
        .with_context(|| format!("failed to load {}", path))?;
    apply_edits(&mut doc, matches)?;

    let mut queried = false;
    if let Some(key) = matches.get_one::<String>("get") {
        queried = true;
        let default = matches
            .get_one::<String>("default")
            .map(String::as_str)
            .unwrap_or("");
        let value = doc.get(key, default);
        if json {
            println!("{}", serde_json::json!({ "key": key, "value": value }));
        } else {
            println!("{}", value);
        }
    }
    if matches.get_flag("list-extensions") {
        queried = true;
        let names: Vec<&str> = doc.enabled_extensions().collect();
        if json {
            println!("{}", serde_json::to_string_pretty(&names)?);
        } else {
            for name in names {
                println!("{}", name);
            }
        }
    }
    if matches.get_flag("changes") {
        queried = true;
        print_changes(&doc, json)?;
    }

    if let Some(output) = matches.get_one::<String>("output") {
        doc.save_to(output)
            .with_context(|| format!("failed to save {}", output))?;
        info!(output = %output, "wrote result");
    } else if matches.get_flag("in-place") {
        if !doc.is_modified() {
            warn!(path = %path, "no changes to write");
        }
        doc.save().with_context(|| format!("failed to save {}", path))?;
    } else if !queried {
        io::stdout()
            .write_all(&doc.to_bytes())
            .context("failed to write to stdout")?;
    }
    Ok(())
}

fn apply_edits(doc: &mut Document, matches: &ArgMatches) -> Result<()> {
    for assignment in values(matches, "set") {
        let Some((key, value)) = assignment.split_once('=') else {
            bail!("--set expects KEY=VALUE, got '{}'", assignment);
        };
        doc.set(key.trim(), value.trim())
            .with_context(|| format!("cannot apply --set {}", assignment))?;
    }
    for key in values(matches, "unset") {
        doc.unset(key);
    }
    for name in values(matches, "enable") {
        doc.enable_extension(name)
            .with_context(|| format!("cannot enable extension {:?}", name))?;
    }
    for name in values(matches, "disable") {
        doc.disable_extension(name);
    }
    Ok(())
}

fn values<'a>(matches: &'a ArgMatches, id: &str) -> impl Iterator<Item = &'a str> {
    matches
        .get_many::<String>(id)
        .into_iter()
        .flatten()
        .map(String::as_str)
}

fn print_changes(doc: &Document, json: bool) -> Result<()> {
    let changes = doc.changes();
    if json {
        println!("{}", serde_json::to_string_pretty(&changes)?);
        return Ok(());
    }
    for change in changes {
        let marker = match change.kind {
            ChangeKind::Added => '+',
            ChangeKind::Modified => '~',
        };
        println!("{} {:>4}: {}", marker, change.line, change.after);
    }
    Ok(())
}
