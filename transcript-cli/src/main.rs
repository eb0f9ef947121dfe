//! Command-line interface for transcript trees
//! This binary loads an execution log, rebuilds the nested event tree of one sample and
//! prints it in the requested format.
//!
//! Usage:
//!   transcript `<path>` [--format `<format>`] [--sample `<n>`]   - Print the tree of a sample
//!   transcript --list-formats                                 - List all output formats
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default `warn`).

mod error;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use error::CliError;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use transcript_config::{Loader, TranscriptConfig};
use transcript_tree::transcript::formats::json::{events_to_json_str, to_json_str};
use transcript_tree::transcript::formats::outline::{to_outline_str, OutlineOptions};
use transcript_tree::transcript::formats::treeviz::to_treeviz_str;
use transcript_tree::transcript::formats::OutputFormat;
use transcript_tree::transcript::{normalize_events, TranscriptLoader};

fn build_cli() -> Command {
    Command::new("transcript")
        .version(env!("CARGO_PKG_VERSION"))
        .about("View execution transcripts as nested event trees")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the log file (event array, sample or eval log JSON)")
                .required_unless_present("list-formats")
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format (default from config: treeviz)"),
        )
        .arg(
            Arg::new("sample")
                .long("sample")
                .short('s')
                .help("Index of the sample to show, for logs holding several")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("base-depth")
                .long("base-depth")
                .help("Depth assigned to root nodes")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("id")
                .long("id")
                .help("Namespace for generated row ids"),
        )
        .arg(
            Arg::new("show-ids")
                .long("show-ids")
                .help("Append row ids to outline lines")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the built-in defaults")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue),
        )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let matches = build_cli().get_matches();

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    match handle_show_command(&matches) {
        Ok(output) => print!("{}", output),
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    }
}

/// Layer the config file and command-line flags over the built-in defaults
fn load_config(matches: &ArgMatches) -> Result<TranscriptConfig, CliError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<PathBuf>("config") {
        loader = loader.with_file(path);
    }
    if let Some(format) = matches.get_one::<String>("format") {
        loader = loader.set_override("output.format", format.as_str())?;
    }
    if let Some(depth) = matches.get_one::<usize>("base-depth") {
        let depth = i64::try_from(*depth)
            .map_err(|_| CliError::Usage(format!("--base-depth {} is too large", depth)))?;
        loader = loader.set_override("tree.base_depth", depth)?;
    }
    if let Some(id) = matches.get_one::<String>("id") {
        loader = loader.set_override("dispatch.namespace", id.as_str())?;
    }
    if matches.get_flag("show-ids") {
        loader = loader.set_override("output.show_ids", true)?;
    }
    Ok(loader.build()?)
}

/// Handle the default command: load, build, print
fn handle_show_command(matches: &ArgMatches) -> Result<String, CliError> {
    let config = load_config(matches)?;
    let format: OutputFormat = config.output.format.parse()?;
    let path = matches
        .get_one::<PathBuf>("path")
        .ok_or_else(|| CliError::Usage("a log path is required".to_string()))?;
    let sample = matches.get_one::<usize>("sample").copied();

    let loader = TranscriptLoader::from_path(path)?;
    debug!(
        samples = loader.sample_count(),
        format = format.name(),
        "loaded log"
    );

    let output = match format {
        OutputFormat::Events => {
            let events = normalize_events(&loader.load_events(sample)?);
            let mut json = events_to_json_str(&events)?;
            json.push('\n');
            json
        }
        OutputFormat::Treeviz => to_treeviz_str(&loader.forest(sample, config.tree.base_depth)?),
        OutputFormat::Outline => {
            let forest = loader.forest(sample, config.tree.base_depth)?;
            let options = OutlineOptions {
                namespace: config.dispatch.namespace,
                show_ids: config.output.show_ids,
            };
            to_outline_str(&forest, &options)
        }
        OutputFormat::Json => {
            let forest = loader.forest(sample, config.tree.base_depth)?;
            let mut json = to_json_str(&forest, &config.dispatch.namespace)?;
            json.push('\n');
            json
        }
    };
    Ok(output)
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available output formats:\n");

    for format in OutputFormat::ALL {
        println!("  {}", format.name());
        println!("    {}", format.description());
        println!();
    }
}
