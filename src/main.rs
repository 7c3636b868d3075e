use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use xmlobj::{Config, Parsed};

#[derive(Debug, Parser)]
#[command(
    name = "xmlobj",
    version,
    about = "Parse, validate and convert a minimal XML dialect"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
    /// Output file (defaults to stdout)
    #[arg(short, long, global = true, value_name = "OUTPUT")]
    output: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse XML and print it as JSON
    #[command(alias = "to-json")]
    Parse(ParseArgs),
    /// Check whether the input is valid XML; exits with 1 when it is not
    Validate {
        /// Input file (defaults to stdin)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
    },
    /// Convert a JSON object to XML
    ToXml {
        /// Input file (defaults to stdin)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
        /// Escape &, <, > and " in values
        #[arg(long)]
        escape: bool,
    },
}

#[derive(Debug, ClapArgs)]
struct ParseArgs {
    /// Input file (defaults to stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
    /// Only split the top level, keeping inner text untouched
    #[arg(long, conflicts_with = "plain")]
    raw: bool,
    /// Skip attribute extraction
    #[arg(long)]
    no_attributes: bool,
    /// Drop attributes and print leaves as plain strings
    #[arg(long)]
    plain: bool,
    /// Decode entities in values and attributes
    #[arg(long)]
    unescape: bool,
    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();

    match run(Args::parse()) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let (output, code) = match args.command {
        Command::Parse(parse_args) => (parse(&parse_args)?, ExitCode::SUCCESS),
        Command::Validate { input } => {
            let text = read_input(&input)?;
            if xmlobj::is_valid(&text) {
                ("valid\n".to_string(), ExitCode::SUCCESS)
            } else {
                ("invalid\n".to_string(), ExitCode::FAILURE)
            }
        }
        Command::ToXml { input, escape } => {
            let text = read_input(&input)?;
            let config = Config::default().with_escape_entities(escape);
            let xml = xmlobj::json_to_xml_with_config(&text, config)
                .context("failed to convert JSON to XML")?;
            (xml, ExitCode::SUCCESS)
        }
    };

    write_output(&args.output, output.as_bytes())?;
    Ok(code)
}

fn parse(args: &ParseArgs) -> Result<String> {
    let text = read_input(&args.input)?;
    let config = Config::default()
        .with_parse_children(!args.raw)
        .with_attributes(!args.no_attributes)
        .with_escape_entities(args.unescape);
    debug!(?config, "parsing input");

    let parsed = xmlobj::parse_with_config(&text, config).context("failed to parse XML")?;
    let json = match (&parsed, args.plain) {
        (Parsed::Tree(tree), true) => tree.to_plain_json(),
        _ => serde_json::to_value(&parsed)?,
    };

    let mut rendered = if args.pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };
    rendered.push('\n');
    Ok(rendered)
}

fn read_input(path: &Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => {
            info!("Reading file: {}", path.display());
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read input file {}", path.display()))
        }
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            if buffer.trim().is_empty() {
                bail!("no input provided on stdin");
            }
            Ok(buffer)
        }
    }
}

fn write_output(path: &Option<PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(data).context("failed to write stdout")?;
            Ok(())
        }
    }
}
