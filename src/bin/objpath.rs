//! Simple CLI for path navigation
//!
//! Reads a JSON document from a file or stdin and reads, checks or writes the
//! value addressed by a path.

use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use objpath::{ContainerFactories, Navigator, Segment, Value, ValueType};
use serde::Serialize;
use serde_json::Value as JsonValue;

#[derive(Parser)]
#[command(name = "objpath")]
#[command(about = "Read, check and write values in JSON documents by path")]
#[command(version)]
struct Cli {
    /// Log level: -v for debug, -vv for trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value at a path
    Get {
        /// Path to read, e.g. `customer.addresses[0].city`
        path: String,
        /// JSON file (reads from stdin if not provided)
        #[arg(short, long)]
        file: Option<String>,
        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Print whether a path leads to a value; exits with 1 when it does not
    Exists {
        path: String,
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Write a value and print the updated document
    Set {
        path: String,
        /// JSON value to write; text that is not valid JSON is written as a string
        value: String,
        #[arg(short, long)]
        file: Option<String>,
        /// Create absent intermediates as empty objects
        #[arg(short, long)]
        create: bool,
        #[arg(short, long)]
        pretty: bool,
    },
    /// Parse a path and print its segments
    Parse { path: String },
}

#[derive(Serialize)]
struct ParsedSegment {
    kind: &'static str,
    text: String,
}

fn main() -> Result<()> {
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let navigator = Navigator::builder()
        .functions(objpath::FunctionRegistry::with_standard_functions())
        .build();

    match cli.command {
        Commands::Get { path, file, pretty } => handle_get(&navigator, &path, file.as_deref(), pretty),
        Commands::Exists { path, file } => handle_exists(&navigator, &path, file.as_deref()),
        Commands::Set {
            path,
            value,
            file,
            create,
            pretty,
        } => handle_set(&navigator, &path, &value, file.as_deref(), create, pretty),
        Commands::Parse { path } => handle_parse(&navigator, &path),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).init();
}

fn read_document(file: Option<&str>) -> Result<Value> {
    let content = match file {
        Some(filename) => {
            fs::read_to_string(filename).with_context(|| format!("reading file '{filename}'"))?
        }
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("reading from stdin")?;
            buffer
        }
    };
    let json: JsonValue = serde_json::from_str(&content).context("parsing JSON document")?;
    Ok(json.into())
}

fn print_json(value: &Value, pretty: bool) -> Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{output}");
    Ok(())
}

fn handle_get(navigator: &Navigator, path: &str, file: Option<&str>, pretty: bool) -> Result<()> {
    let document = read_document(file)?;
    let value = navigator
        .get_cow(&document, path)
        .with_context(|| format!("evaluating `{path}`"))?;
    print_json(&value, pretty)
}

fn handle_exists(navigator: &Navigator, path: &str, file: Option<&str>) -> Result<()> {
    let document = read_document(file)?;
    let exists = navigator.exists(&document, path)?;
    println!("{exists}");
    if !exists {
        std::process::exit(1);
    }
    Ok(())
}

fn handle_set(
    navigator: &Navigator,
    path: &str,
    raw_value: &str,
    file: Option<&str>,
    create: bool,
    pretty: bool,
) -> Result<()> {
    let mut document = read_document(file)?;
    let value: Value = serde_json::from_str::<JsonValue>(raw_value)
        .map(Value::from)
        .unwrap_or_else(|_| Value::string(raw_value));

    let written = if create {
        // JSON documents only hold maps and lists, whose entries are untyped
        let factories = ContainerFactories::new()
            .with_builtin_containers()
            .with(ValueType::Any, Value::map);
        navigator.set_creating(&mut document, path, value, &factories)
    } else {
        navigator.set(&mut document, path, value)
    };
    written.with_context(|| format!("writing `{path}`"))?;

    print_json(&document, pretty)
}

fn handle_parse(navigator: &Navigator, path: &str) -> Result<()> {
    let expression = navigator.parse(path)?;
    let segments: Vec<ParsedSegment> = expression
        .segments()
        .iter()
        .map(|segment: &Segment| ParsedSegment {
            kind: segment.kind_name(),
            text: segment.to_string(),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&segments)?);
    Ok(())
}
