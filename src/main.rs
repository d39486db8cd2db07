//! rpmspec — render and inspect RPM-style package spec files.
//!
//! Two modes:
//!
//! - `rpmspec parse [FILE]` — read a spec file (or stdin) and print the
//!   recovered structure as JSON, or a single entry with `--key`.
//! - `rpmspec render VALUES` — build a spec from a JSON mapping of
//!   canonical keys to values and print (or write) the spec text.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rpmspec::model::{Spec, Value};
use rpmspec::parser::{self, ParsedValue};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "rpmspec",
    about = "Render and inspect RPM-style package spec files"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a spec file and print the recovered structure as JSON
    Parse {
        /// Input spec file. Reads stdin when omitted.
        file: Option<PathBuf>,

        /// Print only the entry under this canonical key
        #[arg(short, long)]
        key: Option<String>,
    },
    /// Render a spec from a JSON mapping of canonical keys to values
    Render {
        /// JSON file mapping canonical keys to strings or string arrays
        values: PathBuf,

        /// Output file. Writes stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Parse { file, key } => cmd_parse(file.as_deref(), key.as_deref()),
        Command::Render { values, output } => cmd_render(&values, output.as_deref()),
    }
}

fn cmd_parse(file: Option<&Path>, key: Option<&str>) -> Result<()> {
    let content = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            input
        }
    };

    let spec = parser::parse(&content);

    match key {
        Some(key) => {
            let Some(value) = spec.get(key) else {
                bail!("no entry for key `{key}`");
            };
            match value {
                ParsedValue::Scalar(s) => println!("{s}"),
                ParsedValue::List(items) | ParsedValue::Lines(items) => {
                    for item in items {
                        println!("{item}");
                    }
                }
            }
        }
        None => {
            let json = serde_json::to_string_pretty(&spec).context("failed to encode JSON")?;
            println!("{json}");
        }
    }
    Ok(())
}

fn cmd_render(values_path: &Path, output: Option<&Path>) -> Result<()> {
    let raw = fs::read_to_string(values_path)
        .with_context(|| format!("failed to read {}", values_path.display()))?;
    let values: BTreeMap<String, Value> = serde_json::from_str(&raw)
        .with_context(|| format!("invalid values file: {}", values_path.display()))?;

    let mut spec = Spec::new();
    spec.populate(values);
    let text = spec.serialize().context("failed to serialize spec")?;

    match output {
        Some(path) => {
            fs::write(path, format!("{text}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => println!("{text}"),
    }
    Ok(())
}
