use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use storedlist::{DurabilityMode, Format, StoreConfig, StoredList};

#[derive(Parser)]
#[command(name = "stored-tool")]
#[command(about = "Inspect and edit stored list snapshots")]
struct Cli {
    /// Snapshot file
    #[arg(long, short)]
    path: PathBuf,

    /// Snapshot encoding: json, json-pretty or msgpack
    #[arg(long, default_value = "json")]
    format: Format,

    /// Skip fsync on writes
    #[arg(long)]
    no_sync: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every element with its index
    Show,
    /// Print the number of elements
    Len,
    /// Append a JSON value
    Append { value: String },
    /// Insert a JSON value before INDEX
    Insert {
        #[arg(allow_negative_numbers = true)]
        index: isize,
        value: String,
    },
    /// Remove and print the element at INDEX (last by default)
    Pop {
        #[arg(allow_negative_numbers = true)]
        index: Option<isize>,
    },
    /// Remove every element
    Clear,
    /// Rewrite the snapshot into another file and format
    Convert {
        #[arg(long)]
        to: Format,
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let durability = if cli.no_sync {
        DurabilityMode::Async
    } else {
        DurabilityMode::Sync
    };
    let config = StoreConfig::new(&cli.path)
        .format(cli.format)
        .durability(durability);

    let mut list: StoredList<Value> = StoredList::from_config(&config, None)
        .with_context(|| format!("Failed to open '{}'", cli.path.display()))?;

    match cli.command {
        Command::Show => {
            for (index, value) in list.iter().enumerate() {
                println!("{}: {}", index, value);
            }
            Ok(())
        }
        Command::Len => {
            println!("{}", list.len());
            Ok(())
        }
        Command::Append { value } => {
            list.append(parse_value(&value)?)?;
            println!("Appended at {}", list.len() - 1);
            Ok(())
        }
        Command::Insert { index, value } => {
            list.insert(index, parse_value(&value)?)?;
            println!("Inserted; length is now {}", list.len());
            Ok(())
        }
        Command::Pop { index } => {
            let value = list.pop(index)?;
            println!("{}", value);
            Ok(())
        }
        Command::Clear => {
            let removed = list.len();
            list.clear()?;
            println!("Removed {} elements", removed);
            Ok(())
        }
        Command::Convert { to, out } => convert(list.into_vec(), to, out, durability),
    }
}

fn parse_value(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).or_else(|_| {
        if raw.trim().is_empty() {
            Err(anyhow!("Empty value. Pass JSON, e.g. 42, \"text\" or {{\"k\": 1}}"))
        } else {
            // bare words are taken as strings
            Ok(Value::String(raw.to_string()))
        }
    })
}

fn convert(items: Vec<Value>, to: Format, out: PathBuf, durability: DurabilityMode) -> Result<()> {
    let config = StoreConfig::new(&out).format(to).durability(durability);
    let converted = StoredList::from_config(&config, Some(items))
        .with_context(|| format!("Failed to write '{}'", out.display()))?;

    println!(
        "Wrote {} elements as {} to {}",
        converted.len(),
        to,
        out.display()
    );
    Ok(())
}
