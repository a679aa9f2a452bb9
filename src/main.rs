use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use eyre::{Context, Result, eyre};
use kartstore::config::{BackendConfig, default_config_path, default_data_dir};
use kartstore::{Config, Criteria, Snapshot, SortOrder, Store, TypedRecord, reset_sample_data, seed_sample_data};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kartstore")]
#[command(about = "kartstore CLI - inspect and maintain a CloudKart record store")]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/kartstore/config.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use this backend instead of the configured one
    #[arg(long, value_enum)]
    backend: Option<BackendKind>,

    /// Database file (sqlite) or directory (file) for --backend
    #[arg(short, long, requires = "backend")]
    path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendKind {
    Sqlite,
    File,
}

#[derive(Subcommand)]
enum Commands {
    /// Record count and last update of every table
    Stats,

    /// Print one page of a table
    List {
        table: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Print one record
    Get { table: String, id: String },

    /// Case-insensitive substring search
    Search {
        table: String,
        query: String,
        /// Restrict the search to this field (repeatable)
        #[arg(short, long = "field")]
        fields: Vec<String>,
    },

    /// Records matching every FIELD=VALUE; VALUE is JSON, a JSON array means "any of"
    Filter {
        table: String,
        #[arg(value_name = "FIELD=VALUE", required = true)]
        conditions: Vec<String>,
    },

    /// Print a table ordered by one field
    Sort {
        table: String,
        field: String,
        #[arg(long, default_value = "asc")]
        order: SortOrder,
    },

    /// Decode every record against its table's schema and report mismatches
    Check,

    /// Seed sample products and categories into empty tables
    Seed,

    /// Write every table as one JSON document
    Export {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace tables from a JSON document written by export
    Import { file: PathBuf },

    /// Remove all records from every table
    Clear {
        /// Seed the sample catalog again afterwards
        #[arg(long)]
        seed: bool,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = Config::load(&config_path).context("Failed to load config")?;
    if let Some(kind) = cli.backend {
        config.backend = backend_override(kind, cli.path.clone());
    }

    let mut store = Store::open(&config).context("Failed to open store")?;

    match cli.command {
        Commands::Stats => {
            println!("{} {} (v{})", "Store".bold(), store.name().cyan(), store.version());
            for (table, stats) in store.stats()? {
                let last = stats
                    .last_updated
                    .and_then(DateTime::<Utc>::from_timestamp_millis)
                    .map(|ts| kartstore::record::format_timestamp(&ts))
                    .unwrap_or_else(|| "-".to_string());
                println!("  {:<12} {:>6}  {}", table.green(), stats.count, last.dimmed());
            }
        }
        Commands::List { table, page, limit } => {
            let page = store.paginate(&table, page, limit)?;
            print_json(&page)?;
        }
        Commands::Get { table, id } => {
            let record = store.require(&table, &id)?;
            print_json(&record)?;
        }
        Commands::Search { table, query, fields } => {
            let records = store.search(&table, &query, fields.as_slice())?;
            print_json(&records)?;
        }
        Commands::Filter { table, conditions } => {
            let criteria = parse_criteria(&conditions)?;
            let records = store.filter(&table, &criteria)?;
            print_json(&records)?;
        }
        Commands::Sort { table, field, order } => {
            let records = store.sort(&table, &field, order)?;
            print_json(&records)?;
        }
        Commands::Check => {
            let mut failures = 0;
            for table in store.tables() {
                for record in store.read(table)? {
                    if let Err(e) = TypedRecord::from_record(table, &record) {
                        failures += 1;
                        println!("{} {}/{}: {}", "invalid".red(), table, record.id, e);
                    }
                }
            }
            if failures == 0 {
                println!("{}", "All records match their schemas".green());
            } else {
                return Err(eyre!("{} records do not match their schemas", failures));
            }
        }
        Commands::Seed => {
            let created = seed_sample_data(&mut store)?;
            println!("Seeded {} records", created);
        }
        Commands::Export { output } => {
            let data = store.export_data()?;
            let json = serde_json::to_string_pretty(&data)?;
            match output {
                Some(path) => {
                    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Exported {} tables to {}", data.len(), path.display());
                }
                None => println!("{}", json),
            }
        }
        Commands::Import { file } => {
            let contents = fs::read_to_string(&file).with_context(|| format!("Failed to read {}", file.display()))?;
            let data: Snapshot = serde_json::from_str(&contents).context("Import file is not a store export")?;
            let written = store.import_data(data)?;
            println!("Imported {} tables", written);
        }
        Commands::Clear { seed } => {
            if seed {
                let created = reset_sample_data(&mut store)?;
                println!("{} (seeded {} records)", "All tables cleared".yellow(), created);
            } else {
                store.clear_all()?;
                println!("{}", "All tables cleared".yellow());
            }
        }
    }

    Ok(())
}

fn backend_override(kind: BackendKind, path: Option<PathBuf>) -> BackendConfig {
    match kind {
        BackendKind::Sqlite => BackendConfig::Sqlite {
            path: path.unwrap_or_else(|| default_data_dir().join("kartstore.db")),
        },
        BackendKind::File => BackendConfig::File {
            dir: path.unwrap_or_else(|| default_data_dir().join("tables")),
        },
    }
}

fn parse_criteria(conditions: &[String]) -> Result<Criteria> {
    let mut map = Map::new();
    for condition in conditions {
        let (field, raw) = condition
            .split_once('=')
            .ok_or_else(|| eyre!("Expected FIELD=VALUE, got {:?}", condition))?;
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        map.insert(field.to_string(), value);
    }
    Ok(Criteria::from(map))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
