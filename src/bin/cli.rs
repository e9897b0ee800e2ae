//! ShardKV CLI
//!
//! Command-line interface for a store directory. Values are JSON.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use serde_json::Value;
use shardkv::{Config, Result, Store};
use tracing_subscriber::{fmt, EnvFilter};

/// ShardKV CLI
#[derive(Parser, Debug)]
#[command(name = "shardkv-cli")]
#[command(about = "CLI for the ShardKV partitioned key-value store")]
#[command(version)]
struct Args {
    /// Store directory
    #[arg(short, long, default_value = "./shardkv_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a store (no-op for partitions that already exist)
    Init {
        /// Number of partitions
        #[arg(short, long, default_value = "16")]
        partitions: usize,
    },

    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Put a key-value pair
    Put {
        /// The key to set
        key: String,

        /// The value, as JSON (e.g. '"text"', '42', '{"a":1}')
        value: String,
    },

    /// Show partition layout
    Info,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shardkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Commands::Init { partitions } => {
            let config = Config::builder()
                .data_dir(&args.data_dir)
                .partition_count(partitions)
                .build();
            let store: Store<Value> = Store::create_with(config)?;
            println!(
                "initialized {} with {} partitions",
                store.dir().display(),
                store.partition_count()
            );
        }
        Commands::Get { key } => {
            let store: Store<Value> = Store::restore(&args.data_dir)?;
            println!("{}", store.get(&key)?);
        }
        Commands::Put { key, value } => {
            let value: Value = serde_json::from_str(&value)?;
            let store: Store<Value> = Store::restore(&args.data_dir)?;
            store.put(&key, value)?;
            println!("OK");
        }
        Commands::Info => {
            let store: Store<Value> = Store::restore(&args.data_dir)?;
            println!("shardkv v{}", shardkv::VERSION);
            println!("directory: {}", store.dir().display());
            for partition in store.partitions() {
                println!("  partition {:>3}: {} keys", partition.index(), partition.len());
            }
            println!("total: {} keys", store.len());
        }
    }
    Ok(())
}
