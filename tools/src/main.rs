//! finqual-gen: writes a seeded, deliberately dirty financial dataset.
//!
//! Usage:
//!   finqual-gen --seed 42 --out-dir data
//!   finqual-gen --config gen.json --reference-time "2025-06-30 12:00:00" --db data.db

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::Parser;
use finqual_core::{
    export, report::DataQualityReport, store::DatasetStore, DatasetGenerator, GeneratorConfig,
};
use std::path::PathBuf;

/// Command-line arguments for finqual-gen. Flags override the config file.
#[derive(Parser, Debug)]
#[command(name = "finqual-gen")]
#[command(about = "Generate customers, accounts, transactions and credit history with injected data-quality defects")]
#[command(version)]
struct Args {
    /// JSON generator config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Master seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Primary customer rows
    #[arg(long, allow_hyphen_values = true)]
    customers: Option<i64>,

    /// Primary account rows
    #[arg(long, allow_hyphen_values = true)]
    accounts: Option<i64>,

    /// Primary transaction rows
    #[arg(long, allow_hyphen_values = true)]
    transactions: Option<i64>,

    /// Fixed "now" for every time window, e.g. "2025-06-30 12:00:00"
    #[arg(long, value_parser = parse_reference_time)]
    reference_time: Option<NaiveDateTime>,

    /// Directory for the CSV files
    #[arg(short, long, default_value = "data")]
    out_dir: PathBuf,

    /// Also load the tables into this SQLite database
    #[arg(long)]
    db: Option<PathBuf>,

    /// Write the data-quality report as JSON
    #[arg(long)]
    report_json: Option<PathBuf>,

    /// Skip the console report
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = build_config(&args)?;
    let generator = DatasetGenerator::new(config)?;

    if !args.quiet {
        println!("finqual-gen");
        println!("  seed:            {}", generator.seed());
        println!("  reference time:  {}", generator.clock().now());
        let counts = &generator.config().row_counts;
        println!(
            "  requested rows:  {} customers, {} accounts, {} transactions",
            counts.customers, counts.accounts, counts.transactions
        );
        let locales: Vec<&str> = generator.config().locales.iter().map(|l| l.code()).collect();
        println!("  locales:         {}", locales.join(", "));
        println!("  out dir:         {}", args.out_dir.display());
        println!();
    }

    let dataset = generator.generate_all()?;

    // Files are written only once every table is assembled.
    let written = export::write_dataset(&args.out_dir, &dataset)?;

    if let Some(db) = &args.db {
        let path = db.to_string_lossy();
        let store = DatasetStore::open(&path)?;
        store.migrate()?;
        let run_id = store.insert_run(
            generator.seed(),
            generator.clock().now(),
            env!("CARGO_PKG_VERSION"),
        )?;
        store.write_dataset(run_id, &dataset)?;
        log::info!("Stored run {run_id} in {path}");
    }

    let report = DataQualityReport::build(&dataset);
    if let Some(path) = &args.report_json {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display()))?;
    }

    if !args.quiet {
        print!("{}", report.render());
        println!();
        println!("=== GENERATION COMPLETE ===");
        println!("  total records:  {}", report.total_records());
        for path in &written {
            println!("  {}", path.display());
        }
    }
    Ok(())
}

fn build_config(args: &Args) -> Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(&path.to_string_lossy())?,
        None => GeneratorConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(n) = args.customers {
        config.row_counts.customers = n;
    }
    if let Some(n) = args.accounts {
        config.row_counts.accounts = n;
    }
    if let Some(n) = args.transactions {
        config.row_counts.transactions = n;
    }
    if let Some(t) = args.reference_time {
        config.reference_time = t;
    }
    Ok(config)
}

fn parse_reference_time(s: &str) -> Result<NaiveDateTime, String> {
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| format!("expected YYYY-MM-DD HH:MM:SS, got '{s}'"))
}
