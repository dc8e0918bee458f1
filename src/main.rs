use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use billsynth::core::*;
use billsynth::export;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "billsynth",
    about = "Generate synthetic retail bills that add up to a sales total",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a batch of invoices
    Generate {
        /// Grand total the batch should add up to
        #[arg(short, long)]
        total: Decimal,

        /// Smallest number of invoices
        #[arg(long, default_value_t = 5)]
        min: usize,

        /// Largest number of invoices
        #[arg(long, default_value_t = 15)]
        max: usize,

        /// Seed for reproducible output
        #[arg(short, long)]
        seed: Option<u64>,

        /// Catalog file (name,price[,gst] per line)
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Customer file (one name per line)
        #[arg(long)]
        customers: Option<PathBuf>,

        /// Fill tuning as JSON (decimal fields as strings, e.g. "0.05")
        #[arg(long)]
        config: Option<PathBuf>,

        /// First bill date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last bill date (YYYY-MM-DD, defaults to --from)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Bill number prefix
        #[arg(short, long, default_value = "")]
        prefix: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the built-in catalog as CSV
    Catalog,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Csv,
    Summary,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            total,
            min,
            max,
            seed,
            catalog,
            customers,
            config,
            from,
            to,
            prefix,
            format,
            output,
        } => {
            let catalog = match catalog {
                Some(path) => parse_catalog(&read(&path)?)
                    .with_context(|| format!("loading catalog {}", path.display()))?,
                None => default_catalog(),
            };
            let customers = match customers {
                Some(path) => parse_customers(&read(&path)?),
                None => Vec::new(),
            };
            let fill_config: FillConfig = match config {
                Some(path) => serde_json::from_str(&read(&path)?)
                    .with_context(|| format!("parsing fill config {}", path.display()))?,
                None => FillConfig::default(),
            };

            let mut builder = BatchRequestBuilder::new(total, catalog)
                .invoice_count(min, max)
                .customers(customers)
                .prefix(prefix)
                .fill_config(fill_config);
            if let Some(start) = from {
                builder = builder.dates(start, to.unwrap_or(start));
            }
            let request = builder.build()?;

            let batch = InvoiceGenerator::new(seed).generate(&request)?;
            for notice in batch.unmet_notices() {
                eprintln!("warning: {notice}");
            }

            let rendered = match format {
                Format::Json => render_json(&batch)?,
                Format::Csv => export::to_csv(&batch.invoices),
                Format::Summary => export::summary_csv(&batch.invoices),
            };

            match output {
                Some(path) => {
                    fs::write(&path, rendered)
                        .with_context(|| format!("writing {}", path.display()))?;
                    eprintln!(
                        "{} bills, total {} (requested {}) written to {}",
                        batch.invoices.len(),
                        batch.grand_total(),
                        batch.total_sales,
                        path.display()
                    );
                }
                None => print!("{rendered}"),
            }
        }

        Commands::Catalog => {
            println!("name,price,gst");
            for entry in default_catalog() {
                println!("{},{},{}", entry.name, entry.unit_price, entry.gst_rate);
            }
        }
    }

    Ok(())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn render_json(batch: &Batch) -> Result<String> {
    let invoices: Vec<_> = batch
        .invoices
        .iter()
        .map(|inv| {
            serde_json::json!({
                "id": inv.id,
                "customer": inv.customer,
                "date": inv.date,
                "items": inv.items,
                "target": inv.target,
                "units": inv.total_quantity(),
                "subtotal": inv.subtotal(),
                "gst_total": inv.gst_total(),
                "status": inv.status,
            })
        })
        .collect();
    let doc = serde_json::json!({
        "total_sales": batch.total_sales,
        "grand_total": batch.grand_total(),
        "invoices": invoices,
    });
    Ok(serde_json::to_string_pretty(&doc)?)
}
