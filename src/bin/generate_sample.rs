//! Sample data generator for the NexGen dashboard
//!
//! Writes the seven input CSVs so the dashboard can run without the case-study
//! files. See `nexgen_logistics::sample` for how the rows are shaped.
//!
//! Usage:
//!   cargo run --release --bin generate_sample -- [OPTIONS]
//!
//! Options:
//!   --orders <N>      Number of orders (default: 200)
//!   --vehicles <N>    Fleet size (default: 50)
//!   --seed <N>        Random seed for reproducibility (optional)
//!   --out-dir <PATH>  Output directory (default: data)

use anyhow::Result;
use clap::Parser;
use nexgen_logistics::sample::{self, SampleConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

/// Generate the seven sample CSV files
#[derive(Parser, Debug)]
#[command(name = "generate_sample")]
#[command(about = "Generate sample logistics datasets for the dashboard")]
struct Args {
    /// Number of orders
    #[arg(long, default_value = "200")]
    orders: usize,

    /// Number of vehicles in the fleet
    #[arg(long, default_value = "50")]
    vehicles: usize,

    /// Share of orders that get a delivery, route and cost row (0.0 - 1.0)
    #[arg(long, default_value = "0.98")]
    coverage: f64,

    /// Share of orders with customer feedback (0.0 - 1.0)
    #[arg(long, default_value = "0.8")]
    feedback_rate: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory
    #[arg(long, default_value = "data")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("warn").init();

    let args = Args::parse();

    println!("🔧 NexGen Sample Data Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Orders:           {}", args.orders);
    println!("Vehicles:         {}", args.vehicles);
    println!("Coverage:         {:.0}%", args.coverage * 100.0);
    println!("Feedback rate:    {:.0}%", args.feedback_rate * 100.0);
    println!("Output:           {}", args.out_dir.display());
    if let Some(seed) = args.seed {
        println!("Random seed:      {}", seed);
    }
    println!();

    let mut rng: StdRng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let config = SampleConfig {
        orders: args.orders,
        vehicles: args.vehicles,
        coverage: args.coverage,
        feedback_rate: args.feedback_rate,
    };
    let tables = sample::generate(&config, &mut rng)?;

    println!("📝 Writing datasets...");
    tables.write_to(&args.out_dir)?;
    for (name, rows) in tables.row_counts() {
        println!("   {:28} {:>6} rows", name, rows);
    }

    println!("\n✅ Generation complete!");
    Ok(())
}
