//! Delay Model Report - how well can we predict late deliveries?
//! Trains the delay classifier once and prints metrics, drivers and the riskiest orders.
//!
//! Run: ./target/release/train_report [--section SECTION] [model options]
//! Sections: all, metrics, importance, confusion, risk

use anyhow::Result;
use clap::Parser;
use nexgen_logistics::config::ModelArgs;
use nexgen_logistics::loader;
use nexgen_logistics::trainer::train_delay_model;
use nexgen_logistics::views::{self, RiskBand};

#[derive(Parser, Debug)]
#[command(name = "train_report")]
#[command(about = "Train the delivery-delay model and print its evaluation")]
struct Args {
    /// Report section to print
    #[arg(long, default_value = "all")]
    section: String,

    /// How many of the riskiest orders to list
    #[arg(long, default_value = "10")]
    top: usize,

    #[command(flatten)]
    model: ModelArgs,
}

fn print_section_header(title: &str) {
    println!("\n{}", "═".repeat(75));
    println!("  {}", title);
    println!("{}\n", "═".repeat(75));
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let args = Args::parse();
    let data = loader::load_all_data(&args.model.data_dir)?;
    let model = train_delay_model(&data.orders, &args.model.model_config())?;
    let overview = views::executive_overview(&data);
    let perf = views::model_performance(&model);

    println!("\n{}", "█".repeat(75));
    println!("{}  DELIVERY DELAY MODEL  {}", "█".repeat(25), "█".repeat(26));
    println!("{}", "█".repeat(75));

    let section = args.section.as_str();
    let all = section == "all";

    if all || section == "metrics" {
        print_section_header("1. MODEL METRICS");
        println!("  Orders:           {}", overview.total_orders);
        println!("  Delay rate:       {:.1}%", overview.delay_rate_pct);
        println!("  Train / test:     {} / {}", perf.train_size, perf.test_size);
        println!(
            "  Forest:           {} trees over {} features",
            model.forest.n_trees(),
            model.forest.n_features()
        );
        println!("  Accuracy:         {:.2}%", perf.accuracy_pct);
        match perf.roc_auc {
            Some(auc) => println!("  ROC-AUC:          {:.3}", auc),
            None => println!("  ROC-AUC:          n/a (single class in test split)"),
        }
    }

    if all || section == "importance" {
        print_section_header("2. WHAT DRIVES DELIVERY DELAYS?");
        for (feature, importance) in &perf.feature_importance {
            let bar = "▇".repeat((importance * 50.0).round() as usize);
            println!("  {:20} {:>7.3}  {}", feature, importance, bar);
        }
    }

    if all || section == "confusion" {
        print_section_header("3. CONFUSION MATRIX");
        let cm = &perf.confusion;
        println!("  {:16} {:>18} {:>18}", "", cm.col_labels[0], cm.col_labels[1]);
        for (label, row) in cm.row_labels.iter().zip(cm.values) {
            println!("  {:16} {:>18} {:>18}", label, row[0], row[1]);
        }
    }

    if all || section == "risk" {
        print_section_header("4. RISKIEST ORDERS");
        let mut scored: Vec<(String, f64)> = data
            .orders
            .iter()
            .map(|o| model.predict_order(o).map(|risk| (o.order_id.clone(), risk)))
            .collect::<Result<_>>()?;
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        println!("  {:14} {:>10} {:>10}", "Order", "Risk %", "Band");
        println!("  {}", "─".repeat(36));
        for (order_id, risk) in scored.iter().take(args.top) {
            let band = match RiskBand::from_percent(*risk) {
                RiskBand::High => "🔴 HIGH",
                RiskBand::Medium => "🟠 MEDIUM",
                RiskBand::Low => "🟢 LOW",
            };
            println!("  {:14} {:>9.1}% {:>10}", order_id, risk, band);
        }
    }

    println!("\n{}", "█".repeat(75));
    Ok(())
}
